use super::model::{RawRecord, Record};
use tracing::debug;

/// Drops rows whose latitude or longitude can't be read as a number. Must run
/// before anything averages coordinates.
pub fn sanitize(raw: Vec<RawRecord>) -> Vec<Record> {
    let total = raw.len();
    let records: Vec<Record> = raw.into_iter().filter_map(to_record).collect();
    if records.len() < total {
        debug!(
            dropped = total - records.len(),
            "Dropped rows with invalid coordinates"
        );
    }
    records
}

fn to_record(raw: RawRecord) -> Option<Record> {
    let latitude = raw.latitude.to_number()?;
    let longitude = raw.longitude.to_number()?;
    Some(Record {
        project_name: raw.project_name,
        address: raw.address,
        district: raw.district,
        usage: raw.usage,
        site_area: raw.site_area,
        floor_area: raw.floor_area,
        total_cost: raw.total_cost,
        designer: raw.designer,
        announced: raw.announced,
        latitude,
        longitude,
        photo: raw.photo,
    })
}

/// Arithmetic mean of all record positions as (lat, lon).
pub fn mean_position(records: &[Record]) -> Option<(f64, f64)> {
    if records.is_empty() {
        return None;
    }
    let n = records.len() as f64;
    let lat = records.iter().map(|it| it.latitude).sum::<f64>() / n;
    let lon = records.iter().map(|it| it.longitude).sum::<f64>() / n;
    Some((lat, lon))
}
