use super::model::{
    Cluster, ClusterOptions, DistrictShape, Label, LatLon, MapDocument, Overlay, Pin, TileLayer,
};
use super::popup;
use crate::boundary::service::{label_font_size, label_points};
use crate::boundary::BoundaryFeature;
use crate::district::DistrictCode;
use crate::photo::PhotoLibrary;
use crate::record::Record;
use tracing::{debug, warn};

pub const TITLE: &str = "부산광역시 설계공모 당선작 지도";
pub const INITIAL_ZOOM: u8 = 11;

const OVERLAY_NAME: &str = "자치구";
const BORDER_COLOR: &str = "white";
const BORDER_WEIGHT: f64 = 1.4;
const FILL_OPACITY: f64 = 0.4;

/// Lays out the map: district polygons, one label per district, and one
/// cluster per district holding the filtered records. `center` comes from
/// the whole dataset, not the filtered subset.
pub fn compose(
    center: LatLon,
    records: &[&Record],
    features: &[&BoundaryFeature],
    photos: &PhotoLibrary,
) -> MapDocument {
    let overlay = Overlay {
        name: OVERLAY_NAME.into(),
        border_color: BORDER_COLOR.into(),
        weight: BORDER_WEIGHT,
        fill_opacity: FILL_OPACITY,
        shapes: features
            .iter()
            .map(|it| DistrictShape {
                code: it.code.to_string(),
                name: it.name.clone(),
                fill_color: it.code.fill_color().into(),
                geometry: it.geometry.clone(),
            })
            .collect(),
    };
    let font_size = label_font_size(INITIAL_ZOOM);
    let labels = label_points(features)
        .into_iter()
        .map(|it| Label {
            position: LatLon {
                lat: it.position.y,
                lon: it.position.x,
            },
            text: it.name,
            font_size: font_size.into(),
        })
        .collect();
    MapDocument {
        title: TITLE.into(),
        center,
        zoom: INITIAL_ZOOM,
        tiles: TileLayer::cartodb_positron(),
        overlay: (!features.is_empty()).then_some(overlay),
        labels,
        clusters: clusters(records, photos),
    }
}

fn clusters(records: &[&Record], photos: &PhotoLibrary) -> Vec<Cluster> {
    let mut clusters: Vec<Cluster> = vec![];
    for record in records {
        let Some(code) = DistrictCode::from_name(&record.district) else {
            warn!(
                district = %record.district,
                project = %record.project_name,
                "Skipping record with unknown district"
            );
            continue;
        };
        let pin = Pin {
            position: LatLon {
                lat: record.latitude,
                lon: record.longitude,
            },
            tooltip: popup::tooltip(record),
            popup: popup::build(record, photos),
        };
        match clusters
            .iter_mut()
            .find(|it| it.district_code == code.as_str())
        {
            Some(cluster) => cluster.pins.push(pin),
            None => {
                debug!(%code, "Creating cluster");
                clusters.push(Cluster {
                    district_code: code.to_string(),
                    options: ClusterOptions::default(),
                    pins: vec![pin],
                });
            }
        }
    }
    clusters
}
