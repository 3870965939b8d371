use crate::boundary::BoundarySet;
use crate::filter::{self, FilterOptions, Selection};
use crate::map::model::LatLon;
use crate::map::{service as map_service, MapDocument};
use crate::photo::PhotoLibrary;
use crate::record::{loader, sanitize};
use crate::Result;
use tracing::info;

pub const NO_RESULTS_MESSAGE: &str = "선택한 조건에 대한 정보가 없습니다.";

pub struct Spreadsheet {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Everything one interaction submits: the sheet, the photos, and the
/// current filter choices.
pub struct Input {
    pub spreadsheet: Spreadsheet,
    pub photos: PhotoLibrary,
    pub selection: Selection,
}

#[derive(Debug)]
pub struct Outcome {
    /// Rows with usable coordinates, before filtering.
    pub row_count: usize,
    pub options: FilterOptions,
    pub map: Option<MapDocument>,
    pub message: Option<String>,
}

/// One full pass from upload to map. Holds no state between calls; a filter
/// change is just another call with the same files.
pub fn run(input: Input, boundaries: &BoundarySet) -> Result<Outcome> {
    let raw = loader::load(&input.spreadsheet.file_name, &input.spreadsheet.bytes)?;
    let records = sanitize::sanitize(raw);
    let options = filter::options(&records);
    let filtered = filter::apply(&records, &input.selection);
    info!(
        rows = records.len(),
        filtered = filtered.len(),
        photos = input.photos.len(),
        "Rendering dashboard"
    );
    let center = match sanitize::mean_position(&records) {
        Some((lat, lon)) if !filtered.is_empty() => LatLon { lat, lon },
        _ => {
            return Ok(Outcome {
                row_count: records.len(),
                options,
                map: None,
                message: Some(NO_RESULTS_MESSAGE.into()),
            })
        }
    };
    let features = boundaries.select(&input.selection.district_codes());
    let map = map_service::compose(center, &filtered, &features, &input.photos);
    Ok(Outcome {
        row_count: records.len(),
        options,
        map: Some(map),
        message: None,
    })
}

#[cfg(test)]
mod test {
    use super::{run, Input, Spreadsheet, NO_RESULTS_MESSAGE};
    use crate::district::ENTIRE_REGION;
    use crate::filter::Selection;
    use crate::photo::PhotoLibrary;
    use crate::test::{mock_boundaries, mock_csv, MOCK_HEADER};
    use crate::Error;

    fn input(csv: String, selection: Selection) -> Input {
        Input {
            spreadsheet: Spreadsheet {
                file_name: "records.csv".into(),
                bytes: csv.into_bytes(),
            },
            photos: PhotoLibrary::default(),
            selection,
        }
    }

    fn sheet() -> String {
        mock_csv(&[
            "중구 청사,중앙동 1,중구,업무시설,100,200,1000,가,2021,35.10,129.03,a.jpg",
            "해운대 도서관,우동 1,해운대구,문화시설,100,200,1000,나,2022,35.16,129.16,b.jpg",
            "좌표 없음,어딘가,해운대구,문화시설,100,200,1000,다,2023,미정,129.16,",
        ])
    }

    #[test]
    fn run_without_filters() {
        let outcome = run(input(sheet(), Selection::default()), &mock_boundaries()).unwrap();
        assert_eq!(2, outcome.row_count);
        let map = outcome.map.unwrap();
        assert_eq!(2, map.clusters.len());
        // No district selected means no boundaries, but every pin is drawn
        assert!(map.overlay.is_none());
        assert!((map.center.lat - 35.13).abs() < 1e-9);
        assert!((map.center.lon - 129.095).abs() < 1e-9);
    }

    #[test]
    fn run_drops_invalid_coordinates() {
        let outcome = run(input(sheet(), Selection::default()), &mock_boundaries()).unwrap();
        let names: Vec<String> = outcome
            .map
            .unwrap()
            .clusters
            .iter()
            .flat_map(|it| it.pins.iter())
            .map(|it| it.tooltip.clone())
            .collect();
        assert!(!names.iter().any(|it| it.contains("좌표 없음")));
    }

    #[test]
    fn run_with_entire_region() {
        let selection = Selection {
            districts: vec![ENTIRE_REGION.into()],
            usages: vec!["문화시설".into()],
        };
        let outcome = run(input(sheet(), selection), &mock_boundaries()).unwrap();
        let map = outcome.map.unwrap();
        assert_eq!(1, map.clusters.len());
        assert_eq!("26350", map.clusters[0].district_code);
        assert_eq!(3, map.overlay.unwrap().shapes.len());
        assert_eq!(2, map.labels.len());
        // The center still averages the whole dataset
        assert!((map.center.lat - 35.13).abs() < 1e-9);
    }

    #[test]
    fn run_no_results() {
        let selection = Selection {
            districts: vec!["중구".into()],
            usages: vec!["문화시설".into()],
        };
        let outcome = run(input(sheet(), selection), &mock_boundaries()).unwrap();
        assert!(outcome.map.is_none());
        assert_eq!(Some(NO_RESULTS_MESSAGE.to_string()), outcome.message);
        assert_eq!(vec!["업무시설", "문화시설"], outcome.options.usages);
    }

    #[test]
    fn run_missing_column() {
        let header = MOCK_HEADER.replace(",사진 경로", "");
        let csv = format!("{header}\na,b,중구,c,1,2,3,d,e,35.1,129.0\n");
        let res = run(input(csv, Selection::default()), &mock_boundaries());
        assert!(matches!(res, Err(Error::InvalidInput(_))));
    }
}
