use crate::district::DistrictCode;
use crate::{Error, Result};
use geo::{MultiPolygon, Polygon};
use geojson::{GeoJson, Geometry};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::{debug, warn};

const PROP_CODE: &str = "sgg";
const PROP_NAME: &str = "sggnm";
const UNKNOWN_NAME: &str = "Unknown";

/// One polygon (or multipolygon) of an administrative district.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    pub code: DistrictCode,
    pub name: String,
    // Kept as received so the overlay draws the source geometry untouched
    pub geometry: Geometry,
    pub shape: MultiPolygon<f64>,
}

/// Every district polygon of the region, loaded once per process.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundarySet {
    features: Vec<BoundaryFeature>,
}

impl BoundarySet {
    pub fn parse(json: &str) -> Result<BoundarySet> {
        let geo_json: GeoJson = json.parse().map_err(|e| {
            Error::BoundaryFetch(format!("Failed to parse district boundaries: {e}"))
        })?;
        let collection = match geo_json {
            GeoJson::FeatureCollection(fc) => fc,
            _ => Err(Error::BoundaryFetch(
                "District boundaries must be a FeatureCollection".into(),
            ))?,
        };
        let mut features = vec![];
        for feature in collection.features {
            let code = match feature.property(PROP_CODE) {
                Some(Value::String(s)) => DistrictCode::parse(s),
                Some(Value::Number(n)) => DistrictCode::parse(&n.to_string()),
                _ => None,
            };
            let Some(code) = code else {
                debug!(id = ?feature.id, "Skipping feature outside of the district table");
                continue;
            };
            let name = feature
                .property(PROP_NAME)
                .and_then(|it| it.as_str())
                .unwrap_or(UNKNOWN_NAME)
                .to_string();
            let Some(geometry) = feature.geometry else {
                warn!(%code, "Skipping feature without geometry");
                continue;
            };
            let shape: MultiPolygon<f64> = match &geometry.value {
                geojson::Value::MultiPolygon(_) => (&geometry.value)
                    .try_into()
                    .map_err(|e| Error::BoundaryFetch(format!("Invalid multipolygon: {e}")))?,
                geojson::Value::Polygon(_) => {
                    let polygon: Polygon<f64> = (&geometry.value)
                        .try_into()
                        .map_err(|e| Error::BoundaryFetch(format!("Invalid polygon: {e}")))?;
                    MultiPolygon::new(vec![polygon])
                }
                _ => {
                    warn!(%code, "Skipping non-polygon feature");
                    continue;
                }
            };
            features.push(BoundaryFeature {
                code,
                name,
                geometry,
                shape,
            });
        }
        Ok(BoundarySet { features })
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Features of the given districts, in source order.
    pub fn select(&self, codes: &BTreeSet<DistrictCode>) -> Vec<&BoundaryFeature> {
        self.features
            .iter()
            .filter(|it| codes.contains(&it.code))
            .collect()
    }
}
