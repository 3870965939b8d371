use super::{BoundaryFeature, BoundarySet};
use crate::conf::Conf;
use crate::district::DistrictCode;
use crate::{Error, Result};
use geo::{coord, Coord};
use reqwest::StatusCode;
use std::{fs, path::Path, time::Instant};
use tracing::info;

pub async fn load(conf: &Conf) -> Result<BoundarySet> {
    let boundaries = match &conf.boundary_path {
        Some(path) => load_file(path)?,
        None => fetch(&conf.boundary_url).await?,
    };
    if boundaries.is_empty() {
        Err(Error::BoundaryFetch(
            "District boundaries have no known districts".into(),
        ))?
    }
    Ok(boundaries)
}

pub async fn fetch(url: &str) -> Result<BoundarySet> {
    let started_at = Instant::now();
    info!(url, "Fetching district boundaries");
    let res = reqwest::get(url).await.map_err(|e| {
        Error::BoundaryFetch(format!("Failed to fetch district boundaries: {e}"))
    })?;
    if res.status() != StatusCode::OK {
        Err(Error::BoundaryFetch(format!(
            "Failed to fetch district boundaries, unexpected status code: {:?}",
            res.status(),
        )))?
    }
    let body = res.text().await.map_err(|e| {
        Error::BoundaryFetch(format!("Failed to read district boundaries: {e}"))
    })?;
    let boundaries = BoundarySet::parse(&body)?;
    let time_ms = started_at.elapsed().as_millis();
    info!(
        features = boundaries.len(),
        time_ms, "Fetched district boundaries"
    );
    Ok(boundaries)
}

pub fn load_file(path: &Path) -> Result<BoundarySet> {
    info!(?path, "Loading district boundaries");
    let body = fs::read_to_string(path).map_err(|e| {
        Error::BoundaryFetch(format!("Failed to read district boundaries {path:?}: {e}"))
    })?;
    let boundaries = BoundarySet::parse(&body)?;
    info!(features = boundaries.len(), "Loaded district boundaries");
    Ok(boundaries)
}

#[derive(Debug, Clone, PartialEq)]
pub struct DistrictLabel {
    pub code: DistrictCode,
    pub name: String,
    pub position: Coord<f64>,
}

/// Label anchor per district: the plain mean of every outer ring vertex of
/// every polygon of that district. Not an area centroid, but it always lands
/// inside the convex hull of the vertices. Districts keep the order in which
/// they first appear.
pub fn label_points(features: &[&BoundaryFeature]) -> Vec<DistrictLabel> {
    let mut sums: Vec<(DistrictCode, &str, f64, f64, usize)> = vec![];
    for feature in features.iter().copied() {
        let index = match sums.iter().position(|it| it.0 == feature.code) {
            Some(index) => index,
            None => {
                sums.push((feature.code, feature.name.as_str(), 0.0, 0.0, 0));
                sums.len() - 1
            }
        };
        let entry = &mut sums[index];
        for polygon in &feature.shape {
            for vertex in polygon.exterior().coords() {
                entry.2 += vertex.x;
                entry.3 += vertex.y;
                entry.4 += 1;
            }
        }
    }
    sums.into_iter()
        .filter(|it| it.4 > 0)
        .map(|(code, name, x, y, n)| DistrictLabel {
            code,
            name: name.to_string(),
            position: coord! { x: x / n as f64, y: y / n as f64 },
        })
        .collect()
}

pub fn label_font_size(zoom: u8) -> &'static str {
    if zoom <= 10 {
        "14px"
    } else if zoom <= 12 {
        "10px"
    } else {
        "8px"
    }
}
