use crate::boundary::BoundarySet;
use serde_json::{json, Value};

pub const MOCK_HEADER: &str =
    "사업명,주소,시군구,용도,대지면적,연면적,총사업비,설계자,당선작 발표,위도,경도,사진 경로";

pub fn mock_csv(rows: &[&str]) -> String {
    let mut csv = MOCK_HEADER.to_string();
    for row in rows {
        csv.push('\n');
        csv.push_str(row);
    }
    csv.push('\n');
    csv
}

fn square(lon: f64, lat: f64, size: f64) -> Value {
    json!([[
        [lon, lat],
        [lon + size, lat],
        [lon + size, lat + size],
        [lon, lat + size],
        [lon, lat]
    ]])
}

fn feature(sgg: Value, name: &str, geometry: Value) -> Value {
    json!({
        "type": "Feature",
        "properties": { "sgg": sgg, "sggnm": name },
        "geometry": geometry
    })
}

/// Two districts worth of dong-level shapes, plus one feature with an
/// unknown code and one that is not a polygon.
pub fn mock_boundaries_json() -> String {
    json!({
        "type": "FeatureCollection",
        "features": [
            feature(json!("26110"), "중구", json!({
                "type": "Polygon",
                "coordinates": square(129.0, 35.0, 0.02)
            })),
            feature(json!(26350), "해운대구", json!({
                "type": "MultiPolygon",
                "coordinates": [square(129.15, 35.16, 0.01), square(129.17, 35.16, 0.01)]
            })),
            feature(json!("26350"), "해운대구", json!({
                "type": "Polygon",
                "coordinates": square(129.15, 35.18, 0.02)
            })),
            feature(json!("99999"), "어딘가", json!({
                "type": "Polygon",
                "coordinates": square(128.0, 34.0, 0.01)
            })),
            feature(json!("26140"), "서구", json!({
                "type": "LineString",
                "coordinates": [[129.01, 35.09], [129.02, 35.10]]
            })),
        ]
    })
    .to_string()
}

pub fn mock_boundaries() -> BoundarySet {
    BoundarySet::parse(&mock_boundaries_json()).unwrap()
}

/// Builds a multipart/form-data body. Parts with a file name are sent as
/// file uploads.
pub fn mock_multipart(parts: &[(&str, Option<&str>, &[u8])]) -> (String, Vec<u8>) {
    let boundary = "----competition-map-test";
    let mut body = vec![];
    for (name, file_name, bytes) in parts {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        match file_name {
            Some(file_name) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}
