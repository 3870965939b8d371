use crate::map::MapDocument;
use crate::{Error, Result};
use minijinja::{context, Environment, Value};
use std::sync::OnceLock;

pub const FILE_NAME: &str = "map.html";
pub const CONTENT_TYPE: &str = "text/html; charset=utf-8";

const TEMPLATE_NAME: &str = "map.html";
const DATA_OPEN: &str = r#"<script type="application/json" id="map-data">"#;
const DATA_CLOSE: &str = "</script>";

static TEMPLATES: OnceLock<Environment<'static>> = OnceLock::new();

fn templates() -> Result<&'static Environment<'static>> {
    if let Some(env) = TEMPLATES.get() {
        return Ok(env);
    }
    let mut env = Environment::new();
    env.add_template(TEMPLATE_NAME, MAP_TEMPLATE)?;
    Ok(TEMPLATES.get_or_init(|| env))
}

/// Renders a standalone page. The page needs nothing but the Leaflet CDN, so
/// the same bytes can be shown inline and saved to disk.
pub fn to_html(doc: &MapDocument) -> Result<String> {
    // Escaping every '<' keeps "</script>" in user text from closing the tag
    let data = serde_json::to_string(doc)?.replace('<', "\\u003c");
    let html = templates()?.get_template(TEMPLATE_NAME)?.render(context! {
        title => doc.title.as_str(),
        data => Value::from_safe_string(data),
    })?;
    Ok(html)
}

/// Reads the map description back out of an exported page.
pub fn extract(html: &str) -> Result<MapDocument> {
    let start = html
        .find(DATA_OPEN)
        .map(|it| it + DATA_OPEN.len())
        .ok_or(Error::InvalidInput("Page has no embedded map data".into()))?;
    let len = html[start..]
        .find(DATA_CLOSE)
        .ok_or(Error::InvalidInput("Embedded map data is not terminated".into()))?;
    Ok(serde_json::from_str(&html[start..start + len])?)
}

const MAP_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="ko">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{ title }}</title>
  <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
  <link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.css" />
  <link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.Default.css" />
  <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
  <script src="https://unpkg.com/leaflet.markercluster@1.5.3/dist/leaflet.markercluster.js"></script>
  <style>
    html, body, #map { width: 100%; height: 100%; margin: 0; padding: 0; }
    .district-label { color: gray; letter-spacing: 0.2px; font-weight: bold; opacity: 0.7; white-space: nowrap; }
    .popup-body { font-family: sans-serif; font-size: 12px; }
    .popup-photo { padding-top: 5px; }
    .cluster-icon { border-radius: 50%; text-align: center; font-size: 12px; }
  </style>
</head>
<body>
  <div id="map"></div>
  <script type="application/json" id="map-data">{{ data }}</script>
  <script>
    (function () {
      var doc = JSON.parse(document.getElementById('map-data').textContent);
      var map = L.map('map').setView([doc.center.lat, doc.center.lon], doc.zoom);

      L.tileLayer(doc.tiles.url, {
        attribution: doc.tiles.attribution,
        subdomains: doc.tiles.subdomains,
        maxZoom: doc.tiles.max_zoom
      }).addTo(map);

      if (doc.overlay) {
        var overlay = doc.overlay;
        var districts = L.geoJSON({
          type: 'FeatureCollection',
          features: overlay.shapes.map(function (shape) {
            return {
              type: 'Feature',
              properties: { sgg: shape.code, sggnm: shape.name, fill: shape.fill_color },
              geometry: shape.geometry
            };
          })
        }, {
          style: function (feature) {
            return {
              fillColor: feature.properties.fill,
              color: overlay.border_color,
              weight: overlay.weight,
              fillOpacity: overlay.fill_opacity
            };
          }
        });
        districts.addTo(map);
        L.control.layers(null, (function () { var o = {}; o[overlay.name] = districts; return o; })()).addTo(map);
      }

      doc.labels.forEach(function (label) {
        var text = document.createElement('div');
        text.className = 'district-label';
        text.style.fontSize = label.font_size;
        text.textContent = label.text;
        L.marker([label.position.lat, label.position.lon], {
          icon: L.divIcon({ html: text, className: '', iconSize: null }),
          interactive: false
        }).addTo(map);
      });

      function line(parent, text) {
        parent.appendChild(document.createTextNode(text));
        parent.appendChild(document.createElement('br'));
      }

      function popupContent(popup) {
        var root = document.createElement('div');
        var body = document.createElement('div');
        body.className = 'popup-body';
        var title = document.createElement('b');
        title.textContent = popup.title;
        body.appendChild(title);
        body.appendChild(document.createElement('br'));
        popup.fields.forEach(function (field) {
          line(body, '[' + field.label + '] ' + field.value);
        });
        root.appendChild(body);
        var photos = document.createElement('div');
        photos.className = 'popup-photo';
        if (popup.photo) {
          var img = document.createElement('img');
          img.src = 'data:' + popup.photo.mime_type + ';base64,' + popup.photo.data;
          img.style.width = popup.photo.width + 'px';
          img.style.height = 'auto';
          photos.appendChild(img);
        }
        root.appendChild(photos);
        return root;
      }

      doc.clusters.forEach(function (cluster) {
        var options = cluster.options;
        var group = L.markerClusterGroup({
          maxClusterRadius: options.max_cluster_radius,
          showCoverageOnHover: options.show_coverage_on_hover,
          iconCreateFunction: function (c) {
            var size = options.icon_size;
            var icon = document.createElement('div');
            icon.className = 'cluster-icon';
            icon.style.backgroundColor = options.icon_color;
            icon.style.width = size + 'px';
            icon.style.height = size + 'px';
            icon.style.lineHeight = size + 'px';
            icon.textContent = c.getChildCount();
            return new L.DivIcon({ html: icon, className: 'my-div', iconSize: L.point(size, size) });
          }
        });
        cluster.pins.forEach(function (pin) {
          var tooltip = document.createElement('span');
          tooltip.textContent = pin.tooltip;
          L.marker([pin.position.lat, pin.position.lon])
            .bindTooltip(tooltip)
            .bindPopup(popupContent(pin.popup), { maxWidth: pin.popup.max_width })
            .addTo(group);
        });
        map.addLayer(group);
      });
    })();
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod test {
    use super::{extract, to_html};
    use crate::map::model::LatLon;
    use crate::map::service::compose;
    use crate::photo::PhotoLibrary;
    use crate::record::Record;
    use crate::test::mock_boundaries;
    use crate::Error;

    #[test]
    fn round_trip() {
        let boundaries = mock_boundaries();
        let features = boundaries.select(&crate::district::DistrictCode::all().collect());
        let record = Record::mock();
        let mut photos = PhotoLibrary::default();
        photos.insert("library.jpg", vec![1, 2, 3, 4]);
        let doc = compose(
            LatLon {
                lat: 35.1631,
                lon: 129.1635,
            },
            &[&record],
            &features,
            &photos,
        );
        let html = to_html(&doc).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>부산광역시 설계공모 당선작 지도</title>"));
        assert_eq!(doc, extract(&html).unwrap());
    }

    #[test]
    fn user_text_cannot_close_script() {
        let record = Record {
            project_name: "</script><script>alert(1)</script>".into(),
            ..Record::mock()
        };
        let doc = compose(
            LatLon { lat: 35.0, lon: 129.0 },
            &[&record],
            &[],
            &PhotoLibrary::default(),
        );
        let html = to_html(&doc).unwrap();
        assert!(!html.contains("alert(1)</script>"));
        assert_eq!(doc, extract(&html).unwrap());
    }

    #[test]
    fn missing_photo_leaves_no_image() {
        let doc = compose(
            LatLon { lat: 35.0, lon: 129.0 },
            &[&Record::mock()],
            &[],
            &PhotoLibrary::default(),
        );
        let html = to_html(&doc).unwrap();
        assert!(!html.contains("data:image"));
        assert!(!html.contains("\"photo\""));
    }

    #[test]
    fn extract_plain_page() {
        let res = extract("<html><body>hello</body></html>");
        assert!(matches!(res, Err(Error::InvalidInput(_))));
    }
}
