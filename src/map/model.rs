use geojson::Geometry;
use serde::{Deserialize, Serialize};

/// Everything needed to draw the map, independent of markup. The exported
/// page embeds this as JSON and draws it with Leaflet.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct MapDocument {
    pub title: String,
    pub center: LatLon,
    pub zoom: u8,
    pub tiles: TileLayer,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<Overlay>,
    pub labels: Vec<Label>,
    pub clusters: Vec<Cluster>,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Copy)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct TileLayer {
    pub name: String,
    pub url: String,
    pub attribution: String,
    pub subdomains: String,
    pub max_zoom: u8,
}

impl TileLayer {
    pub fn cartodb_positron() -> TileLayer {
        TileLayer {
            name: "cartodbpositron".into(),
            url: "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png".into(),
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors &copy; <a href=\"https://carto.com/attributions\">CARTO</a>".into(),
            subdomains: "abcd".into(),
            max_zoom: 20,
        }
    }
}

/// District polygons drawn under the pins.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Overlay {
    pub name: String,
    pub border_color: String,
    pub weight: f64,
    pub fill_opacity: f64,
    pub shapes: Vec<DistrictShape>,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct DistrictShape {
    pub code: String,
    pub name: String,
    pub fill_color: String,
    pub geometry: Geometry,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Label {
    pub position: LatLon,
    pub text: String,
    pub font_size: String,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Cluster {
    pub district_code: String,
    pub options: ClusterOptions,
    pub pins: Vec<Pin>,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct ClusterOptions {
    pub max_cluster_radius: u32,
    pub show_coverage_on_hover: bool,
    pub icon_color: String,
    pub icon_size: u32,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        ClusterOptions {
            max_cluster_radius: 75,
            show_coverage_on_hover: false,
            icon_color: "lightblue".into(),
            icon_size: 30,
        }
    }
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Pin {
    pub position: LatLon,
    pub tooltip: String,
    pub popup: Popup,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Popup {
    pub title: String,
    pub fields: Vec<PopupField>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<InlinePhoto>,
    pub max_width: u32,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct PopupField {
    pub label: String,
    pub value: String,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct InlinePhoto {
    pub mime_type: String,
    pub data: String,
    pub width: u32,
}
