use super::model::{InlinePhoto, Popup, PopupField};
use crate::photo::PhotoLibrary;
use crate::record::loader::{
    COL_ADDRESS, COL_ANNOUNCED, COL_DESIGNER, COL_FLOOR_AREA, COL_PROJECT_NAME, COL_SITE_AREA,
    COL_TOTAL_COST, COL_USAGE,
};
use crate::record::model::format_number;
use crate::record::Record;

const POPUP_MAX_WIDTH: u32 = 300;
const PHOTO_WIDTH: u32 = 100;
const MISSING: &str = "-";

pub fn tooltip(record: &Record) -> String {
    format!("{COL_PROJECT_NAME}: {}", record.project_name)
}

/// Popup contents for a record. The photo is only attached when an upload
/// with a matching name exists.
pub fn build(record: &Record, photos: &PhotoLibrary) -> Popup {
    let field = |label: &str, value: String| PopupField {
        label: label.to_string(),
        value,
    };
    let photo = photos.get(&record.photo).map(|it| InlinePhoto {
        mime_type: it.mime_type().to_string(),
        data: it.to_base64(),
        width: PHOTO_WIDTH,
    });
    Popup {
        title: format!("[{COL_PROJECT_NAME}] {}", record.project_name),
        fields: vec![
            field(COL_ADDRESS, record.address.clone()),
            field(COL_USAGE, record.usage.clone()),
            field(COL_SITE_AREA, with_unit(record.site_area.map(format_number), "m²")),
            field(COL_FLOOR_AREA, with_unit(record.floor_area.map(format_number), "m²")),
            field(COL_TOTAL_COST, with_unit(record.total_cost.map(format_grouped), "원")),
            field(COL_DESIGNER, record.designer.clone()),
            field(COL_ANNOUNCED, record.announced.clone()),
        ],
        photo,
        max_width: POPUP_MAX_WIDTH,
    }
}

fn with_unit(value: Option<String>, unit: &str) -> String {
    match value {
        Some(value) => format!("{value} {unit}"),
        None => MISSING.to_string(),
    }
}

/// Thousands separators on the integer part: 35000000000 → 35,000,000,000.
fn format_grouped(n: f64) -> String {
    let plain = format_number(n);
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };
    let (int_part, fraction) = match unsigned.split_once('.') {
        Some((int_part, fraction)) => (int_part, Some(fraction)),
        None => (unsigned, None),
    };
    let mut grouped = String::new();
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}
