use crate::district::{DistrictCode, ENTIRE_REGION};
use crate::record::Record;
use std::collections::BTreeSet;

/// User choices. An empty list means that filter is off.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub districts: Vec<String>,
    pub usages: Vec<String>,
}

impl Selection {
    pub fn covers_entire_region(&self) -> bool {
        self.districts.iter().any(|it| it == ENTIRE_REGION)
    }

    /// Codes whose boundaries get drawn. Unknown names are ignored.
    pub fn district_codes(&self) -> BTreeSet<DistrictCode> {
        if self.covers_entire_region() {
            DistrictCode::all().collect()
        } else {
            self.districts
                .iter()
                .filter_map(|it| DistrictCode::from_name(it))
                .collect()
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        let district_ok = self.districts.is_empty()
            || self.covers_entire_region()
            || self.districts.iter().any(|it| it == &record.district);
        let usage_ok = self.usages.is_empty() || self.usages.iter().any(|it| it == &record.usage);
        district_ok && usage_ok
    }
}

pub fn apply<'a>(records: &'a [Record], selection: &Selection) -> Vec<&'a Record> {
    records.iter().filter(|it| selection.matches(it)).collect()
}

/// Choices offered to the user, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub districts: Vec<String>,
    pub usages: Vec<String>,
}

pub fn options(records: &[Record]) -> FilterOptions {
    let mut districts = vec![ENTIRE_REGION.to_string()];
    let mut usages: Vec<String> = vec![];
    for record in records {
        if !districts.contains(&record.district) {
            districts.push(record.district.clone());
        }
        if !usages.contains(&record.usage) {
            usages.push(record.usage.clone());
        }
    }
    FilterOptions { districts, usages }
}
