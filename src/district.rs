use std::fmt::{Display, Formatter};

/// Selecting this overrides the district filter and shows every district.
pub const ENTIRE_REGION: &str = "부산시 전체";

pub const DEFAULT_FILL_COLOR: &str = "gray";

struct District {
    name: &'static str,
    code: &'static str,
    fill_color: &'static str,
}

const DISTRICTS: [District; 16] = [
    District { name: "중구", code: "26110", fill_color: "lightblue" },
    District { name: "서구", code: "26140", fill_color: "lightgreen" },
    District { name: "동구", code: "26170", fill_color: "yellow" },
    District { name: "영도구", code: "26200", fill_color: "pink" },
    District { name: "부산진구", code: "26230", fill_color: "orange" },
    District { name: "동래구", code: "26260", fill_color: "purple" },
    District { name: "남구", code: "26290", fill_color: "lightcoral" },
    District { name: "북구", code: "26320", fill_color: "lightcyan" },
    District { name: "해운대구", code: "26350", fill_color: "lightgrey" },
    District { name: "사하구", code: "26380", fill_color: "plum" },
    District { name: "금정구", code: "26410", fill_color: "salmon" },
    District { name: "강서구", code: "26440", fill_color: "khaki" },
    District { name: "연제구", code: "26470", fill_color: "peachpuff" },
    District { name: "수영구", code: "26500", fill_color: "lavender" },
    District { name: "사상구", code: "26530", fill_color: "mistyrose" },
    District { name: "기장군", code: "26710", fill_color: "lightsteelblue" },
];

/// Administrative district code, e.g. `26350` for 해운대구. Only codes from
/// the lookup table can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DistrictCode(&'static str);

impl DistrictCode {
    pub fn from_name(name: &str) -> Option<DistrictCode> {
        let name = name.trim();
        DISTRICTS
            .iter()
            .find(|it| it.name == name)
            .map(|it| DistrictCode(it.code))
    }

    pub fn parse(code: &str) -> Option<DistrictCode> {
        let code = code.trim();
        DISTRICTS
            .iter()
            .find(|it| it.code == code)
            .map(|it| DistrictCode(it.code))
    }

    pub fn all() -> impl Iterator<Item = DistrictCode> {
        DISTRICTS.iter().map(|it| DistrictCode(it.code))
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    pub fn fill_color(&self) -> &'static str {
        DISTRICTS
            .iter()
            .find(|it| it.code == self.0)
            .map(|it| it.fill_color)
            .unwrap_or(DEFAULT_FILL_COLOR)
    }
}

impl Display for DistrictCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod test {
    use super::DistrictCode;

    #[test]
    fn from_name() {
        assert_eq!("26350", DistrictCode::from_name("해운대구").unwrap().as_str());
        assert_eq!("26710", DistrictCode::from_name(" 기장군 ").unwrap().as_str());
        assert_eq!(None, DistrictCode::from_name("강남구"));
    }

    #[test]
    fn parse() {
        assert_eq!(DistrictCode::from_name("중구"), DistrictCode::parse("26110"));
        assert_eq!(None, DistrictCode::parse("11110"));
    }

    #[test]
    fn all_codes_are_unique() {
        let mut codes: Vec<DistrictCode> = DistrictCode::all().collect();
        codes.sort();
        codes.dedup();
        assert_eq!(16, codes.len());
    }

    #[test]
    fn fill_color() {
        assert_eq!("khaki", DistrictCode::parse("26440").unwrap().fill_color());
        assert_eq!("lightblue", DistrictCode::parse("26110").unwrap().fill_color());
    }
}
