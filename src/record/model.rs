/// A single spreadsheet cell, reduced to what the dashboard cares about.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Strict numeric coercion: numbers pass through, text must parse as a
    /// plain decimal after trimming. Non-finite values are missing.
    pub fn to_number(&self) -> Option<f64> {
        let number = match self {
            Cell::Empty => None,
            Cell::Number(n) => Some(*n),
            Cell::Text(text) => text.trim().parse::<f64>().ok(),
        };
        number.filter(|it| it.is_finite())
    }

    /// Like `to_number`, but tolerates thousands separators ("1,200,000").
    /// Only for amounts, never for coordinates.
    pub fn to_amount(&self) -> Option<f64> {
        match self {
            Cell::Text(text) => Cell::Text(text.replace(',', "")).to_number(),
            _ => self.to_number(),
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(n) => format_number(*n),
            Cell::Text(text) => text.trim().to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Number(_) => false,
            Cell::Text(text) => text.trim().is_empty(),
        }
    }
}

/// Whole numbers lose their fraction, so 2021.0 reads as "2021".
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// A spreadsheet row with its columns resolved but coordinates not yet
/// validated.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub project_name: String,
    pub address: String,
    pub district: String,
    pub usage: String,
    pub site_area: Option<f64>,
    pub floor_area: Option<f64>,
    pub total_cost: Option<f64>,
    pub designer: String,
    pub announced: String,
    pub latitude: Cell,
    pub longitude: Cell,
    pub photo: String,
}

/// A building record with usable coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub project_name: String,
    pub address: String,
    pub district: String,
    pub usage: String,
    pub site_area: Option<f64>,
    pub floor_area: Option<f64>,
    pub total_cost: Option<f64>,
    pub designer: String,
    pub announced: String,
    pub latitude: f64,
    pub longitude: f64,
    pub photo: String,
}

impl Record {
    #[cfg(test)]
    pub fn mock() -> Record {
        Record {
            project_name: "해운대 도서관".into(),
            address: "부산광역시 해운대구 우동 1".into(),
            district: "해운대구".into(),
            usage: "교육연구시설".into(),
            site_area: Some(5230.5),
            floor_area: Some(12000.0),
            total_cost: Some(35_000_000_000.0),
            designer: "건축사사무소 바다".into(),
            announced: "2023-05-12".into(),
            latitude: 35.1631,
            longitude: 129.1635,
            photo: "library.jpg".into(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Cell;

    #[test]
    fn to_number() {
        assert_eq!(Some(35.1), Cell::Number(35.1).to_number());
        assert_eq!(Some(129.05), Cell::Text(" 129.05 ".into()).to_number());
        assert_eq!(None, Cell::Text("35,1631".into()).to_number());
        assert_eq!(None, Cell::Text("북위 35도".into()).to_number());
        assert_eq!(None, Cell::Text("NaN".into()).to_number());
        assert_eq!(None, Cell::Number(f64::INFINITY).to_number());
        assert_eq!(None, Cell::Empty.to_number());
    }

    #[test]
    fn to_amount() {
        assert_eq!(Some(1200000.0), Cell::Text("1,200,000".into()).to_amount());
        assert_eq!(Some(12.5), Cell::Number(12.5).to_amount());
        assert_eq!(None, Cell::Text("미정".into()).to_amount());
        assert_eq!(None, Cell::Empty.to_amount());
    }

    #[test]
    fn to_text() {
        assert_eq!("2021", Cell::Number(2021.0).to_text());
        assert_eq!("12.5", Cell::Number(12.5).to_text());
        assert_eq!("중구", Cell::Text(" 중구 ".into()).to_text());
        assert_eq!("", Cell::Empty.to_text());
    }
}
