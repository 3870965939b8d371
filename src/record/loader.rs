use super::model::{Cell, RawRecord};
use crate::{Error, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::{collections::HashMap, io::Cursor, path::Path};
use time::{macros::date, macros::format_description, Duration};
use tracing::{debug, info};

pub const COL_PROJECT_NAME: &str = "사업명";
pub const COL_ADDRESS: &str = "주소";
pub const COL_DISTRICT: &str = "시군구";
pub const COL_USAGE: &str = "용도";
pub const COL_SITE_AREA: &str = "대지면적";
pub const COL_FLOOR_AREA: &str = "연면적";
pub const COL_TOTAL_COST: &str = "총사업비";
pub const COL_DESIGNER: &str = "설계자";
pub const COL_ANNOUNCED: &str = "당선작 발표";
pub const COL_LATITUDE: &str = "위도";
pub const COL_LONGITUDE: &str = "경도";
pub const COL_PHOTO: &str = "사진 경로";

pub const REQUIRED_COLUMNS: [&str; 12] = [
    COL_PROJECT_NAME,
    COL_ADDRESS,
    COL_DISTRICT,
    COL_USAGE,
    COL_SITE_AREA,
    COL_FLOOR_AREA,
    COL_TOTAL_COST,
    COL_DESIGNER,
    COL_ANNOUNCED,
    COL_LATITUDE,
    COL_LONGITUDE,
    COL_PHOTO,
];

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

/// Parses an uploaded spreadsheet. The format is picked by file extension.
/// Any failure here is an input validation error: the caller reports it and
/// renders nothing.
pub fn load(file_name: &str, bytes: &[u8]) -> Result<Vec<RawRecord>> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|it| it.to_str())
        .map(|it| it.to_lowercase())
        .unwrap_or_default();
    let table = match extension.as_str() {
        "xlsx" | "xlsm" | "xls" | "ods" => read_workbook(bytes)?,
        "csv" => read_csv(bytes)?,
        _ => Err(Error::InvalidInput(format!(
            "Unsupported spreadsheet format: {file_name}"
        )))?,
    };
    let records = into_records(table)?;
    info!(file_name, rows = records.len(), "Loaded spreadsheet");
    Ok(records)
}

fn read_workbook(bytes: &[u8]) -> Result<Table> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| Error::InvalidInput(format!("Failed to read spreadsheet: {e}")))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(Error::InvalidInput("Spreadsheet has no worksheets".into()))?
        .map_err(|e| Error::InvalidInput(format!("Failed to read worksheet: {e}")))?;
    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header) => header.iter().map(|it| it.to_string().trim().to_string()).collect(),
        None => Err(Error::InvalidInput("Spreadsheet is empty".into()))?,
    };
    let rows = rows
        .map(|row| row.iter().map(to_cell).collect::<Result<Vec<_>>>())
        .collect::<Result<Vec<_>>>()?;
    Ok(Table { headers, rows })
}

fn to_cell(data: &Data) -> Result<Cell> {
    Ok(match data {
        Data::Empty => Cell::Empty,
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Float(n) => Cell::Number(*n),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => Cell::Text(excel_date(dt.as_f64())?),
        Data::DateTimeIso(s) => Cell::Text(s.clone()),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => {
            debug!(?e, "Cell error treated as empty");
            Cell::Empty
        }
    })
}

// Excel serial dates count days from 1899-12-30
fn excel_date(serial: f64) -> Result<String> {
    let date = date!(1899 - 12 - 30).checked_add(Duration::days(serial.floor() as i64));
    match date {
        Some(date) => Ok(date.format(format_description!("[year]-[month]-[day]"))?),
        None => Ok(serial.to_string()),
    }
}

fn read_csv(bytes: &[u8]) -> Result<Table> {
    let bytes = bytes.strip_prefix(&UTF8_BOM).unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);
    let headers = reader
        .headers()
        .map_err(|e| Error::InvalidInput(format!("Failed to read CSV header: {e}")))?
        .iter()
        .map(|it| it.trim().to_string())
        .collect();
    let mut rows = vec![];
    for record in reader.records() {
        let record =
            record.map_err(|e| Error::InvalidInput(format!("Failed to read CSV row: {e}")))?;
        rows.push(
            record
                .iter()
                .map(|it| {
                    if it.trim().is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(it.to_string())
                    }
                })
                .collect(),
        );
    }
    Ok(Table { headers, rows })
}

fn into_records(table: Table) -> Result<Vec<RawRecord>> {
    let indices: HashMap<&str, usize> = table
        .headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.as_str(), i))
        .collect();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|it| !indices.contains_key(*it))
        .copied()
        .collect();
    if !missing.is_empty() {
        Err(Error::InvalidInput(format!(
            "Spreadsheet is missing required columns: {}",
            missing.join(", ")
        )))?
    }
    let empty = Cell::Empty;
    let mut records = vec![];
    for row in &table.rows {
        if row.iter().all(|it| it.is_empty()) {
            continue;
        }
        let cell = |column: &str| indices.get(column).and_then(|i| row.get(*i)).unwrap_or(&empty);
        records.push(RawRecord {
            project_name: cell(COL_PROJECT_NAME).to_text(),
            address: cell(COL_ADDRESS).to_text(),
            district: cell(COL_DISTRICT).to_text(),
            usage: cell(COL_USAGE).to_text(),
            site_area: cell(COL_SITE_AREA).to_amount(),
            floor_area: cell(COL_FLOOR_AREA).to_amount(),
            total_cost: cell(COL_TOTAL_COST).to_amount(),
            designer: cell(COL_DESIGNER).to_text(),
            announced: cell(COL_ANNOUNCED).to_text(),
            latitude: cell(COL_LATITUDE).clone(),
            longitude: cell(COL_LONGITUDE).clone(),
            photo: cell(COL_PHOTO).to_text(),
        });
    }
    Ok(records)
}

#[cfg(test)]
mod test {
    use super::{excel_date, load};
    use crate::record::model::Cell;
    use crate::test::{mock_csv, MOCK_HEADER};
    use crate::Error;
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

    fn workbook() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, header) in MOCK_HEADER.split(',').enumerate() {
            sheet.write_string(0, col as u16, header).unwrap();
        }
        sheet.write_string(1, 0, "해운대 도서관").unwrap();
        sheet.write_string(1, 1, "우동 1").unwrap();
        sheet.write_string(1, 2, "해운대구").unwrap();
        sheet.write_string(1, 3, "교육연구시설").unwrap();
        sheet.write_number(1, 4, 5230.5).unwrap();
        sheet.write_string(1, 5, "12,000").unwrap();
        sheet.write_number(1, 6, 35_000_000_000.0).unwrap();
        sheet.write_string(1, 7, "바다").unwrap();
        let announced = ExcelDateTime::from_ymd(2023, 5, 12).unwrap();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        sheet
            .write_datetime_with_format(1, 8, &announced, &date_format)
            .unwrap();
        sheet.write_number(1, 9, 35.1631).unwrap();
        sheet.write_string(1, 10, "129.1635").unwrap();
        sheet.write_string(1, 11, "library.jpg").unwrap();
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn load_xlsx() {
        let records = load("records.xlsx", &workbook()).unwrap();
        assert_eq!(1, records.len());
        let record = &records[0];
        assert_eq!("해운대 도서관", record.project_name);
        assert_eq!(Some(5230.5), record.site_area);
        assert_eq!(Some(12000.0), record.floor_area);
        assert_eq!(Some(35_000_000_000.0), record.total_cost);
        assert_eq!("2023-05-12", record.announced);
        assert_eq!(Cell::Number(35.1631), record.latitude);
        assert_eq!(Cell::Text("129.1635".into()), record.longitude);
        assert_eq!("library.jpg", record.photo);
    }

    #[test]
    fn load_csv() {
        let csv = mock_csv(&[
            "해운대 도서관,우동 1,해운대구,교육연구시설,5230.5,12000,35000000000,바다,2023-05-12,35.1631,129.1635,library.jpg",
            "사하 체육관,하단동 2,사하구,운동시설,,8000,,산,2022-01-01,35.10,128.97,",
        ]);
        let records = load("records.csv", csv.as_bytes()).unwrap();
        assert_eq!(2, records.len());
        assert_eq!("해운대 도서관", records[0].project_name);
        assert_eq!(Some(5230.5), records[0].site_area);
        assert_eq!(Cell::Text("35.1631".into()), records[0].latitude);
        assert_eq!(None, records[1].site_area);
        assert_eq!(None, records[1].total_cost);
        assert_eq!("", records[1].photo);
    }

    #[test]
    fn load_csv_with_bom() {
        let csv = format!(
            "\u{feff}{}",
            mock_csv(&["a,b,중구,c,1,2,3,d,e,35.1,129.0,f"])
        );
        let records = load("records.CSV", csv.as_bytes()).unwrap();
        assert_eq!("a", records[0].project_name);
    }

    #[test]
    fn load_skips_blank_rows() {
        let csv = mock_csv(&[",,,,,,,,,,,", "a,b,중구,c,1,2,3,d,e,35.1,129.0,f"]);
        assert_eq!(1, load("records.csv", csv.as_bytes()).unwrap().len());
    }

    #[test]
    fn load_missing_column() {
        let header = MOCK_HEADER.replace(",위도", "");
        let csv = format!("{header}\na,b,중구,c,1,2,3,d,e,129.0,f\n");
        match load("records.csv", csv.as_bytes()) {
            Err(Error::InvalidInput(message)) => {
                assert!(message.contains("위도"));
                assert!(!message.contains("경도"));
            }
            _ => panic!("Expected input validation failure"),
        }
    }

    #[test]
    fn load_unsupported_extension() {
        let res = load("records.txt", b"hello");
        assert!(matches!(res, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn load_broken_workbook() {
        let res = load("records.xlsx", b"definitely not a zip archive");
        assert!(matches!(res, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn excel_date_serial() {
        assert_eq!("2023-05-12", excel_date(45058.0).unwrap());
        assert_eq!("1900-01-01", excel_date(2.5).unwrap());
    }
}
