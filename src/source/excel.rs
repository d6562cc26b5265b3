use calamine::{open_workbook_auto, Data, ExcelDateTime, Reader};
use chrono::NaiveDate;
use std::path::Path;
use tracing::Span;

use super::{build_rows, SourceTable};
use crate::error::{ImportError, Result};
use crate::types::RawValue;

/// Read the first sheet of a workbook. The first row is the header.
pub fn read_workbook(path: &Path, span: &Span) -> Result<SourceTable> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names().to_vec();
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ImportError::InvalidInput(format!("{} has no sheets", path.display())))??;

    if sheet_names.len() > 1 {
        tracing::info!(
            parent: span,
            sheet = sheet_names.first().map(String::as_str).unwrap_or_default(),
            ignored = sheet_names.len() - 1,
            "Reading first sheet only"
        );
    }

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(row) => row.iter().map(header_text).collect(),
        None => {
            return Err(ImportError::InvalidInput(format!(
                "{} has an empty first sheet",
                path.display()
            )))
        }
    };

    let data = rows
        .enumerate()
        .map(|(index, row)| (index + 1, row.iter().map(cell_value).collect()))
        .collect();

    Ok(build_rows(headers, data, span))
}

fn header_text(cell: &Data) -> String {
    match cell_value(cell) {
        RawValue::Null => String::new(),
        value => value.to_text().unwrap_or_default(),
    }
}

/// Map a spreadsheet cell onto the untyped values the CSV reader produces.
pub fn cell_value(cell: &Data) -> RawValue {
    match cell {
        Data::Empty | Data::Error(_) => RawValue::Null,
        Data::String(s) => RawValue::from_cell(s),
        Data::Float(n) => RawValue::Number(*n),
        Data::Int(n) => RawValue::Number(*n as f64),
        Data::Bool(b) => RawValue::Text(b.to_string()),
        Data::DateTime(dt) => match excel_date(dt) {
            Some(date) => RawValue::Text(date.format("%Y-%m-%d").to_string()),
            None => RawValue::Null,
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawValue::from_cell(s),
    }
}

/// Calendar date of a date cell. calamine applies the workbook's 1900 or 1904
/// date system, including the 1900 system's phantom 29 February.
fn excel_date(dt: &ExcelDateTime) -> Option<NaiveDate> {
    let serial = dt.as_f64();
    if !serial.is_finite() || serial.abs() > 3_000_000.0 {
        return None;
    }
    dt.as_datetime().map(|datetime| datetime.date())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::ExcelDateTimeType;
    use rust_xlsxwriter::Workbook;

    fn date_cell(serial: f64, is_1904: bool) -> Option<NaiveDate> {
        excel_date(&ExcelDateTime::new(serial, ExcelDateTimeType::DateTime, is_1904))
    }

    #[test]
    fn test_serial_dates() {
        assert_eq!(date_cell(1.0, false), NaiveDate::from_ymd_opt(1900, 1, 1));
        assert_eq!(date_cell(59.0, false), NaiveDate::from_ymd_opt(1900, 2, 28));
        assert_eq!(date_cell(61.0, false), NaiveDate::from_ymd_opt(1900, 3, 1));
        assert_eq!(date_cell(36526.75, false), NaiveDate::from_ymd_opt(2000, 1, 1));
        assert_eq!(date_cell(f64::NAN, false), None);
    }

    #[test]
    fn test_1904_date_system() {
        assert_eq!(date_cell(0.0, true), NaiveDate::from_ymd_opt(1904, 1, 1));
        assert_eq!(date_cell(35064.0, true), NaiveDate::from_ymd_opt(2000, 1, 1));
    }

    #[test]
    fn test_reads_first_sheet_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Rewritten_Data.xlsx");

        let mut workbook = Workbook::new();
        let first = workbook.add_worksheet();
        first.set_name("Students").unwrap();
        first.write_number(0, 0, 0.0).unwrap();
        first.write_number(0, 1, 1.0).unwrap();
        first.write_number(0, 2, 2.0).unwrap();
        first.write_string(1, 0, "Ma-ga-she").unwrap();
        first.write_string(1, 1, "Smith").unwrap();
        first.write_number(1, 2, 1890.0).unwrap();
        first.write_string(2, 0, "Wa-kon").unwrap();
        first.write_string(2, 1, "Jones").unwrap();
        let second = workbook.add_worksheet();
        second.set_name("Notes").unwrap();
        second.write_string(0, 0, "Comment").unwrap();
        second.write_string(1, 0, "not student data").unwrap();
        workbook.save(&path).unwrap();

        let table = read_workbook(&path, &Span::none()).unwrap();
        assert_eq!(table.headers, vec!["0", "1", "2"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].get("1"), Some(&RawValue::Text("Smith".into())));
        assert_eq!(table.rows[0].get("2"), Some(&RawValue::Number(1890.0)));
        assert_eq!(table.rows[1].get("0"), Some(&RawValue::Text("Wa-kon".into())));
        assert_eq!(table.rows[1].get("2"), Some(&RawValue::Null));
        assert!(table.rows.iter().all(|row| row.get("Comment").is_none()));
    }

    #[test]
    fn test_cell_values() {
        assert_eq!(cell_value(&Data::Empty), RawValue::Null);
        assert_eq!(cell_value(&Data::Int(1890)), RawValue::Number(1890.0));
        assert_eq!(cell_value(&Data::Bool(true)), RawValue::Text("true".into()));
        assert_eq!(cell_value(&Data::String("  ".into())), RawValue::Null);
        assert_eq!(header_text(&Data::Float(3.0)), "3");
    }
}
