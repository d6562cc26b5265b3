//! Loading source files into header labels plus raw rows.

pub mod csv;
pub mod encoding;
pub mod excel;

use std::path::Path;

use tracing::Span;

use crate::error::{ImportError, Result};
use crate::types::{RawRow, RawValue};

/// Header row and data rows of one source file.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Workbook,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(SourceFormat::Workbook),
            _ => Err(ImportError::UnsupportedFormat(format!(
                "{} (expected .csv, .xlsx, .xlsm, .xls, .xlsb or .ods)",
                path.display()
            ))),
        }
    }
}

/// Read a CSV or spreadsheet file. Spreadsheets contribute their first sheet only.
pub fn read_source(path: &Path, span: &Span) -> Result<SourceTable> {
    validate_file(path)?;
    let table = match SourceFormat::from_path(path)? {
        SourceFormat::Csv => csv::read_csv(path, span)?,
        SourceFormat::Workbook => excel::read_workbook(path, span)?,
    };
    tracing::info!(
        parent: span,
        file = %path.display(),
        columns = table.headers.len(),
        rows = table.rows.len(),
        "Loaded source file"
    );
    Ok(table)
}

fn validate_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(ImportError::InvalidInput(format!(
            "file not found: {}",
            path.display()
        )));
    }
    let metadata = std::fs::metadata(path)?;
    if !metadata.is_file() {
        return Err(ImportError::InvalidInput(format!(
            "not a regular file: {}",
            path.display()
        )));
    }
    if metadata.len() == 0 {
        return Err(ImportError::InvalidInput(format!(
            "file is empty: {}",
            path.display()
        )));
    }
    Ok(())
}

/// Pair cells with header labels. Short rows are padded with nulls; non-empty
/// cells past the last header are counted as overflow. Rows with no values
/// at all are dropped.
pub(crate) fn build_rows(
    headers: Vec<String>,
    data: Vec<(usize, Vec<RawValue>)>,
    span: &Span,
) -> SourceTable {
    let width = headers.len();
    let mut rows = Vec::with_capacity(data.len());

    for (line, mut cells) in data {
        if cells.iter().all(RawValue::is_null) {
            tracing::debug!(parent: span, line, "Skipping blank row");
            continue;
        }
        let overflow = cells
            .iter()
            .skip(width)
            .filter(|c| !c.is_null())
            .count();
        cells.resize(width, RawValue::Null);
        let pairs = headers.iter().cloned().zip(cells).collect();
        rows.push(RawRow::new(line, pairs).with_overflow(overflow));
    }

    SourceTable { headers, rows }
}
