use std::path::Path;

use tracing::Span;

use super::{build_rows, SourceTable};
use crate::error::{ImportError, Result};
use crate::types::RawValue;

/// Delimiters tried in order; the first that splits the header wins.
const DELIMITERS: &[u8] = &[b'|', b',', b'\t', b';'];

pub fn read_csv(path: &Path, span: &Span) -> Result<SourceTable> {
    let bytes = std::fs::read(path)?;
    let (content, encoding) = super::encoding::decode(&bytes);
    tracing::info!(parent: span, file = %path.display(), encoding = encoding.name(), "Detected encoding");
    parse_csv(&content, span)
}

/// Parse decoded CSV text into a header row plus data rows.
pub fn parse_csv(content: &str, span: &Span) -> Result<SourceTable> {
    let delimiter = sniff_delimiter(content).ok_or_else(|| {
        ImportError::InvalidInput(
            "could not find a delimiter that splits the header row into columns".to_string(),
        )
    })?;
    let shown = (delimiter as char).escape_default().to_string();
    tracing::debug!(parent: span, delimiter = %shown, "Using delimiter");

    let mut reader = ::csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(record) => record?.iter().map(|h| h.to_string()).collect(),
        None => return Err(ImportError::InvalidInput("file has no header row".to_string())),
    };

    let mut data = Vec::new();
    for (index, record) in records.enumerate() {
        let record = record?;
        let cells: Vec<RawValue> = record
            .iter()
            .map(|cell| RawValue::from_cell(cell.trim_start()))
            .collect();
        data.push((index + 1, cells));
    }

    Ok(build_rows(headers, data, span))
}

fn sniff_delimiter(content: &str) -> Option<u8> {
    let header_line = content.lines().find(|line| !line.trim().is_empty())?;
    DELIMITERS.iter().copied().find(|&delim| {
        ::csv::ReaderBuilder::new()
            .delimiter(delim)
            .has_headers(false)
            .flexible(true)
            .from_reader(header_line.as_bytes())
            .records()
            .next()
            .and_then(|r| r.ok())
            .map(|r| r.len() > 1)
            .unwrap_or(false)
    })
}
