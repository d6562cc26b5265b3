use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::NULL_MARKERS;

/// An untyped cell value as found in a source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Text(String),
    Number(f64),
}

impl RawValue {
    /// Build a value from a text cell; blank cells and null markers such as
    /// `N/A` become `Null`.
    pub fn from_cell(cell: &str) -> Self {
        let trimmed = cell.trim();
        if trimmed.is_empty() || NULL_MARKERS.contains(&trimmed) {
            RawValue::Null
        } else {
            RawValue::Text(cell.to_string())
        }
    }

    /// Missing cells and NaN numbers both count as null.
    pub fn is_null(&self) -> bool {
        match self {
            RawValue::Null => true,
            RawValue::Number(n) => n.is_nan(),
            RawValue::Text(_) => false,
        }
    }

    /// Text rendering used for cleaning and for `_original_text` columns.
    pub fn to_text(&self) -> Option<String> {
        match self {
            RawValue::Null => None,
            RawValue::Text(s) => Some(s.clone()),
            RawValue::Number(n) if n.is_nan() => None,
            RawValue::Number(n) => Some(format_number(*n)),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Some(text) => write!(f, "{text}"),
            None => write!(f, "<null>"),
        }
    }
}

/// Integral numbers print without a fractional part so "1890" stays "1890".
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// One data row of a source file: ordered `(column label, value)` pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based data row number (the header is row 0)
    pub line: usize,
    cells: Vec<(String, RawValue)>,
    /// Cells found beyond the last header column
    pub overflow: usize,
}

impl RawRow {
    pub fn new(line: usize, cells: Vec<(String, RawValue)>) -> Self {
        Self {
            line,
            cells,
            overflow: 0,
        }
    }

    pub fn with_overflow(mut self, overflow: usize) -> Self {
        self.overflow = overflow;
        self
    }

    /// First cell carrying `label`
    pub fn get(&self, label: &str) -> Option<&RawValue> {
        self.cells
            .iter()
            .find(|(column, _)| column == label)
            .map(|(_, value)| value)
    }

    /// Compact `label=value` rendering for row-level error logs
    pub fn describe(&self) -> String {
        self.cells
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(label, value)| format!("{label}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Why a parsed date or year is not treated as exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UncertaintyType {
    Approximate,
    Range,
    Before,
    After,
    PeriodQualifier,
    MultipleDates,
    EstimatedFromAge,
}

impl UncertaintyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UncertaintyType::Approximate => "approximate",
            UncertaintyType::Range => "range",
            UncertaintyType::Before => "before",
            UncertaintyType::After => "after",
            UncertaintyType::PeriodQualifier => "period_qualifier",
            UncertaintyType::MultipleDates => "multiple_dates",
            UncertaintyType::EstimatedFromAge => "estimated_from_age",
        }
    }
}

impl fmt::Display for UncertaintyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized year or date together with its uncertainty annotations.
///
/// `uncertain` is true exactly when `uncertainty_type` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Uncertain<T> {
    pub value: Option<T>,
    pub uncertain: bool,
    pub uncertainty_type: Option<UncertaintyType>,
    pub original_text: Option<String>,
}

impl<T> Uncertain<T> {
    pub fn new(
        value: Option<T>,
        uncertainty: Option<UncertaintyType>,
        original_text: Option<String>,
    ) -> Self {
        Self {
            value,
            uncertain: uncertainty.is_some(),
            uncertainty_type: uncertainty,
            original_text,
        }
    }

    /// Field for a column the source file does not have
    pub fn absent() -> Self {
        Self::new(None, None, None)
    }
}

pub type YearField = Uncertain<i32>;
pub type DateField = Uncertain<NaiveDate>;
