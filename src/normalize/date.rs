use chrono::{Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::Span;

use crate::constants::year_in_range;
use crate::types::{DateField, RawValue, UncertaintyType, Uncertain};

const NULL_MARKERS: &[&str] = &["nan", "none", "null", "nat"];

/// Qualifier words stripped before parsing, in the order they are looked for.
const QUALIFIERS: &[&str] = &["about", "c.", "circa", "before", "after", "early", "mid", "late"];

static QUALIFIER_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    QUALIFIERS
        .iter()
        .map(|q| {
            // "c." ends in a non-word character, so only anchor the trailing edge on words
            let tail = if q.ends_with(|c: char| c.is_alphanumeric()) { r"\b" } else { "" };
            let pattern = format!(r"(?i)\b{}{}", regex::escape(q), tail);
            (*q, Regex::new(&pattern).unwrap())
        })
        .collect()
});

static YEAR_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{4}").unwrap());
static FOUR_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{4}").unwrap());

const EXPLICIT_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y"];
const MONTH_FORMATS: &[&str] = &["%Y-%m", "%Y/%m"];

/// Looser shapes tried last: written-out months, two-digit years, dotted forms.
const FLEXIBLE_DATE_FORMATS: &[&str] = &[
    "%B %d, %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%m/%d/%y",
    "%m-%d-%y",
    "%d.%m.%Y",
    "%d.%m.%y",
    "%Y.%m.%d",
    "%m-%d-%Y",
];
const FLEXIBLE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];
/// Month-and-year shapes, completed with the first of the month
const FLEXIBLE_MONTH_FORMATS: &[&str] = &["%B %Y", "%b %Y", "%B, %Y", "%b, %Y"];

/// Parses dates from free-text ledger entries and classifies how certain they are.
pub struct DateNormalizer {
    span: Span,
}

impl DateNormalizer {
    pub fn new(span: Span) -> Self {
        Self { span }
    }

    pub fn normalize(&self, value: &RawValue) -> DateField {
        let Some(text) = value.to_text() else {
            return Uncertain::absent();
        };
        let text = text.trim();
        if text.is_empty() || NULL_MARKERS.contains(&text.to_lowercase().as_str()) {
            return Uncertain::absent();
        }

        let (date, uncertainty) = self.classify_and_parse(text);
        Uncertain::new(date, uncertainty, Some(text.to_string()))
    }

    /// `(date, uncertainty)` for a non-empty entry.
    ///
    /// A total parse failure drops the uncertainty tag along with the date, so
    /// an unreadable "about ..." entry is stored as null and not uncertain.
    pub fn classify_and_parse(&self, text: &str) -> (Option<NaiveDate>, Option<UncertaintyType>) {
        let lower = text.to_lowercase();

        let (candidate, uncertainty) = if text.contains(';') {
            let first = text.split(';').next().unwrap_or_default().trim();
            (first, Some(UncertaintyType::MultipleDates))
        } else if YEAR_SPAN.is_match(text) {
            let first = text.split('-').next().unwrap_or_default();
            (first, Some(UncertaintyType::Range))
        } else if lower.contains("about") || lower.contains("c.") || lower.contains("circa") {
            (text, Some(UncertaintyType::Approximate))
        } else if lower.contains("before") {
            (text, Some(UncertaintyType::Before))
        } else if lower.contains("after") {
            (text, Some(UncertaintyType::After))
        } else if ["early", "mid", "late"].iter().any(|q| lower.contains(q)) {
            (text, Some(UncertaintyType::PeriodQualifier))
        } else {
            (text, None)
        };

        match parse_date(&strip_qualifier(candidate)) {
            Some(date) => (Some(date), uncertainty),
            None => {
                tracing::warn!(parent: &self.span, value = %text, "Could not parse date");
                (None, None)
            }
        }
    }
}

/// Remove every whole-word occurrence of the first qualifier found in `text`.
fn strip_qualifier(text: &str) -> String {
    let text = text.trim();
    let lower = text.to_lowercase();
    QUALIFIER_PATTERNS
        .iter()
        .find(|(q, _)| lower.contains(q))
        .map(|(_, pattern)| pattern.replace_all(text, "").trim().to_string())
        .unwrap_or_else(|| text.to_string())
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    for fmt in EXPLICIT_FORMATS {
        if let Some(date) = in_range(NaiveDate::parse_from_str(text, fmt).ok()) {
            return Some(date);
        }
    }

    let first_of_month = format!("{text}-01");
    for fmt in MONTH_FORMATS {
        let with_day = format!("{fmt}-%d");
        if let Some(date) = in_range(NaiveDate::parse_from_str(&first_of_month, &with_day).ok()) {
            return Some(date);
        }
    }

    if text.len() == 4 && text.bytes().all(|b| b.is_ascii_digit()) {
        if let Some(date) = in_range(january_first(text)) {
            return Some(date);
        }
    }

    if let Some(found) = FOUR_DIGITS.find(text) {
        if let Some(date) = in_range(january_first(found.as_str())) {
            return Some(date);
        }
    }

    flexible_parse(text)
}

fn flexible_parse(text: &str) -> Option<NaiveDate> {
    FLEXIBLE_DATE_FORMATS
        .iter()
        .find_map(|fmt| in_range(NaiveDate::parse_from_str(text, fmt).ok()))
        .or_else(|| {
            FLEXIBLE_DATETIME_FORMATS.iter().find_map(|fmt| {
                in_range(NaiveDateTime::parse_from_str(text, fmt).ok().map(|dt| dt.date()))
            })
        })
        .or_else(|| {
            let with_day = format!("1 {text}");
            FLEXIBLE_MONTH_FORMATS.iter().find_map(|fmt| {
                in_range(NaiveDate::parse_from_str(&with_day, &format!("%d {fmt}")).ok())
            })
        })
}

fn january_first(year: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, 1, 1)
}

fn in_range(date: Option<NaiveDate>) -> Option<NaiveDate> {
    date.filter(|d| year_in_range(d.year()))
}
