use once_cell::sync::Lazy;
use regex::Regex;
use tracing::Span;

use crate::constants::year_in_range;
use crate::types::{RawValue, UncertaintyType, Uncertain, YearField};

static FOUR_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{4}").unwrap());
static AGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"age\s*([0-9]+)").unwrap());
static ISO_DATE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})-[0-9]{2}-[0-9]{2}").unwrap());
static BARE_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]{4})(?:\.0)?$").unwrap());

const NULL_SENTINELS: &[&str] = &["nan", "inf", "-inf", "infinity", "-infinity"];

/// Parses the many shapes a birth year takes in the ledgers into a checked
/// four-digit year.
pub struct YearNormalizer {
    reference_year: i32,
    span: Span,
}

impl YearNormalizer {
    pub fn new(reference_year: i32, span: Span) -> Self {
        Self {
            reference_year,
            span,
        }
    }

    /// Normalize a cell into a year field. Never fails: anything that cannot
    /// be read as an in-range year becomes a null value.
    pub fn normalize(&self, value: &RawValue) -> YearField {
        let original_text = value
            .to_text()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        match self.parse(value) {
            Some((year, uncertainty)) => Uncertain::new(Some(year), uncertainty, original_text),
            None => Uncertain::new(None, None, original_text),
        }
    }

    /// The year and, when the entry was not a plain year, why it is uncertain.
    pub fn parse(&self, value: &RawValue) -> Option<(i32, Option<UncertaintyType>)> {
        match value {
            RawValue::Null => None,
            RawValue::Number(n) => self.parse_number(*n),
            RawValue::Text(text) => self.parse_text(text),
        }
    }

    fn parse_number(&self, n: f64) -> Option<(i32, Option<UncertaintyType>)> {
        if !n.is_finite() {
            return None;
        }
        if n.fract() != 0.0 {
            tracing::warn!(parent: &self.span, value = n, "Year has a fractional part");
            return None;
        }
        if n < i32::MIN as f64 || n > i32::MAX as f64 {
            return None;
        }
        checked(n as i32).map(|year| (year, None))
    }

    fn parse_text(&self, text: &str) -> Option<(i32, Option<UncertaintyType>)> {
        let text = text.trim().to_lowercase();
        if text.is_empty() || NULL_SENTINELS.contains(&text.as_str()) {
            return None;
        }

        if text.contains("age") {
            let year = first_four_digits(&text)
                .and_then(checked)
                .or_else(|| self.estimate_from_age(&text));
            if year.is_none() {
                tracing::warn!(parent: &self.span, value = %text, "Could not estimate year from age");
            }
            return year.map(|y| (y, Some(UncertaintyType::EstimatedFromAge)));
        }

        if text.contains("about") || text.contains("c.") {
            return self.tagged(&text, first_four_digits(&text), UncertaintyType::Approximate);
        }

        if text.contains(" or ") {
            let first = text.split(" or ").next().unwrap_or_default();
            return self.tagged(&text, first_four_digits(first), UncertaintyType::MultipleDates);
        }

        if let Some((base, _)) = text.split_once('/') {
            let base = base.trim();
            let starts_with_year = base.len() >= 4 && base.as_bytes()[..4].iter().all(u8::is_ascii_digit);
            let year = if starts_with_year {
                base.parse::<i32>().ok()
            } else {
                None
            };
            return self.tagged(&text, year, UncertaintyType::Range);
        }

        if let Some(caps) = ISO_DATE_PREFIX.captures(&text) {
            return caps[1].parse().ok().and_then(checked).map(|y| (y, None));
        }

        if let Some(caps) = BARE_YEAR.captures(&text) {
            return caps[1].parse().ok().and_then(checked).map(|y| (y, None));
        }

        tracing::warn!(parent: &self.span, value = %text, "Could not parse year");
        None
    }

    fn estimate_from_age(&self, text: &str) -> Option<i32> {
        let age: i32 = AGE.captures(text)?[1].parse().ok()?;
        checked(self.reference_year.checked_sub(age)?)
    }

    fn tagged(
        &self,
        text: &str,
        year: Option<i32>,
        uncertainty: UncertaintyType,
    ) -> Option<(i32, Option<UncertaintyType>)> {
        match year {
            Some(year) => checked(year).map(|y| (y, Some(uncertainty))),
            None => {
                tracing::warn!(parent: &self.span, value = %text, kind = %uncertainty, "Could not parse year");
                None
            }
        }
    }
}

fn first_four_digits(text: &str) -> Option<i32> {
    FOUR_DIGITS.find(text)?.as_str().parse().ok()
}

fn checked(year: i32) -> Option<i32> {
    year_in_range(year).then_some(year)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> YearNormalizer {
        YearNormalizer::new(1900, Span::none())
    }

    fn year(value: RawValue) -> Option<i32> {
        normalizer().normalize(&value).value
    }

    fn text(s: &str) -> RawValue {
        RawValue::Text(s.to_string())
    }

    #[test]
    fn test_every_year_in_window_round_trips() {
        for y in 1800..=2000 {
            assert_eq!(year(text(&y.to_string())), Some(y));
            assert_eq!(year(RawValue::Number(y as f64)), Some(y));
        }
    }

    #[test]
    fn test_out_of_window_years_are_null() {
        for y in [1799, 2001, 9999] {
            assert_eq!(year(RawValue::Number(y as f64)), None);
            assert_eq!(year(text(&y.to_string())), None);
        }
    }

    #[test]
    fn test_qualified_shapes() {
        assert_eq!(year(text("about 1890")), Some(1890));
        assert_eq!(year(text("c. 1890")), Some(1890));
        assert_eq!(year(text("1890-01-01")), Some(1890));
        assert_eq!(year(text("1890/1891")), Some(1890));
        assert_eq!(year(text("1890 or 1891")), Some(1890));
        assert_eq!(year(text("age 10")), Some(1890));
        assert_eq!(year(text("1890.0")), Some(1890));
    }

    #[test]
    fn test_uncertainty_tags() {
        let n = normalizer();
        let approx = n.normalize(&text("About 1890"));
        assert!(approx.uncertain);
        assert_eq!(approx.uncertainty_type, Some(UncertaintyType::Approximate));
        assert_eq!(approx.original_text.as_deref(), Some("About 1890"));

        let age = n.normalize(&text("age 12"));
        assert_eq!(age.value, Some(1888));
        assert_eq!(age.uncertainty_type, Some(UncertaintyType::EstimatedFromAge));

        let aged_with_year = n.normalize(&text("1885 (age 15)"));
        assert_eq!(aged_with_year.value, Some(1885));
        assert_eq!(aged_with_year.uncertainty_type, Some(UncertaintyType::EstimatedFromAge));

        assert_eq!(
            n.normalize(&text("1890 or 1891")).uncertainty_type,
            Some(UncertaintyType::MultipleDates)
        );
        assert_eq!(
            n.normalize(&text("1890/91")).uncertainty_type,
            Some(UncertaintyType::Range)
        );

        let exact = n.normalize(&RawValue::Number(1890.0));
        assert!(!exact.uncertain);
        assert_eq!(exact.uncertainty_type, None);
    }

    #[test]
    fn test_reference_year_is_configurable() {
        let n = YearNormalizer::new(1880, Span::none());
        assert_eq!(n.normalize(&text("age 10")).value, Some(1870));
    }

    #[test]
    fn test_null_like_inputs() {
        assert_eq!(year(RawValue::Number(f64::INFINITY)), None);
        assert_eq!(year(RawValue::Number(f64::NEG_INFINITY)), None);
        assert_eq!(year(RawValue::Number(f64::NAN)), None);
        assert_eq!(year(RawValue::Null), None);
        assert_eq!(year(text("")), None);
        assert_eq!(year(text("nan")), None);
        assert_eq!(year(text("-Infinity")), None);
    }

    #[test]
    fn test_fractional_and_garbage_inputs_are_null_and_certain() {
        let n = normalizer();
        for value in [
            RawValue::Number(1890.5),
            text("unknown"),
            text("abt/1890"),
            text("about"),
            text("age unknown"),
        ] {
            let field = n.normalize(&value);
            assert_eq!(field.value, None, "{value:?}");
            assert!(!field.uncertain);
            assert_eq!(field.uncertainty_type, None);
        }
    }

    #[test]
    fn test_qualified_out_of_range_years_are_not_clamped() {
        assert_eq!(year(text("about 1750")), None);
        assert_eq!(year(text("age 150")), None);
        assert_eq!(year(text("2050/2051")), None);
    }
}
