use tracing::Span;

use crate::types::RawValue;

/// Trimmed text, or `None` for null and blank cells.
pub fn normalize_text(value: &RawValue) -> Option<String> {
    let text = value.to_text()?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Short category codes such as `sex`: trimmed and upper-cased.
pub fn normalize_code(value: &RawValue) -> Option<String> {
    normalize_text(value).map(|s| s.to_uppercase())
}

/// Cuts text to its stored column width, counted in characters.
pub struct Truncator {
    span: Span,
}

impl Truncator {
    pub fn new(span: Span) -> Self {
        Self { span }
    }

    pub fn truncate(&self, field: &str, value: Option<String>, max_len: Option<usize>) -> Option<String> {
        let (value, max_len) = match (value, max_len) {
            (Some(value), Some(max_len)) => (value, max_len),
            (value, _) => return value,
        };

        let len = value.chars().count();
        if len <= max_len {
            return Some(value);
        }

        let preview: String = value.chars().take(50).collect();
        tracing::warn!(
            parent: &self.span,
            field,
            from = len,
            to = max_len,
            "Truncating value: {}...",
            preview
        );
        let cut: String = value.chars().take(max_len).collect();
        Some(cut.trim_end().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_trimmed_and_blank_is_none() {
        assert_eq!(normalize_text(&RawValue::Text("  Santee  ".into())).as_deref(), Some("Santee"));
        assert_eq!(normalize_text(&RawValue::Text("   ".into())), None);
        assert_eq!(normalize_text(&RawValue::Null), None);
    }

    #[test]
    fn test_code_is_upper_cased() {
        assert_eq!(normalize_code(&RawValue::Text(" f ".into())).as_deref(), Some("F"));
    }

    #[test]
    fn test_truncation_counts_characters() {
        let truncator = Truncator::new(Span::none());
        let value = Some("Ŝéñ".to_string());
        assert_eq!(truncator.truncate("sex", value, Some(1)).as_deref(), Some("Ŝ"));
        assert_eq!(
            truncator.truncate("nation", Some("Omaha".into()), Some(200)).as_deref(),
            Some("Omaha")
        );
        assert_eq!(
            truncator.truncate("comments", Some("x".repeat(5000)), None).map(|s| s.len()),
            Some(5000)
        );
        assert_eq!(truncator.truncate("alias", None, Some(10)), None);
    }

    #[test]
    fn test_renormalizing_is_a_projection() {
        let truncator = Truncator::new(Span::none());
        let once = truncator.truncate(
            "family_name",
            normalize_text(&RawValue::Text("  Running Water  ".into())),
            Some(8),
        );
        assert_eq!(once.as_deref(), Some("Running"));
        let twice = truncator.truncate(
            "family_name",
            normalize_text(&RawValue::Text(once.clone().unwrap())),
            Some(8),
        );
        assert_eq!(once, twice);
    }
}
