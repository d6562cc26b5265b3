use crate::types::RawValue;

/// Strip every character that is not alphanumeric, whitespace, a hyphen or
/// a period, then trim. Empty results become `None`.
pub fn normalize_name(value: &RawValue) -> Option<String> {
    let text = value.to_text()?;
    clean_name(&text)
}

pub fn clean_name(text: &str) -> Option<String> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '.')
        .collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
