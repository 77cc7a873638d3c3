//! Canonical forms for free-text fields before they are sent.

/// Trim and collapse internal whitespace runs to a single space.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Enum-like name: whitespace runs become `_`, letters uppercase.
///
/// `" computer   science "` becomes `"COMPUTER_SCIENCE"`.
pub fn canonical_name(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_uppercase()
}

/// Inverse display form of [`canonical_name`].
pub fn display_name(s: &str) -> String {
    s.replace('_', " ")
}

/// `None` for blank input, otherwise the trimmed text.
pub fn optional_text(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
