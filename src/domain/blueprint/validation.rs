//! Model name validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length for model names
pub const MAX_MODEL_NAME_LENGTH: usize = 64;

/// Regex pattern for identifier-safe model names
static MODEL_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Check that a model name is identifier-safe: it is interpolated into
/// a file name and a string literal of the generated script.
pub fn is_identifier_safe(name: &str) -> bool {
    !name.is_empty() && name.len() <= MAX_MODEL_NAME_LENGTH && MODEL_NAME_PATTERN.is_match(name)
}

/// Replace every character that is not identifier-safe so the emitted
/// save/load calls stay syntactically valid regardless of user input.
pub fn sanitize_model_name(name: &str) -> String {
    if is_identifier_safe(name) {
        return name.to_string();
    }

    let cleaned: String = name
        .chars()
        .take(MAX_MODEL_NAME_LENGTH)
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if cleaned.is_empty() {
        "my_model".to_string()
    } else if cleaned.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        format!("my_{}", cleaned)
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_safe_names() {
        assert!(is_identifier_safe("my_model"));
        assert!(is_identifier_safe("Model2"));
        assert!(is_identifier_safe("_hidden"));
    }

    #[test]
    fn test_unsafe_names() {
        assert!(!is_identifier_safe(""));
        assert!(!is_identifier_safe("my model"));
        assert!(!is_identifier_safe("model's"));
        assert!(!is_identifier_safe("2fast"));
        assert!(!is_identifier_safe(&"x".repeat(MAX_MODEL_NAME_LENGTH + 1)));
    }

    #[test]
    fn test_sanitize_passthrough() {
        assert_eq!(sanitize_model_name("my_model"), "my_model");
    }

    #[test]
    fn test_sanitize_replaces_invalid_chars() {
        assert_eq!(sanitize_model_name("my model"), "my_model");
        assert_eq!(sanitize_model_name("model's"), "model_s");
    }

    #[test]
    fn test_sanitize_leading_digit() {
        assert_eq!(sanitize_model_name("2fast"), "my_2fast");
    }

    #[test]
    fn test_sanitize_empty() {
        assert_eq!(sanitize_model_name(""), "my_model");
    }
}
