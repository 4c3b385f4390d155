//! Repair of characters the charset could not represent.
//!
//! Text that went through a lossy encode carries numeric character
//! references such as `&#9824;`. Every such reference (including the
//! degenerate `&#;`) is replaced with a single `?`.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static NUMERIC_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#[0-9]*;").expect("numeric reference pattern compiles"));

/// Replace every `&#<digits>;` in `text` with `?`.
///
/// Borrows when there is nothing to replace.
pub fn normalize_special(text: &str) -> Cow<'_, str> {
    if !text.contains("&#") {
        return Cow::Borrowed(text);
    }
    NUMERIC_REFERENCE.replace_all(text, "?")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_borrowed() {
        assert!(matches!(normalize_special("abc"), Cow::Borrowed("abc")));
    }

    #[test]
    fn test_replaces_all_references() {
        assert_eq!(normalize_special("a&#9824;b&#12;c"), "a?b?c");
    }

    #[test]
    fn test_empty_digits_replaced() {
        assert_eq!(normalize_special("x&#;y"), "x?y");
    }

    #[test]
    fn test_non_numeric_reference_kept() {
        assert_eq!(normalize_special("&#x41;&amp;"), "&#x41;&amp;");
    }
}
