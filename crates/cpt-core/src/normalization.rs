//! Free-text cleanup for user-supplied names.

use unicode_normalization::UnicodeNormalization;

/// Normalize a topic name before lookup.
///
/// Applies NFC composition, trims, and collapses inner whitespace runs to a
/// single space. Case is kept: catalog lookups compare names
/// case-insensitively, and the stored spelling is what users see.
pub fn normalize_topic_name(s: &str) -> String {
    s.nfc()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        assert_eq!(normalize_topic_name("Arrays"), "Arrays");
    }

    #[test]
    fn test_whitespace_collapse() {
        assert_eq!(normalize_topic_name("  Dynamic   Programming "), "Dynamic Programming");
        assert_eq!(normalize_topic_name("Two\tPointers"), "Two Pointers");
    }

    #[test]
    fn test_empty_and_whitespace_only() {
        assert_eq!(normalize_topic_name(""), "");
        assert_eq!(normalize_topic_name("   "), "");
    }

    #[test]
    fn test_case_is_preserved() {
        assert_eq!(normalize_topic_name("graphs"), "graphs");
    }

    #[test]
    fn test_decomposed_input_is_composed() {
        // "e" followed by a combining acute accent
        assert_eq!(
            normalize_topic_name("Re\u{301}seaux"),
            normalize_topic_name("Réseaux")
        );
    }
}
