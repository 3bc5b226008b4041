//! Affiliation text normalization

use deunicode::deunicode;

/// Whether the text contains any character from the Latin blocks
/// (Basic Latin through Latin Extended-B).
pub fn is_latin_char_text(text: &str) -> bool {
    text.chars().any(|c| c <= '\u{024F}')
}

/// Normalize affiliation or organization text for substring comparison.
///
/// - Transliterates to ASCII when the text contains Latin characters
/// - Converts to lowercase
/// - Removes punctuation (anything that is not a word character or whitespace)
/// - Trims surrounding whitespace
pub fn normalize_text(text: &str) -> String {
    let transliterated = if is_latin_char_text(text) {
        deunicode(text)
    } else {
        text.to_string()
    };

    let lowered = transliterated.to_lowercase();
    let stripped: String = lowered
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    stripped.trim().to_string()
}

/// Join key for exact affiliation lookups: case-folded and trimmed.
pub fn affiliation_key(affiliation: &str) -> String {
    affiliation.trim().to_lowercase()
}

/// Whether an extracted entity looks like an acronym (e.g. "EMBL", "M.I.T.").
pub fn is_likely_acronym(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return false;
    }

    if text.chars().count() <= 5 && is_upper(text) {
        return true;
    }

    let compact: String = text.chars().filter(|c| *c != '.' && *c != '-').collect();
    compact.chars().count() <= 5 && is_upper(&compact)
}

/// At least one cased character and no lowercase ones.
fn is_upper(text: &str) -> bool {
    text.chars().any(|c| c.is_uppercase()) && !text.chars().any(|c| c.is_lowercase())
}

/// Collapse runs of whitespace into a single space and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_space = false;

    for c in s.chars() {
        if c.is_whitespace() {
            if !prev_was_space && !result.is_empty() {
                result.push(' ');
            }
            prev_was_space = true;
        } else {
            result.push(c);
            prev_was_space = false;
        }
    }

    if result.ends_with(' ') {
        result.pop();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text_basic() {
        assert_eq!(normalize_text("Acme Labs, Inc."), "acme labs inc");
        assert_eq!(
            normalize_text("  European Molecular Biology Laboratory  "),
            "european molecular biology laboratory"
        );
    }

    #[test]
    fn test_normalize_text_transliterates() {
        assert_eq!(normalize_text("Universität Zürich"), "universitat zurich");
        assert_eq!(normalize_text("Université de Montréal"), "universite de montreal");
    }

    #[test]
    fn test_normalize_text_keeps_non_latin_script() {
        // No Latin characters at all: left as-is apart from punctuation
        assert_eq!(normalize_text("東京大学"), "東京大学");
    }

    #[test]
    fn test_affiliation_key() {
        assert_eq!(affiliation_key("  Acme Labs "), "acme labs");
    }

    #[test]
    fn test_is_likely_acronym() {
        assert!(is_likely_acronym("EMBL"));
        assert!(is_likely_acronym("M.I.T."));
        assert!(is_likely_acronym("E-M-B-L"));
        assert!(!is_likely_acronym("EMBL-EBI"));
        assert!(!is_likely_acronym("Embl"));
        assert!(!is_likely_acronym("UNIVERSITY"));
        assert!(!is_likely_acronym(""));
        assert!(!is_likely_acronym("12345"));
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  john   a  smith "), "john a smith");
        assert_eq!(collapse_whitespace(""), "");
    }
}
