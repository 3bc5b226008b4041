//! DOI cleaning for input identifiers

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // 10.XXXX[.N]/suffix, anchored, followed by whitespace or end of text
    static ref DOI_REGEX: Regex =
        Regex::new(r"^(10\.\d{4,}(?:\.\d+)?/[-._;()/:a-zA-Z0-9]+)(?:\s|$)").unwrap();
}

/// Resolver and scheme prefixes, checked in order, case-insensitively
const DOI_PREFIXES: &[&str] = &[
    "https://doi.org/",
    "http://doi.org/",
    "https://dx.doi.org/",
    "http://dx.doi.org/",
    "https://www.doi.org/",
    "http://www.doi.org/",
    "doi.org/",
    "dx.doi.org/",
    "www.doi.org/",
    "doi:",
];

/// Extract a bare DOI from a cell that may hold a resolver URL or a
/// `doi:` prefixed value.
///
/// Returns `None` when nothing DOI-shaped remains.
pub fn extract_doi(text: &str) -> Option<String> {
    let mut s = text
        .trim()
        .trim_matches(|c| c == '<' || c == '>')
        .trim_matches('"')
        .trim_matches('\'');

    if s.is_empty() {
        return None;
    }

    for prefix in DOI_PREFIXES {
        if s.len() >= prefix.len()
            && s.is_char_boundary(prefix.len())
            && s[..prefix.len()].eq_ignore_ascii_case(prefix)
        {
            s = &s[prefix.len()..];
            break;
        }
    }

    if let Some(idx) = s.find('?') {
        s = &s[..idx];
    }
    if let Some(idx) = s.find('#') {
        s = &s[..idx];
    }
    let s = s.trim();

    if let Some(cap) = DOI_REGEX.captures(s) {
        return cap.get(1).map(|m| m.as_str().trim().to_string());
    }

    if s.starts_with("10.") && s.contains('/') {
        let cleaned = s.trim_end_matches(|c| matches!(c, '.' | ',' | ';' | ':'));
        return Some(cleaned.to_string());
    }

    None
}

/// Identifier used for exclusion: the cleaned DOI, or the trimmed raw value
/// when it does not look like a DOI. Blank cells give `None`.
pub fn clean_doi_or_raw(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(extract_doi(trimmed).unwrap_or_else(|| trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_doi() {
        assert_eq!(extract_doi("10.1234/abc.def"), Some("10.1234/abc.def".to_string()));
    }

    #[test]
    fn test_url_prefixes() {
        assert_eq!(
            extract_doi("https://doi.org/10.1038/nature12373"),
            Some("10.1038/nature12373".to_string())
        );
        assert_eq!(
            extract_doi("HTTP://DX.DOI.ORG/10.1038/nature12373"),
            Some("10.1038/nature12373".to_string())
        );
        assert_eq!(
            extract_doi("doi:10.1038/nature12373"),
            Some("10.1038/nature12373".to_string())
        );
    }

    #[test]
    fn test_strips_query_fragment_and_wrapping() {
        assert_eq!(
            extract_doi("<https://doi.org/10.1000/xyz123?via=ihub#sec1>"),
            Some("10.1000/xyz123".to_string())
        );
        assert_eq!(extract_doi("\"10.1000/xyz123\""), Some("10.1000/xyz123".to_string()));
    }

    #[test]
    fn test_fallback_trims_trailing_punctuation() {
        // Characters outside the strict suffix class force the fallback
        assert_eq!(extract_doi("10.1/x[1];"), Some("10.1/x[1]".to_string()));
    }

    #[test]
    fn test_not_a_doi() {
        assert_eq!(extract_doi(""), None);
        assert_eq!(extract_doi("   "), None);
        assert_eq!(extract_doi("W2741809807"), None);
        assert_eq!(extract_doi("11.1234/abc"), None);
    }

    #[test]
    fn test_clean_doi_or_raw() {
        assert_eq!(clean_doi_or_raw(" doi:10.1/x "), Some("10.1/x".to_string()));
        assert_eq!(clean_doi_or_raw(" not-a-doi "), Some("not-a-doi".to_string()));
        assert_eq!(clean_doi_or_raw("  "), None);
    }
}
