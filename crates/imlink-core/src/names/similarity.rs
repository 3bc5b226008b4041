//! Author name similarity
//!
//! Two names match when their surnames are close under Jaro-Winkler and
//! their given names agree, either on the leading initial or by
//! Jaro-Winkler. A near-identical surname matches on its own.

use strsim::jaro_winkler;

use super::parser::{parse_name, ParsedName};
use super::style::NameStyle;
use crate::error::ValidationError;

/// Default similarity threshold for names
pub const DEFAULT_NAME_THRESHOLD: f64 = 0.85;

/// Surname similarity at which a match no longer needs a given-name match
pub const SURNAME_OVERRIDE: f64 = 0.95;

/// Whether `name1` (written in `style1`) and `name2` (written in `style2`)
/// denote the same person.
pub fn are_similar(
    name1: &str,
    name2: &str,
    style1: NameStyle,
    style2: NameStyle,
    threshold: f64,
) -> bool {
    let a = parse_name(name1, style1);
    let b = parse_name(name2, style2);
    parsed_similar(&a, &b, threshold)
}

/// Compare two already-parsed names.
pub(crate) fn parsed_similar(a: &ParsedName, b: &ParsedName, threshold: f64) -> bool {
    if a.last.is_empty() || b.last.is_empty() {
        return a.normalized == b.normalized;
    }

    let last_similarity = jaro_winkler(&a.last, &b.last);
    if last_similarity < threshold {
        return false;
    }

    if !a.first.is_empty() && !b.first.is_empty() {
        if a.first.chars().count() == 1 || b.first.chars().count() == 1 {
            if a.first.chars().next() == b.first.chars().next() {
                return true;
            }
        } else if jaro_winkler(&a.first, &b.first) >= threshold {
            return true;
        }
    }

    last_similarity >= SURNAME_OVERRIDE
}

/// Name matcher bound to the input and reference naming conventions.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityMatcher {
    input_style: NameStyle,
    reference_style: NameStyle,
    threshold: f64,
}

impl SimilarityMatcher {
    pub fn new(
        input_style: NameStyle,
        reference_style: NameStyle,
        threshold: f64,
    ) -> Result<Self, ValidationError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ValidationError::Threshold(threshold));
        }

        Ok(Self {
            input_style,
            reference_style,
            threshold,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Parse an input-file author name.
    pub fn parse_input(&self, name: &str) -> ParsedName {
        parse_name(name, self.input_style)
    }

    /// Parse a reference-corpus author name.
    pub fn parse_reference(&self, name: &str) -> ParsedName {
        parse_name(name, self.reference_style)
    }

    /// Compare an input name against a reference name.
    ///
    /// Blank names never match anything.
    pub fn matches(&self, input_name: &str, reference_name: &str) -> bool {
        if input_name.trim().is_empty() || reference_name.trim().is_empty() {
            return false;
        }
        self.matches_parsed(&self.parse_input(input_name), &self.parse_reference(reference_name))
    }

    /// Compare two names parsed with [`parse_input`](Self::parse_input) and
    /// [`parse_reference`](Self::parse_reference).
    pub fn matches_parsed(&self, input: &ParsedName, reference: &ParsedName) -> bool {
        if input.original.is_empty() || reference.original.is_empty() {
            return false;
        }
        parsed_similar(input, reference, self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_matches_full_first_name() {
        assert!(are_similar(
            "Smith J",
            "Smith, John",
            NameStyle::LastInitial,
            NameStyle::LastCommaFirst,
            DEFAULT_NAME_THRESHOLD
        ));
    }

    #[test]
    fn test_initial_mismatch_needs_surname_override() {
        // smith/smith scores 1.0 so the surname override still applies
        assert!(are_similar(
            "Smith K",
            "Smith, John",
            NameStyle::LastInitial,
            NameStyle::LastCommaFirst,
            DEFAULT_NAME_THRESHOLD
        ));
        assert!(!are_similar(
            "Smyth K",
            "Smith, John",
            NameStyle::LastInitial,
            NameStyle::LastCommaFirst,
            DEFAULT_NAME_THRESHOLD
        ));
    }

    #[test]
    fn test_surname_below_threshold() {
        assert!(!are_similar(
            "John Smith",
            "John Jones",
            NameStyle::Auto,
            NameStyle::Auto,
            DEFAULT_NAME_THRESHOLD
        ));
    }

    #[test]
    fn test_empty_surname_uses_normalized_equality() {
        // A single token parses as a given name only
        assert!(are_similar("Smith", "smith", NameStyle::Auto, NameStyle::Auto, 0.85));
        assert!(!are_similar("Smith", "Smyth", NameStyle::Auto, NameStyle::Auto, 0.85));
    }

    #[test]
    fn test_matcher_rejects_bad_threshold() {
        assert!(SimilarityMatcher::new(NameStyle::Auto, NameStyle::Auto, 1.5).is_err());
        assert!(SimilarityMatcher::new(NameStyle::Auto, NameStyle::Auto, -0.1).is_err());
    }

    #[test]
    fn test_matcher_blank_names_never_match() {
        let matcher = SimilarityMatcher::new(NameStyle::Auto, NameStyle::Auto, 0.85).unwrap();
        assert!(!matcher.matches("", ""));
        assert!(!matcher.matches("  ", "John Smith"));
        assert!(matcher.matches("John Smith", "J. Smith"));
    }
}
