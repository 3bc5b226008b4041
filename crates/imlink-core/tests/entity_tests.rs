//! Entity extraction and validation integration tests

use imlink_core::entities::{passes_entity_filter, MIN_ENTITY_LEN};
use imlink_core::text::is_likely_acronym;
use imlink_core::{EntityExtractionValidator, KeywordTagger, OrganizationTagger, TaggedSpan, TaggerError};
use proptest::prelude::*;
use rstest::rstest;

#[rstest]
#[case("EMBL", true)]
#[case("M.I.T.", true)]
#[case("E-M-B-L", true)]
#[case("EMBL-EBI", false)]
#[case("Embl", false)]
#[case("", false)]
fn test_acronym_detection(#[case] text: &str, #[case] expected: bool) {
    assert_eq!(is_likely_acronym(text), expected);
}

/// Tags each whole affiliation as one organization
struct WholeStringTagger;

impl OrganizationTagger for WholeStringTagger {
    fn extract_organizations(&self, batch: &[String]) -> Result<Vec<Vec<TaggedSpan>>, TaggerError> {
        Ok(batch.iter().map(|a| vec![TaggedSpan::organization(a.as_str())]).collect())
    }
}

#[test]
fn test_threshold_is_strict() {
    let orgs = vec!["Max Planck Institute".to_string()];
    let tagger = WholeStringTagger;
    let affiliations = vec!["Max Planck Institute for Astronomy".to_string()];

    let lenient = EntityExtractionValidator::new(&tagger, &orgs, 0.99, 8).unwrap();
    assert_eq!(lenient.run(&affiliations).validated.len(), 1);

    // A perfect partial match cannot exceed a threshold of 1.0
    let strict = EntityExtractionValidator::new(&tagger, &orgs, 1.0, 8).unwrap();
    assert!(strict.run(&affiliations).validated.is_empty());
}

#[test]
fn test_keyword_tagger_feeds_validator() {
    let orgs = vec!["Stanford University".to_string()];
    let tagger = KeywordTagger::new();
    let validator = EntityExtractionValidator::new(&tagger, &orgs, 0.85, 2).unwrap();

    let extraction = validator.run(&[
        "Department of Physics, Stanford University School of Medicine, CA".to_string(),
        "Stanford University".to_string(),
        "Nowhere Foundation".to_string(),
    ]);

    let keys: Vec<&str> = extraction
        .validated
        .iter()
        .map(|e| e.entity_key.as_str())
        .collect();
    assert_eq!(
        keys,
        vec!["stanford university", "stanford university school of medicine"]
    );
    assert!(extraction.mappings().contains_key("Nowhere Foundation"));
}

proptest! {
    #[test]
    fn prop_filtered_entities_are_long_and_not_acronyms(text in "[A-Za-z .-]{0,30}") {
        if passes_entity_filter(&text) {
            prop_assert!(!is_likely_acronym(&text));
            prop_assert!(text.chars().count() > MIN_ENTITY_LEN);
        }
    }

    #[test]
    fn prop_short_text_never_passes(text in "\\PC{0,15}") {
        prop_assert!(!passes_entity_filter(&text));
    }
}
