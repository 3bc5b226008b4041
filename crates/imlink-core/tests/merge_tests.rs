//! Result merging integration tests
//!
//! Enhanced with property-based testing

use std::collections::HashSet;

use imlink_core::{DiscoveredWork, MatchType, ResultMerger};
use proptest::prelude::*;

fn work(work_id: Option<&str>, doi: Option<&str>, author: &str, match_type: MatchType) -> DiscoveredWork {
    DiscoveredWork {
        work_id: work_id.map(str::to_string),
        doi: doi.map(str::to_string),
        author: author.to_string(),
        author_affiliation: "Acme Labs".to_string(),
        ror_id: None,
        matching_key: "acme labs".to_string(),
        match_type,
    }
}

#[test]
fn test_duplicate_rows_within_a_stream_collapse() {
    let row = work(Some("W1"), Some("10.1/a"), "Doe", MatchType::AffiliationExact);
    let merged = ResultMerger::new().merge(&[row.clone(), row], &[]);
    assert_eq!(merged.works.len(), 1);
}

#[test]
fn test_distinct_counts_use_doi_when_work_id_absent() {
    let merged = ResultMerger::new().merge(
        &[],
        &[
            work(None, Some("10.1/a"), "Doe", MatchType::EntityExtracted),
            work(None, Some("10.1/a"), "Roe", MatchType::EntityExtracted),
            work(None, Some("10.1/b"), "Roe", MatchType::EntityExtracted),
        ],
    );
    assert_eq!(merged.works.len(), 3);
    assert_eq!(merged.count(MatchType::EntityExtracted), 2);
}

fn arb_work() -> impl Strategy<Value = DiscoveredWork> {
    (
        prop::option::of(prop::sample::select(vec!["W1", "W2", "W3"])),
        prop::option::of(prop::sample::select(vec!["10.1/a", "10.1/b"])),
        prop::sample::select(vec!["Doe", "Roe", "Moe"]),
        prop::bool::ANY,
    )
        .prop_map(|(work_id, doi, author, exact)| {
            let match_type = if exact {
                MatchType::AffiliationExact
            } else {
                MatchType::EntityExtracted
            };
            work(work_id, doi, author, match_type)
        })
}

proptest! {
    #[test]
    fn prop_merge_keys_unique(
        affiliation in prop::collection::vec(arb_work(), 0..20),
        entity in prop::collection::vec(arb_work(), 0..20),
    ) {
        let merged = ResultMerger::new().merge(&affiliation, &entity);

        let mut keys = HashSet::new();
        for w in &merged.works {
            prop_assert!(keys.insert(w.row_key()), "duplicate key {:?}", w.row_key());
        }

        // Every input key survives, with the exact match winning
        for w in affiliation.iter().chain(&entity) {
            let kept = merged.works.iter().find(|m| m.row_key() == w.row_key());
            prop_assert!(kept.is_some());
            let any_exact = affiliation
                .iter()
                .chain(&entity)
                .any(|o| o.row_key() == w.row_key() && o.match_type == MatchType::AffiliationExact);
            if any_exact {
                prop_assert_eq!(kept.map(|k| k.match_type), Some(MatchType::AffiliationExact));
            }
        }
    }

    #[test]
    fn prop_merge_sorted_by_match_type(
        affiliation in prop::collection::vec(arb_work(), 0..20),
        entity in prop::collection::vec(arb_work(), 0..20),
    ) {
        let merged = ResultMerger::new().merge(&affiliation, &entity);
        let types: Vec<MatchType> = merged.works.iter().map(|w| w.match_type).collect();
        let mut sorted = types.clone();
        sorted.sort();
        prop_assert_eq!(types, sorted);
    }
}
