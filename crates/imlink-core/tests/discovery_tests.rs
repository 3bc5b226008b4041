//! Affiliation and entity discovery integration tests

mod common;

use common::record;
use imlink_core::{
    AffiliationDiscoveryEngine, EntityDiscoveryEngine, ExclusionSet, InMemoryReferenceStore,
    LinkageResult, LinkageStatus, MatchType, ReferenceRecord, ValidatedEntity,
};

fn linkage(status: LinkageStatus, affiliation: &str) -> LinkageResult {
    LinkageResult {
        input_doi: Some("10.1/x".to_string()),
        input_work_id: None,
        input_author_name: "Smith J".to_string(),
        ref_author_name: "Smith, John".to_string(),
        ref_affiliation: affiliation.to_string(),
        linkage_status: status,
    }
}

fn exclusions(ids: &[(Option<&str>, Option<&str>)]) -> ExclusionSet {
    let mut set = ExclusionSet::new();
    for (doi, work_id) in ids {
        set.insert(*doi, *work_id);
    }
    set
}

#[test]
fn test_input_doi_excluded_even_without_work_id() {
    let store: InMemoryReferenceStore = [
        ReferenceRecord::new(None, Some("10.1/x"), "Smith, John", "Acme Labs"),
        ReferenceRecord::new(Some("W2"), Some("10.1/y"), "Doe, Jane", "Acme Labs"),
    ]
    .into_iter()
    .collect();

    let found = AffiliationDiscoveryEngine::new(&store)
        .discover(
            &[linkage(LinkageStatus::OrgMatchFound, "acme labs")],
            &exclusions(&[(Some("https://doi.org/10.1/x"), None)]),
        )
        .unwrap();

    assert_eq!(found.works.len(), 1);
    assert_eq!(found.works[0].doi.as_deref(), Some("10.1/y"));
    assert_eq!(found.works[0].match_type, MatchType::AffiliationExact);
    assert_eq!(found.works[0].matching_key, "acme labs");
}

#[test]
fn test_input_work_id_excluded_independently_of_doi() {
    let store: InMemoryReferenceStore = [
        record("W1", "10.1/other", "Doe, Jane", "Acme Labs"),
        record("W2", "10.1/y", "Roe, Rita", "Acme Labs"),
    ]
    .into_iter()
    .collect();

    let found = AffiliationDiscoveryEngine::new(&store)
        .discover(
            &[linkage(LinkageStatus::OrgMatchFound, "acme labs")],
            &exclusions(&[(None, Some("W1"))]),
        )
        .unwrap();

    let ids: Vec<_> = found.works.iter().map(|w| w.work_id.as_deref()).collect();
    assert_eq!(ids, vec![Some("W2")]);
}

#[test]
fn test_name_only_linkages_do_not_seed() {
    let store: InMemoryReferenceStore = [record("W2", "10.1/y", "Doe, Jane", "Acme Labs")]
        .into_iter()
        .collect();

    let found = AffiliationDiscoveryEngine::new(&store)
        .discover(
            &[linkage(LinkageStatus::NameMatchNoOrgAffiliation, "acme labs")],
            &ExclusionSet::new(),
        )
        .unwrap();
    assert!(found.works.is_empty());
    assert!(found.log.is_empty());

    let found = AffiliationDiscoveryEngine::new(&store)
        .discover(
            &[linkage(LinkageStatus::FirstAvailable, "Acme Labs ")],
            &ExclusionSet::new(),
        )
        .unwrap();
    assert_eq!(found.works.len(), 1);
}

#[test]
fn test_log_has_one_entry_per_linkage_and_row() {
    let store: InMemoryReferenceStore = [record("W2", "10.1/y", "Doe, Jane", "Acme Labs")]
        .into_iter()
        .collect();

    let mut second = linkage(LinkageStatus::OrgMatchFound, "acme labs");
    second.input_author_name = "Smith John".to_string();

    let found = AffiliationDiscoveryEngine::new(&store)
        .discover(
            &[linkage(LinkageStatus::OrgMatchFound, "acme labs"), second],
            &ExclusionSet::new(),
        )
        .unwrap();

    assert_eq!(found.works.len(), 1);
    assert_eq!(found.log.len(), 2);
    assert_eq!(found.log[0].discovered_author, "Doe, Jane");
    assert_eq!(found.log[1].input_author_name, "Smith John");
}

fn entity(text: &str) -> ValidatedEntity {
    ValidatedEntity {
        entity_text: text.to_string(),
        entity_key: imlink_core::text::normalize_text(text),
        source_affiliations: vec![format!("Dept of Physics, {text}")],
        matched_org: "Acme Laboratories".to_string(),
        score: 1.0,
    }
}

#[test]
fn test_entity_discovery_requires_entity_and_org() {
    let store: InMemoryReferenceStore = [
        record("W2", "10.1/y", "Doe, Jane", "Acme Laboratories Heidelberg"),
        record("W4", "10.1/w", "Kay, Kim", "Physics, Acme Laboratories Heidelberg, DE"),
        record("W5", "10.1/v", "Lin, Lu", "Heidelberg University"),
        record("W6", "10.1/u", "Ode, Oz", "Acme Laboratories Hamburg"),
    ]
    .into_iter()
    .collect();

    let already = AffiliationDiscoveryEngine::new(&store)
        .discover(
            &[linkage(LinkageStatus::OrgMatchFound, "acme laboratories heidelberg")],
            &ExclusionSet::new(),
        )
        .unwrap();
    assert_eq!(already.works.len(), 1);

    let works = EntityDiscoveryEngine::new(&store, vec!["acme laboratories".to_string()])
        .discover(
            &[entity("Acme Laboratories Heidelberg")],
            &already.works,
            &ExclusionSet::new(),
        )
        .unwrap();

    assert_eq!(works.len(), 1);
    assert_eq!(works[0].work_id.as_deref(), Some("W4"));
    assert_eq!(works[0].match_type, MatchType::EntityExtracted);
    assert_eq!(works[0].matching_key, "acme laboratories heidelberg");
}

#[test]
fn test_entity_discovery_without_orgs_is_empty() {
    let store: InMemoryReferenceStore = [record("W2", "10.1/y", "Doe, Jane", "Acme Laboratories")]
        .into_iter()
        .collect();
    let works = EntityDiscoveryEngine::new(&store, Vec::new())
        .discover(&[entity("Acme Laboratories")], &[], &ExclusionSet::new())
        .unwrap();
    assert!(works.is_empty());
}
