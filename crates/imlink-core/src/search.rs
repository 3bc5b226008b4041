//! Affiliation search mode
//!
//! Looks up every reference row whose affiliation key equals the normalized
//! form of a search term read from a CSV column.

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::config::LinkConfig;
use crate::error::Result;
use crate::input::read_column;
use crate::store::ReferenceStore;
use crate::text::{affiliation_key, collapse_whitespace, normalize_text};

const SEARCH_HEADER: &[&str] = &[
    "input_search_term",
    "ref_work_id",
    "ref_doi",
    "ref_author_name",
    "ref_affiliation",
    "ref_affiliation_normalized_key",
];

/// One reference row matched by a search term
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AffiliationSearchHit {
    pub input_search_term: String,
    pub ref_work_id: Option<String>,
    pub ref_doi: Option<String>,
    pub ref_author_name: String,
    /// Normalized affiliation name of the reference row
    pub ref_affiliation: String,
    pub ref_affiliation_normalized_key: String,
}

/// Key a search term is joined on
pub fn search_key(term: &str) -> String {
    affiliation_key(&collapse_whitespace(&normalize_text(term)))
}

/// Find reference rows for each term, sorted by term, DOI and author.
/// Terms that normalize to nothing match nothing.
pub fn search_affiliations<S: ReferenceStore + ?Sized>(
    store: &S,
    terms: &[String],
) -> Result<Vec<AffiliationSearchHit>> {
    let mut by_key = HashMap::new();
    let mut hits = Vec::new();

    for term in terms {
        let key = search_key(term);
        if key.is_empty() {
            continue;
        }
        if !by_key.contains_key(&key) {
            let records = store
                .records_by_affiliation_key(&key)
                .map_err(|e| e.in_phase("affiliation search"))?;
            by_key.insert(key.clone(), records);
        }

        hits.extend(by_key[&key].iter().map(|record| AffiliationSearchHit {
            input_search_term: term.clone(),
            ref_work_id: record.work_id.clone(),
            ref_doi: record.doi.clone(),
            ref_author_name: record.author_name.clone(),
            ref_affiliation: record.normalized_affiliation_name.clone(),
            ref_affiliation_normalized_key: record.normalized_affiliation_key.clone(),
        }));
    }

    hits.sort_by(|a, b| {
        (&a.input_search_term, &a.ref_doi, &a.ref_author_name).cmp(&(
            &b.input_search_term,
            &b.ref_doi,
            &b.ref_author_name,
        ))
    });
    Ok(hits)
}

/// Read the configured search column from `input_path`, search, and write
/// the hits to `output_path`. Returns the number of rows written.
pub fn run_affiliation_search<S: ReferenceStore + ?Sized>(
    store: &S,
    config: &LinkConfig,
    input_path: &Path,
    output_path: &Path,
) -> Result<usize> {
    let column = config.search_column()?;
    let terms = read_column(input_path, column)?;
    info!(terms = terms.len(), column, "Searching affiliations");

    let hits = search_affiliations(store, &terms)?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(output_path)?;
    writer.write_record(SEARCH_HEADER)?;
    for hit in &hits {
        writer.serialize(hit)?;
    }
    writer.flush()?;

    info!(path = %output_path.display(), rows = hits.len(), "Search complete");
    Ok(hits.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReferenceRecord;
    use crate::store::InMemoryReferenceStore;

    fn store() -> InMemoryReferenceStore {
        [
            ReferenceRecord::new(Some("W2"), Some("10.1/b"), "Zoe Roe", "Acme Labs"),
            ReferenceRecord::new(Some("W1"), Some("10.1/a"), "Jane Doe", "ACME  Labs"),
            ReferenceRecord::new(Some("W3"), Some("10.1/c"), "Max Moe", "Other Institute"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_search_key_normalizes() {
        assert_eq!(search_key("  ACME   Labs "), "acme labs");
        assert_eq!(search_key(""), "");
    }

    #[test]
    fn test_search_sorted_by_term_doi_author() {
        let terms = vec!["acme labs".to_string(), "Nowhere".to_string(), "".to_string()];
        let hits = search_affiliations(&store(), &terms).unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].ref_doi.as_deref(), Some("10.1/a"));
        assert_eq!(hits[1].ref_doi.as_deref(), Some("10.1/b"));
        assert!(hits.iter().all(|h| h.ref_affiliation_normalized_key == "acme labs"));
    }
}
