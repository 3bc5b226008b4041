//! Reference and input records

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::identifiers::clean_doi_or_raw;
use crate::names::{parse_name, NameStyle};
use crate::text::{affiliation_key, collapse_whitespace, normalize_text};

/// One author/affiliation row of the reference corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    pub work_id: Option<String>,
    pub doi: Option<String>,
    pub author_name: String,
    pub normalized_author_name: String,
    pub affiliation_name: String,
    pub normalized_affiliation_name: String,
    /// Case-folded, trimmed `normalized_affiliation_name`; the discovery join key
    pub normalized_affiliation_key: String,
    pub affiliation_ror: Option<String>,
}

impl ReferenceRecord {
    /// Build a record, deriving the normalized columns the way the corpus
    /// importer does.
    pub fn new(
        work_id: Option<&str>,
        doi: Option<&str>,
        author_name: impl Into<String>,
        affiliation_name: impl Into<String>,
    ) -> Self {
        let author_name = author_name.into();
        let affiliation_name = affiliation_name.into();
        let normalized_affiliation_name = collapse_whitespace(&normalize_text(&affiliation_name));

        Self {
            work_id: non_blank(work_id),
            doi: non_blank(doi),
            normalized_author_name: parse_name(&author_name, NameStyle::FirstLast).normalized,
            normalized_affiliation_key: affiliation_key(&normalized_affiliation_name),
            normalized_affiliation_name,
            author_name,
            affiliation_name,
            affiliation_ror: None,
        }
    }

    pub fn with_ror(mut self, ror: impl Into<String>) -> Self {
        let ror: String = ror.into();
        self.affiliation_ror = non_blank(Some(&ror));
        self
    }

    pub fn key(&self) -> WorkKey {
        WorkKey::new(self.doi.as_deref(), self.work_id.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Identifier pair of a work; either side may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct WorkKey {
    pub doi: Option<String>,
    pub work_id: Option<String>,
}

impl WorkKey {
    pub fn new(doi: Option<&str>, work_id: Option<&str>) -> Self {
        Self {
            doi: non_blank(doi),
            work_id: non_blank(work_id),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.doi.is_none() && self.work_id.is_none()
    }
}

/// One row of the user's input file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InputRecord {
    /// Cleaned DOI
    pub doi: Option<String>,
    pub work_id: Option<String>,
    /// Author names, already split and trimmed
    pub authors: Vec<String>,
}

impl InputRecord {
    pub fn key(&self) -> WorkKey {
        WorkKey::new(self.doi.as_deref(), self.work_id.as_deref())
    }
}

/// Identifiers already present in the input file.
///
/// A reference row is excluded when its DOI or its work id was seen in the
/// input, independently of the other identifier.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    pairs: HashSet<WorkKey>,
    dois: HashSet<String>,
    work_ids: HashSet<String>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one input row's identifiers. The DOI is stored cleaned when
    /// it parses as a DOI and trimmed otherwise.
    pub fn insert(&mut self, doi: Option<&str>, work_id: Option<&str>) {
        let doi = doi.and_then(clean_doi_or_raw);
        let work_id = non_blank(work_id);

        if let Some(d) = &doi {
            self.dois.insert(d.clone());
        }
        if let Some(w) = &work_id {
            self.work_ids.insert(w.clone());
        }
        if doi.is_some() || work_id.is_some() {
            self.pairs.insert(WorkKey { doi, work_id });
        }
    }

    pub fn contains_doi(&self, doi: &str) -> bool {
        self.dois.contains(doi.trim())
    }

    pub fn contains_work_id(&self, work_id: &str) -> bool {
        self.work_ids.contains(work_id.trim())
    }

    /// Whether a work with these identifiers is already known.
    pub fn excludes(&self, doi: Option<&str>, work_id: Option<&str>) -> bool {
        doi.is_some_and(|d| self.contains_doi(d)) || work_id.is_some_and(|w| self.contains_work_id(w))
    }

    pub fn excludes_record(&self, record: &ReferenceRecord) -> bool {
        self.excludes(record.doi.as_deref(), record.work_id.as_deref())
    }

    /// Number of distinct `(doi, work_id)` pairs
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn doi_count(&self) -> usize {
        self.dois.len()
    }

    pub fn work_id_count(&self) -> usize {
        self.work_ids.len()
    }
}
