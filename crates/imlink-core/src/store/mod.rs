//! Reference corpus access
//!
//! The corpus is read-only for the whole run. [`ReferenceStore`] is the
//! query surface the linkage and discovery phases need; the SQLite store
//! serves a pre-built database and the in-memory store serves tests and
//! embedders.

mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

use std::collections::HashMap;

pub use memory::InMemoryReferenceStore;
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteReferenceStore, REFERENCE_TABLE};

use crate::domain::{ReferenceRecord, WorkKey};
use crate::error::StoreError;

/// Author name and normalized affiliation of one reference row
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AuthorAffiliation {
    pub author_name: String,
    pub affiliation: String,
}

/// Queries over the reference corpus
pub trait ReferenceStore {
    /// Distinct author/affiliation pairs of rows whose DOI equals `key.doi`
    /// or whose work id equals `key.work_id`. Absent identifiers never
    /// match; rows without an author name are skipped.
    fn authors_for_work(&self, key: &WorkKey) -> Result<Vec<AuthorAffiliation>, StoreError>;

    /// Rows whose `normalized_affiliation_key` equals `key`
    fn records_by_affiliation_key(&self, key: &str) -> Result<Vec<ReferenceRecord>, StoreError>;

    /// Rows whose `normalized_affiliation_key` contains `entity_key` and at
    /// least one of `org_names`
    fn records_containing(
        &self,
        entity_key: &str,
        org_names: &[String],
    ) -> Result<Vec<ReferenceRecord>, StoreError>;

    /// Map each normalized affiliation to one original spelling, the
    /// lexicographically smallest. Unknown names are left out.
    fn original_affiliation_names(
        &self,
        normalized: &[String],
    ) -> Result<HashMap<String, String>, StoreError>;

    /// Total number of rows
    fn record_count(&self) -> Result<usize, StoreError>;
}
