//! In-memory reference store

use std::collections::{BTreeSet, HashMap};

use super::{AuthorAffiliation, ReferenceStore};
use crate::domain::{ReferenceRecord, WorkKey};
use crate::error::StoreError;

/// Reference rows held in memory with hash indexes on the lookup columns.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReferenceStore {
    records: Vec<ReferenceRecord>,
    by_doi: HashMap<String, Vec<usize>>,
    by_work_id: HashMap<String, Vec<usize>>,
    by_affiliation_key: HashMap<String, Vec<usize>>,
}

impl InMemoryReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: ReferenceRecord) {
        let idx = self.records.len();

        if let Some(doi) = &record.doi {
            self.by_doi.entry(doi.clone()).or_default().push(idx);
        }
        if let Some(work_id) = &record.work_id {
            self.by_work_id.entry(work_id.clone()).or_default().push(idx);
        }
        self.by_affiliation_key
            .entry(record.normalized_affiliation_key.clone())
            .or_default()
            .push(idx);

        self.records.push(record);
    }

    pub fn records(&self) -> &[ReferenceRecord] {
        &self.records
    }

    fn rows<'a>(
        &'a self,
        indexes: Option<&'a Vec<usize>>,
    ) -> impl Iterator<Item = &'a ReferenceRecord> + 'a {
        indexes
            .into_iter()
            .flatten()
            .filter_map(move |&i| self.records.get(i))
    }
}

impl FromIterator<ReferenceRecord> for InMemoryReferenceStore {
    fn from_iter<I: IntoIterator<Item = ReferenceRecord>>(iter: I) -> Self {
        let mut store = Self::new();
        for record in iter {
            store.insert(record);
        }
        store
    }
}

impl ReferenceStore for InMemoryReferenceStore {
    fn authors_for_work(&self, key: &WorkKey) -> Result<Vec<AuthorAffiliation>, StoreError> {
        let by_doi = key.doi.as_ref().and_then(|d| self.by_doi.get(d));
        let by_work_id = key.work_id.as_ref().and_then(|w| self.by_work_id.get(w));

        let pairs: BTreeSet<AuthorAffiliation> = self
            .rows(by_doi)
            .chain(self.rows(by_work_id))
            .filter(|r| !r.author_name.trim().is_empty())
            .map(|r| AuthorAffiliation {
                author_name: r.author_name.clone(),
                affiliation: r.normalized_affiliation_name.clone(),
            })
            .collect();

        Ok(pairs.into_iter().collect())
    }

    fn records_by_affiliation_key(&self, key: &str) -> Result<Vec<ReferenceRecord>, StoreError> {
        Ok(self.rows(self.by_affiliation_key.get(key)).cloned().collect())
    }

    fn records_containing(
        &self,
        entity_key: &str,
        org_names: &[String],
    ) -> Result<Vec<ReferenceRecord>, StoreError> {
        Ok(self
            .records
            .iter()
            .filter(|r| {
                let key = &r.normalized_affiliation_key;
                key.contains(entity_key) && org_names.iter().any(|org| key.contains(org.as_str()))
            })
            .cloned()
            .collect())
    }

    fn original_affiliation_names(
        &self,
        normalized: &[String],
    ) -> Result<HashMap<String, String>, StoreError> {
        let mut originals: HashMap<String, String> = HashMap::new();

        for record in &self.records {
            if !normalized.contains(&record.normalized_affiliation_name) {
                continue;
            }
            originals
                .entry(record.normalized_affiliation_name.clone())
                .and_modify(|current| {
                    if record.affiliation_name < *current {
                        *current = record.affiliation_name.clone();
                    }
                })
                .or_insert_with(|| record.affiliation_name.clone());
        }

        Ok(originals)
    }

    fn record_count(&self) -> Result<usize, StoreError> {
        Ok(self.records.len())
    }
}
