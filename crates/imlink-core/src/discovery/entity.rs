//! Organization-entity discovery

use std::collections::HashSet;

use tracing::{debug, info};

use crate::domain::{DiscoveredWork, ExclusionSet, MatchType, ValidatedEntity};
use crate::error::StoreError;
use crate::store::ReferenceStore;

/// Searches the corpus for affiliations containing a validated entity and
/// a configured organization.
pub struct EntityDiscoveryEngine<'a, S: ReferenceStore + ?Sized> {
    store: &'a S,
    org_names: Vec<String>,
}

impl<'a, S: ReferenceStore + ?Sized> EntityDiscoveryEngine<'a, S> {
    /// `org_names` must already be normalized
    pub fn new(store: &'a S, org_names: Vec<String>) -> Self {
        Self { store, org_names }
    }

    /// Works reachable through `entities`, skipping rows whose DOI or work id
    /// was input or was already discovered by affiliation.
    pub fn discover(
        &self,
        entities: &[ValidatedEntity],
        already_discovered: &[DiscoveredWork],
        exclusions: &ExclusionSet,
    ) -> Result<Vec<DiscoveredWork>, StoreError> {
        if self.org_names.is_empty() || entities.is_empty() {
            return Ok(Vec::new());
        }

        let known_work_ids: HashSet<&str> = already_discovered
            .iter()
            .filter_map(|w| w.work_id.as_deref())
            .collect();
        let known_dois: HashSet<&str> = already_discovered
            .iter()
            .filter_map(|w| w.doi.as_deref())
            .collect();

        let mut seen = HashSet::new();
        let mut works = Vec::new();

        for entity in entities {
            if entity.entity_key.is_empty() {
                continue;
            }

            let rows = self
                .store
                .records_containing(&entity.entity_key, &self.org_names)
                .map_err(|e| e.in_phase("entity discovery"))?;
            debug!(entity = %entity.entity_key, rows = rows.len(), "Searched entity");

            for record in rows {
                let already = record
                    .work_id
                    .as_deref()
                    .is_some_and(|w| known_work_ids.contains(w))
                    || record.doi.as_deref().is_some_and(|d| known_dois.contains(d));
                if already || exclusions.excludes_record(&record) {
                    continue;
                }

                let work = DiscoveredWork::from_record(
                    &record,
                    &entity.entity_key,
                    MatchType::EntityExtracted,
                );
                if seen.insert(work.clone()) {
                    works.push(work);
                }
            }
        }

        works.sort_by(|a, b| (&a.work_id, &a.doi).cmp(&(&b.work_id, &b.doi)));

        info!(entities = entities.len(), works = works.len(), "Entity discovery complete");
        Ok(works)
    }
}
