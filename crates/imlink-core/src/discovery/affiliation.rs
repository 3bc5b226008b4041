//! Affiliation-key discovery

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::domain::{
    DiscoveredWork, DiscoveryLogEntry, ExclusionSet, LinkageResult, MatchType, ReferenceRecord,
};
use crate::error::StoreError;
use crate::store::ReferenceStore;
use crate::text::affiliation_key;

/// Works found by affiliation key, with per-linkage provenance
#[derive(Debug, Clone, Default)]
pub struct AffiliationDiscovery {
    /// Distinct discovered rows
    pub works: Vec<DiscoveredWork>,
    /// One entry per (linkage, discovered row)
    pub log: Vec<DiscoveryLogEntry>,
}

/// Joins linked affiliations against the corpus affiliation key.
pub struct AffiliationDiscoveryEngine<'a, S: ReferenceStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ReferenceStore + ?Sized> AffiliationDiscoveryEngine<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Expand `org_match_found` and `first_available` linkages into every
    /// reference row sharing the linked affiliation, minus known works.
    pub fn discover(
        &self,
        linkages: &[LinkageResult],
        exclusions: &ExclusionSet,
    ) -> Result<AffiliationDiscovery, StoreError> {
        let mut by_key: HashMap<String, Vec<ReferenceRecord>> = HashMap::new();
        let mut seen = HashSet::new();
        let mut discovery = AffiliationDiscovery::default();
        let mut seeds = 0usize;

        for linkage in linkages.iter().filter(|l| l.linkage_status.seeds_discovery()) {
            let key = affiliation_key(&linkage.ref_affiliation);
            if key.is_empty() {
                continue;
            }
            seeds += 1;

            if !by_key.contains_key(&key) {
                let rows = self
                    .store
                    .records_by_affiliation_key(&key)
                    .map_err(|e| e.in_phase("affiliation discovery"))?;
                debug!(key = %key, rows = rows.len(), "Joined affiliation key");
                by_key.insert(key.clone(), rows);
            }
            let Some(rows) = by_key.get(&key) else {
                continue;
            };

            for record in rows.iter().filter(|r| !exclusions.excludes_record(r)) {
                discovery.log.push(DiscoveryLogEntry {
                    input_doi: linkage.input_doi.clone(),
                    input_work_id: linkage.input_work_id.clone(),
                    input_author_name: linkage.input_author_name.clone(),
                    linking_affiliation: linkage.ref_affiliation.clone(),
                    discovered_work_id: record.work_id.clone(),
                    discovered_doi: record.doi.clone(),
                    discovered_author: record.author_name.clone(),
                    discovered_author_affiliation: record.affiliation_name.clone(),
                    discovered_ror_id: record.affiliation_ror.clone(),
                });

                let work = DiscoveredWork::from_record(
                    record,
                    &linkage.ref_affiliation,
                    MatchType::AffiliationExact,
                );
                if seen.insert(work.clone()) {
                    discovery.works.push(work);
                }
            }
        }

        info!(
            seeds,
            keys = by_key.len(),
            works = discovery.works.len(),
            "Affiliation discovery complete"
        );
        Ok(discovery)
    }
}
