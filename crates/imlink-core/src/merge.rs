//! Merging the two discovery streams

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::domain::{DiscoveredWork, MatchType};

/// Final discovered works and distinct-work counts per match type
#[derive(Debug, Clone, Default)]
pub struct MergedDiscoveries {
    /// Unique per `(work_id, doi, author)`, sorted by match type, DOI, author
    pub works: Vec<DiscoveredWork>,
    pub counts: BTreeMap<MatchType, usize>,
}

impl MergedDiscoveries {
    pub fn count(&self, match_type: MatchType) -> usize {
        self.counts.get(&match_type).copied().unwrap_or(0)
    }
}

/// Unions discovery streams, keeping the highest-priority row per key.
#[derive(Debug, Default)]
pub struct ResultMerger;

impl ResultMerger {
    pub fn new() -> Self {
        Self
    }

    pub fn merge(
        &self,
        affiliation_works: &[DiscoveredWork],
        entity_works: &[DiscoveredWork],
    ) -> MergedDiscoveries {
        let mut best: HashMap<(Option<&str>, Option<&str>, &str), &DiscoveredWork> = HashMap::new();

        for work in affiliation_works.iter().chain(entity_works) {
            best.entry(work.row_key())
                .and_modify(|current| {
                    if work.match_type.priority() < current.match_type.priority() {
                        *current = work;
                    }
                })
                .or_insert(work);
        }

        let mut works: Vec<DiscoveredWork> = best.into_values().cloned().collect();
        works.sort_by(|a, b| {
            a.match_type
                .cmp(&b.match_type)
                .then_with(|| a.doi.cmp(&b.doi))
                .then_with(|| a.author.cmp(&b.author))
                .then_with(|| a.work_id.cmp(&b.work_id))
        });

        let mut distinct: BTreeMap<MatchType, HashSet<&str>> = BTreeMap::new();
        for work in &works {
            if let Some(identity) = work.work_identity() {
                distinct.entry(work.match_type).or_default().insert(identity);
            }
        }
        let counts = distinct
            .into_iter()
            .map(|(match_type, ids)| (match_type, ids.len()))
            .collect();

        MergedDiscoveries { works, counts }
    }
}
