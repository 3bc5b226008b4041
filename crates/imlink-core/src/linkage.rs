//! Linking input authors to reference authors
//!
//! Each distinct work key of a chunk moves through:
//! ```text
//! New → CandidatesFetched → OrgMatched | FirstAvailable | NameMatchNoOrg | NoMatch
//! ```
//! and every input author of that work is resolved against the same
//! fetched candidates. At most one result is emitted per
//! `(work key, input author)` over the whole run.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::config::LinkConfig;
use crate::domain::{InputRecord, LinkageResult, LinkageStatus, WorkKey};
use crate::error::{Result, StoreError};
use crate::names::{ParsedName, SimilarityMatcher};
use crate::store::{AuthorAffiliation, ReferenceStore};
use crate::text::normalize_text;

/// Outcome of resolving one input author
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Index of the first name match affiliated with a configured organization
    OrgMatched(usize),
    /// Index of the first name match; no organizations configured
    FirstAvailable(usize),
    /// Index of the first name match; none affiliated with an organization
    NameMatchNoOrg(usize),
    NoMatch,
}

impl Resolution {
    pub fn status(&self) -> Option<LinkageStatus> {
        match self {
            Resolution::OrgMatched(_) => Some(LinkageStatus::OrgMatchFound),
            Resolution::FirstAvailable(_) => Some(LinkageStatus::FirstAvailable),
            Resolution::NameMatchNoOrg(_) => Some(LinkageStatus::NameMatchNoOrgAffiliation),
            Resolution::NoMatch => None,
        }
    }

    pub fn candidate(&self) -> Option<usize> {
        match self {
            Resolution::OrgMatched(i)
            | Resolution::FirstAvailable(i)
            | Resolution::NameMatchNoOrg(i) => Some(*i),
            Resolution::NoMatch => None,
        }
    }
}

/// A fetched reference author, parsed once per work
#[derive(Debug, Clone)]
pub struct Candidate {
    pub author: AuthorAffiliation,
    parsed: ParsedName,
    has_org: bool,
}

/// Resolves input authors against the reference store.
pub struct LinkageResolver<'a, S: ReferenceStore + ?Sized> {
    store: &'a S,
    matcher: SimilarityMatcher,
    org_names: Vec<String>,
    emitted: HashSet<(WorkKey, String)>,
}

impl<'a, S: ReferenceStore + ?Sized> LinkageResolver<'a, S> {
    pub fn new(store: &'a S, config: &LinkConfig) -> Result<Self> {
        let matcher = SimilarityMatcher::new(
            config.input_name_style,
            config.reference_name_style,
            config.name_matching_threshold,
        )?;

        Ok(Self {
            store,
            matcher,
            org_names: config.normalized_org_names(),
            emitted: HashSet::new(),
        })
    }

    /// Number of results emitted so far in this run
    pub fn emitted_count(&self) -> usize {
        self.emitted.len()
    }

    /// Parse, sort and de-duplicate fetched candidates.
    pub fn prepare_candidates(&self, mut authors: Vec<AuthorAffiliation>) -> Vec<Candidate> {
        authors.sort();
        authors.dedup();

        authors
            .into_iter()
            .map(|author| {
                let normalized_affiliation = normalize_text(&author.affiliation);
                let has_org = self
                    .org_names
                    .iter()
                    .any(|org| normalized_affiliation.contains(org.as_str()));
                Candidate {
                    parsed: self.matcher.parse_reference(&author.author_name),
                    author,
                    has_org,
                }
            })
            .collect()
    }

    /// Pick the linked candidate for one input author.
    pub fn resolve_author(&self, input_author: &str, candidates: &[Candidate]) -> Resolution {
        if input_author.trim().is_empty() {
            return Resolution::NoMatch;
        }
        let parsed = self.matcher.parse_input(input_author);

        let mut first_match = None;
        for (idx, candidate) in candidates.iter().enumerate() {
            if !self.matcher.matches_parsed(&parsed, &candidate.parsed) {
                continue;
            }
            if candidate.has_org {
                return Resolution::OrgMatched(idx);
            }
            if first_match.is_none() {
                first_match = Some(idx);
            }
        }

        match first_match {
            Some(idx) if self.org_names.is_empty() => Resolution::FirstAvailable(idx),
            Some(idx) => Resolution::NameMatchNoOrg(idx),
            None => Resolution::NoMatch,
        }
    }

    /// Resolve every author of a chunk of input rows.
    ///
    /// Candidates are fetched once per distinct work key in the chunk.
    pub fn resolve_chunk(
        &mut self,
        chunk: &[InputRecord],
    ) -> std::result::Result<Vec<LinkageResult>, StoreError> {
        let mut order: Vec<WorkKey> = Vec::new();
        let mut authors_by_key: HashMap<WorkKey, Vec<&str>> = HashMap::new();

        for record in chunk {
            let key = record.key();
            if key.is_empty() {
                continue;
            }
            let authors = authors_by_key.entry(key.clone()).or_insert_with(|| {
                order.push(key);
                Vec::new()
            });
            authors.extend(record.authors.iter().map(String::as_str));
        }

        let mut results = Vec::new();

        for key in order {
            let Some(authors) = authors_by_key.get(&key) else {
                continue;
            };

            let fetched = self
                .store
                .authors_for_work(&key)
                .map_err(|e| e.in_phase("author linkage"))?;
            let candidates = self.prepare_candidates(fetched);
            debug!(doi = ?key.doi, work_id = ?key.work_id, candidates = candidates.len(), "Resolving work");

            if candidates.is_empty() {
                continue;
            }

            for &input_author in authors {
                let input_author = input_author.trim();
                let emitted_key = (key.clone(), input_author.to_string());
                if self.emitted.contains(&emitted_key) {
                    continue;
                }

                let resolution = self.resolve_author(input_author, &candidates);
                let (Some(status), Some(idx)) = (resolution.status(), resolution.candidate())
                else {
                    continue;
                };
                let chosen = &candidates[idx].author;

                self.emitted.insert(emitted_key);
                results.push(LinkageResult {
                    input_doi: key.doi.clone(),
                    input_work_id: key.work_id.clone(),
                    input_author_name: input_author.to_string(),
                    ref_author_name: chosen.author_name.clone(),
                    ref_affiliation: chosen.affiliation.clone(),
                    linkage_status: status,
                });
            }
        }

        Ok(results)
    }
}
