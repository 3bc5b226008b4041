//! Entity filtering and fuzzy validation

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use super::tagger::OrganizationTagger;
use crate::domain::{EntityCandidate, ValidatedEntity};
use crate::error::{TaggerError, ValidationError};
use crate::text::{collapse_whitespace, is_likely_acronym, normalize_text, partial_ratio};

/// Entities must be longer than this, raw and normalized, in characters
pub const MIN_ENTITY_LEN: usize = 15;

/// Whether a tagged span is worth validating: not acronym-like, and longer
/// than [`MIN_ENTITY_LEN`] characters both raw and normalized.
pub fn passes_entity_filter(entity_text: &str) -> bool {
    !is_likely_acronym(entity_text)
        && entity_text.chars().count() > MIN_ENTITY_LEN
        && normalize_text(entity_text).chars().count() > MIN_ENTITY_LEN
}

/// Tagger output and the entities that survived validation
#[derive(Debug, Clone, Default)]
pub struct EntityExtraction {
    /// Every organization span, unfiltered
    pub candidates: Vec<EntityCandidate>,
    /// Validated entities keyed by normalized text, sorted by key
    pub validated: Vec<ValidatedEntity>,
}

impl EntityExtraction {
    /// Source affiliation to its extracted entity texts, for the mappings file
    pub fn mappings(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut mappings: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for candidate in &self.candidates {
            let entities = mappings.entry(candidate.source_affiliation.as_str()).or_default();
            if !entities.contains(&candidate.entity_text.as_str()) {
                entities.push(candidate.entity_text.as_str());
            }
        }
        mappings
    }
}

/// Runs the tagger over affiliations and validates its spans against the
/// configured organization names.
pub struct EntityExtractionValidator<'t> {
    tagger: &'t dyn OrganizationTagger,
    org_names: Vec<String>,
    threshold: f64,
    batch_size: usize,
}

impl<'t> EntityExtractionValidator<'t> {
    /// `threshold` is a fraction in [0, 1]; scores must exceed it.
    pub fn new(
        tagger: &'t dyn OrganizationTagger,
        org_names: &[String],
        threshold: f64,
        batch_size: usize,
    ) -> Result<Self, ValidationError> {
        let org_names: Vec<String> = org_names
            .iter()
            .filter(|o| !o.trim().is_empty())
            .cloned()
            .collect();
        if org_names.is_empty() {
            return Err(ValidationError::NoOrganizations);
        }
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ValidationError::Threshold(threshold));
        }

        Ok(Self {
            tagger,
            org_names,
            threshold,
            batch_size: batch_size.max(1),
        })
    }

    /// Tag and validate the given original affiliation strings.
    pub fn run(&self, affiliations: &[String]) -> EntityExtraction {
        let candidates = self.extract_candidates(affiliations);
        let validated = self.validate(&candidates);
        info!(
            affiliations = affiliations.len(),
            candidates = candidates.len(),
            validated = validated.len(),
            "Entity extraction complete"
        );
        EntityExtraction {
            candidates,
            validated,
        }
    }

    /// Organization spans from the tagger, one batch at a time. A failed
    /// batch is logged and contributes nothing.
    pub fn extract_candidates(&self, affiliations: &[String]) -> Vec<EntityCandidate> {
        let mut candidates = Vec::new();

        for (batch_no, batch) in affiliations.chunks(self.batch_size).enumerate() {
            let tagged = match self.tagger.extract_organizations(batch) {
                Ok(tagged) if tagged.len() == batch.len() => tagged,
                Ok(tagged) => {
                    let err = TaggerError::Prediction(format!(
                        "expected {} span lists, got {}",
                        batch.len(),
                        tagged.len()
                    ));
                    warn!(tagger = self.tagger.name(), batch = batch_no, error = %err, "Tagger batch failed");
                    continue;
                }
                Err(err) => {
                    warn!(tagger = self.tagger.name(), batch = batch_no, error = %err, "Tagger batch failed");
                    continue;
                }
            };

            for (source, spans) in batch.iter().zip(tagged) {
                candidates.extend(
                    spans
                        .into_iter()
                        .filter(|span| span.tag.is_organization())
                        .filter(|span| !span.text.trim().is_empty())
                        .map(|span| EntityCandidate {
                            entity_text: span.text.trim().to_string(),
                            source_affiliation: source.clone(),
                        }),
                );
            }
        }

        candidates
    }

    /// Filter candidates and keep those whose best organization score
    /// exceeds the threshold, one entry per normalized entity text.
    pub fn validate(&self, candidates: &[EntityCandidate]) -> Vec<ValidatedEntity> {
        // Raw entity text to its source affiliations, in first-seen order
        let mut sources: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for candidate in candidates.iter().filter(|c| passes_entity_filter(&c.entity_text)) {
            let list = sources.entry(candidate.entity_text.as_str()).or_default();
            if !list.contains(&candidate.source_affiliation) {
                list.push(candidate.source_affiliation.clone());
            }
        }

        let mut by_key: BTreeMap<String, ValidatedEntity> = BTreeMap::new();

        for (entity_text, source_affiliations) in sources {
            let Some((matched_org, score)) = self.best_match(entity_text) else {
                continue;
            };
            if score <= self.threshold {
                debug!(entity = entity_text, score, "Entity below threshold");
                continue;
            }

            let entity_key = collapse_whitespace(&normalize_text(entity_text));
            if entity_key.is_empty() {
                continue;
            }

            let entity = ValidatedEntity {
                entity_text: entity_text.to_string(),
                entity_key: entity_key.clone(),
                source_affiliations,
                matched_org: matched_org.to_string(),
                score,
            };

            match by_key.get_mut(&entity_key) {
                Some(existing) if entity.score > existing.score => {
                    let mut merged = entity;
                    for source in std::mem::take(&mut existing.source_affiliations) {
                        if !merged.source_affiliations.contains(&source) {
                            merged.source_affiliations.push(source);
                        }
                    }
                    *existing = merged;
                }
                Some(existing) => {
                    for source in entity.source_affiliations {
                        if !existing.source_affiliations.contains(&source) {
                            existing.source_affiliations.push(source);
                        }
                    }
                }
                None => {
                    by_key.insert(entity_key, entity);
                }
            }
        }

        by_key.into_values().collect()
    }

    /// Highest-scoring organization; ties keep the earlier one
    fn best_match(&self, entity_text: &str) -> Option<(&str, f64)> {
        let mut best: Option<(&str, f64)> = None;
        for org in &self.org_names {
            let score = partial_ratio(entity_text, org);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((org.as_str(), score));
            }
        }
        best
    }
}
