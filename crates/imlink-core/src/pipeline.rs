//! End-to-end file processing run
//!
//! Phases, in order: validate configuration, pre-scan input identifiers,
//! link authors chunk by chunk, extract and validate organization entities,
//! discover by affiliation and by entity, merge, write artifacts. Each phase
//! writes its artifact before the next starts, so a failure leaves the
//! earlier files on disk. Artifacts of a previous run are only removed once
//! the input file has been opened and its columns resolved.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::{info, warn};

use crate::config::LinkConfig;
use crate::discovery::{AffiliationDiscoveryEngine, EntityDiscoveryEngine};
use crate::domain::{LinkageResult, LinkageStatus, MatchType};
use crate::entities::{EntityExtraction, EntityExtractionValidator, OrganizationTagger};
use crate::error::Result;
use crate::input::InputReader;
use crate::linkage::LinkageResolver;
use crate::merge::ResultMerger;
use crate::output::{self, OutputPaths};
use crate::store::ReferenceStore;

/// What a run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub paths: OutputPaths,
    /// Distinct `(doi, work_id)` pairs in the input
    pub input_ids: usize,
    pub linkages: usize,
    pub linkage_counts: BTreeMap<LinkageStatus, usize>,
    pub entity_candidates: usize,
    pub validated_entities: usize,
    pub affiliation_discoveries: usize,
    pub entity_discoveries: usize,
    /// Rows in the final discovered-works file
    pub discovered_works: usize,
    /// Distinct works per match type after merging
    pub distinct_works: BTreeMap<MatchType, usize>,
}

impl RunSummary {
    pub fn linkage_count(&self, status: LinkageStatus) -> usize {
        self.linkage_counts.get(&status).copied().unwrap_or(0)
    }

    pub fn distinct_work_count(&self, match_type: MatchType) -> usize {
        self.distinct_works.get(&match_type).copied().unwrap_or(0)
    }
}

/// File-processing run over one reference store
pub struct LinkagePipeline<'a, S: ReferenceStore + ?Sized> {
    store: &'a S,
    config: &'a LinkConfig,
    tagger: Option<&'a dyn OrganizationTagger>,
}

impl<'a, S: ReferenceStore + ?Sized> LinkagePipeline<'a, S> {
    pub fn new(store: &'a S, config: &'a LinkConfig) -> Self {
        Self {
            store,
            config,
            tagger: None,
        }
    }

    /// Use `tagger` for entity extraction; without one the phase is skipped.
    pub fn with_tagger(mut self, tagger: &'a dyn OrganizationTagger) -> Self {
        self.tagger = Some(tagger);
        self
    }

    pub fn run(&self, input_path: &Path, output_path: &Path) -> Result<RunSummary> {
        self.config.validate()?;

        let input = InputReader::open(input_path, self.config)?;

        let paths = OutputPaths::from_output(output_path);
        paths.remove_stale()?;

        let exclusions = input.exclusion_set()?;
        info!(ids = exclusions.len(), "Pre-scanned input identifiers");

        let linkages = self.link(&input)?;
        output::write_linkage(&paths.linkage, &linkages)?;

        let extraction = self.extract_entities(&linkages)?;
        if !extraction.candidates.is_empty() {
            output::write_entity_mappings(&paths.entity_mappings, &extraction)?;
        }

        let affiliation = AffiliationDiscoveryEngine::new(self.store).discover(&linkages, &exclusions)?;
        output::write_full_log(&paths.full_log, &affiliation.log)?;

        let entity_works = if self.config.use_entity_discovery && !extraction.validated.is_empty() {
            EntityDiscoveryEngine::new(self.store, self.config.normalized_org_names()).discover(
                &extraction.validated,
                &affiliation.works,
                &exclusions,
            )?
        } else {
            Vec::new()
        };

        let merged = ResultMerger::new().merge(&affiliation.works, &entity_works);
        output::write_discovered_works(&paths.discovered_works, &merged.works)?;

        let mut linkage_counts = BTreeMap::new();
        for linkage in &linkages {
            *linkage_counts.entry(linkage.linkage_status).or_insert(0) += 1;
        }

        let summary = RunSummary {
            paths,
            input_ids: exclusions.len(),
            linkages: linkages.len(),
            linkage_counts,
            entity_candidates: extraction.candidates.len(),
            validated_entities: extraction.validated.len(),
            affiliation_discoveries: affiliation.works.len(),
            entity_discoveries: entity_works.len(),
            discovered_works: merged.works.len(),
            distinct_works: merged.counts,
        };

        for (match_type, count) in &summary.distinct_works {
            info!(match_type = %match_type, works = count, "Discovered works");
        }
        info!(
            linkages = summary.linkages,
            discovered = summary.discovered_works,
            "Run complete"
        );

        Ok(summary)
    }

    fn link(&self, input: &InputReader) -> Result<Vec<LinkageResult>> {
        let mut resolver = LinkageResolver::new(self.store, self.config)?;
        let mut linkages = Vec::new();

        for (chunk_no, chunk) in input.chunks(self.config.chunk_size)?.enumerate() {
            let chunk = chunk?;
            let found = resolver.resolve_chunk(&chunk)?;
            info!(
                chunk = chunk_no + 1,
                rows = chunk.len(),
                linkages = found.len(),
                "Processed chunk"
            );
            linkages.extend(found);
        }

        info!(total = linkages.len(), "Author linkage complete");
        Ok(linkages)
    }

    fn extract_entities(&self, linkages: &[LinkageResult]) -> Result<EntityExtraction> {
        if !self.config.runs_entity_extraction() {
            return Ok(EntityExtraction::default());
        }
        let Some(tagger) = self.tagger else {
            warn!("Entity extraction enabled but no tagger available; skipping");
            return Ok(EntityExtraction::default());
        };

        let affiliations: Vec<String> = linkages
            .iter()
            .filter(|l| l.linkage_status == LinkageStatus::OrgMatchFound)
            .map(|l| l.ref_affiliation.clone())
            .filter(|a| !a.trim().is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if affiliations.is_empty() {
            info!("No organization-matched affiliations for entity extraction");
            return Ok(EntityExtraction::default());
        }

        let originals = self
            .store
            .original_affiliation_names(&affiliations)
            .map_err(|e| e.in_phase("entity extraction"))?;
        let sources: Vec<String> = originals
            .into_values()
            .filter(|a| !a.trim().is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        info!(
            affiliations = affiliations.len(),
            originals = sources.len(),
            "Extracting organization entities"
        );

        let validator = EntityExtractionValidator::new(
            tagger,
            &self.config.organization_names,
            self.config.entity_threshold_fraction(),
            self.config.entity_batch_size,
        )?;
        Ok(validator.run(&sources))
    }
}
