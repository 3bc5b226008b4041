//! Output artifacts of a run

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{DiscoveredWork, DiscoveryLogEntry, LinkageResult};
use crate::entities::EntityExtraction;
use crate::error::Result;

pub const LINKAGE_SUFFIX: &str = "_linkage.csv";
pub const FULL_LOG_SUFFIX: &str = "_full_discovery_log.csv";
pub const DISCOVERED_WORKS_SUFFIX: &str = "_discovered_works.csv";
pub const ENTITY_MAPPINGS_SUFFIX: &str = "_entity_mappings.csv";

const LINKAGE_HEADER: &[&str] = &[
    "input_doi",
    "input_work_id",
    "input_author_name",
    "ref_author_name",
    "ref_affiliation",
    "linkage_status",
];

const DISCOVERED_HEADER: &[&str] = &[
    "work_id",
    "doi",
    "author",
    "author_affiliation",
    "ror_id",
    "matching_affiliation",
    "match_type",
];

const FULL_LOG_HEADER: &[&str] = &[
    "input_doi",
    "input_work_id",
    "input_author_name",
    "linking_affiliation",
    "discovered_work_id",
    "discovered_doi",
    "discovered_author",
    "discovered_author_affiliation",
    "discovered_ror_id",
];

/// Paths of every artifact derived from one output path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub linkage: PathBuf,
    pub full_log: PathBuf,
    pub discovered_works: PathBuf,
    pub entity_mappings: PathBuf,
}

impl OutputPaths {
    /// `out/results.csv` gives `out/results_linkage.csv` and friends
    pub fn from_output(output: &Path) -> Self {
        let stem = output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        let dir = output.parent().unwrap_or_else(|| Path::new(""));
        let with_suffix = |suffix: &str| dir.join(format!("{stem}{suffix}"));

        Self {
            linkage: with_suffix(LINKAGE_SUFFIX),
            full_log: with_suffix(FULL_LOG_SUFFIX),
            discovered_works: with_suffix(DISCOVERED_WORKS_SUFFIX),
            entity_mappings: with_suffix(ENTITY_MAPPINGS_SUFFIX),
        }
    }

    pub fn all(&self) -> [&Path; 4] {
        [
            self.linkage.as_path(),
            self.full_log.as_path(),
            self.discovered_works.as_path(),
            self.entity_mappings.as_path(),
        ]
    }

    /// Delete artifacts left over from an earlier run.
    pub fn remove_stale(&self) -> Result<()> {
        for path in self.all() {
            if path.exists() {
                std::fs::remove_file(path)?;
                debug!(path = %path.display(), "Removed stale output");
            }
        }
        Ok(())
    }
}

fn write_rows<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = rows.len(), "Wrote output");
    Ok(())
}

/// Linkage results, sorted by input doi, work id and author
pub fn write_linkage(path: &Path, results: &[LinkageResult]) -> Result<()> {
    let mut sorted: Vec<&LinkageResult> = results.iter().collect();
    sorted.sort_by(|a, b| {
        (&a.input_doi, &a.input_work_id, &a.input_author_name).cmp(&(
            &b.input_doi,
            &b.input_work_id,
            &b.input_author_name,
        ))
    });
    write_rows(path, LINKAGE_HEADER, &sorted)
}

pub fn write_discovered_works(path: &Path, works: &[DiscoveredWork]) -> Result<()> {
    write_rows(path, DISCOVERED_HEADER, works)
}

pub fn write_full_log(path: &Path, entries: &[DiscoveryLogEntry]) -> Result<()> {
    write_rows(path, FULL_LOG_HEADER, entries)
}

/// Source affiliations and their extracted entities joined by `"; "`
pub fn write_entity_mappings(path: &Path, extraction: &EntityExtraction) -> Result<()> {
    let rows: Vec<(&str, String)> = extraction
        .mappings()
        .into_iter()
        .map(|(source, entities)| (source, entities.join("; ")))
        .collect();
    write_rows(path, &["source_affiliation", "extracted_entities"], &rows)
}
