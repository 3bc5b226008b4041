//! Imlink Core - Author record linkage and affiliation-based work discovery
//!
//! This crate links the authors of a user's known works to rows of a large
//! bibliographic reference corpus, then uses the linked affiliations to find
//! other works written at the same institutions:
//!
//! - **Names**: Author name parsing under configurable styles and fuzzy matching
//! - **Text**: Affiliation normalization, join keys, acronym detection, partial-ratio scoring
//! - **Identifiers**: DOI cleaning
//! - **Store**: Read-only reference corpus access (SQLite or in-memory)
//! - **Linkage**: Per-author resolution against reference candidates
//! - **Entities**: Organization span tagging and fuzzy validation
//! - **Discovery**: Exact-affiliation and entity-substring work discovery
//! - **Merge**: Union of discovery streams with match-type priority
//! - **Pipeline**: The end-to-end file processing run
//! - **Search**: Affiliation search mode
//! - **Config**: Run configuration (YAML or TOML)
//!
//! # Run phases
//!
//! ```text
//! input CSV ─► linkage ─► entity extraction ─► affiliation discovery
//!                                      │                 │
//!                                      └► entity discovery
//!                                                        ▼
//!                                                      merge ─► discovered works
//! ```

pub mod config;
pub mod discovery;
pub mod domain;
pub mod entities;
pub mod error;
pub mod identifiers;
pub mod input;
pub mod linkage;
pub mod merge;
pub mod names;
pub mod output;
pub mod pipeline;
pub mod search;
pub mod store;
pub mod text;

pub use config::{AffiliationSearchColumns, InputColumns, LinkConfig};
pub use discovery::{AffiliationDiscovery, AffiliationDiscoveryEngine, EntityDiscoveryEngine};
pub use domain::{
    DiscoveredWork, DiscoveryLogEntry, EntityCandidate, EntityTag, ExclusionSet, InputRecord,
    LinkageResult, LinkageStatus, MatchType, ReferenceRecord, TaggedSpan, ValidatedEntity,
    WorkKey,
};
pub use entities::{EntityExtraction, EntityExtractionValidator, KeywordTagger, OrganizationTagger};
pub use error::{ConfigError, LinkError, Result, StoreError, TaggerError, ValidationError};
pub use identifiers::extract_doi;
pub use linkage::{LinkageResolver, Resolution};
pub use merge::{MergedDiscoveries, ResultMerger};
pub use names::{are_similar, parse_name, NameStyle, ParsedName, SimilarityMatcher};
pub use output::OutputPaths;
pub use pipeline::{LinkagePipeline, RunSummary};
pub use search::{run_affiliation_search, search_affiliations, AffiliationSearchHit};
pub use store::{AuthorAffiliation, InMemoryReferenceStore, ReferenceStore};
#[cfg(feature = "sqlite")]
pub use store::SqliteReferenceStore;
