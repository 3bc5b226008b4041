//! Records flowing through a linkage run
//!
//! Reference rows come from the corpus, input rows from the user file.
//! Linkage results and discovered works are the accumulated outputs.

mod discovery;
mod entity;
mod linkage;
mod record;

pub use discovery::{DiscoveredWork, DiscoveryLogEntry, MatchType};
pub use entity::{EntityCandidate, EntityTag, TaggedSpan, ValidatedEntity};
pub use linkage::{LinkageResult, LinkageStatus};
pub use record::{ExclusionSet, InputRecord, ReferenceRecord, WorkKey};
