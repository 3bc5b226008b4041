//! Discovery of works connected to the input through shared affiliations
//!
//! Two independent streams feed the merger: exact affiliation-key joins
//! seeded by linkage results, and substring searches seeded by validated
//! organization entities.

mod affiliation;
mod entity;

pub use affiliation::{AffiliationDiscovery, AffiliationDiscoveryEngine};
pub use entity::EntityDiscoveryEngine;
