//! Author linkage decisions

use serde::{Deserialize, Serialize};

/// How the linked reference author was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkageStatus {
    /// A matching author had an affiliation naming a configured organization
    OrgMatchFound,
    /// No organizations configured; first matching author taken
    FirstAvailable,
    /// Organizations configured but no matching author was affiliated with one
    NameMatchNoOrgAffiliation,
}

impl LinkageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkageStatus::OrgMatchFound => "org_match_found",
            LinkageStatus::FirstAvailable => "first_available",
            LinkageStatus::NameMatchNoOrgAffiliation => "name_match_no_org_affiliation",
        }
    }

    /// Whether the linked affiliation seeds affiliation discovery
    pub fn seeds_discovery(&self) -> bool {
        matches!(self, LinkageStatus::OrgMatchFound | LinkageStatus::FirstAvailable)
    }
}

impl std::fmt::Display for LinkageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One input author linked to one reference author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkageResult {
    pub input_doi: Option<String>,
    pub input_work_id: Option<String>,
    pub input_author_name: String,
    pub ref_author_name: String,
    /// Normalized affiliation of the linked reference author
    pub ref_affiliation: String,
    pub linkage_status: LinkageStatus,
}
