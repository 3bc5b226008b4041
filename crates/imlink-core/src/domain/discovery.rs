//! Discovered works

use serde::{Deserialize, Serialize};

use super::record::ReferenceRecord;

/// How a discovered work was reached. Variant order is output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Same normalized affiliation as a linked author
    AffiliationExact,
    /// Affiliation contains a validated organization entity
    EntityExtracted,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::AffiliationExact => "affiliation_exact",
            MatchType::EntityExtracted => "entity_extracted",
        }
    }

    /// Lower wins when the same row is found both ways
    pub fn priority(&self) -> u8 {
        match self {
            MatchType::AffiliationExact => 1,
            MatchType::EntityExtracted => 2,
        }
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference row not present in the input file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiscoveredWork {
    pub work_id: Option<String>,
    pub doi: Option<String>,
    pub author: String,
    pub author_affiliation: String,
    pub ror_id: Option<String>,
    /// Affiliation key or entity text that led here
    #[serde(rename = "matching_affiliation")]
    pub matching_key: String,
    pub match_type: MatchType,
}

impl DiscoveredWork {
    pub fn from_record(record: &ReferenceRecord, matching_key: &str, match_type: MatchType) -> Self {
        Self {
            work_id: record.work_id.clone(),
            doi: record.doi.clone(),
            author: record.author_name.clone(),
            author_affiliation: record.affiliation_name.clone(),
            ror_id: record.affiliation_ror.clone(),
            matching_key: matching_key.to_string(),
            match_type,
        }
    }

    /// Deduplication key
    pub fn row_key(&self) -> (Option<&str>, Option<&str>, &str) {
        (self.work_id.as_deref(), self.doi.as_deref(), self.author.as_str())
    }

    /// Distinct-work identity: work id, else DOI
    pub fn work_identity(&self) -> Option<&str> {
        self.work_id.as_deref().or(self.doi.as_deref())
    }
}

/// Provenance of one affiliation discovery: which linkage led to which row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryLogEntry {
    pub input_doi: Option<String>,
    pub input_work_id: Option<String>,
    pub input_author_name: String,
    pub linking_affiliation: String,
    pub discovered_work_id: Option<String>,
    pub discovered_doi: Option<String>,
    pub discovered_author: String,
    pub discovered_author_affiliation: String,
    pub discovered_ror_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_type_order_follows_priority() {
        assert!(MatchType::AffiliationExact < MatchType::EntityExtracted);
        assert!(MatchType::AffiliationExact.priority() < MatchType::EntityExtracted.priority());
    }

    #[test]
    fn test_work_identity_prefers_work_id() {
        let record = ReferenceRecord::new(Some("W1"), Some("10.1/x"), "A B", "Acme");
        let work = DiscoveredWork::from_record(&record, "acme", MatchType::AffiliationExact);
        assert_eq!(work.work_identity(), Some("W1"));

        let record = ReferenceRecord::new(None, Some("10.1/x"), "A B", "Acme");
        let work = DiscoveredWork::from_record(&record, "acme", MatchType::AffiliationExact);
        assert_eq!(work.work_identity(), Some("10.1/x"));
    }
}
