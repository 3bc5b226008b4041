//! Organization taggers

use crate::domain::{EntityTag, TaggedSpan};
use crate::error::TaggerError;

/// Keywords marking an affiliation segment as an organization
pub const DEFAULT_ORG_KEYWORDS: &[&str] = &[
    "university",
    "universität",
    "université",
    "universidad",
    "universidade",
    "università",
    "institute",
    "institut",
    "instituto",
    "laboratory",
    "laboratories",
    "labs",
    "centre",
    "center",
    "hospital",
    "college",
    "school",
    "foundation",
    "council",
    "agency",
    "academy",
    "observatory",
    "department",
    "faculty",
    "organization",
    "organisation",
    "society",
    "museum",
    "clinic",
];

/// Batch named-entity tagger over affiliation strings.
///
/// Implementations return one span list per input string, in input order.
pub trait OrganizationTagger: Send + Sync {
    /// Tag every string of the batch.
    fn extract_organizations(&self, batch: &[String]) -> Result<Vec<Vec<TaggedSpan>>, TaggerError>;

    /// Short name for logs
    fn name(&self) -> &str {
        "tagger"
    }
}

/// Rule-based tagger: each comma or semicolon separated segment containing
/// an organization keyword is an organization span.
#[derive(Debug, Clone)]
pub struct KeywordTagger {
    keywords: Vec<String>,
}

impl Default for KeywordTagger {
    fn default() -> Self {
        Self::with_keywords(DEFAULT_ORG_KEYWORDS.iter().copied())
    }
}

impl KeywordTagger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    fn tag(&self, text: &str) -> Vec<TaggedSpan> {
        text.split([',', ';'])
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .filter_map(|segment| {
                let lower = segment.to_lowercase();
                self.keywords
                    .iter()
                    .any(|k| lower.contains(k.as_str()))
                    .then(|| TaggedSpan {
                        text: segment.to_string(),
                        tag: EntityTag::Organization,
                    })
            })
            .collect()
    }
}

impl OrganizationTagger for KeywordTagger {
    fn extract_organizations(&self, batch: &[String]) -> Result<Vec<Vec<TaggedSpan>>, TaggerError> {
        Ok(batch.iter().map(|text| self.tag(text)).collect())
    }

    fn name(&self) -> &str {
        "keyword"
    }
}
