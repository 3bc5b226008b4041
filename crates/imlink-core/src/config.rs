//! Configuration for a linkage run
//!
//! Loaded once from TOML or YAML and passed by reference into every phase.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::names::NameStyle;
use crate::text::normalize_text;

/// Default input rows per chunk
pub const DEFAULT_CHUNK_SIZE: usize = 100_000;

/// Default name similarity threshold
pub const DEFAULT_NAME_THRESHOLD: f64 = 0.85;

/// Default entity match threshold, as a percentage
pub const DEFAULT_ENTITY_THRESHOLD: f64 = 85.0;

/// Default affiliations per tagger call
pub const DEFAULT_ENTITY_BATCH_SIZE: usize = 256;

/// Run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Input file column mapping
    pub input_columns: InputColumns,
    /// Organizations whose affiliations are preferred and searched
    pub organization_names: Vec<String>,
    /// Naming convention of input author names
    pub input_name_style: NameStyle,
    /// Naming convention of reference author names
    pub reference_name_style: NameStyle,
    /// Jaro-Winkler threshold for names, in [0, 1]
    pub name_matching_threshold: f64,
    /// Run the organization tagger over linked affiliations
    pub entity_extraction_enabled: bool,
    /// Partial-ratio threshold for entities, as a percentage in [0, 100]
    pub entity_matching_threshold: f64,
    /// Search the corpus with validated entities
    pub use_entity_discovery: bool,
    /// Input rows per chunk
    pub chunk_size: usize,
    /// Affiliations per tagger call
    pub entity_batch_size: usize,
    /// Column mapping for affiliation search mode
    pub affiliation_search_columns: AffiliationSearchColumns,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            input_columns: InputColumns::default(),
            organization_names: Vec::new(),
            input_name_style: NameStyle::Auto,
            reference_name_style: NameStyle::FirstLast,
            name_matching_threshold: DEFAULT_NAME_THRESHOLD,
            entity_extraction_enabled: true,
            entity_matching_threshold: DEFAULT_ENTITY_THRESHOLD,
            use_entity_discovery: true,
            chunk_size: DEFAULT_CHUNK_SIZE,
            entity_batch_size: DEFAULT_ENTITY_BATCH_SIZE,
            affiliation_search_columns: AffiliationSearchColumns::default(),
        }
    }
}

/// Input file column names
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputColumns {
    pub doi: Option<String>,
    pub work_id: Option<String>,
    pub authors: Option<String>,
    /// Separator inside the authors cell; empty means one author per cell
    pub author_separator: Option<String>,
}

/// Search-mode column names
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AffiliationSearchColumns {
    pub affiliation_name: Option<String>,
}

impl LinkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml(yaml_str: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml_str)?)
    }

    /// Load configuration from a file; `.toml` is TOML, anything else YAML.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))?;

        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::from_toml(&contents),
            _ => Self::from_yaml(&contents),
        }
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Validate the options a file-processing run needs
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.doi_column().is_none() && self.work_id_column().is_none() {
            return Err(ConfigError::MissingIdentifierColumn);
        }

        if self.input_columns.authors.as_deref().map_or(true, |c| c.trim().is_empty()) {
            return Err(ConfigError::MissingKey("input_columns.authors".to_string()));
        }

        if self.input_columns.author_separator.is_none() {
            return Err(ConfigError::MissingKey(
                "input_columns.author_separator".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.name_matching_threshold) {
            return Err(ConfigError::OutOfRange(format!(
                "name_matching_threshold must be between 0.0 and 1.0, got {}",
                self.name_matching_threshold
            )));
        }

        if !(0.0..=100.0).contains(&self.entity_matching_threshold) {
            return Err(ConfigError::OutOfRange(format!(
                "entity_matching_threshold must be between 0 and 100, got {}",
                self.entity_matching_threshold
            )));
        }

        if self.chunk_size == 0 {
            return Err(ConfigError::OutOfRange("chunk_size must be positive".to_string()));
        }

        if self.entity_batch_size == 0 {
            return Err(ConfigError::OutOfRange(
                "entity_batch_size must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Column holding the search affiliations, required in search mode
    pub fn search_column(&self) -> Result<&str, ConfigError> {
        non_empty(self.affiliation_search_columns.affiliation_name.as_deref()).ok_or_else(|| {
            ConfigError::MissingKey("affiliation_search_columns.affiliation_name".to_string())
        })
    }

    pub fn doi_column(&self) -> Option<&str> {
        non_empty(self.input_columns.doi.as_deref())
    }

    pub fn work_id_column(&self) -> Option<&str> {
        non_empty(self.input_columns.work_id.as_deref())
    }

    pub fn authors_column(&self) -> Option<&str> {
        non_empty(self.input_columns.authors.as_deref())
    }

    pub fn author_separator(&self) -> &str {
        self.input_columns.author_separator.as_deref().unwrap_or("")
    }

    /// Entity threshold as a fraction in [0, 1]
    pub fn entity_threshold_fraction(&self) -> f64 {
        self.entity_matching_threshold / 100.0
    }

    pub fn has_organizations(&self) -> bool {
        !self.organization_names.is_empty()
    }

    /// Configured organizations after text normalization, blanks dropped
    pub fn normalized_org_names(&self) -> Vec<String> {
        self.organization_names
            .iter()
            .map(|name| normalize_text(name))
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// Whether the tagger phase runs at all
    pub fn runs_entity_extraction(&self) -> bool {
        self.entity_extraction_enabled && self.has_organizations()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> LinkConfig {
        LinkConfig {
            input_columns: InputColumns {
                doi: Some("doi".to_string()),
                work_id: None,
                authors: Some("authors".to_string()),
                author_separator: Some(";".to_string()),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = LinkConfig::default();
        assert_eq!(config.chunk_size, 100_000);
        assert_eq!(config.name_matching_threshold, 0.85);
        assert_eq!(config.entity_matching_threshold, 85.0);
        assert_eq!(config.input_name_style, NameStyle::Auto);
        assert_eq!(config.reference_name_style, NameStyle::FirstLast);
        assert!(config.entity_extraction_enabled);
        assert!(config.use_entity_discovery);
        assert!((config.entity_threshold_fraction() - 0.85).abs() < 1e-12);
    }

    #[test]
    fn test_validate_requires_identifier_column() {
        let mut config = valid();
        assert!(config.validate().is_ok());

        config.input_columns.doi = Some("  ".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingIdentifierColumn)
        ));
    }

    #[test]
    fn test_validate_requires_authors() {
        let mut config = valid();
        config.input_columns.authors = None;
        assert!(matches!(config.validate(), Err(ConfigError::MissingKey(_))));
    }

    #[test]
    fn test_validate_ranges() {
        let mut config = valid();
        config.name_matching_threshold = 1.2;
        assert!(matches!(config.validate(), Err(ConfigError::OutOfRange(_))));

        let mut config = valid();
        config.entity_matching_threshold = 120.0;
        assert!(matches!(config.validate(), Err(ConfigError::OutOfRange(_))));

        let mut config = valid();
        config.chunk_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::OutOfRange(_))));
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
input_columns:
  doi: DOI
  authors: Authors
  author_separator: "; "
organization_names:
  - Acme Labs
input_name_style: last_initial
entity_matching_threshold: 90
"#;
        let config = LinkConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.doi_column(), Some("DOI"));
        assert_eq!(config.author_separator(), "; ");
        assert_eq!(config.input_name_style, NameStyle::LastInitial);
        assert_eq!(config.reference_name_style, NameStyle::FirstLast);
        assert!((config.entity_threshold_fraction() - 0.9).abs() < 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml() {
        let toml_str = r#"
organization_names = ["Acme Labs, Inc."]
chunk_size = 10

[input_columns]
work_id = "id"
authors = "authors"
author_separator = ""
"#;
        let config = LinkConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.chunk_size, 10);
        assert_eq!(config.work_id_column(), Some("id"));
        assert_eq!(config.normalized_org_names(), vec!["acme labs inc".to_string()]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_style_is_parse_error() {
        let err = LinkConfig::from_yaml("input_name_style: sideways\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_search_column_required() {
        let config = LinkConfig::default();
        assert!(config.search_column().is_err());
    }
}
