//! Error types for imlink-core

use thiserror::Error;

/// Result type alias for imlink operations
pub type Result<T> = std::result::Result<T, LinkError>;

/// Main error type for a linkage run
#[derive(Error, Debug)]
pub enum LinkError {
    /// Configuration errors, fatal before any matching
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Reference store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Invalid arguments handed to a phase
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Tagger errors that could not be degraded
    #[error("Tagger error: {0}")]
    Tagger(#[from] TaggerError),

    /// Input file or reference database not found
    #[error("Missing resource: {0}")]
    MissingResource(String),

    /// CSV read or write failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Neither a DOI nor a work id column was configured
    #[error("config must specify 'doi' or 'work_id' in input_columns")]
    MissingIdentifierColumn,

    /// A required key was absent
    #[error("config missing required key: {0}")]
    MissingKey(String),

    /// A name style string outside the supported set
    #[error("unknown name style: {0}")]
    UnknownNameStyle(String),

    /// A numeric option outside its valid range
    #[error("{0}")]
    OutOfRange(String),

    /// The config file could not be decoded
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// The input file lacks a configured column
    #[error("input file has no column named '{0}'")]
    MissingColumn(String),
}

/// Reference store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// A query failed
    #[error("query failed: {0}")]
    Query(String),

    /// A query failed during a named pipeline phase
    #[error("{phase} failed: {source}")]
    Phase {
        phase: &'static str,
        #[source]
        source: Box<StoreError>,
    },
}

impl StoreError {
    /// Wrap this error with the pipeline phase it aborted
    pub fn in_phase(self, phase: &'static str) -> Self {
        StoreError::Phase {
            phase,
            source: Box::new(self),
        }
    }
}

/// Argument validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Threshold outside [0, 1]
    #[error("threshold must be between 0.0 and 1.0, got {0}")]
    Threshold(f64),

    /// Entity validation needs at least one organization name
    #[error("organization names cannot be empty")]
    NoOrganizations,
}

/// Organization tagger errors
#[derive(Error, Debug)]
pub enum TaggerError {
    /// The tagger model is not available
    #[error("tagger unavailable: {0}")]
    Unavailable(String),

    /// Prediction failed for a batch
    #[error("prediction failed: {0}")]
    Prediction(String),
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Query(err.to_string())
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for LinkError {
    fn from(err: rusqlite::Error) -> Self {
        LinkError::Store(StoreError::from(err))
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
