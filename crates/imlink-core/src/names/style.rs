//! Declared author-name conventions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Naming convention an author string is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NameStyle {
    /// "Smith J", "Van Der Berg JA"
    LastInitial,
    /// "Smith, John A"
    LastCommaFirst,
    /// "Smith John A"
    LastFirst,
    /// "J. A. Smith"
    FirstInitialLast,
    /// General parser for free-form names
    #[default]
    Auto,
    /// "John A. Smith"; handled by the general parser
    FirstLast,
}

impl NameStyle {
    /// Configuration spelling of the style.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LastInitial => "last_initial",
            Self::LastCommaFirst => "last_comma_first",
            Self::LastFirst => "last_first",
            Self::FirstInitialLast => "first_initial_last",
            Self::Auto => "auto",
            Self::FirstLast => "first_last",
        }
    }

    /// Whether names in this style go straight to the general parser.
    pub fn is_general(&self) -> bool {
        matches!(self, Self::Auto | Self::FirstLast)
    }
}

impl fmt::Display for NameStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NameStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "last_initial" => Ok(Self::LastInitial),
            "last_comma_first" => Ok(Self::LastCommaFirst),
            "last_first" => Ok(Self::LastFirst),
            "first_initial_last" => Ok(Self::FirstInitialLast),
            "auto" => Ok(Self::Auto),
            "first_last" => Ok(Self::FirstLast),
            _ => Err(ConfigError::UnknownNameStyle(s.to_string())),
        }
    }
}

impl TryFrom<String> for NameStyle {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NameStyle> for String {
    fn from(style: NameStyle) -> Self {
        style.as_str().to_string()
    }
}
