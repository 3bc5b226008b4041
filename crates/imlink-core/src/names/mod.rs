//! Author name parsing and fuzzy name matching
//!
//! Names arrive in heterogeneous conventions ("Smith J", "Smith, John",
//! "J. A. Smith", free-form). Each convention is a [`NameStyle`]; parsing
//! under a style yields a [`ParsedName`] that the similarity matcher compares.

mod human;
mod parser;
mod similarity;
mod style;

pub use parser::{parse_name, ParsedName};
pub use similarity::{are_similar, SimilarityMatcher, DEFAULT_NAME_THRESHOLD, SURNAME_OVERRIDE};
pub use style::NameStyle;
