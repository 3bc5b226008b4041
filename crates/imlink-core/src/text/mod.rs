//! Text processing for affiliation and organization strings
//!
//! - Affiliation normalization (transliteration, case folding, punctuation stripping)
//! - Join keys for exact affiliation lookups
//! - Acronym detection for extracted entities
//! - Partial-ratio fuzzy scoring

mod fuzzy;
mod normalize;

pub use fuzzy::partial_ratio;
pub use normalize::{
    affiliation_key, collapse_whitespace, is_latin_char_text, is_likely_acronym, normalize_text,
};
