//! Organization entity extraction and validation
//!
//! A tagger proposes organization spans inside linked affiliation strings.
//! The validator drops acronyms and short spans, then keeps the spans that
//! fuzzily match a configured organization name.

mod tagger;
mod validator;

pub use tagger::{KeywordTagger, OrganizationTagger, DEFAULT_ORG_KEYWORDS};
pub use validator::{passes_entity_filter, EntityExtraction, EntityExtractionValidator, MIN_ENTITY_LEN};
