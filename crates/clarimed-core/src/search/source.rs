//! Drug vocabulary lookup capability.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{ConceptGroup, ConceptProperties, InteractionGroup, TermType};

/// Lookup errors. Never surfaced past [`super::DrugSearch`]; logged instead.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("Malformed response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("Invalid concept id: {0:?}")]
    InvalidConceptId(String),
}

pub type LookupResult<T> = Result<T, LookupError>;

/// Read-only queries against a drug vocabulary service.
///
/// Absent JSON fields are "no results", not errors: implementations return
/// empty collections or `None` for them.
#[async_trait]
pub trait VocabularySource: Send + Sync {
    /// Name search. An empty vector means the service returned no concept groups.
    async fn find_drugs(&self, name: &str) -> LookupResult<Vec<ConceptGroup>>;

    /// Approximate match. Returns candidate rxcuis in service rank order
    /// (may repeat; usually ingredient-level concepts).
    async fn approximate_term(&self, term: &str, max_entries: usize) -> LookupResult<Vec<String>>;

    /// Concepts related to `rxcui`, restricted to `term_types`.
    async fn related_by_type(
        &self,
        rxcui: &str,
        term_types: &[TermType],
    ) -> LookupResult<Vec<ConceptGroup>>;

    /// Full properties of a concept.
    async fn properties(&self, rxcui: &str) -> LookupResult<Option<ConceptProperties>>;

    /// Interactions among ingredient rxcuis.
    async fn interactions(&self, rxcuis: &[String]) -> LookupResult<Vec<InteractionGroup>>;

    /// Spelling suggestions for a free-typed name.
    async fn spelling_suggestions(&self, name: &str) -> LookupResult<Vec<String>>;
}
