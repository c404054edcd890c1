//! Drug search against a vocabulary service.
//!
//! Pipeline: Name search → (Approximate match → Related products) → Normalization → Ranking
//!
//! Every public operation fails soft: lookup errors are logged and collapse
//! to an empty result, so a failed search looks like "no matches".

mod normalizer;
mod ranker;
mod source;

pub use normalizer::*;
pub use ranker::*;
pub use source::*;

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::models::{ConceptGroup, ConceptProperties, DrugCandidate, InteractionGroup, TermType};

/// Queries shorter than this return no results without a lookup.
pub const MIN_QUERY_LEN: usize = 2;

/// Tunables for the fallback path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// `maxEntries` for the approximate-match request
    pub approximate_max_entries: usize,
    /// Number of distinct approximate matches expanded into products
    pub fallback_fanout: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            approximate_max_entries: 10,
            fallback_fanout: 5,
        }
    }
}

/// Fail-soft drug lookup over an injected [`VocabularySource`].
pub struct DrugSearch<S> {
    source: S,
    options: SearchOptions,
}

impl<S: VocabularySource> DrugSearch<S> {
    /// Create a search with default options.
    pub fn new(source: S) -> Self {
        Self::with_options(source, SearchOptions::default())
    }

    pub fn with_options(source: S, options: SearchOptions) -> Self {
        Self { source, options }
    }

    /// Get the underlying source for direct access.
    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// Autocomplete candidates for a partial drug name, deduplicated and ranked.
    pub async fn search(&self, query: &str) -> Vec<DrugCandidate> {
        if query.chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }

        match self.try_search(query).await {
            Ok(candidates) => {
                debug!(query, results = candidates.len(), "drug search complete");
                candidates
            }
            Err(error) => {
                warn!(operation = "search", query, %error, "drug search failed");
                Vec::new()
            }
        }
    }

    async fn try_search(&self, query: &str) -> LookupResult<Vec<DrugCandidate>> {
        // Step 1: Exact name search
        let mut groups = self.source.find_drugs(query).await?;

        // Step 2: Approximate match when name search has nothing at all
        if groups.is_empty() {
            debug!(query, "no concept groups from name search, trying approximate match");
            groups = self.fallback_groups(query).await?;
        }

        // Step 3: Normalize, dedupe and rank
        Ok(rank(product_candidates(groups)))
    }

    /// Expand approximate (ingredient-level) matches into drug products.
    async fn fallback_groups(&self, query: &str) -> LookupResult<Vec<ConceptGroup>> {
        let matches = self
            .source
            .approximate_term(query, self.options.approximate_max_entries)
            .await?;

        let mut seen = HashSet::new();
        let rxcuis: Vec<String> = matches
            .into_iter()
            .filter(|rxcui| !rxcui.is_empty() && seen.insert(rxcui.clone()))
            .take(self.options.fallback_fanout)
            .collect();

        let mut groups = Vec::new();
        for rxcui in &rxcuis {
            match self
                .source
                .related_by_type(rxcui, &TermType::SEARCHABLE)
                .await
            {
                Ok(related) => groups.extend(related),
                // Only a transport failure abandons the search; a bad answer
                // for one match skips that match.
                Err(error @ LookupError::Transport(_)) => return Err(error),
                Err(error) => {
                    warn!(rxcui = rxcui.as_str(), %error, "skipping approximate match");
                }
            }
        }
        Ok(groups)
    }

    /// Full properties of a concept; `None` when unknown or on failure.
    pub async fn drug_details(&self, rxcui: &str) -> Option<ConceptProperties> {
        match self.source.properties(rxcui).await {
            Ok(properties) => properties,
            Err(error) => {
                warn!(operation = "drug_details", rxcui, %error, "drug details lookup failed");
                None
            }
        }
    }

    /// Ingredient rxcuis of a product (for interaction checks).
    pub async fn ingredients(&self, rxcui: &str) -> Vec<String> {
        match self
            .source
            .related_by_type(rxcui, &[TermType::Ingredient])
            .await
        {
            Ok(groups) => groups
                .into_iter()
                .filter(|g| g.term_type() == Some(TermType::Ingredient))
                .flat_map(|g| g.concept_properties)
                .map(|c| c.rxcui)
                .collect(),
            Err(error) => {
                warn!(operation = "ingredients", rxcui, %error, "ingredient lookup failed");
                Vec::new()
            }
        }
    }

    /// Interactions among two or more ingredient rxcuis.
    pub async fn check_interactions(&self, ingredient_rxcuis: &[String]) -> Vec<InteractionGroup> {
        if ingredient_rxcuis.len() < 2 {
            return Vec::new();
        }

        match self.source.interactions(ingredient_rxcuis).await {
            Ok(groups) => groups,
            Err(error) => {
                warn!(
                    operation = "check_interactions",
                    count = ingredient_rxcuis.len(),
                    %error,
                    "interaction check failed"
                );
                Vec::new()
            }
        }
    }

    /// Spelling suggestions for a free-typed name.
    pub async fn spelling_suggestions(&self, query: &str) -> Vec<String> {
        match self.source.spelling_suggestions(query).await {
            Ok(suggestions) => suggestions,
            Err(error) => {
                warn!(operation = "spelling_suggestions", query, %error, "spelling suggestion lookup failed");
                Vec::new()
            }
        }
    }
}

/// Normalize the SCD/SBD concepts of `groups`, in group order.
fn product_candidates(groups: Vec<ConceptGroup>) -> Vec<DrugCandidate> {
    groups
        .into_iter()
        .filter_map(|group| {
            let tty = group.term_type().filter(TermType::is_searchable)?;
            Some(
                group
                    .concept_properties
                    .into_iter()
                    .map(move |concept| normalize_concept(concept, tty)),
            )
        })
        .flatten()
        .collect()
}
