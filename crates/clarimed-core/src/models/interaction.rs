//! Drug-drug interaction models (RxNav `fullInteractionTypeGroup`).

use serde::{Deserialize, Serialize};

/// Interaction findings from one source (e.g. DrugBank, ONCHigh).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionGroup {
    pub source_disclaimer: Option<String>,
    pub source_name: Option<String>,
    pub full_interaction_type: Vec<InteractionType>,
}

/// Interactions between one pair of queried concepts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionType {
    pub comment: Option<String>,
    pub min_concept: Vec<MinConcept>,
    pub interaction_pair: Vec<InteractionPair>,
}

/// Minimal concept reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MinConcept {
    pub rxcui: String,
    pub name: String,
    pub tty: String,
}

/// A single interaction finding.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionPair {
    pub interaction_concept: Vec<InteractionConcept>,
    pub severity: Option<String>,
    pub description: Option<String>,
}

/// One side of an interaction pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionConcept {
    pub min_concept_item: MinConcept,
    pub source_concept_item: Option<SourceConcept>,
}

/// The source vocabulary's own concept record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceConcept {
    pub id: String,
    pub name: String,
    pub url: Option<String>,
}

impl InteractionGroup {
    /// All interaction descriptions in this group, in response order.
    pub fn descriptions(&self) -> Vec<&str> {
        self.full_interaction_type
            .iter()
            .flat_map(|t| t.interaction_pair.iter())
            .filter_map(|p| p.description.as_deref())
            .collect()
    }
}
