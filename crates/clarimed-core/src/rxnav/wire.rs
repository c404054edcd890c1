//! RxNav JSON response shapes.
//!
//! Every level is optional or defaulted: a missing field means "no results".

use serde::Deserialize;

use crate::models::{ConceptGroup, ConceptProperties, InteractionGroup};

/// `/drugs.json`
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DrugsResponse {
    pub drug_group: Option<DrugGroup>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DrugGroup {
    pub name: Option<String>,
    pub concept_group: Vec<ConceptGroup>,
}

impl DrugsResponse {
    pub fn into_groups(self) -> Vec<ConceptGroup> {
        self.drug_group.map(|g| g.concept_group).unwrap_or_default()
    }
}

/// `/approximateTerm.json`
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApproximateResponse {
    pub approximate_group: Option<ApproximateGroup>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApproximateGroup {
    pub input_term: Option<String>,
    pub candidate: Vec<ApproximateCandidate>,
}

/// Score and rank are left out: RxNav sends them as strings or numbers
/// depending on version, and ordering already follows rank.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApproximateCandidate {
    pub rxcui: Option<String>,
    pub name: Option<String>,
    pub source: Option<String>,
}

impl ApproximateResponse {
    /// Candidate rxcuis in rank order, skipping entries without one.
    pub fn into_rxcuis(self) -> Vec<String> {
        self.approximate_group
            .map(|g| g.candidate)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|c| c.rxcui)
            .collect()
    }
}

/// `/rxcui/{id}/related.json`
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RelatedResponse {
    pub related_group: Option<RelatedGroup>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RelatedGroup {
    pub rxcui: Option<String>,
    pub concept_group: Vec<ConceptGroup>,
}

impl RelatedResponse {
    pub fn into_groups(self) -> Vec<ConceptGroup> {
        self.related_group.map(|g| g.concept_group).unwrap_or_default()
    }
}

/// `/rxcui/{id}/properties.json`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PropertiesResponse {
    pub properties: Option<ConceptProperties>,
}

/// `/interaction/list.json`
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionResponse {
    pub full_interaction_type_group: Vec<InteractionGroup>,
}

/// `/spellingsuggestions.json`
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpellingResponse {
    pub suggestion_group: Option<SuggestionGroup>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SuggestionGroup {
    pub name: Option<String>,
    pub suggestion_list: Option<SuggestionList>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SuggestionList {
    pub suggestion: Vec<String>,
}

impl SpellingResponse {
    pub fn into_suggestions(self) -> Vec<String> {
        self.suggestion_group
            .and_then(|g| g.suggestion_list)
            .map(|l| l.suggestion)
            .unwrap_or_default()
    }
}
