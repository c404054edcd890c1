//! RxNorm concept models shared by the vocabulary client and the search pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// RxNorm term type (product kind) of a concept.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TermType {
    /// Semantic Clinical Drug (generic product)
    #[serde(rename = "SCD")]
    GenericClinicalDrug,
    /// Semantic Branded Drug
    #[serde(rename = "SBD")]
    BrandedClinicalDrug,
    /// Branded pack
    #[serde(rename = "BPCK")]
    BrandedPack,
    /// Generic pack
    #[serde(rename = "GPCK")]
    GenericPack,
    /// Ingredient
    #[serde(rename = "IN")]
    Ingredient,
}

impl TermType {
    /// The two product kinds that appear in search results.
    pub const SEARCHABLE: [TermType; 2] = [TermType::GenericClinicalDrug, TermType::BrandedClinicalDrug];

    /// RxNav TTY code.
    pub fn code(&self) -> &'static str {
        match self {
            TermType::GenericClinicalDrug => "SCD",
            TermType::BrandedClinicalDrug => "SBD",
            TermType::BrandedPack => "BPCK",
            TermType::GenericPack => "GPCK",
            TermType::Ingredient => "IN",
        }
    }

    /// Parse an RxNav TTY code. Codes outside the known set yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "SCD" => Some(TermType::GenericClinicalDrug),
            "SBD" => Some(TermType::BrandedClinicalDrug),
            "BPCK" => Some(TermType::BrandedPack),
            "GPCK" => Some(TermType::GenericPack),
            "IN" => Some(TermType::Ingredient),
            _ => None,
        }
    }

    /// Whether concepts of this kind participate in search results.
    pub fn is_searchable(&self) -> bool {
        Self::SEARCHABLE.contains(self)
    }
}

impl fmt::Display for TermType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Canonical properties of a single concept, as returned by RxNav.
///
/// Absent fields deserialize to their defaults rather than failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConceptProperties {
    pub rxcui: String,
    pub name: String,
    pub synonym: Option<String>,
    /// Raw TTY code (kept as a string; RxNav returns more kinds than [`TermType`] models)
    pub tty: String,
    pub language: String,
    pub suppress: String,
    pub umlscui: Option<String>,
}

impl ConceptProperties {
    /// Parsed term type, if it is one we model.
    pub fn term_type(&self) -> Option<TermType> {
        TermType::from_code(&self.tty)
    }
}

/// A group of concepts sharing one term type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ConceptGroup {
    pub tty: Option<String>,
    pub concept_properties: Vec<ConceptProperties>,
}

impl ConceptGroup {
    /// Parsed term type of the group.
    pub fn term_type(&self) -> Option<TermType> {
        self.tty.as_deref().and_then(TermType::from_code)
    }
}
