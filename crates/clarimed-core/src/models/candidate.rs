//! Drug search candidate models.

use serde::{Deserialize, Serialize};

use super::TermType;

/// Dosage-form group used to order search results.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DosageForm {
    Tablet,
    Capsule,
    /// Liquid, solution, suspension, syrup
    Liquid,
    Other,
}

impl DosageForm {
    /// Sort priority (lower sorts first).
    pub fn priority(&self) -> u8 {
        match self {
            DosageForm::Tablet => 1,
            DosageForm::Capsule => 2,
            DosageForm::Liquid => 3,
            DosageForm::Other => 4,
        }
    }
}

/// A drug product offered as an autocomplete suggestion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrugCandidate {
    /// RxNorm concept identifier of the product
    pub rxcui: String,
    /// Canonical RxNorm name (e.g. "lisinopril 10 MG Oral Tablet [Prinivil]")
    pub name: String,
    /// Human-facing name; brand promoted to the front for branded products
    pub display_name: String,
    /// Product kind (SCD or SBD)
    pub tty: TermType,
    /// Sort group derived from the raw name
    pub dosage_form: DosageForm,
    /// Extracted form label (e.g. "Tablet", "Injection", "Other")
    pub form: String,
    /// RxNorm synonym, when provided
    pub synonym: Option<String>,
    pub language: String,
    pub suppress: String,
}

impl DrugCandidate {
    /// Whether this is a generic (SCD) product.
    pub fn is_generic(&self) -> bool {
        self.tty == TermType::GenericClinicalDrug
    }

    /// Deduplication key: lowercase, trimmed display name.
    pub fn dedup_key(&self) -> String {
        self.display_name.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_priority_order() {
        let mut forms = vec![DosageForm::Other, DosageForm::Liquid, DosageForm::Tablet, DosageForm::Capsule];
        forms.sort_by_key(|f| f.priority());
        assert_eq!(
            forms,
            vec![DosageForm::Tablet, DosageForm::Capsule, DosageForm::Liquid, DosageForm::Other]
        );
    }

    #[test]
    fn test_dedup_key_is_case_and_space_insensitive() {
        let candidate = DrugCandidate {
            rxcui: "314076".into(),
            name: "lisinopril 10 MG Oral Tablet".into(),
            display_name: "  Lisinopril 10 MG Oral Tablet ".into(),
            tty: TermType::GenericClinicalDrug,
            dosage_form: DosageForm::Tablet,
            form: "Tablet".into(),
            synonym: None,
            language: "ENG".into(),
            suppress: "N".into(),
        };
        assert_eq!(candidate.dedup_key(), "lisinopril 10 mg oral tablet");
        assert!(candidate.is_generic());
    }
}
