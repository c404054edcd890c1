//! ClariMed Core Library
//!
//! Personal medication list with RxNorm-backed drug search and
//! maintenance-medication suggestions.
//!
//! # Architecture
//!
//! ```text
//! Query ──► Name search ──(no groups)──► Approximate match ──► Related SCD/SBD
//!                │                                                   │
//!                └──────────────────────┬────────────────────────────┘
//!                                       ▼
//!                        Normalize → Dedupe → Rank ──► Candidates
//!                                                          │
//!                                             User picks / free-types
//!                                                          │
//!                                     Maintenance suggestion (ATC / name)
//!                                                          │
//!                                                          ▼
//!                                                 Local medication list
//! ```
//!
//! Lookups never fail from the caller's point of view: a network or parse
//! failure looks the same as "no matches" and is logged with `tracing`.
//!
//! # Modules
//!
//! - [`config`]: RxNav settings from the environment
//! - [`db`]: SQLite key-value store holding the medication list
//! - [`maintenance`]: Rule-based maintenance classifier
//! - [`models`]: Domain types (DrugCandidate, MedicationRecord, etc.)
//! - [`rxnav`]: RxNav REST client
//! - [`search`]: Search pipeline (normalizer + ranker) over a vocabulary source

pub mod config;
pub mod db;
pub mod maintenance;
pub mod models;
pub mod rxnav;
pub mod search;

// Re-export commonly used types
pub use config::RxNavConfig;
pub use db::Database;
pub use maintenance::{MaintenanceClassifier, MaintenanceSuggestion};
pub use models::{
    ConceptProperties, DosageForm, DrugCandidate, InteractionGroup, MedicationRecord,
    MedicationUpdate, NewMedication, TermType,
};
pub use rxnav::RxNavClient;
pub use search::{DrugSearch, LookupError, SearchOptions, VocabularySource};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use tokio::runtime::Runtime;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum ClariMedError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Setup error: {0}")]
    SetupError(String),
}

impl From<db::DbError> for ClariMedError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotFound(id) => ClariMedError::NotFound(id),
            other => ClariMedError::DatabaseError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ClariMedError {
    fn from(e: serde_json::Error) -> Self {
        ClariMedError::SerializationError(e.to_string())
    }
}

impl From<LookupError> for ClariMedError {
    fn from(e: LookupError) -> Self {
        ClariMedError::SetupError(e.to_string())
    }
}

impl From<std::io::Error> for ClariMedError {
    fn from(e: std::io::Error) -> Self {
        ClariMedError::SetupError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for ClariMedError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ClariMedError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create the medication store at the given path.
///
/// RxNav settings come from `CLARIMED_RXNAV_*` environment variables.
#[uniffi::export]
pub fn open_core(path: String) -> Result<Arc<ClariMedCore>, ClariMedError> {
    let db = Database::open(&path)?;
    ClariMedCore::build(db, &RxNavConfig::from_env())
}

/// Create an in-memory store (for testing).
#[uniffi::export]
pub fn open_core_in_memory() -> Result<Arc<ClariMedCore>, ClariMedError> {
    let db = Database::open_in_memory()?;
    ClariMedCore::build(db, &RxNavConfig::from_env())
}

// =========================================================================
// Stateless helpers (exported to FFI)
// =========================================================================

/// Whether a medication is likely taken long-term.
#[uniffi::export]
pub fn is_likely_maintenance_med(drug_name: String, atc_code: Option<String>) -> bool {
    maintenance::default_classifier().is_maintenance(&drug_name, atc_code.as_deref())
}

/// Explanation for a maintenance suggestion, or `None` when not maintenance.
#[uniffi::export]
pub fn get_maintenance_reason(drug_name: String, atc_code: Option<String>) -> Option<String> {
    maintenance::default_classifier().maintenance_reason(&drug_name, atc_code.as_deref())
}

/// Strength text from an RxNorm name (e.g. "10 MG"), empty if none.
#[uniffi::export]
pub fn parse_dosage(drug_name: String) -> String {
    search::parse_dosage(&drug_name)
}

/// Form text from an RxNorm name (e.g. "Oral Tablet"), empty if none.
#[uniffi::export]
pub fn parse_form(drug_name: String) -> String {
    search::parse_form(&drug_name)
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe store plus drug lookup for FFI.
#[derive(uniffi::Object)]
pub struct ClariMedCore {
    db: Arc<Mutex<Database>>,
    search: DrugSearch<RxNavClient>,
    classifier: MaintenanceClassifier,
    runtime: Runtime,
}

impl ClariMedCore {
    fn build(db: Database, config: &RxNavConfig) -> Result<Arc<Self>, ClariMedError> {
        let client = RxNavClient::new(config)?;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        Ok(Arc::new(Self {
            db: Arc::new(Mutex::new(db)),
            search: DrugSearch::with_options(client, config.search_options()),
            classifier: MaintenanceClassifier::new(),
            runtime,
        }))
    }
}

#[uniffi::export]
impl ClariMedCore {
    // =========================================================================
    // Medication List Operations
    // =========================================================================

    /// All medications, in the order they were added.
    pub fn list_medications(&self) -> Result<Vec<FfiMedication>, ClariMedError> {
        let db = self.db.lock()?;
        let medications = db.list_medications()?;
        Ok(medications.into_iter().map(|m| m.into()).collect())
    }

    /// Get a medication by ID.
    pub fn get_medication(&self, id: String) -> Result<FfiMedication, ClariMedError> {
        let db = self.db.lock()?;
        Ok(db.get_medication(&id)?.into())
    }

    /// Add a medication. Name, dosage and frequency are required.
    pub fn add_medication(&self, input: FfiNewMedication) -> Result<FfiMedication, ClariMedError> {
        let input = NewMedication::from(input).trimmed();
        if let Some(field) = input.missing_required_field() {
            return Err(ClariMedError::InvalidInput(format!("{field} is required")));
        }

        let db = self.db.lock()?;
        Ok(db.add_medication(input)?.into())
    }

    /// Update fields of a medication. Returns `None` for an unknown ID.
    ///
    /// Name, dosage and frequency may be changed but not blanked.
    pub fn update_medication(
        &self,
        id: String,
        update: FfiMedicationUpdate,
    ) -> Result<Option<FfiMedication>, ClariMedError> {
        let update = MedicationUpdate::from(update).trimmed();
        if let Some(field) = update.blanked_required_field() {
            return Err(ClariMedError::InvalidInput(format!("{field} is required")));
        }

        let db = self.db.lock()?;
        let updated = db.update_medication(&id, update)?;
        Ok(updated.map(|m| m.into()))
    }

    /// Delete a medication. Returns whether it existed.
    pub fn delete_medication(&self, id: String) -> Result<bool, ClariMedError> {
        let db = self.db.lock()?;
        Ok(db.delete_medication(&id)?)
    }

    pub fn clear_medications(&self) -> Result<(), ClariMedError> {
        let db = self.db.lock()?;
        db.clear_medications()?;
        Ok(())
    }

    /// Filter the list by name, dosage, frequency or notes.
    pub fn filter_medications(&self, query: String) -> Result<Vec<FfiMedication>, ClariMedError> {
        let db = self.db.lock()?;
        let medications = db.filter_medications(&query)?;
        Ok(medications.into_iter().map(|m| m.into()).collect())
    }

    // =========================================================================
    // Maintenance Operations
    // =========================================================================

    /// Classify a name and optional ATC code.
    pub fn classify_medication(
        &self,
        drug_name: String,
        atc_code: Option<String>,
    ) -> FfiMaintenanceSuggestion {
        self.classifier
            .classify(&drug_name, atc_code.as_deref())
            .into()
    }

    /// Classify a stored medication.
    pub fn suggest_maintenance(&self, id: String) -> Result<FfiMaintenanceSuggestion, ClariMedError> {
        let db = self.db.lock()?;
        let record = db.get_medication(&id)?;
        Ok(self.classifier.suggest(&record).into())
    }

    // =========================================================================
    // Drug Lookup Operations
    // =========================================================================

    /// Autocomplete candidates for a partial drug name.
    pub fn search_drugs(&self, query: String) -> Vec<FfiDrugCandidate> {
        self.runtime
            .block_on(self.search.search(&query))
            .into_iter()
            .map(|c| c.into())
            .collect()
    }

    /// Full properties of a concept.
    pub fn drug_details(&self, rxcui: String) -> Option<FfiConceptProperties> {
        self.runtime
            .block_on(self.search.drug_details(&rxcui))
            .map(|p| p.into())
    }

    /// Ingredient rxcuis of a product.
    pub fn drug_ingredients(&self, rxcui: String) -> Vec<String> {
        self.runtime.block_on(self.search.ingredients(&rxcui))
    }

    /// Interactions among ingredient rxcuis, as the RxNav JSON group list.
    pub fn check_interactions(&self, ingredient_rxcuis: Vec<String>) -> Result<String, ClariMedError> {
        let groups = self
            .runtime
            .block_on(self.search.check_interactions(&ingredient_rxcuis));
        Ok(serde_json::to_string(&groups)?)
    }

    /// Spelling suggestions for a free-typed name.
    pub fn spelling_suggestions(&self, drug_name: String) -> Vec<String> {
        self.runtime
            .block_on(self.search.spelling_suggestions(&drug_name))
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe medication record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedication {
    pub id: String,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub notes: Option<String>,
    pub rxcui: Option<String>,
    pub verified: bool,
    pub is_maintenance: bool,
    pub therapeutic_class: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<MedicationRecord> for FfiMedication {
    fn from(record: MedicationRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            dosage: record.dosage,
            frequency: record.frequency,
            notes: record.notes,
            rxcui: record.rxcui,
            verified: record.verified,
            is_maintenance: record.is_maintenance,
            therapeutic_class: record.therapeutic_class,
            ingredients: record.ingredients,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// FFI-safe input for a new medication.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewMedication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub notes: Option<String>,
    pub rxcui: Option<String>,
    pub is_maintenance: bool,
    pub therapeutic_class: Option<String>,
    pub ingredients: Option<Vec<String>>,
}

impl From<FfiNewMedication> for NewMedication {
    fn from(input: FfiNewMedication) -> Self {
        NewMedication {
            name: input.name,
            dosage: input.dosage,
            frequency: input.frequency,
            notes: input.notes,
            rxcui: input.rxcui,
            is_maintenance: input.is_maintenance,
            therapeutic_class: input.therapeutic_class,
            ingredients: input.ingredients,
        }
    }
}

/// FFI-safe partial update.
///
/// A `clear_*` flag removes the stored value and wins over the matching
/// field. Clearing `rxcui` also marks the record unverified.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiMedicationUpdate {
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub notes: Option<String>,
    pub rxcui: Option<String>,
    pub is_maintenance: Option<bool>,
    pub therapeutic_class: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub clear_notes: bool,
    pub clear_rxcui: bool,
    pub clear_therapeutic_class: bool,
    pub clear_ingredients: bool,
}

fn set_or_clear<T>(value: Option<T>, clear: bool) -> Option<Option<T>> {
    if clear {
        Some(None)
    } else {
        value.map(Some)
    }
}

impl From<FfiMedicationUpdate> for MedicationUpdate {
    fn from(update: FfiMedicationUpdate) -> Self {
        MedicationUpdate {
            name: update.name,
            dosage: update.dosage,
            frequency: update.frequency,
            notes: set_or_clear(update.notes, update.clear_notes),
            rxcui: set_or_clear(update.rxcui, update.clear_rxcui),
            is_maintenance: update.is_maintenance,
            therapeutic_class: set_or_clear(update.therapeutic_class, update.clear_therapeutic_class),
            ingredients: set_or_clear(update.ingredients, update.clear_ingredients),
        }
    }
}

/// FFI-safe maintenance suggestion.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMaintenanceSuggestion {
    pub is_maintenance: bool,
    pub reason: Option<String>,
}

impl From<MaintenanceSuggestion> for FfiMaintenanceSuggestion {
    fn from(suggestion: MaintenanceSuggestion) -> Self {
        Self {
            is_maintenance: suggestion.is_maintenance,
            reason: suggestion.reason,
        }
    }
}

/// FFI-safe search candidate.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDrugCandidate {
    pub rxcui: String,
    pub name: String,
    pub display_name: String,
    pub tty: String,
    pub form: String,
    pub form_priority: u8,
    pub dosage: String,
    pub synonym: Option<String>,
}

impl From<DrugCandidate> for FfiDrugCandidate {
    fn from(candidate: DrugCandidate) -> Self {
        Self {
            dosage: search::parse_dosage(&candidate.name),
            form_priority: candidate.dosage_form.priority(),
            tty: candidate.tty.code().to_string(),
            rxcui: candidate.rxcui,
            name: candidate.name,
            display_name: candidate.display_name,
            form: candidate.form,
            synonym: candidate.synonym,
        }
    }
}

/// FFI-safe concept properties.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiConceptProperties {
    pub rxcui: String,
    pub name: String,
    pub synonym: Option<String>,
    pub tty: String,
    pub language: String,
    pub suppress: String,
}

impl From<ConceptProperties> for FfiConceptProperties {
    fn from(properties: ConceptProperties) -> Self {
        Self {
            rxcui: properties.rxcui,
            name: properties.name,
            synonym: properties.synonym.filter(|s| !s.is_empty()),
            tty: properties.tty,
            language: properties.language,
            suppress: properties.suppress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_med(name: &str) -> FfiNewMedication {
        FfiNewMedication {
            name: name.into(),
            dosage: "10 MG".into(),
            frequency: "Once daily".into(),
            notes: None,
            rxcui: None,
            is_maintenance: false,
            therapeutic_class: None,
            ingredients: None,
        }
    }

    #[test]
    fn test_core_medication_lifecycle() {
        let core = open_core_in_memory().unwrap();

        let med = core.add_medication(new_med("  Lisinopril 10mg ")).unwrap();
        assert_eq!(med.name, "Lisinopril 10mg");
        assert_eq!(core.list_medications().unwrap().len(), 1);

        let updated = core
            .update_medication(
                med.id.clone(),
                FfiMedicationUpdate {
                    is_maintenance: Some(true),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert!(updated.is_maintenance);

        assert_eq!(core.filter_medications("lisin".into()).unwrap().len(), 1);
        assert!(core.delete_medication(med.id.clone()).unwrap());
        assert!(matches!(
            core.get_medication(med.id),
            Err(ClariMedError::NotFound(_))
        ));
    }

    #[test]
    fn test_core_update_clears_search_selection() {
        let core = open_core_in_memory().unwrap();
        let mut input = new_med("Lisinopril 10mg");
        input.rxcui = Some("314076".into());
        input.notes = Some("x".into());
        let med = core.add_medication(input).unwrap();
        assert!(med.verified);

        let updated = core
            .update_medication(
                med.id.clone(),
                FfiMedicationUpdate {
                    name: Some("Lisinopril 20mg".into()),
                    clear_rxcui: true,
                    notes: Some("  ".into()),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, "Lisinopril 20mg");
        assert!(updated.rxcui.is_none());
        assert!(!updated.verified);
        assert!(updated.notes.is_none());
    }

    #[test]
    fn test_core_update_rejects_blanked_fields() {
        let core = open_core_in_memory().unwrap();
        let med = core.add_medication(new_med("Lisinopril 10mg")).unwrap();

        let err = core
            .update_medication(
                med.id.clone(),
                FfiMedicationUpdate {
                    name: Some("   ".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, ClariMedError::InvalidInput(msg) if msg.contains("name")));
        assert_eq!(core.get_medication(med.id).unwrap().name, "Lisinopril 10mg");
    }

    #[test]
    fn test_core_rejects_blank_required_fields() {
        let core = open_core_in_memory().unwrap();
        let mut input = new_med("Lisinopril");
        input.frequency = "   ".into();

        let err = core.add_medication(input).unwrap_err();
        assert!(matches!(err, ClariMedError::InvalidInput(msg) if msg.contains("frequency")));
        assert!(core.list_medications().unwrap().is_empty());
    }

    #[test]
    fn test_core_suggest_maintenance() {
        let core = open_core_in_memory().unwrap();
        let med = core.add_medication(new_med("Lisinopril 10mg")).unwrap();

        let suggestion = core.suggest_maintenance(med.id).unwrap();
        assert!(suggestion.is_maintenance);
        assert_eq!(
            suggestion.reason.as_deref(),
            Some("Blood pressure medication - ACE inhibitor (typically taken long-term)")
        );

        let none = core.classify_medication("Amoxicillin 500mg".into(), None);
        assert!(!none.is_maintenance);
        assert!(none.reason.is_none());
    }

    #[test]
    fn test_core_short_query_skips_lookup() {
        let core = open_core_in_memory().unwrap();
        assert!(core.search_drugs("l".into()).is_empty());
        assert_eq!(core.check_interactions(vec!["29046".into()]).unwrap(), "[]");
    }

    #[test]
    fn test_free_functions() {
        assert!(is_likely_maintenance_med("Lisinopril 10mg".into(), None));
        assert!(!is_likely_maintenance_med("Amoxicillin 500mg".into(), None));
        assert_eq!(
            get_maintenance_reason("Unknown".into(), Some("C10AA05".into())).as_deref(),
            Some("Cholesterol medication (typically taken long-term)")
        );
        assert_eq!(parse_dosage("lisinopril 10 MG Oral Tablet".into()), "10 MG");
        assert_eq!(parse_form("lisinopril 10 MG Oral Tablet".into()), "Oral Tablet");
    }

    #[test]
    fn test_candidate_conversion() {
        let candidate = search::normalize_concept(
            ConceptProperties {
                rxcui: "104377".into(),
                name: "lisinopril 10 MG Oral Tablet [Zestril]".into(),
                tty: "SBD".into(),
                ..Default::default()
            },
            TermType::BrandedClinicalDrug,
        );

        let ffi: FfiDrugCandidate = candidate.into();
        assert_eq!(ffi.display_name, "Zestril (lisinopril) 10 MG Oral Tablet");
        assert_eq!(ffi.tty, "SBD");
        assert_eq!(ffi.form, "Tablet");
        assert_eq!(ffi.form_priority, 1);
        assert_eq!(ffi.dosage, "10 MG");
    }
}
