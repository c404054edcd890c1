//! Medication list operations.
//!
//! The whole list lives under one storage key as a JSON array, so every
//! mutation is a read-modify-write of that value.

use tracing::warn;

use super::{Database, DbError, DbResult};
use crate::models::{MedicationRecord, MedicationUpdate, NewMedication};

/// Storage key holding the medication list.
pub const MEDICATIONS_KEY: &str = "clarimed_medications";

impl Database {
    /// All stored medications, in insertion order.
    ///
    /// A value that does not parse is logged and treated as an empty list.
    pub fn list_medications(&self) -> DbResult<Vec<MedicationRecord>> {
        match self.load_medications() {
            Err(DbError::Json(error)) => {
                warn!(key = MEDICATIONS_KEY, %error, "Unreadable medication list, ignoring");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Strict read used before every write, so an unreadable list is never
    /// overwritten.
    fn load_medications(&self) -> DbResult<Vec<MedicationRecord>> {
        match self.get_item(MEDICATIONS_KEY)? {
            Some(stored) => Ok(serde_json::from_str(&stored)?),
            None => Ok(Vec::new()),
        }
    }

    /// Replace the stored list.
    pub fn save_medications(&self, medications: &[MedicationRecord]) -> DbResult<()> {
        let json = serde_json::to_string(medications)?;
        self.set_item(MEDICATIONS_KEY, &json)
    }

    /// Get one medication by id.
    pub fn get_medication(&self, id: &str) -> DbResult<MedicationRecord> {
        self.list_medications()?
            .into_iter()
            .find(|m| m.id == id)
            .ok_or_else(|| DbError::NotFound(id.to_string()))
    }

    /// Append a new medication with a fresh id and timestamps.
    pub fn add_medication(&self, input: NewMedication) -> DbResult<MedicationRecord> {
        let mut medications = self.load_medications()?;
        let record = MedicationRecord::new(input);
        medications.push(record.clone());
        self.save_medications(&medications)?;
        Ok(record)
    }

    /// Merge `update` into the medication with `id`. `None` if there is none.
    pub fn update_medication(
        &self,
        id: &str,
        update: MedicationUpdate,
    ) -> DbResult<Option<MedicationRecord>> {
        let mut medications = self.load_medications()?;
        let Some(record) = medications.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };

        record.apply(update);
        let updated = record.clone();
        self.save_medications(&medications)?;
        Ok(Some(updated))
    }

    /// Delete the medication with `id`. Returns whether anything was removed.
    pub fn delete_medication(&self, id: &str) -> DbResult<bool> {
        let mut medications = self.load_medications()?;
        let before = medications.len();
        medications.retain(|m| m.id != id);

        if medications.len() == before {
            return Ok(false);
        }
        self.save_medications(&medications)?;
        Ok(true)
    }

    pub fn clear_medications(&self) -> DbResult<()> {
        self.remove_item(MEDICATIONS_KEY)?;
        Ok(())
    }

    /// Medications whose name, dosage, frequency or notes contain `query`
    /// (case-insensitive). A blank query returns everything.
    pub fn filter_medications(&self, query: &str) -> DbResult<Vec<MedicationRecord>> {
        let medications = self.list_medications()?;
        let query = query.trim();
        if query.is_empty() {
            return Ok(medications);
        }
        Ok(medications.into_iter().filter(|m| m.matches(query)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_med(name: &str, notes: Option<&str>) -> NewMedication {
        NewMedication {
            name: name.into(),
            dosage: "10 MG".into(),
            frequency: "Once daily".into(),
            notes: notes.map(Into::into),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_and_list() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.list_medications().unwrap().is_empty());

        let first = db.add_medication(new_med("Lisinopril", None)).unwrap();
        let second = db.add_medication(new_med("Metformin", None)).unwrap();

        let all = db.list_medications().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, first.id);
        assert_eq!(all[1].id, second.id);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_update() {
        let db = Database::open_in_memory().unwrap();
        let med = db.add_medication(new_med("Lisinopril", None)).unwrap();
        assert!(!med.verified);

        let updated = db
            .update_medication(
                &med.id,
                MedicationUpdate {
                    frequency: Some("Twice daily".into()),
                    rxcui: Some(Some("314076".into())),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.frequency, "Twice daily");
        assert_eq!(updated.name, "Lisinopril");
        assert!(updated.verified);
        assert_eq!(updated.created_at, med.created_at);
        assert_eq!(db.get_medication(&med.id).unwrap(), updated);

        let missing = db
            .update_medication("nope", MedicationUpdate::default())
            .unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(db.get_medication("nope"), Err(DbError::NotFound(id)) if id == "nope"));
    }

    #[test]
    fn test_delete() {
        let db = Database::open_in_memory().unwrap();
        let keep = db.add_medication(new_med("Lisinopril", None)).unwrap();
        let drop = db.add_medication(new_med("Metformin", None)).unwrap();

        assert!(db.delete_medication(&drop.id).unwrap());
        assert!(!db.delete_medication(&drop.id).unwrap());

        let all = db.list_medications().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, keep.id);
    }

    #[test]
    fn test_clear() {
        let db = Database::open_in_memory().unwrap();
        db.add_medication(new_med("Lisinopril", None)).unwrap();
        db.clear_medications().unwrap();
        assert!(db.list_medications().unwrap().is_empty());
        assert!(db.get_item(MEDICATIONS_KEY).unwrap().is_none());
    }

    #[test]
    fn test_filter() {
        let db = Database::open_in_memory().unwrap();
        db.add_medication(new_med("Lisinopril", Some("Take with WATER"))).unwrap();
        db.add_medication(new_med("Metformin", None)).unwrap();

        let names = |query: &str| -> Vec<String> {
            db.filter_medications(query)
                .unwrap()
                .into_iter()
                .map(|m| m.name)
                .collect()
        };

        assert_eq!(names("lisino"), vec!["Lisinopril"]);
        assert_eq!(names("water"), vec!["Lisinopril"]);
        assert_eq!(names("once daily").len(), 2);
        assert_eq!(names("  ").len(), 2);
        assert!(names("aspirin").is_empty());
    }

    #[test]
    fn test_legacy_records_get_defaults() {
        let db = Database::open_in_memory().unwrap();
        db.set_item(
            MEDICATIONS_KEY,
            r#"[{"id": "a1", "name": "Lisinopril", "dosage": "10 MG", "frequency": "daily",
                 "verified": false, "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"}]"#,
        )
        .unwrap();

        let all = db.list_medications().unwrap();
        assert_eq!(all.len(), 1);
        assert!(!all[0].is_maintenance);
        assert!(all[0].therapeutic_class.is_none());
        assert!(all[0].ingredients.is_none());
    }

    #[test]
    fn test_garbled_value_reads_as_empty() {
        let db = Database::open_in_memory().unwrap();
        db.set_item(MEDICATIONS_KEY, "{not json").unwrap();
        assert!(db.list_medications().unwrap().is_empty());

        // Writes refuse to replace what they could not read
        assert!(matches!(
            db.add_medication(new_med("Lisinopril", None)),
            Err(DbError::Json(_))
        ));
        assert!(matches!(
            db.update_medication("a1", MedicationUpdate::default()),
            Err(DbError::Json(_))
        ));
        assert!(matches!(db.delete_medication("a1"), Err(DbError::Json(_))));
        assert_eq!(db.get_item(MEDICATIONS_KEY).unwrap().as_deref(), Some("{not json"));

        db.clear_medications().unwrap();
        db.add_medication(new_med("Lisinopril", None)).unwrap();
        assert_eq!(db.list_medications().unwrap().len(), 1);
    }

    #[test]
    fn test_loose_records_survive_add() {
        let db = Database::open_in_memory().unwrap();
        db.set_item(
            MEDICATIONS_KEY,
            r#"[{"id": "a1", "name": "Warfarin", "dosage": "5 MG", "frequency": "daily",
                 "verified": null, "isMaintenance": true}]"#,
        )
        .unwrap();

        assert_eq!(db.list_medications().unwrap().len(), 1);
        db.add_medication(new_med("Metformin", None)).unwrap();

        let all = db.list_medications().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Warfarin");
        assert!(!all[0].verified);
        assert!(all[0].is_maintenance);
        assert_eq!(all[0].created_at, "");
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meds.db");

        let id = {
            let db = Database::open(&path).unwrap();
            db.add_medication(new_med("Atorvastatin", None)).unwrap().id
        };

        let db = Database::open(&path).unwrap();
        assert_eq!(db.get_medication(&id).unwrap().name, "Atorvastatin");
    }

    #[test]
    fn test_stored_json_uses_camel_case() {
        let db = Database::open_in_memory().unwrap();
        db.add_medication(NewMedication {
            is_maintenance: true,
            therapeutic_class: Some("C10AA05".into()),
            ..new_med("Atorvastatin", None)
        })
        .unwrap();

        let raw = db.get_item(MEDICATIONS_KEY).unwrap().unwrap();
        assert!(raw.contains("\"isMaintenance\":true"));
        assert!(raw.contains("\"therapeuticClass\":\"C10AA05\""));
        assert!(raw.contains("\"createdAt\""));
    }
}
