//! Medication store tests against an on-disk database.

use clarimed_core::db::MEDICATIONS_KEY;
use clarimed_core::maintenance::MaintenanceClassifier;
use clarimed_core::{Database, MedicationUpdate, NewMedication};

fn open_temp() -> (tempfile::TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(dir.path().join("clarimed.db")).unwrap();
    (dir, db)
}

#[test]
fn test_add_with_suggested_maintenance() {
    let (_dir, db) = open_temp();
    let classifier = MaintenanceClassifier::new();

    let inputs = [
        ("Lisinopril 10mg", None),
        ("Amoxicillin 500mg", None),
        ("Mystery Tablet", Some("C10AA05")),
    ];

    for (name, class) in inputs {
        let suggestion = classifier.classify(name, class);
        db.add_medication(NewMedication {
            name: name.into(),
            dosage: "1 tablet".into(),
            frequency: "Once daily".into(),
            is_maintenance: suggestion.is_maintenance,
            therapeutic_class: class.map(Into::into),
            ..Default::default()
        })
        .unwrap();
    }

    let flags: Vec<(String, bool)> = db
        .list_medications()
        .unwrap()
        .into_iter()
        .map(|m| (m.name, m.is_maintenance))
        .collect();

    assert_eq!(
        flags,
        vec![
            ("Lisinopril 10mg".to_string(), true),
            ("Amoxicillin 500mg".to_string(), false),
            ("Mystery Tablet".to_string(), true),
        ]
    );

    for record in db.list_medications().unwrap() {
        assert_eq!(
            classifier.suggest(&record).is_maintenance,
            record.is_maintenance,
            "Record {}: stored flag should match suggestion",
            record.name
        );
    }
}

#[test]
fn test_web_client_list_loads() {
    let (_dir, db) = open_temp();

    // Shape written by the browser app, including an entry from before
    // isMaintenance existed.
    db.set_item(
        MEDICATIONS_KEY,
        r#"[
            {"id": "8d3f", "name": "Metformin", "dosage": "500 MG", "frequency": "Twice daily",
             "rxcui": "861007", "verified": true, "isMaintenance": true,
             "ingredients": ["6809"], "createdAt": "2024-03-01T08:00:00.000Z", "updatedAt": "2024-03-01T08:00:00.000Z"},
            {"id": "9a11", "name": "Ibuprofen", "dosage": "200 MG", "frequency": "As needed",
             "notes": "After meals", "verified": false,
             "createdAt": "2023-11-20T10:00:00.000Z", "updatedAt": "2023-11-20T10:00:00.000Z"}
        ]"#,
    )
    .unwrap();

    let meds = db.list_medications().unwrap();
    assert_eq!(meds.len(), 2);
    assert_eq!(meds[0].ingredients.as_deref(), Some(&["6809".to_string()][..]));
    assert!(meds[0].verified);
    assert!(!meds[1].is_maintenance);

    let updated = db
        .update_medication(
            "9a11",
            MedicationUpdate {
                notes: Some(Some("With food".into())),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(updated.notes.as_deref(), Some("With food"));
    assert_eq!(updated.created_at, "2023-11-20T10:00:00.000Z");
    assert_ne!(updated.updated_at, "2023-11-20T10:00:00.000Z");

    assert_eq!(db.filter_medications("food").unwrap().len(), 1);
}

#[test]
fn test_add_keeps_records_without_timestamps() {
    let (_dir, db) = open_temp();
    db.set_item(
        MEDICATIONS_KEY,
        r#"[{"id": "a1", "name": "Warfarin", "dosage": "5 MG", "frequency": "Once daily",
             "isMaintenance": true}]"#,
    )
    .unwrap();

    db.add_medication(NewMedication {
        name: "Metformin".into(),
        dosage: "500 MG".into(),
        frequency: "Twice daily".into(),
        ..Default::default()
    })
    .unwrap();

    let raw = db.get_item(MEDICATIONS_KEY).unwrap().unwrap();
    assert!(raw.contains("Warfarin"));
    let names: Vec<String> = db
        .list_medications()
        .unwrap()
        .into_iter()
        .map(|m| m.name)
        .collect();
    assert_eq!(names, vec!["Warfarin", "Metformin"]);
}

#[test]
fn test_unreadable_list_is_not_overwritten() {
    let (_dir, db) = open_temp();
    let stored = r#"[{"id": "a1", "name": 42}]"#;
    db.set_item(MEDICATIONS_KEY, stored).unwrap();

    assert!(db.list_medications().unwrap().is_empty());
    assert!(db.add_medication(NewMedication::default()).is_err());
    assert_eq!(db.get_item(MEDICATIONS_KEY).unwrap().as_deref(), Some(stored));
}
