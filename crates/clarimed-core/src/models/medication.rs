//! Medication list models.

use serde::{Deserialize, Deserializer, Serialize};

/// A medication on the user's personal list.
///
/// Serialized with camelCase keys so lists written by the web client load
/// unchanged. Fields added after the first release default when absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicationRecord {
    /// Local UUID
    pub id: String,
    /// Display name (e.g. "Lisinopril 10mg")
    pub name: String,
    /// Dosage text (e.g. "10 MG")
    pub dosage: String,
    /// Frequency text (e.g. "Once daily")
    pub frequency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// RxNorm concept identifier, attached when picked from search
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rxcui: Option<String>,
    /// True iff `rxcui` came from a search selection
    #[serde(default, deserialize_with = "null_as_default")]
    pub verified: bool,
    /// Taken long-term for a chronic condition
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_maintenance: bool,
    /// ATC code (e.g. "C10AA05")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub therapeutic_class: Option<String>,
    /// Ingredient rxcuis, for combination products and interaction checks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Read `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Input for creating a medication.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewMedication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub notes: Option<String>,
    pub rxcui: Option<String>,
    pub is_maintenance: bool,
    pub therapeutic_class: Option<String>,
    pub ingredients: Option<Vec<String>>,
}

/// Partial update; `None` leaves a field unchanged.
///
/// Optional fields take `Some(None)` to clear the stored value. Clearing
/// `rxcui` also clears `verified`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MedicationUpdate {
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub notes: Option<Option<String>>,
    pub rxcui: Option<Option<String>>,
    pub is_maintenance: Option<bool>,
    pub therapeutic_class: Option<Option<String>>,
    pub ingredients: Option<Option<Vec<String>>>,
}

impl MedicationUpdate {
    /// Trim the text fields that are set; blank notes become a clear.
    pub fn trimmed(mut self) -> Self {
        let trim = |value: Option<String>| value.map(|v| v.trim().to_string());
        self.name = trim(self.name);
        self.dosage = trim(self.dosage);
        self.frequency = trim(self.frequency);
        self.notes = self.notes.map(|notes| {
            notes
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
        });
        self
    }

    /// First required field that is set but blank, if any.
    pub fn blanked_required_field(&self) -> Option<&'static str> {
        [
            ("name", &self.name),
            ("dosage", &self.dosage),
            ("frequency", &self.frequency),
        ]
        .into_iter()
        .find(|(_, value)| value.as_deref().is_some_and(|v| v.trim().is_empty()))
        .map(|(field, _)| field)
    }
}

impl NewMedication {
    /// Trim text fields; blank notes become `None`.
    pub fn trimmed(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.dosage = self.dosage.trim().to_string();
        self.frequency = self.frequency.trim().to_string();
        self.notes = self
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        self
    }

    /// First required field that is blank, if any.
    pub fn missing_required_field(&self) -> Option<&'static str> {
        [
            ("name", &self.name),
            ("dosage", &self.dosage),
            ("frequency", &self.frequency),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
    }
}

impl MedicationRecord {
    /// Create a record with a fresh id and timestamps.
    pub fn new(input: NewMedication) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: input.name,
            dosage: input.dosage,
            frequency: input.frequency,
            notes: input.notes,
            verified: input.rxcui.is_some(),
            rxcui: input.rxcui,
            is_maintenance: input.is_maintenance,
            therapeutic_class: input.therapeutic_class,
            ingredients: input.ingredients,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Merge a partial update and bump `updated_at`.
    pub fn apply(&mut self, update: MedicationUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(dosage) = update.dosage {
            self.dosage = dosage;
        }
        if let Some(frequency) = update.frequency {
            self.frequency = frequency;
        }
        if let Some(notes) = update.notes {
            self.notes = notes;
        }
        if let Some(rxcui) = update.rxcui {
            self.verified = rxcui.is_some();
            self.rxcui = rxcui;
        }
        if let Some(is_maintenance) = update.is_maintenance {
            self.is_maintenance = is_maintenance;
        }
        if let Some(therapeutic_class) = update.therapeutic_class {
            self.therapeutic_class = therapeutic_class;
        }
        if let Some(ingredients) = update.ingredients {
            self.ingredients = ingredients;
        }
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }

    /// Case-insensitive substring match over name, dosage, frequency and notes.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.dosage.to_lowercase().contains(&query)
            || self.frequency.to_lowercase().contains(&query)
            || self
                .notes
                .as_ref()
                .is_some_and(|n| n.to_lowercase().contains(&query))
    }
}
