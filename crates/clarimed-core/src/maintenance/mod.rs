//! Maintenance medication classifier.
//!
//! Suggests whether a medication is taken long-term for a chronic condition:
//! - ATC class prefix (when a code is known)
//! - Drug name patterns (statins, ACE inhibitors, ARBs, ...)
//!
//! A positive classification always comes with a reason string, and a
//! negative one never does.

mod rules;

pub use rules::GENERIC_REASON;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::MedicationRecord;

static DEFAULT_CLASSIFIER: LazyLock<MaintenanceClassifier> = LazyLock::new(MaintenanceClassifier::new);

/// Shared classifier with the built-in rules.
pub fn default_classifier() -> &'static MaintenanceClassifier {
    &DEFAULT_CLASSIFIER
}

/// Outcome of classifying one medication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceSuggestion {
    pub is_maintenance: bool,
    pub reason: Option<String>,
}

/// Rule-based classifier. Tables are ordered; first match wins.
#[derive(Debug, Clone)]
pub struct MaintenanceClassifier {
    /// Uppercase ATC prefixes
    atc_prefixes: Vec<String>,
    /// Name patterns that mark a medication as maintenance
    name_patterns: Vec<Regex>,
    /// Name pattern → specific explanation
    name_reasons: Vec<(Regex, String)>,
    /// ATC prefix → explanation
    atc_reasons: Vec<(String, String)>,
}

impl Default for MaintenanceClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl MaintenanceClassifier {
    /// Create a classifier with the built-in rule tables.
    pub fn new() -> Self {
        Self {
            atc_prefixes: rules::ATC_PREFIXES.iter().map(|p| p.to_string()).collect(),
            name_patterns: rules::NAME_PATTERNS.iter().map(|p| builtin(p)).collect(),
            name_reasons: rules::name_reasons()
                .into_iter()
                .map(|(pattern, reason)| (builtin(pattern), reason))
                .collect(),
            atc_reasons: rules::atc_reasons()
                .into_iter()
                .map(|(prefix, reason)| (prefix.to_string(), reason))
                .collect(),
        }
    }

    /// Whether the medication is likely taken long-term.
    pub fn is_maintenance(&self, name: &str, atc_code: Option<&str>) -> bool {
        if let Some(code) = normalize_code(atc_code) {
            if self.atc_prefixes.iter().any(|p| code.starts_with(p.as_str())) {
                return true;
            }
        }
        self.name_patterns.iter().any(|re| re.is_match(name))
    }

    /// Human-readable explanation, or `None` when not a maintenance medication.
    pub fn maintenance_reason(&self, name: &str, atc_code: Option<&str>) -> Option<String> {
        if !self.is_maintenance(name, atc_code) {
            return None;
        }

        let by_name = self
            .name_reasons
            .iter()
            .find(|(re, _)| re.is_match(name))
            .map(|(_, reason)| reason);

        let by_code = || {
            let code = normalize_code(atc_code)?;
            self.atc_reasons
                .iter()
                .find(|(prefix, _)| code.starts_with(prefix.as_str()))
                .map(|(_, reason)| reason)
        };

        Some(
            by_name
                .or_else(by_code)
                .cloned()
                .unwrap_or_else(|| GENERIC_REASON.to_string()),
        )
    }

    pub fn classify(&self, name: &str, atc_code: Option<&str>) -> MaintenanceSuggestion {
        let reason = self.maintenance_reason(name, atc_code);
        MaintenanceSuggestion {
            is_maintenance: reason.is_some(),
            reason,
        }
    }

    /// Classify a stored record by its name and therapeutic class.
    pub fn suggest(&self, record: &MedicationRecord) -> MaintenanceSuggestion {
        self.classify(&record.name, record.therapeutic_class.as_deref())
    }

    /// Add a name pattern (case-insensitive), optionally with its own reason.
    ///
    /// Custom reasons are checked after the built-in ones.
    pub fn add_name_pattern(&mut self, pattern: &str, reason: Option<&str>) -> Result<(), regex::Error> {
        let re = case_insensitive(pattern)?;
        if let Some(reason) = reason {
            self.name_reasons.push((re.clone(), reason.to_string()));
        }
        self.name_patterns.push(re);
        Ok(())
    }

    /// Add an ATC prefix, optionally with its own reason.
    pub fn add_atc_prefix(&mut self, prefix: &str, reason: Option<&str>) {
        let prefix = prefix.trim().to_uppercase();
        if prefix.is_empty() {
            return;
        }
        if let Some(reason) = reason {
            self.atc_reasons.push((prefix.clone(), reason.to_string()));
        }
        self.atc_prefixes.push(prefix);
    }
}

fn case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("(?i){pattern}"))
}

fn builtin(pattern: &str) -> Regex {
    case_insensitive(pattern).expect("built-in maintenance pattern")
}

/// Uppercased code, or `None` for a missing or empty one. Not trimmed, so a
/// padded code never matches a prefix.
fn normalize_code(code: Option<&str>) -> Option<String> {
    code.filter(|c| !c.is_empty()).map(str::to_uppercase)
}
