//! Drug name normalizer.
//!
//! Handles:
//! - Brand promotion ("lisinopril 10 MG Oral Tablet [Prinivil]" → "Prinivil (lisinopril) 10 MG Oral Tablet")
//! - Dosage form extraction and grouping (Tablet, Capsule, Liquid, Other)
//! - Strength extraction with unit conversion (mcg→mg, g→mg)

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{ConceptProperties, DosageForm, DrugCandidate, TermType};

/// "<generic part> [<brand>]"
static BRAND_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s*\[([^\]]+)\]$").expect("brand suffix pattern"));

/// "<ingredient words> <rest>"
static INGREDIENT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-zA-Z\s]+)\s+(.+)$").expect("ingredient prefix pattern"));

static FORM_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(Tablet|Capsule|Liquid|Solution|Suspension|Syrup|Oral Solution|Injection|Cream|Ointment|Gel|Patch)\b",
    )
    .expect("form label pattern")
});

static TABLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\btablet\b").expect("tablet pattern"));
static CAPSULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bcapsule\b").expect("capsule pattern"));
static LIQUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(liquid|solution|suspension|syrup|oral solution)\b").expect("liquid pattern")
});

static STRENGTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(MG|MCG|G|ML|%|UNIT)").expect("strength pattern")
});
static DOSAGE_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?\s*(?:MG|ML|MCG|G|%|UNIT))").expect("dosage text pattern")
});
static FORM_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:MG|ML|MCG|G|%|UNIT)\s+(.+?)$").expect("form tail pattern")
});

/// Label used when no known form word appears in a name.
pub const OTHER_FORM: &str = "Other";

/// Put the brand first and the generic ingredient in parentheses.
///
/// Names without a bracketed brand, or whose generic part does not start
/// with an ingredient word, are returned unchanged.
pub fn format_brand_name(name: &str) -> String {
    let Some(caps) = BRAND_SUFFIX.captures(name) else {
        return name.to_string();
    };
    let generic_part = &caps[1];
    let brand = &caps[2];

    match INGREDIENT_PREFIX.captures(generic_part) {
        Some(parts) => format!("{} ({}) {}", brand, parts[1].trim(), &parts[2]),
        None => name.to_string(),
    }
}

/// First form word in the name (as written), or [`OTHER_FORM`].
pub fn extract_dosage_form(name: &str) -> String {
    FORM_LABEL
        .captures(name)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| OTHER_FORM.to_string())
}

/// Sort group of a name. Tablet wins over capsule wins over liquid.
pub fn dosage_form(name: &str) -> DosageForm {
    if TABLET.is_match(name) {
        DosageForm::Tablet
    } else if CAPSULE.is_match(name) {
        DosageForm::Capsule
    } else if LIQUID.is_match(name) {
        DosageForm::Liquid
    } else {
        DosageForm::Other
    }
}

/// Numeric strength in mg-equivalent units; 0.0 when the name has none.
///
/// ML, % and UNIT values are compared as-is.
pub fn dosage_strength(name: &str) -> f64 {
    let Some(caps) = STRENGTH.captures(name) else {
        return 0.0;
    };
    let Ok(value) = caps[1].parse::<f64>() else {
        return 0.0;
    };

    match caps[2].to_uppercase().as_str() {
        "MCG" => value / 1000.0,
        "G" => value * 1000.0,
        _ => value,
    }
}

/// Strength-and-unit substring (e.g. "10 MG"), or an empty string.
pub fn parse_dosage(name: &str) -> String {
    DOSAGE_TEXT
        .captures(name)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default()
}

/// Form text following the strength unit (e.g. "Oral Tablet"), or an empty string.
pub fn parse_form(name: &str) -> String {
    FORM_TAIL
        .captures(name)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default()
}

/// Build a search candidate from a concept of the given product kind.
pub fn normalize_concept(concept: ConceptProperties, tty: TermType) -> DrugCandidate {
    let display_name = if tty == TermType::BrandedClinicalDrug {
        format_brand_name(&concept.name)
    } else {
        concept.name.clone()
    };

    DrugCandidate {
        dosage_form: dosage_form(&concept.name),
        form: extract_dosage_form(&concept.name),
        display_name,
        rxcui: concept.rxcui,
        name: concept.name,
        tty,
        synonym: concept.synonym.filter(|s| !s.is_empty()),
        language: concept.language,
        suppress: concept.suppress,
    }
}
