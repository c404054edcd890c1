//! Deduplication and ordering of search candidates.
//!
//! Ordering keys, in priority order:
//! - Dosage form: Tablet, Capsule, Liquid, Other
//! - Generic (SCD) before brand (SBD)
//! - Strength, lowest first (mg-equivalent)
//! - Display name, case-insensitive

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::{DrugCandidate, TermType};

use super::normalizer::dosage_strength;

/// Drop candidates whose display name repeats an earlier one.
///
/// Two concepts rendering to the same display name collapse to whichever
/// came first in service order.
pub fn dedupe(candidates: Vec<DrugCandidate>) -> Vec<DrugCandidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert(c.dedup_key()))
        .collect()
}

/// Deduplicate, then sort with [`compare`]. The sort is stable.
pub fn rank(candidates: Vec<DrugCandidate>) -> Vec<DrugCandidate> {
    let mut unique = dedupe(candidates);
    unique.sort_by(compare);
    unique
}

/// Total order over candidates.
pub fn compare(a: &DrugCandidate, b: &DrugCandidate) -> Ordering {
    a.dosage_form
        .priority()
        .cmp(&b.dosage_form.priority())
        .then_with(|| kind_rank(a.tty).cmp(&kind_rank(b.tty)))
        .then_with(|| dosage_strength(&a.name).total_cmp(&dosage_strength(&b.name)))
        .then_with(|| {
            a.display_name
                .to_lowercase()
                .cmp(&b.display_name.to_lowercase())
        })
}

fn kind_rank(tty: TermType) -> u8 {
    match tty {
        TermType::GenericClinicalDrug => 0,
        TermType::BrandedClinicalDrug => 1,
        _ => 2,
    }
}
