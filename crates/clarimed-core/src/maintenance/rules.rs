//! Built-in maintenance rule tables.
//!
//! Patterns are regex sources matched case-insensitively against the
//! medication name. Order matters: the first matching reason wins.

const LONG_TERM: &str = "(typically taken long-term)";

/// ATC prefixes for drug classes that are usually taken indefinitely.
pub const ATC_PREFIXES: &[&str] = &[
    // Cardiovascular
    "C01", "C02", "C03", "C07", "C08", "C09", "C10",
    // Antithrombotic agents
    "B01A",
    // Diabetes, thyroid
    "A10", "H03",
    // Antiepileptics, antipsychotics, antidepressants
    "N03", "N05A", "N06A",
    // Obstructive airway disease
    "R03",
    // Immunosuppressants, antineoplastics
    "L04", "L01",
    // Bone structure
    "M05B",
];

/// Name patterns that mark a medication as maintenance.
pub const NAME_PATTERNS: &[&str] = &[
    // Statins
    r"statin$",
    r"atorvastatin|simvastatin|rosuvastatin|pravastatin|lovastatin|fluvastatin",
    // ACE inhibitors
    r"pril$",
    r"lisinopril|enalapril|ramipril|benazepril|captopril|fosinopril|perindopril|quinapril|trandolapril",
    // ARBs
    r"sartan$",
    r"losartan|valsartan|telmisartan|irbesartan|olmesartan|candesartan|azilsartan",
    // Beta blockers
    r"olol$",
    r"metoprolol|atenolol|carvedilol|bisoprolol|propranolol|nadolol|labetalol|nebivolol",
    // Calcium channel blockers
    r"dipine$",
    r"amlodipine|nifedipine|felodipine|diltiazem|verapamil|nicardipine",
    // Diuretics
    r"thiazide|furosemide|torsemide|spironolactone|hydrochlorothiazide|chlorthalidone|bumetanide|triamterene|amiloride",
    // Diabetes
    r"insulin|metformin|glipizide|glyburide|sitagliptin|empagliflozin|dulaglutide|semaglutide|liraglutide|pioglitazone|glimepiride",
    // Thyroid
    r"levothyroxine|synthroid|liothyronine|armour thyroid",
    // Anticoagulants
    r"warfarin|apixaban|rivaroxaban|dabigatran|edoxaban",
    r"coumadin|eliquis|xarelto|pradaxa|savaysa",
    // Antiplatelets
    r"clopidogrel|prasugrel|ticagrelor|plavix|aspirin",
    // Immunosuppressants
    r"tacrolimus|cyclosporine|azathioprine|mycophenolate",
    r"prograf|neoral|imuran|cellcept",
    // Antiepileptics
    r"levetiracetam|phenytoin|carbamazepine|valproate|lamotrigine",
    r"keppra|dilantin|tegretol|depakote|lamictal",
];

/// Specific explanations keyed by name pattern.
pub fn name_reasons() -> Vec<(&'static str, String)> {
    vec![
        (
            r"statin|atorvastatin|simvastatin|rosuvastatin|pravastatin|lovastatin|fluvastatin",
            format!("Cholesterol medication {LONG_TERM}"),
        ),
        (
            r"pril$|lisinopril|enalapril|ramipril|benazepril|captopril",
            format!("Blood pressure medication - ACE inhibitor {LONG_TERM}"),
        ),
        (
            r"sartan$|losartan|valsartan|telmisartan|irbesartan",
            format!("Blood pressure medication - ARB {LONG_TERM}"),
        ),
        (
            r"olol$|metoprolol|atenolol|carvedilol|bisoprolol",
            format!("Blood pressure medication - Beta blocker {LONG_TERM}"),
        ),
        (
            r"dipine$|amlodipine|nifedipine|felodipine",
            format!("Blood pressure medication - Calcium channel blocker {LONG_TERM}"),
        ),
        (
            r"insulin|metformin|glipizide|glyburide",
            format!("Diabetes medication {LONG_TERM}"),
        ),
        (
            r"levothyroxine|synthroid|levoxyl|liothyronine",
            format!("Thyroid medication {LONG_TERM}"),
        ),
        (
            r"warfarin|apixaban|rivaroxaban|dabigatran|edoxaban|coumadin|eliquis|xarelto",
            format!("Blood thinner - Anticoagulant {LONG_TERM}"),
        ),
    ]
}

/// Explanations keyed by ATC prefix, used when no name reason applies.
pub fn atc_reasons() -> Vec<(&'static str, String)> {
    let blood_pressure = format!("Blood pressure medication {LONG_TERM}");
    vec![
        ("C10", format!("Cholesterol medication {LONG_TERM}")),
        ("C07", blood_pressure.clone()),
        ("C08", blood_pressure.clone()),
        ("C09", blood_pressure),
        ("A10", format!("Diabetes medication {LONG_TERM}")),
        ("H03", format!("Thyroid medication {LONG_TERM}")),
        ("B01A", format!("Blood thinner {LONG_TERM}")),
        ("N03", format!("Seizure medication {LONG_TERM}")),
        ("L04", format!("Immunosuppressant {LONG_TERM}")),
    ]
}

/// Reason given when a medication matched only a broad rule.
pub const GENERIC_REASON: &str = "This medication is typically taken regularly for chronic conditions";
