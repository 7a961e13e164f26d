//! Keyword dictionaries for the rule-based classifier.
//!
//! All tables are lowercase and matched as substrings of the normalised symptom text. Order
//! matters: within each table, matches are reported in declaration order, and the specialty
//! table's order decides which specialty supplies the provider when several match.

// ── Keyword sets ────────────────────────────────────────────

/// Signals that always mean emergency care.
pub static EMERGENCY_KEYWORDS: &[&str] = &[
    "chest pain",
    "chest pressure",
    "can't breathe",
    "cannot breathe",
    "difficulty breathing",
    "shortness of breath",
    "severe bleeding",
    "unconscious",
    "unresponsive",
    "loss of consciousness",
    "stroke",
    "heart attack",
    "suicide",
    "suicidal",
    "overdose",
    "seizure",
    "severe burn",
    "paralysis",
    "sudden weakness",
    "sudden confusion",
    "coughing blood",
    "vomiting blood",
    "severe allergic reaction",
];

/// Signals that need same-day care.
pub static URGENT_KEYWORDS: &[&str] = &[
    "high fever",
    "persistent fever",
    "severe vomiting",
    "severe diarrhea",
    "dehydration",
    "difficulty urinating",
    "blood in urine",
    "severe cough",
    "broken bone",
    "sprained ankle",
    "deep cut",
    "animal bite",
    "severe rash",
    "eye injury",
    "ear infection",
    "severe pain",
];

/// Signals that self-care is appropriate, checked only after every other tier.
pub static MILD_KEYWORDS: &[&str] = &[
    "mild",
    "slight",
    "minor",
    "runny nose",
    "stuffy nose",
    "scratchy throat",
    "sniffles",
    "common cold",
    "tired",
    "fatigue",
];

/// A medical specialty and the vocabulary that points to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialtyEntry {
    /// Field name, e.g. `Neurology`.
    pub specialty: &'static str,
    /// Provider title, e.g. `Neurologist`.
    pub provider: &'static str,
    pub keywords: &'static [&'static str],
    /// Typical conditions, most likely first. Between three and five entries.
    pub conditions: &'static [&'static str],
}

pub static SPECIALTY_TABLE: &[SpecialtyEntry] = &[
    SpecialtyEntry {
        specialty: "Cardiology",
        provider: "Cardiologist",
        keywords: &["heart", "palpitations", "irregular heartbeat", "chest discomfort"],
        conditions: &["Cardiac concerns", "Heart rhythm issues", "Hypertension"],
    },
    SpecialtyEntry {
        specialty: "Dermatology",
        provider: "Dermatologist",
        keywords: &["skin", "rash", "acne", "mole", "eczema", "psoriasis", "hives"],
        conditions: &["Skin condition", "Allergic reaction", "Dermatitis", "Infection"],
    },
    SpecialtyEntry {
        specialty: "Orthopedics",
        provider: "Orthopedic Specialist",
        keywords: &["bone", "joint", "fracture", "sprain", "back pain", "knee pain"],
        conditions: &["Musculoskeletal injury", "Arthritis", "Strain or sprain"],
    },
    SpecialtyEntry {
        specialty: "Gastroenterology",
        provider: "Gastroenterologist",
        keywords: &[
            "stomach",
            "digestion",
            "nausea",
            "diarrhea",
            "constipation",
            "abdominal",
        ],
        conditions: &["Digestive disorder", "Gastritis", "IBS", "Food intolerance"],
    },
    SpecialtyEntry {
        specialty: "Neurology",
        provider: "Neurologist",
        keywords: &["headache", "migraine", "dizziness", "numbness", "tingling"],
        conditions: &["Neurological condition", "Migraine", "Tension headache"],
    },
    SpecialtyEntry {
        specialty: "Pulmonology",
        provider: "Pulmonologist",
        keywords: &["cough", "breathing", "lungs", "asthma", "bronchitis", "wheezing"],
        conditions: &["Respiratory infection", "Bronchitis", "Asthma exacerbation"],
    },
    SpecialtyEntry {
        specialty: "ENT",
        provider: "ENT Specialist",
        keywords: &["earache", "ear pain", "sore throat", "sinus", "tonsil", "hearing loss"],
        conditions: &[
            "Ear infection",
            "Sinusitis",
            "Tonsillitis",
            "Upper respiratory infection",
        ],
    },
    SpecialtyEntry {
        specialty: "Ophthalmology",
        provider: "Ophthalmologist",
        keywords: &["eye", "vision", "blurry", "double vision"],
        conditions: &["Eye condition", "Vision problem", "Conjunctivitis"],
    },
    SpecialtyEntry {
        specialty: "Psychiatry",
        provider: "Mental Health Professional",
        keywords: &["anxiety", "depression", "stress", "mental", "panic", "worried"],
        conditions: &["Anxiety disorder", "Depression", "Stress-related condition"],
    },
    SpecialtyEntry {
        specialty: "Pediatrics",
        provider: "Pediatrician",
        keywords: &["child", "baby", "infant", "toddler"],
        conditions: &["Childhood illness", "Viral infection", "Developmental concern"],
    },
    SpecialtyEntry {
        specialty: "Urology",
        provider: "Urologist",
        keywords: &["urinary", "bladder", "kidney", "urination"],
        conditions: &["Urinary tract infection", "Kidney condition", "Bladder issue"],
    },
    SpecialtyEntry {
        specialty: "Gynecology",
        provider: "Gynecologist",
        keywords: &["menstrual", "missed period", "pregnancy", "vaginal", "pelvic"],
        conditions: &[
            "Gynecological condition",
            "Menstrual disorder",
            "Reproductive health issue",
        ],
    },
    SpecialtyEntry {
        specialty: "Internal Medicine",
        provider: "Internist",
        keywords: &["fever", "infection", "chills"],
        conditions: &["Viral infection", "Bacterial infection", "Inflammatory condition"],
    },
];

// ── Matching ────────────────────────────────────────────────

/// Lowercase and fold typographic apostrophes so "Can’t" matches "can't".
pub fn normalise(text: &str) -> String {
    text.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'")
}

/// Keywords from `keywords` found in an already normalised text, in declaration order.
pub fn find_matches(normalised: &str, keywords: &'static [&'static str]) -> Vec<&'static str> {
    keywords
        .iter()
        .copied()
        .filter(|keyword| normalised.contains(keyword))
        .collect()
}

/// Emergency keywords present in raw `text`.
pub fn emergency_matches(text: &str) -> Vec<&'static str> {
    find_matches(&normalise(text), EMERGENCY_KEYWORDS)
}

/// A specialty together with the keywords that selected it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialtyMatch {
    pub entry: &'static SpecialtyEntry,
    pub hits: Vec<&'static str>,
}

/// Every specialty with at least one keyword hit, in table order.
pub fn specialty_matches(normalised: &str) -> Vec<SpecialtyMatch> {
    SPECIALTY_TABLE
        .iter()
        .filter_map(|entry| {
            let hits = find_matches(normalised, entry.keywords);
            (!hits.is_empty()).then_some(SpecialtyMatch { entry, hits })
        })
        .collect()
}
