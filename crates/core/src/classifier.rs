//! Rule-based fallback classifier.
//!
//! A pure function from symptom text to [`TriageResult`]. Tiers are checked strictly in the
//! order emergency, urgent, specialty, mild, default; the first tier with a keyword hit decides
//! the result. Unrecognised or empty text lands on a low-confidence doctor visit rather than
//! home care.

use crate::constants::{
    DEFAULT_CONFIDENCE, DEFAULT_RECOMMENDATION, EMERGENCY_PROVIDER, EMERGENCY_RECOMMENDATION,
    EMERGENCY_SCORE, HOME_CARE_RECOMMENDATION, MAX_RECOMMENDED_SPECIALTIES, MILD_SCORE,
    PRIMARY_CARE_PROVIDER, RULE_BASED_MODEL, SELF_CARE_PROVIDER, SPECIALTY_SCORE,
    URGENT_PROVIDER, URGENT_RECOMMENDATION, URGENT_SCORE,
};
use crate::keywords::{
    find_matches, normalise, specialty_matches, SpecialtyMatch, EMERGENCY_KEYWORDS,
    MILD_KEYWORDS, URGENT_KEYWORDS,
};
use crate::recommender::recommend_specialties;
use crate::{TriageResult, Urgency};
use std::collections::BTreeSet;

const EMERGENCY_CONDITIONS: [&str; 3] = [
    "Medical emergency requiring immediate evaluation",
    "Life-threatening condition cannot be ruled out",
    "Acute injury or illness",
];

const URGENT_CONDITIONS: [&str; 3] = [
    "Requires urgent medical evaluation",
    "Acute infection",
    "Acute injury",
];

const MILD_CONDITIONS: [&str; 3] = [
    "Mild symptoms - self-care appropriate",
    "Common cold",
    "Minor viral infection",
];

const SELF_CARE_TIPS: [&str; 5] = [
    "Get plenty of rest",
    "Stay well hydrated",
    "Use over-the-counter medications as directed",
    "Monitor your temperature",
    "Seek care if symptoms worsen",
];

/// Classify `text` into an urgency tier. Never fails.
pub fn classify(text: &str) -> TriageResult {
    let normalised = normalise(text);

    let emergency = find_matches(&normalised, EMERGENCY_KEYWORDS);
    if !emergency.is_empty() {
        tracing::debug!(hits = ?emergency, "classified as emergency");
        return emergency_result(&emergency);
    }

    let urgent = find_matches(&normalised, URGENT_KEYWORDS);
    if !urgent.is_empty() {
        tracing::debug!(hits = ?urgent, "classified as urgent care");
        return urgent_result(text, &urgent);
    }

    let specialties = specialty_matches(&normalised);
    if !specialties.is_empty() {
        tracing::debug!(
            specialty = specialties[0].entry.specialty,
            matched = specialties.len(),
            "classified as doctor visit"
        );
        return specialty_result(&specialties);
    }

    let mild = find_matches(&normalised, MILD_KEYWORDS);
    if !mild.is_empty() {
        tracing::debug!(hits = ?mild, "classified as home care");
        return mild_result(&mild);
    }

    tracing::debug!("no keyword matched; using default tier");
    default_result()
}

/// The emergency answer for a set of matched keywords.
///
/// Shared with the dispatcher's safety net so both paths give the same instruction.
pub(crate) fn emergency_result(hits: &[&str]) -> TriageResult {
    TriageResult {
        urgency: Urgency::Emergency,
        recommendation: EMERGENCY_RECOMMENDATION.into(),
        provider_type: Some(EMERGENCY_PROVIDER.into()),
        confidence: EMERGENCY_SCORE.score(hits.len()),
        possible_conditions: to_strings(&EMERGENCY_CONDITIONS),
        recommended_specialties: recommend_specialties("", Urgency::Emergency),
        follow_up_needed: true,
        red_flags: to_strings(hits),
        self_care_tips: Vec::new(),
        model_used: RULE_BASED_MODEL.into(),
        safety_override: false,
    }
}

fn urgent_result(text: &str, hits: &[&str]) -> TriageResult {
    TriageResult {
        urgency: Urgency::UrgentCare,
        recommendation: URGENT_RECOMMENDATION.into(),
        provider_type: Some(URGENT_PROVIDER.into()),
        confidence: URGENT_SCORE.score(hits.len()),
        possible_conditions: to_strings(&URGENT_CONDITIONS),
        recommended_specialties: recommend_specialties(text, Urgency::UrgentCare),
        follow_up_needed: true,
        red_flags: to_strings(hits),
        self_care_tips: Vec::new(),
        model_used: RULE_BASED_MODEL.into(),
        safety_override: false,
    }
}

fn specialty_result(matches: &[SpecialtyMatch]) -> TriageResult {
    let primary = matches[0].entry;
    // A keyword can sit in more than one table entry; count it once.
    let distinct_hits: BTreeSet<&str> = matches
        .iter()
        .flat_map(|m| m.hits.iter().copied())
        .collect();

    TriageResult {
        urgency: Urgency::DoctorVisit,
        recommendation: format!(
            "Schedule an appointment with {} within the next few days. Your symptoms should be \
             evaluated by a healthcare professional.",
            with_article(primary.provider)
        ),
        provider_type: Some(primary.provider.into()),
        confidence: SPECIALTY_SCORE.score(distinct_hits.len()),
        possible_conditions: to_strings(primary.conditions),
        recommended_specialties: matches
            .iter()
            .take(MAX_RECOMMENDED_SPECIALTIES)
            .map(|m| m.entry.specialty.to_string())
            .collect(),
        follow_up_needed: true,
        red_flags: Vec::new(),
        self_care_tips: Vec::new(),
        model_used: RULE_BASED_MODEL.into(),
        safety_override: false,
    }
}

fn mild_result(hits: &[&str]) -> TriageResult {
    TriageResult {
        urgency: Urgency::HomeCare,
        recommendation: HOME_CARE_RECOMMENDATION.into(),
        provider_type: Some(SELF_CARE_PROVIDER.into()),
        confidence: MILD_SCORE.score(hits.len()),
        possible_conditions: to_strings(&MILD_CONDITIONS),
        recommended_specialties: Vec::new(),
        follow_up_needed: false,
        red_flags: Vec::new(),
        self_care_tips: to_strings(&SELF_CARE_TIPS),
        model_used: RULE_BASED_MODEL.into(),
        safety_override: false,
    }
}

fn default_result() -> TriageResult {
    TriageResult {
        urgency: Urgency::DoctorVisit,
        recommendation: DEFAULT_RECOMMENDATION.into(),
        provider_type: Some(PRIMARY_CARE_PROVIDER.into()),
        confidence: DEFAULT_CONFIDENCE,
        possible_conditions: Vec::new(),
        recommended_specialties: recommend_specialties("", Urgency::DoctorVisit),
        follow_up_needed: true,
        red_flags: Vec::new(),
        self_care_tips: Vec::new(),
        model_used: RULE_BASED_MODEL.into(),
        safety_override: false,
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn with_article(noun: &str) -> String {
    let vowel = noun
        .chars()
        .next()
        .is_some_and(|c| matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o'));
    if vowel {
        format!("an {}", noun)
    } else {
        format!("a {}", noun)
    }
}
