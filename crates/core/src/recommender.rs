//! Specialty recommendations for a symptom text and urgency tier.

use crate::constants::{EMERGENCY_SPECIALTY, GENERAL_SPECIALTIES, MAX_RECOMMENDED_SPECIALTIES};
use crate::keywords::{normalise, specialty_matches};
use crate::Urgency;

/// Recommend medical specialties for `text` at the given urgency.
///
/// Emergencies always go to emergency medicine and home care needs no specialist. Otherwise
/// the first [`MAX_RECOMMENDED_SPECIALTIES`] specialties whose vocabulary appears in the text are
/// returned in table order, falling back to general practice when nothing matches.
pub fn recommend_specialties(text: &str, urgency: Urgency) -> Vec<String> {
    match urgency {
        Urgency::Emergency => vec![EMERGENCY_SPECIALTY.to_string()],
        Urgency::HomeCare => Vec::new(),
        Urgency::UrgentCare | Urgency::DoctorVisit => {
            let matched: Vec<String> = specialty_matches(&normalise(text))
                .into_iter()
                .take(MAX_RECOMMENDED_SPECIALTIES)
                .map(|m| m.entry.specialty.to_string())
                .collect();
            if matched.is_empty() {
                GENERAL_SPECIALTIES.iter().map(|s| s.to_string()).collect()
            } else {
                matched
            }
        }
    }
}
