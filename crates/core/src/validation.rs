//! Validation of AI completions.
//!
//! The AI service is asked for a JSON object; nothing about its answer is trusted until it has
//! been checked here. Any rejection is reported as an [`AnalyzerError`] and handled by the
//! dispatcher exactly like a transport failure.

use crate::constants::{MAX_POSSIBLE_CONDITIONS, MIN_POSSIBLE_CONDITIONS};
use crate::{AnalyzerError, AnalyzerResult, TriageResult, Urgency};
use serde::Deserialize;

/// Shape of the JSON object requested from the AI service.
///
/// Every field is optional at the serde level so a missing field is reported by name rather
/// than as an opaque decode error.
#[derive(Debug, Default, Deserialize)]
pub struct AiPayload {
    #[serde(alias = "urgency")]
    pub urgency_level: Option<String>,
    pub recommendation: Option<String>,
    #[serde(alias = "provider_type")]
    pub recommended_provider_type: Option<String>,
    pub possible_conditions: Option<Vec<String>>,
    #[serde(alias = "confidence")]
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub self_care_tips: Vec<String>,
    #[serde(default)]
    pub red_flags: Vec<String>,
    #[serde(default)]
    pub recommended_specialties: Vec<String>,
}

/// Parse and validate the raw completion text returned by the AI service.
pub fn parse_completion(content: &str, model: &str) -> AnalyzerResult<TriageResult> {
    let payload: AiPayload =
        serde_json::from_str(content.trim()).map_err(AnalyzerError::MalformedPayload)?;
    validate_payload(payload, model)
}

/// Check a decoded payload and convert it into a [`TriageResult`].
pub fn validate_payload(payload: AiPayload, model: &str) -> AnalyzerResult<TriageResult> {
    let urgency_raw = payload
        .urgency_level
        .ok_or(AnalyzerError::MissingField("urgency_level"))?;
    let urgency = urgency_raw
        .parse::<Urgency>()
        .map_err(|e| AnalyzerError::InvalidPayload(e.to_string()))?;

    let recommendation = payload
        .recommendation
        .ok_or(AnalyzerError::MissingField("recommendation"))?;
    if recommendation.trim().is_empty() {
        return Err(AnalyzerError::InvalidPayload(
            "recommendation cannot be empty".into(),
        ));
    }

    let confidence = payload
        .confidence_score
        .ok_or(AnalyzerError::MissingField("confidence_score"))?;
    if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
        return Err(AnalyzerError::InvalidPayload(format!(
            "confidence_score {} outside [0.0, 1.0]",
            confidence
        )));
    }

    let mut possible_conditions = clean_list(
        payload
            .possible_conditions
            .ok_or(AnalyzerError::MissingField("possible_conditions"))?,
    );
    if possible_conditions.len() < MIN_POSSIBLE_CONDITIONS {
        return Err(AnalyzerError::InvalidPayload(format!(
            "expected at least {} possible conditions, got {}",
            MIN_POSSIBLE_CONDITIONS,
            possible_conditions.len()
        )));
    }
    possible_conditions.truncate(MAX_POSSIBLE_CONDITIONS);

    let self_care_tips = if urgency == Urgency::HomeCare {
        clean_list(payload.self_care_tips)
    } else {
        Vec::new()
    };

    Ok(TriageResult {
        urgency,
        recommendation: recommendation.trim().to_string(),
        provider_type: payload
            .recommended_provider_type
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty()),
        confidence,
        possible_conditions,
        recommended_specialties: dedup(clean_list(payload.recommended_specialties)),
        follow_up_needed: urgency != Urgency::HomeCare,
        red_flags: clean_list(payload.red_flags),
        self_care_tips,
        model_used: model.to_string(),
        safety_override: false,
    })
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn dedup(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = "gpt-4o-mini";

    fn valid_json() -> serde_json::Value {
        serde_json::json!({
            "urgency_level": "doctor_visit",
            "recommendation": "See a neurologist this week.",
            "recommended_provider_type": "Neurologist",
            "possible_conditions": ["Migraine", "Tension headache", "Sinusitis"],
            "confidence_score": 0.8,
            "self_care_tips": ["Rest in a dark room"],
            "red_flags": []
        })
    }

    fn parse(value: serde_json::Value) -> AnalyzerResult<TriageResult> {
        parse_completion(&value.to_string(), MODEL)
    }

    #[test]
    fn test_valid_payload_converts() {
        let result = parse(valid_json()).unwrap();

        assert_eq!(result.urgency, Urgency::DoctorVisit);
        assert_eq!(result.provider_type.as_deref(), Some("Neurologist"));
        assert_eq!(result.possible_conditions.len(), 3);
        assert!(result.follow_up_needed);
        // Tips are only kept for home care.
        assert!(result.self_care_tips.is_empty());
        assert_eq!(result.model_used, MODEL);
        assert!(!result.safety_override);
    }

    #[test]
    fn test_home_care_keeps_tips_and_skips_follow_up() {
        let mut json = valid_json();
        json["urgency_level"] = "home_care".into();
        let result = parse(json).unwrap();

        assert_eq!(result.self_care_tips, vec!["Rest in a dark room"]);
        assert!(!result.follow_up_needed);
    }

    #[test]
    fn test_short_field_aliases_accepted() {
        let json = serde_json::json!({
            "urgency": "urgent_care",
            "recommendation": "Go today.",
            "confidence": 0.7,
            "possible_conditions": ["A", "B", "C"]
        });
        let result = parse(json).unwrap();
        assert_eq!(result.urgency, Urgency::UrgentCare);
        assert!(result.provider_type.is_none());
    }

    #[test]
    fn test_missing_fields_rejected() {
        for field in [
            "urgency_level",
            "recommendation",
            "confidence_score",
            "possible_conditions",
        ] {
            let mut json = valid_json();
            json.as_object_mut().unwrap().remove(field);
            match parse(json) {
                Err(AnalyzerError::MissingField(name)) => assert_eq!(name, field),
                other => panic!("expected MissingField({}), got {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_unknown_urgency_rejected() {
        let mut json = valid_json();
        json["urgency_level"] = "critical".into();
        assert!(matches!(parse(json), Err(AnalyzerError::InvalidPayload(_))));
    }

    #[test]
    fn test_confidence_out_of_range_rejected() {
        for bad in [1.5, -0.1] {
            let mut json = valid_json();
            json["confidence_score"] = bad.into();
            assert!(matches!(parse(json), Err(AnalyzerError::InvalidPayload(_))));
        }
    }

    #[test]
    fn test_condition_count_enforced() {
        let mut json = valid_json();
        json["possible_conditions"] = serde_json::json!(["Migraine", " "]);
        assert!(matches!(parse(json), Err(AnalyzerError::InvalidPayload(_))));

        let mut json = valid_json();
        json["possible_conditions"] = serde_json::json!(["a", "b", "c", "d", "e", "f", "g"]);
        let result = parse(json).unwrap();
        assert_eq!(result.possible_conditions, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_non_json_rejected() {
        assert!(matches!(
            parse_completion("I think you should see a doctor", MODEL),
            Err(AnalyzerError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_wrong_types_rejected() {
        let mut json = valid_json();
        json["confidence_score"] = "high".into();
        assert!(matches!(parse(json), Err(AnalyzerError::MalformedPayload(_))));
    }
}
