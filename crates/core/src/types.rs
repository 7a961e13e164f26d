//! Triage data model.

use serde::{Deserialize, Serialize};

/// Urgency tier, ordered by decreasing severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Emergency,
    UrgentCare,
    DoctorVisit,
    HomeCare,
}

impl Urgency {
    pub const ALL: [Urgency; 4] = [
        Urgency::Emergency,
        Urgency::UrgentCare,
        Urgency::DoctorVisit,
        Urgency::HomeCare,
    ];

    /// Wire form, e.g. `urgent_care`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Emergency => "emergency",
            Urgency::UrgentCare => "urgent_care",
            Urgency::DoctorVisit => "doctor_visit",
            Urgency::HomeCare => "home_care",
        }
    }

    /// 0 is the most severe tier.
    pub fn severity_rank(&self) -> u8 {
        match self {
            Urgency::Emergency => 0,
            Urgency::UrgentCare => 1,
            Urgency::DoctorVisit => 2,
            Urgency::HomeCare => 3,
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the four urgency tiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown urgency level: {0}")]
pub struct UnknownUrgency(pub String);

impl std::str::FromStr for Urgency {
    type Err = UnknownUrgency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_ascii_lowercase();
        Urgency::ALL
            .into_iter()
            .find(|u| u.as_str() == normalised)
            .ok_or_else(|| UnknownUrgency(s.to_string()))
    }
}

/// Free-text symptom description with optional context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomInput {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
}

impl SymptomInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            duration: None,
            severity: None,
        }
    }

    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    pub fn with_severity(mut self, severity: impl Into<String>) -> Self {
        self.severity = Some(severity.into());
        self
    }

    /// Fold the context fields into a single description.
    ///
    /// Blank context fields are omitted, e.g. `"headache. Duration: 3 days"`.
    pub fn description(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        let text = self.text.trim();
        if !text.is_empty() {
            parts.push(text.to_string());
        }
        if let Some(duration) = self.duration.as_deref().map(str::trim) {
            if !duration.is_empty() {
                parts.push(format!("Duration: {}", duration));
            }
        }
        if let Some(severity) = self.severity.as_deref().map(str::trim) {
            if !severity.is_empty() {
                parts.push(format!("Severity: {}", severity));
            }
        }
        parts.join(". ")
    }
}

/// Outcome of a single triage request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageResult {
    pub urgency: Urgency,
    pub recommendation: String,
    pub provider_type: Option<String>,
    /// Tier confidence in `[0.0, 1.0]`. Not a probability.
    pub confidence: f64,
    /// Most likely first.
    pub possible_conditions: Vec<String>,
    pub recommended_specialties: Vec<String>,
    pub follow_up_needed: bool,
    pub red_flags: Vec<String>,
    /// Only populated for `home_care`.
    pub self_care_tips: Vec<String>,
    /// `rule_based` or the AI model that produced the result.
    pub model_used: String,
    /// Set when an AI result was escalated to `emergency` by the safety net.
    pub safety_override: bool,
}
