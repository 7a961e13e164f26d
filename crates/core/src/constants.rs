//! Constants used throughout the triage core crate.
//!
//! Fixed recommendation texts, provider labels and confidence parameters live here so the
//! classifier, the dispatcher and the tests agree on them.

/// Model label recorded on results produced by the rule-based classifier.
pub const RULE_BASED_MODEL: &str = "rule_based";

/// Default model requested from the AI service when none is configured.
pub const DEFAULT_AI_MODEL: &str = "gpt-4o-mini";

/// Default base URL of the OpenAI-compatible chat-completions API.
pub const DEFAULT_AI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default timeout, in seconds, for the single AI attempt.
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 10;

/// Sampling temperature for the AI request. Kept low for consistent advice.
pub const AI_TEMPERATURE: f32 = 0.3;

/// Token ceiling for the AI response.
pub const AI_MAX_TOKENS: u32 = 800;

pub const EMERGENCY_RECOMMENDATION: &str =
    "Call emergency services or go to the ER immediately. Do not drive yourself.";

pub const URGENT_RECOMMENDATION: &str =
    "Visit urgent care or ER today. Your symptoms require prompt medical attention.";

pub const HOME_CARE_RECOMMENDATION: &str = "Rest, stay hydrated, and monitor your symptoms. \
Over-the-counter medications may help relieve symptoms. Seek medical attention if symptoms \
worsen or persist for more than 7 days.";

pub const DEFAULT_RECOMMENDATION: &str = "Consult a general practitioner so your symptoms can \
be evaluated by a healthcare professional within the next few days.";

pub const EMERGENCY_PROVIDER: &str = "Emergency Room";
pub const URGENT_PROVIDER: &str = "Urgent Care";
pub const SELF_CARE_PROVIDER: &str = "Self-care";
pub const PRIMARY_CARE_PROVIDER: &str = "Primary Care Physician";

/// Specialty recommended for every emergency.
pub const EMERGENCY_SPECIALTY: &str = "Emergency Medicine";

/// Specialties recommended when no keyword points anywhere more specific.
pub const GENERAL_SPECIALTIES: [&str; 2] = ["Family Medicine", "Internal Medicine"];

/// Most specialties the recommender returns.
pub const MAX_RECOMMENDED_SPECIALTIES: usize = 3;

/// Lower and upper bounds on the number of possible conditions reported.
pub const MIN_POSSIBLE_CONDITIONS: usize = 3;
pub const MAX_POSSIBLE_CONDITIONS: usize = 5;

/// Factor applied to an AI confidence when the safety net overrides its urgency.
pub const SAFETY_OVERRIDE_CONFIDENCE_FACTOR: f64 = 0.75;

/// Linear, capped confidence curve for one classifier tier.
///
/// `score(hits) = min(base + step * (hits - 1), cap)`, clamped to `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierScore {
    pub base: f64,
    pub step: f64,
    pub cap: f64,
}

impl TierScore {
    pub const fn new(base: f64, step: f64, cap: f64) -> Self {
        Self { base, step, cap }
    }

    /// Confidence for `hits` distinct keyword matches. Zero hits scores as one.
    pub fn score(&self, hits: usize) -> f64 {
        let extra = hits.saturating_sub(1) as f64;
        (self.base + self.step * extra).min(self.cap).clamp(0.0, 1.0)
    }
}

pub const EMERGENCY_SCORE: TierScore = TierScore::new(0.90, 0.02, 0.98);
pub const URGENT_SCORE: TierScore = TierScore::new(0.70, 0.05, 0.85);
pub const SPECIALTY_SCORE: TierScore = TierScore::new(0.60, 0.05, 0.85);
pub const MILD_SCORE: TierScore = TierScore::new(0.55, 0.05, 0.70);
pub const DEFAULT_CONFIDENCE: f64 = 0.40;
