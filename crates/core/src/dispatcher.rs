//! Hybrid dispatcher: AI first, rule-based fallback, safety net on top.
//!
//! `analyze` never fails. Exactly one source produces each result: a validated AI answer, or
//! the classifier's answer when the AI path is disabled or fails for any reason.

use crate::analyzer::{OpenAiAnalyzer, PrimaryAnalyzer};
use crate::classifier::{classify, emergency_result};
use crate::constants::SAFETY_OVERRIDE_CONFIDENCE_FACTOR;
use crate::conversation::{
    compile_answers, compile_description, questions_for_step, ConversationOutcome, Exchange,
    FinalAnalysis, FINAL_STEP,
};
use crate::keywords::emergency_matches;
use crate::recommender::recommend_specialties;
use crate::{AnalyzerError, SymptomInput, TriageConfig, TriageResult, Urgency};
use std::sync::Arc;

/// Entry point for symptom triage.
///
/// Holds no per-request state; share it behind an `Arc` across request handlers.
#[derive(Clone)]
pub struct Dispatcher {
    cfg: Arc<TriageConfig>,
    analyzer: Option<Arc<dyn PrimaryAnalyzer>>,
}

impl Dispatcher {
    /// Create a dispatcher from configuration.
    ///
    /// The AI analyzer is only built when the toggle is on and a credential is present. If it
    /// cannot be built the dispatcher runs rule-based only.
    pub fn new(cfg: Arc<TriageConfig>) -> Self {
        let analyzer: Option<Arc<dyn PrimaryAnalyzer>> = if cfg.ai_enabled() {
            match OpenAiAnalyzer::from_config(&cfg) {
                Ok(analyzer) => {
                    tracing::info!(model = cfg.model(), "AI analyzer initialised");
                    Some(Arc::new(analyzer))
                }
                Err(e) => {
                    tracing::warn!("AI analyzer initialisation failed: {}; using rule-based", e);
                    None
                }
            }
        } else {
            if cfg.use_ai() {
                tracing::info!("no AI credential configured; using rule-based analysis");
            }
            None
        };

        Self { cfg, analyzer }
    }

    /// Create a dispatcher around an explicit analyzer.
    pub fn with_analyzer(cfg: Arc<TriageConfig>, analyzer: Arc<dyn PrimaryAnalyzer>) -> Self {
        Self {
            cfg,
            analyzer: Some(analyzer),
        }
    }

    pub fn config(&self) -> &TriageConfig {
        &self.cfg
    }

    /// True when an AI analyzer is available to this dispatcher.
    pub fn ai_available(&self) -> bool {
        self.analyzer.is_some()
    }

    /// Triage `text`, trying the AI analyzer first when `use_ai` is set.
    pub async fn analyze(&self, text: &str, use_ai: bool) -> TriageResult {
        self.analyze_split(text, text, use_ai).await
    }

    /// Send `prompt` to the AI analyzer while keyword rules only look at `patient_text`.
    async fn analyze_split(
        &self,
        prompt: &str,
        patient_text: &str,
        use_ai: bool,
    ) -> TriageResult {
        let analyzer = match (&self.analyzer, use_ai) {
            (Some(analyzer), true) => analyzer,
            _ => return classify(patient_text),
        };

        match self.try_analyzer(&**analyzer, prompt).await {
            Ok(result) => apply_safety_net(patient_text, with_specialties(patient_text, result)),
            Err(e) => {
                tracing::warn!("AI analysis failed: {}; using rule-based fallback", e);
                classify(patient_text)
            }
        }
    }

    /// Triage a [`SymptomInput`], folding its context fields into the text first.
    pub async fn analyze_input(&self, input: &SymptomInput, use_ai: bool) -> TriageResult {
        self.analyze(&input.description(), use_ai).await
    }

    /// Advance a conversational intake.
    ///
    /// Steps before [`FINAL_STEP`] return the next questions; from the final step on, the
    /// history is analysed. The AI sees each question with its answer, the keyword rules see
    /// the answers alone.
    pub async fn continue_conversation(
        &self,
        history: &[Exchange],
        step: u8,
        use_ai: bool,
    ) -> ConversationOutcome {
        if step < FINAL_STEP {
            return ConversationOutcome::Questions(questions_for_step(step));
        }

        let prompt = compile_description(history);
        let answers = compile_answers(history);
        let result = self.analyze_split(&prompt, &answers, use_ai).await;
        ConversationOutcome::Final(FinalAnalysis {
            result,
            conversation_summary: history.to_vec(),
        })
    }

    async fn try_analyzer(
        &self,
        analyzer: &dyn PrimaryAnalyzer,
        text: &str,
    ) -> Result<TriageResult, AnalyzerError> {
        let timeout = self.cfg.timeout();
        match tokio::time::timeout(timeout, analyzer.analyze(text)).await {
            Ok(result) => result,
            Err(_) => Err(AnalyzerError::Timeout(timeout)),
        }
    }
}

fn with_specialties(text: &str, mut result: TriageResult) -> TriageResult {
    if result.recommended_specialties.is_empty() && result.urgency != Urgency::HomeCare {
        result.recommended_specialties = recommend_specialties(text, result.urgency);
    }
    result
}

/// Force `result` to emergency when `text` carries an emergency keyword.
///
/// Results that are already emergencies pass through unchanged. An override keeps the source
/// model, lowers the confidence and marks `safety_override`.
pub fn apply_safety_net(text: &str, result: TriageResult) -> TriageResult {
    let hits = emergency_matches(text);
    let already_emergency =
        result.urgency.severity_rank() <= Urgency::Emergency.severity_rank();
    if hits.is_empty() || already_emergency {
        return result;
    }

    tracing::warn!(
        model = %result.model_used,
        reported = %result.urgency,
        keywords = ?hits,
        "emergency keywords present; overriding AI urgency to emergency"
    );

    let mut red_flags = result.red_flags;
    for hit in &hits {
        if !red_flags.iter().any(|f| f == hit) {
            red_flags.push(hit.to_string());
        }
    }

    let template = emergency_result(&hits);
    TriageResult {
        urgency: Urgency::Emergency,
        recommendation: template.recommendation,
        provider_type: template.provider_type,
        confidence: (result.confidence * SAFETY_OVERRIDE_CONFIDENCE_FACTOR).clamp(0.0, 1.0),
        possible_conditions: result.possible_conditions,
        recommended_specialties: template.recommended_specialties,
        follow_up_needed: true,
        red_flags,
        self_care_tips: Vec::new(),
        model_used: result.model_used,
        safety_override: true,
    }
}
