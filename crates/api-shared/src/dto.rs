//! Wire types for the triage API.
//!
//! Core types stay free of OpenAPI concerns; everything crossing an API boundary is converted
//! into one of these DTOs first.

use serde::{Deserialize, Serialize};
use triage_core::{ConversationStep, Exchange, FinalAnalysis, Question, TriageResult};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeReq {
    /// Free-text description of the symptoms.
    pub symptoms: String,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    /// Overrides the server's AI toggle for this request.
    #[serde(default)]
    pub use_ai: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeRes {
    pub analysis_id: String,
    /// RFC 3339 timestamp.
    pub analyzed_at: String,
    /// One of `emergency`, `urgent_care`, `doctor_visit`, `home_care`.
    pub urgency: String,
    pub recommendation: String,
    pub provider_type: Option<String>,
    pub confidence: f64,
    pub possible_conditions: Vec<String>,
    pub recommended_specialties: Vec<String>,
    pub follow_up_needed: bool,
    pub red_flags: Vec<String>,
    pub self_care_tips: Vec<String>,
    pub model_used: String,
    pub safety_override: bool,
}

impl AnalyzeRes {
    pub fn from_result(
        analysis_id: impl Into<String>,
        analyzed_at: impl Into<String>,
        result: TriageResult,
    ) -> Self {
        Self {
            analysis_id: analysis_id.into(),
            analyzed_at: analyzed_at.into(),
            urgency: result.urgency.as_str().to_string(),
            recommendation: result.recommendation,
            provider_type: result.provider_type,
            confidence: result.confidence,
            possible_conditions: result.possible_conditions,
            recommended_specialties: result.recommended_specialties,
            follow_up_needed: result.follow_up_needed,
            red_flags: result.red_flags,
            self_care_tips: result.self_care_tips,
            model_used: result.model_used,
            safety_override: result.safety_override,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConversationStartReq {
    pub initial_complaint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QuestionRes {
    pub id: String,
    pub question: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub placeholder: String,
}

impl From<Question> for QuestionRes {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            question: q.question,
            kind: q.kind,
            placeholder: q.placeholder,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConversationStepRes {
    pub step: u8,
    pub step_title: String,
    pub questions: Vec<QuestionRes>,
}

impl From<ConversationStep> for ConversationStepRes {
    fn from(step: ConversationStep) -> Self {
        Self {
            step: step.step,
            step_title: step.step_title,
            questions: step.questions.into_iter().map(QuestionRes::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExchangeDto {
    pub question: String,
    pub answer: String,
}

impl From<ExchangeDto> for Exchange {
    fn from(dto: ExchangeDto) -> Self {
        Exchange::new(dto.question, dto.answer)
    }
}

impl From<Exchange> for ExchangeDto {
    fn from(e: Exchange) -> Self {
        Self {
            question: e.question,
            answer: e.answer,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConversationContinueReq {
    #[serde(default)]
    pub history: Vec<ExchangeDto>,
    /// Step the client is about to show; 4 or above requests the final analysis.
    pub step: u8,
    #[serde(default)]
    pub use_ai: Option<bool>,
}

/// Either the next round of questions or the final analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConversationRes {
    pub is_final: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<ConversationStepRes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalyzeRes>,
    #[serde(default)]
    pub conversation_summary: Vec<ExchangeDto>,
}

impl ConversationRes {
    pub fn questions(step: ConversationStep) -> Self {
        Self {
            is_final: false,
            next: Some(step.into()),
            analysis: None,
            conversation_summary: Vec::new(),
        }
    }

    pub fn final_analysis(
        analysis_id: impl Into<String>,
        analyzed_at: impl Into<String>,
        done: FinalAnalysis,
    ) -> Self {
        Self {
            is_final: true,
            next: None,
            analysis: Some(AnalyzeRes::from_result(
                analysis_id,
                analyzed_at,
                done.result,
            )),
            conversation_summary: done
                .conversation_summary
                .into_iter()
                .map(ExchangeDto::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::{classify, questions_for_step};

    #[test]
    fn test_analyze_res_uses_snake_case_urgency() {
        let res = AnalyzeRes::from_result("id-1", "2026-01-01T00:00:00Z", classify("high fever"));
        assert_eq!(res.urgency, "urgent_care");
        assert_eq!(res.model_used, "rule_based");
        assert_eq!(res.analysis_id, "id-1");
    }

    #[test]
    fn test_analyze_req_optional_fields_default() {
        let req: AnalyzeReq =
            serde_json::from_str(r#"{"symptoms":"sore throat for two days"}"#).unwrap();
        assert!(req.duration.is_none());
        assert!(req.use_ai.is_none());
    }

    #[test]
    fn test_question_kind_serialises_as_type() {
        let step = ConversationStepRes::from(questions_for_step(1));
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["questions"][0]["type"], "text");
        assert_eq!(json["step"], 1);
    }

    #[test]
    fn test_questions_response_omits_analysis() {
        let json = serde_json::to_value(ConversationRes::questions(questions_for_step(2))).unwrap();
        assert_eq!(json["is_final"], false);
        assert!(json.get("analysis").is_none());
        assert_eq!(json["next"]["step"], 2);
    }

    #[test]
    fn test_exchange_round_trip_into_core() {
        let core: Exchange = ExchangeDto {
            question: "Duration".into(),
            answer: "3 days".into(),
        }
        .into();
        assert_eq!(core, Exchange::new("Duration", "3 days"));
    }
}
