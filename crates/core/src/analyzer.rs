//! Primary (AI) analyzer.
//!
//! The [`PrimaryAnalyzer`] trait is the seam the dispatcher depends on. [`OpenAiAnalyzer`] is
//! the production implementation: a single call to an OpenAI-compatible chat-completions
//! endpoint, asking for a JSON object that is then checked by [`crate::validation`].

use crate::constants::{AI_MAX_TOKENS, AI_TEMPERATURE};
use crate::validation::parse_completion;
use crate::{AnalyzerError, AnalyzerResult, TriageConfig, TriageResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Fixed instruction sent with every request.
pub const SYSTEM_PROMPT: &str = r#"You are a medical triage AI assistant. Analyze patient symptoms and provide:
1. Urgency level (emergency/urgent_care/doctor_visit/home_care)
2. Brief recommendation
3. Recommended provider type
4. Possible conditions (3-5 most likely, most likely first)
5. Confidence score (0.0-1.0)
6. Self-care tips if applicable

CRITICAL SAFETY RULES:
- If symptoms suggest emergency (chest pain, difficulty breathing, severe bleeding, stroke signs, loss of consciousness), ALWAYS classify as 'emergency'
- Err on the side of caution - when in doubt, escalate urgency level
- Never diagnose - only suggest possibilities
- Always recommend professional medical evaluation for concerning symptoms

Respond in JSON format:
{
  "urgency_level": "emergency|urgent_care|doctor_visit|home_care",
  "recommendation": "specific recommendation text",
  "recommended_provider_type": "Emergency Room|Urgent Care|Specialist Name|Primary Care|Self-care",
  "possible_conditions": ["condition1", "condition2", "condition3"],
  "confidence_score": 0.85,
  "self_care_tips": ["tip1", "tip2"],
  "red_flags": ["flag1", "flag2"],
  "recommended_specialties": ["Specialty1"]
}"#;

/// Something that can turn a symptom description into a structured result, or fail.
#[async_trait]
pub trait PrimaryAnalyzer: Send + Sync {
    /// Model label recorded on successful results.
    fn model(&self) -> &str;

    /// One attempt, no retries.
    async fn analyze(&self, description: &str) -> AnalyzerResult<TriageResult>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat-completions API.
pub struct OpenAiAnalyzer {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAiAnalyzer {
    /// Build an analyzer from configuration.
    ///
    /// # Errors
    /// Returns `MissingCredential` when no API key is configured, or `ClientBuild` when the
    /// HTTP client cannot be constructed.
    pub fn from_config(cfg: &TriageConfig) -> AnalyzerResult<Self> {
        let api_key = cfg
            .api_key()
            .ok_or(AnalyzerError::MissingCredential)?
            .to_string();
        let http_client = reqwest::Client::builder()
            .timeout(cfg.timeout())
            .build()
            .map_err(AnalyzerError::ClientBuild)?;

        Ok(Self {
            http_client,
            api_key,
            model: cfg.model().to_string(),
            endpoint: format!("{}/chat/completions", cfg.api_base_url()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_body<'a>(&'a self, user_prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: AI_TEMPERATURE,
            max_tokens: AI_MAX_TOKENS,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        }
    }
}

#[async_trait]
impl PrimaryAnalyzer for OpenAiAnalyzer {
    fn model(&self) -> &str {
        &self.model
    }

    async fn analyze(&self, description: &str) -> AnalyzerResult<TriageResult> {
        let user_prompt = format!("Patient symptoms: {}", description);
        let start = Instant::now();

        tracing::info!(model = %self.model, chars = description.len(), "AI triage request");

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(&user_prompt))
            .send()
            .await
            .map_err(AnalyzerError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalyzerError::Status { status, body });
        }

        let chat: ChatResponse = response.json().await.map_err(AnalyzerError::Envelope)?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(AnalyzerError::EmptyCompletion)?;

        tracing::info!(
            model = %self.model,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "AI triage response received"
        );

        parse_completion(&content, &self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn cfg(api_key: Option<&str>) -> TriageConfig {
        TriageConfig::new(
            true,
            api_key.map(String::from),
            "gpt-4o-mini".into(),
            "http://127.0.0.1:9/v1/".into(),
            Duration::from_millis(200),
        )
        .unwrap()
    }

    #[test]
    fn test_requires_credential() {
        assert!(matches!(
            OpenAiAnalyzer::from_config(&cfg(None)),
            Err(AnalyzerError::MissingCredential)
        ));
    }

    #[test]
    fn test_endpoint_and_model_from_config() {
        let analyzer = OpenAiAnalyzer::from_config(&cfg(Some("sk-test"))).unwrap();
        assert_eq!(analyzer.endpoint(), "http://127.0.0.1:9/v1/chat/completions");
        assert_eq!(analyzer.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_request_body_shape() {
        let analyzer = OpenAiAnalyzer::from_config(&cfg(Some("sk-test"))).unwrap();
        let body = serde_json::to_value(analyzer.request_body("Patient symptoms: cough")).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Patient symptoms: cough");
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["max_tokens"], 800);
    }

    #[test]
    fn test_system_prompt_names_every_tier() {
        for tier in crate::Urgency::ALL {
            assert!(SYSTEM_PROMPT.contains(tier.as_str()));
        }
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        // Port 9 (discard) is not expected to be serving HTTP locally.
        let analyzer = OpenAiAnalyzer::from_config(&cfg(Some("sk-test"))).unwrap();
        let result = analyzer.analyze("headache").await;
        assert!(matches!(result, Err(AnalyzerError::Transport(_))));
    }
}
