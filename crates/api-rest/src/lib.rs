//! # API REST
//!
//! REST API implementation for the triage service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, request validation)
//!
//! Uses `api-shared` for DTOs and `triage-core` for the triage itself.

#![warn(rust_2018_idioms)]

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    AnalyzeReq, AnalyzeRes, ConversationContinueReq, ConversationRes, ConversationStartReq,
    ConversationStepRes, ExchangeDto, HealthRes, HealthService, QuestionRes,
};
use triage_core::{
    start_conversation, ConversationOutcome, Dispatcher, EnvValues, Exchange, SymptomInput,
    TriageConfig,
};

/// Shortest symptom description, after trimming, the analyze endpoint accepts.
pub const MIN_SYMPTOM_CHARS: usize = 10;

/// Application state shared across REST API handlers
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    pub fn new(cfg: TriageConfig) -> Self {
        Self {
            dispatcher: Arc::new(Dispatcher::new(Arc::new(cfg))),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, analyze, start_conversation_handler, continue_conversation_handler),
    components(schemas(
        HealthRes,
        AnalyzeReq,
        AnalyzeRes,
        ConversationStartReq,
        ConversationContinueReq,
        ConversationRes,
        ConversationStepRes,
        QuestionRes,
        ExchangeDto,
    ))
)]
pub struct ApiDoc;

/// Resolve [`TriageConfig`] from the process environment.
///
/// # Environment Variables
/// - `TRIAGE_USE_AI`: enable the AI analyzer (default: false)
/// - `OPENAI_API_KEY`: AI credential
/// - `TRIAGE_AI_MODEL`: model name (default: "gpt-4o-mini")
/// - `TRIAGE_AI_BASE_URL`: API base URL (default: "https://api.openai.com/v1")
/// - `TRIAGE_AI_TIMEOUT_SECS`: per-call timeout (default: 10)
///
/// # Errors
/// Returns an error if any value is present but invalid.
pub fn config_from_process_env() -> anyhow::Result<TriageConfig> {
    let values = EnvValues {
        use_ai: std::env::var("TRIAGE_USE_AI").ok(),
        api_key: std::env::var("OPENAI_API_KEY").ok(),
        model: std::env::var("TRIAGE_AI_MODEL").ok(),
        api_base_url: std::env::var("TRIAGE_AI_BASE_URL").ok(),
        timeout_secs: std::env::var("TRIAGE_AI_TIMEOUT_SECS").ok(),
    };
    Ok(TriageConfig::from_env_values(values)?)
}

/// Build the REST router, including Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/symptoms/analyze", post(analyze))
        .route(
            "/symptoms/conversation/start",
            post(start_conversation_handler),
        )
        .route(
            "/symptoms/conversation/continue",
            post(continue_conversation_handler),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn new_analysis_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/symptoms/analyze",
    request_body = AnalyzeReq,
    responses(
        (status = 200, description = "Triage result", body = AnalyzeRes),
        (status = 400, description = "Symptom description too short")
    )
)]
/// Triage a symptom description
///
/// Uses the AI analyzer when enabled (per request via `use_ai`, otherwise per server
/// configuration) and falls back to the rule-based classifier on any failure.
///
/// # Errors
/// Returns `400 Bad Request` if the trimmed description is shorter than
/// [`MIN_SYMPTOM_CHARS`] characters.
#[axum::debug_handler]
async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeReq>,
) -> Result<Json<AnalyzeRes>, (StatusCode, &'static str)> {
    let symptoms = req.symptoms.trim();
    if symptoms.chars().count() < MIN_SYMPTOM_CHARS {
        return Err((
            StatusCode::BAD_REQUEST,
            "Please describe your symptoms in at least 10 characters",
        ));
    }

    let mut input = SymptomInput::new(symptoms);
    if let Some(duration) = req.duration.filter(|d| !d.trim().is_empty()) {
        input = input.with_duration(duration.trim());
    }
    if let Some(severity) = req.severity.filter(|s| !s.trim().is_empty()) {
        input = input.with_severity(severity.trim());
    }

    let use_ai = req
        .use_ai
        .unwrap_or_else(|| state.dispatcher.config().use_ai());
    let result = state.dispatcher.analyze_input(&input, use_ai).await;

    tracing::info!(
        urgency = %result.urgency,
        model = %result.model_used,
        safety_override = result.safety_override,
        "symptoms analysed"
    );

    Ok(Json(AnalyzeRes::from_result(
        new_analysis_id(),
        now_rfc3339(),
        result,
    )))
}

#[utoipa::path(
    post,
    path = "/symptoms/conversation/start",
    request_body = ConversationStartReq,
    responses(
        (status = 200, description = "First round of questions", body = ConversationStepRes),
        (status = 400, description = "Initial complaint missing")
    )
)]
/// Start a conversational intake
///
/// # Errors
/// Returns `400 Bad Request` if `initial_complaint` is blank.
#[axum::debug_handler]
async fn start_conversation_handler(
    State(_state): State<AppState>,
    Json(req): Json<ConversationStartReq>,
) -> Result<Json<ConversationStepRes>, (StatusCode, &'static str)> {
    if req.initial_complaint.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "initial_complaint is required"));
    }
    Ok(Json(start_conversation().into()))
}

#[utoipa::path(
    post,
    path = "/symptoms/conversation/continue",
    request_body = ConversationContinueReq,
    responses(
        (status = 200, description = "Next questions or final analysis", body = ConversationRes),
        (status = 400, description = "Invalid step")
    )
)]
/// Continue a conversational intake
///
/// Steps 1 to 3 return the next questions. Step 4 or above triages the compiled answers and
/// echoes the history back as the conversation summary.
///
/// # Errors
/// Returns `400 Bad Request` if `step` is 0.
#[axum::debug_handler]
async fn continue_conversation_handler(
    State(state): State<AppState>,
    Json(req): Json<ConversationContinueReq>,
) -> Result<Json<ConversationRes>, (StatusCode, &'static str)> {
    if req.step == 0 {
        return Err((StatusCode::BAD_REQUEST, "step must be 1 or greater"));
    }

    let history: Vec<Exchange> = req.history.into_iter().map(Exchange::from).collect();
    let use_ai = req
        .use_ai
        .unwrap_or_else(|| state.dispatcher.config().use_ai());

    let res = match state
        .dispatcher
        .continue_conversation(&history, req.step, use_ai)
        .await
    {
        ConversationOutcome::Questions(step) => ConversationRes::questions(step),
        ConversationOutcome::Final(done) => {
            ConversationRes::final_analysis(new_analysis_id(), now_rfc3339(), done)
        }
    };
    Ok(Json(res))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app() -> Router {
        router(AppState::new(TriageConfig::rule_based()))
    }

    async fn post_json(uri: &str, body: serde_json::Value) -> (StatusCode, Vec<u8>) {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let res: HealthRes = serde_json::from_slice(&bytes).unwrap();
        assert!(res.ok);
    }

    #[tokio::test]
    async fn test_analyze_emergency() {
        let (status, body) = post_json(
            "/symptoms/analyze",
            serde_json::json!({ "symptoms": "I have crushing chest pain and can't breathe" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let res: AnalyzeRes = serde_json::from_slice(&body).unwrap();
        assert_eq!(res.urgency, "emergency");
        assert!(res.follow_up_needed);
        assert_eq!(res.model_used, "rule_based");
        assert!(uuid::Uuid::parse_str(&res.analysis_id).is_ok());
        assert!(chrono::DateTime::parse_from_rfc3339(&res.analyzed_at).is_ok());
    }

    #[tokio::test]
    async fn test_analyze_folds_duration_and_severity() {
        let (status, body) = post_json(
            "/symptoms/analyze",
            serde_json::json!({
                "symptoms": "headache that will not go away",
                "duration": "3 days",
                "severity": "moderate",
                "use_ai": true
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        // No analyzer is configured, so `use_ai` falls back to rules.
        let res: AnalyzeRes = serde_json::from_slice(&body).unwrap();
        assert_eq!(res.urgency, "doctor_visit");
        assert_eq!(res.provider_type.as_deref(), Some("Neurologist"));
        assert_eq!(res.model_used, "rule_based");
    }

    #[tokio::test]
    async fn test_analyze_rejects_short_text() {
        let (status, _) = post_json(
            "/symptoms/analyze",
            serde_json::json!({ "symptoms": "   ouch    " }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_conversation_start() {
        let (status, body) = post_json(
            "/symptoms/conversation/start",
            serde_json::json!({ "initial_complaint": "sore throat" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let res: ConversationStepRes = serde_json::from_slice(&body).unwrap();
        assert_eq!(res.step, 1);
        assert_eq!(res.questions.len(), 3);
    }

    #[tokio::test]
    async fn test_conversation_start_requires_complaint() {
        let (status, _) = post_json(
            "/symptoms/conversation/start",
            serde_json::json!({ "initial_complaint": "  " }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_conversation_continue_next_step() {
        let (status, body) = post_json(
            "/symptoms/conversation/continue",
            serde_json::json!({
                "history": [{ "question": "Initial complaint", "answer": "sore throat" }],
                "step": 2
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let res: ConversationRes = serde_json::from_slice(&body).unwrap();
        assert!(!res.is_final);
        assert_eq!(res.next.map(|s| s.step), Some(2));
        assert!(res.analysis.is_none());
    }

    #[tokio::test]
    async fn test_conversation_continue_final() {
        let history = serde_json::json!([
            { "question": "Initial complaint", "answer": "sore throat and earache" },
            { "question": "How long?", "answer": "4 days" }
        ]);
        let (status, body) = post_json(
            "/symptoms/conversation/continue",
            serde_json::json!({ "history": history, "step": 4 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let res: ConversationRes = serde_json::from_slice(&body).unwrap();
        assert!(res.is_final);
        assert_eq!(res.conversation_summary.len(), 2);
        let analysis = res.analysis.unwrap();
        assert_eq!(analysis.urgency, "doctor_visit");
        assert!(analysis
            .recommended_specialties
            .contains(&"ENT".to_string()));
    }

    #[tokio::test]
    async fn test_conversation_continue_rejects_step_zero() {
        let (status, _) = post_json(
            "/symptoms/conversation/continue",
            serde_json::json!({ "history": [], "step": 0 }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_openapi_lists_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/symptoms/analyze",
            "/symptoms/conversation/start",
            "/symptoms/conversation/continue",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{}", path);
        }
    }
}
