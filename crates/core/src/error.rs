/// Failures of the primary (AI) analyzer.
///
/// None of these ever reach a caller of the dispatcher; each one triggers the rule-based
/// fallback.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("no AI credential configured")]
    MissingCredential,
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("AI request failed: {0}")]
    Transport(reqwest::Error),
    #[error("AI request timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("AI service returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("failed to decode AI response envelope: {0}")]
    Envelope(reqwest::Error),
    #[error("AI response contained no completion")]
    EmptyCompletion,
    #[error("AI completion is not valid JSON: {0}")]
    MalformedPayload(serde_json::Error),
    #[error("AI payload missing required field `{0}`")]
    MissingField(&'static str),
    #[error("invalid AI payload: {0}")]
    InvalidPayload(String),
}

pub type AnalyzerResult<T> = std::result::Result<T, AnalyzerError>;

/// Errors raised while resolving configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    InvalidInput(String),
    #[error("invalid boolean for {name}: {value}")]
    InvalidBool { name: &'static str, value: String },
    #[error("invalid timeout seconds: {0}")]
    InvalidTimeout(std::num::ParseIntError),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
