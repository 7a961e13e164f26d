//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the dispatcher. The
//! core never reads process-wide environment variables itself, so request handling and tests
//! behave the same regardless of the ambient environment.

use crate::constants::{DEFAULT_AI_BASE_URL, DEFAULT_AI_MODEL, DEFAULT_AI_TIMEOUT_SECS};
use crate::{ConfigError, ConfigResult};
use std::time::Duration;

/// Triage configuration resolved at startup.
#[derive(Clone)]
pub struct TriageConfig {
    use_ai: bool,
    api_key: Option<String>,
    model: String,
    api_base_url: String,
    timeout: Duration,
}

impl std::fmt::Debug for TriageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriageConfig")
            .field("use_ai", &self.use_ai)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("api_base_url", &self.api_base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl TriageConfig {
    /// Create a new `TriageConfig`.
    ///
    /// A blank `api_key` is treated as absent.
    pub fn new(
        use_ai: bool,
        api_key: Option<String>,
        model: String,
        api_base_url: String,
        timeout: Duration,
    ) -> ConfigResult<Self> {
        if model.trim().is_empty() {
            return Err(ConfigError::InvalidInput("model cannot be empty".into()));
        }
        if api_base_url.trim().is_empty() {
            return Err(ConfigError::InvalidInput(
                "api_base_url cannot be empty".into(),
            ));
        }
        if timeout.is_zero() {
            return Err(ConfigError::InvalidInput(
                "timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            use_ai,
            api_key: api_key
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            model: model.trim().to_string(),
            api_base_url: api_base_url.trim().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Rule-based only: AI off, no credential, defaults everywhere else.
    pub fn rule_based() -> Self {
        Self {
            use_ai: false,
            api_key: None,
            model: DEFAULT_AI_MODEL.into(),
            api_base_url: DEFAULT_AI_BASE_URL.into(),
            timeout: Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS),
        }
    }

    /// Build a configuration from raw environment values.
    ///
    /// Callers pass `std::env::var(..).ok()` for each variable; absent or blank values fall
    /// back to the defaults.
    pub fn from_env_values(values: EnvValues) -> ConfigResult<Self> {
        let use_ai = parse_bool("TRIAGE_USE_AI", values.use_ai)?.unwrap_or(false);
        let model = non_blank(values.model).unwrap_or_else(|| DEFAULT_AI_MODEL.into());
        let api_base_url =
            non_blank(values.api_base_url).unwrap_or_else(|| DEFAULT_AI_BASE_URL.into());
        let timeout_secs = non_blank(values.timeout_secs)
            .map(|v| v.parse::<u64>())
            .transpose()
            .map_err(ConfigError::InvalidTimeout)?
            .unwrap_or(DEFAULT_AI_TIMEOUT_SECS);

        Self::new(
            use_ai,
            values.api_key,
            model,
            api_base_url,
            Duration::from_secs(timeout_secs),
        )
    }

    pub fn use_ai(&self) -> bool {
        self.use_ai
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// True when the AI toggle is on and a credential is present.
    pub fn ai_enabled(&self) -> bool {
        self.use_ai && self.api_key.is_some()
    }
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self::rule_based()
    }
}

/// Raw environment values consumed by [`TriageConfig::from_env_values`].
#[derive(Debug, Default, Clone)]
pub struct EnvValues {
    /// `TRIAGE_USE_AI`
    pub use_ai: Option<String>,
    /// `OPENAI_API_KEY`
    pub api_key: Option<String>,
    /// `TRIAGE_AI_MODEL`
    pub model: Option<String>,
    /// `TRIAGE_AI_BASE_URL`
    pub api_base_url: Option<String>,
    /// `TRIAGE_AI_TIMEOUT_SECS`
    pub timeout_secs: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bool(name: &'static str, value: Option<String>) -> ConfigResult<Option<bool>> {
    let Some(value) = non_blank(value) else {
        return Ok(None);
    };
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::InvalidBool { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_env_is_empty() {
        let cfg = TriageConfig::from_env_values(EnvValues::default()).unwrap();

        assert!(!cfg.use_ai());
        assert!(cfg.api_key().is_none());
        assert!(!cfg.ai_enabled());
        assert_eq!(cfg.model(), DEFAULT_AI_MODEL);
        assert_eq!(cfg.api_base_url(), DEFAULT_AI_BASE_URL);
        assert_eq!(cfg.timeout(), Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS));
    }

    #[test]
    fn test_ai_enabled_requires_credential() {
        let cfg = TriageConfig::from_env_values(EnvValues {
            use_ai: Some("True".into()),
            api_key: Some("   ".into()),
            ..Default::default()
        })
        .unwrap();

        assert!(cfg.use_ai());
        assert!(!cfg.ai_enabled());

        let cfg = TriageConfig::from_env_values(EnvValues {
            use_ai: Some("true".into()),
            api_key: Some("sk-test".into()),
            model: Some("gpt-4o".into()),
            api_base_url: Some("http://localhost:8080/v1/".into()),
            timeout_secs: Some("3".into()),
        })
        .unwrap();

        assert!(cfg.ai_enabled());
        assert_eq!(cfg.model(), "gpt-4o");
        assert_eq!(cfg.api_base_url(), "http://localhost:8080/v1");
        assert_eq!(cfg.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_rejects_bad_values() {
        let result = TriageConfig::from_env_values(EnvValues {
            use_ai: Some("maybe".into()),
            ..Default::default()
        });
        assert!(matches!(result, Err(ConfigError::InvalidBool { .. })));

        let result = TriageConfig::from_env_values(EnvValues {
            timeout_secs: Some("ten".into()),
            ..Default::default()
        });
        assert!(matches!(result, Err(ConfigError::InvalidTimeout(_))));

        let result = TriageConfig::from_env_values(EnvValues {
            timeout_secs: Some("0".into()),
            ..Default::default()
        });
        assert!(matches!(result, Err(ConfigError::InvalidInput(_))));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let cfg = TriageConfig::new(
            true,
            Some("sk-secret".into()),
            DEFAULT_AI_MODEL.into(),
            DEFAULT_AI_BASE_URL.into(),
            Duration::from_secs(1),
        )
        .unwrap();

        let rendered = format!("{:?}", cfg);
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
