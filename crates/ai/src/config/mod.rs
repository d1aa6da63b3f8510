use crate::provider::{AiProvider, OpenAICompatibleProvider};
use mailgenie_core::error::Result;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_MODEL: &str = "MAILGENIE_MODEL";
pub const ENV_DETECT_MODEL: &str = "MAILGENIE_DETECT_MODEL";
pub const ENV_HTTP_TIMEOUT: &str = "MAILGENIE_HTTP_TIMEOUT_SECS";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_DETECT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

pub const API_KEY_PREFIX: &str = "sk-";

/// Values shipped in sample env files that must not count as a real key.
const PLACEHOLDER_KEYS: &[&str] = &[
    "your_openai_api_key_here",
    "sk-your_actual_openai_api_key_here",
];

/// True only for a key that could plausibly authenticate against the backend.
pub fn is_generation_backend_configured(api_key: Option<&str>) -> bool {
    match api_key.map(str::trim) {
        Some(key) if !key.is_empty() => {
            !PLACEHOLDER_KEYS.contains(&key) && key.starts_with(API_KEY_PREFIX)
        }
        _ => false,
    }
}

#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub detect_model: String,
    pub http_timeout: Duration,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            detect_model: DEFAULT_DETECT_MODEL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl AiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let http_timeout = match lookup(ENV_HTTP_TIMEOUT) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!("Ignoring invalid {}={:?}", ENV_HTTP_TIMEOUT, raw);
                    defaults.http_timeout
                }
            },
            None => defaults.http_timeout,
        };

        Self {
            api_key: lookup(ENV_API_KEY)
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            base_url: lookup(ENV_BASE_URL)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.base_url),
            model: lookup(ENV_MODEL)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.model),
            detect_model: lookup(ENV_DETECT_MODEL)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.detect_model),
            http_timeout,
        }
    }

    pub fn is_configured(&self) -> bool {
        is_generation_backend_configured(self.api_key.as_deref())
    }

    /// Builds the live backend, or `None` when no usable key is configured.
    pub fn build_provider(&self) -> Result<Option<Arc<dyn AiProvider>>> {
        if !self.is_configured() {
            info!("Generation backend not configured; replies will use fallback templates");
            return Ok(None);
        }

        let provider = OpenAICompatibleProvider::new(
            self.base_url.clone(),
            self.api_key.clone(),
            Some(self.model.clone()),
            self.http_timeout,
        )?;
        info!(base_url = %self.base_url, model = %self.model, "Initialized generation backend");
        Ok(Some(Arc::new(provider)))
    }

    pub fn report(&self) -> ConfigReport {
        ConfigReport::from_key(self.api_key.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ApiKeyFormat {
    ValidFormat,
    InvalidFormat,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigReport {
    pub configured: bool,
    pub api_key_present: bool,
    pub api_key_format: ApiKeyFormat,
    pub message: String,
}

impl ConfigReport {
    pub fn from_key(api_key: Option<&str>) -> Self {
        let configured = is_generation_backend_configured(api_key);
        let api_key_format = match api_key {
            None => ApiKeyFormat::Missing,
            Some(key) if key.trim().starts_with(API_KEY_PREFIX) => ApiKeyFormat::ValidFormat,
            Some(_) => ApiKeyFormat::InvalidFormat,
        };

        let message = if configured {
            "Generation backend is properly configured".to_string()
        } else {
            format!(
                "API key is missing or invalid. Set a valid {} to enable AI-generated replies.",
                ENV_API_KEY
            )
        };

        Self {
            configured,
            api_key_present: api_key.is_some(),
            api_key_format,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_backend_configured_rules() {
        assert!(is_generation_backend_configured(Some("sk-abc123")));
        assert!(!is_generation_backend_configured(None));
        assert!(!is_generation_backend_configured(Some("")));
        assert!(!is_generation_backend_configured(Some("   ")));
        assert!(!is_generation_backend_configured(Some("your_openai_api_key_here")));
        assert!(!is_generation_backend_configured(Some(
            "sk-your_actual_openai_api_key_here"
        )));
        assert!(!is_generation_backend_configured(Some("pk-abc123")));
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = AiConfig::from_lookup(lookup_from(&[]));
        assert!(config.api_key.is_none());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.detect_model, DEFAULT_DETECT_MODEL);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert!(!config.is_configured());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = AiConfig::from_lookup(lookup_from(&[
            (ENV_API_KEY, "sk-live"),
            (ENV_BASE_URL, "http://localhost:8000/v1"),
            (ENV_MODEL, "llama3"),
            (ENV_HTTP_TIMEOUT, "5"),
        ]));
        assert!(config.is_configured());
        assert_eq!(config.base_url, "http://localhost:8000/v1");
        assert_eq!(config.model, "llama3");
        assert_eq!(config.detect_model, DEFAULT_DETECT_MODEL);
        assert_eq!(config.http_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_api_key_is_trimmed() {
        let config = AiConfig::from_lookup(lookup_from(&[(ENV_API_KEY, "  sk-live\n")]));
        assert_eq!(config.api_key.as_deref(), Some("sk-live"));
        assert!(config.is_configured());

        let blank = AiConfig::from_lookup(lookup_from(&[(ENV_API_KEY, "   ")]));
        assert!(blank.api_key.is_none());
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let json = serde_json::to_value(ConfigReport::from_key(Some("sk-abc"))).unwrap();
        assert_eq!(json["configured"], true);
        assert_eq!(json["apiKeyPresent"], true);
        assert_eq!(json["apiKeyFormat"], "valid_format");
        assert!(json.get("api_key_present").is_none());
    }

    #[test]
    fn test_invalid_timeout_falls_back_to_default() {
        let config = AiConfig::from_lookup(lookup_from(&[(ENV_HTTP_TIMEOUT, "soon")]));
        assert_eq!(config.http_timeout, Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS));
    }

    #[test]
    fn test_unconfigured_builds_no_provider() {
        let config = AiConfig::default();
        assert!(config.build_provider().unwrap().is_none());
    }

    #[test]
    fn test_configured_builds_provider() {
        let config = AiConfig {
            api_key: Some("sk-live".into()),
            ..AiConfig::default()
        };
        let provider = config.build_provider().unwrap().unwrap();
        assert_eq!(provider.name(), "openai-compatible");
    }

    #[test]
    fn test_report_formats() {
        let missing = ConfigReport::from_key(None);
        assert!(!missing.configured);
        assert!(!missing.api_key_present);
        assert_eq!(missing.api_key_format, ApiKeyFormat::Missing);

        let invalid = ConfigReport::from_key(Some("abc"));
        assert!(invalid.api_key_present);
        assert_eq!(invalid.api_key_format, ApiKeyFormat::InvalidFormat);

        let valid = ConfigReport::from_key(Some("sk-abc"));
        assert!(valid.configured);
        assert_eq!(valid.api_key_format, ApiKeyFormat::ValidFormat);
        assert_eq!(valid.api_key_format.to_string(), "valid_format");
    }
}
