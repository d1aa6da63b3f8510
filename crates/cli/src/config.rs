use agent::engine::DEFAULT_REQUEST_TIMEOUT;
use ai::config::AiConfig;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

pub const ENV_DATA_DIR: &str = "MAILGENIE_DATA_DIR";
pub const ENV_REQUEST_TIMEOUT: &str = "MAILGENIE_REQUEST_TIMEOUT_SECS";
pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub request_timeout: Duration,
    pub ai: AiConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let request_timeout = match lookup(ENV_REQUEST_TIMEOUT) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!("Ignoring invalid {}={:?}", ENV_REQUEST_TIMEOUT, raw);
                    DEFAULT_REQUEST_TIMEOUT
                }
            },
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        Self {
            data_dir: lookup(ENV_DATA_DIR)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            request_timeout,
            ai: AiConfig::from_lookup(&lookup),
        }
    }

    pub fn with_data_dir(mut self, data_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert!(!config.ai.is_configured());
    }

    #[test]
    fn test_env_and_flag_overrides() {
        let config = AppConfig::from_lookup(|key| match key {
            ENV_DATA_DIR => Some("/var/lib/mailgenie".into()),
            ENV_REQUEST_TIMEOUT => Some("15".into()),
            "OPENAI_API_KEY" => Some("sk-123".into()),
            _ => None,
        });
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/mailgenie"));
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert!(config.ai.is_configured());

        let overridden = config.with_data_dir(Some(PathBuf::from("/tmp/mg")));
        assert_eq!(overridden.data_dir, PathBuf::from("/tmp/mg"));
    }
}
