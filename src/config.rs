//! Configuration types.

use std::time::Duration;

use reqwest::Url;
use secrecy::SecretString;

use crate::error::ConfigError;

const ENV_BASE_URL: &str = "BACKOFFICE_API_BASE_URL";
const ENV_TOKEN: &str = "BACKOFFICE_API_TOKEN";
const ENV_TIMEOUT: &str = "BACKOFFICE_HTTP_TIMEOUT_SECS";

/// Back office API client configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL that all `/admin/...` paths are appended to.
    pub base_url: Url,
    /// Bearer token sent on every broker call (never on direct uploads).
    pub api_token: SecretString,
    /// Per-request timeout. `None` waits for the server indefinitely.
    pub request_timeout: Option<Duration>,
    /// User-Agent header value.
    pub user_agent: String,
}

impl ApiConfig {
    /// Build a configuration from an explicit base URL and token.
    pub fn new(base_url: &str, api_token: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            api_token: SecretString::from(api_token.into()),
            request_timeout: None,
            user_agent: format!("backoffice-onboarding/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Set a per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Load configuration from `BACKOFFICE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url =
            lookup(ENV_BASE_URL).ok_or_else(|| ConfigError::MissingEnvVar(ENV_BASE_URL.into()))?;
        let token = lookup(ENV_TOKEN)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(ENV_TOKEN.into()))?;

        let mut config = Self::new(&base_url, token)?;

        if let Some(raw) = lookup(ENV_TIMEOUT) {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_TIMEOUT.into(),
                message: format!("expected a whole number of seconds, got {raw:?}"),
            })?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    key: ENV_TIMEOUT.into(),
                    message: "timeout must be greater than zero".into(),
                });
            }
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidValue {
        key: ENV_BASE_URL.into(),
        message: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::InvalidValue {
            key: ENV_BASE_URL.into(),
            message: format!("{raw} is not an http(s) base URL"),
        });
    }
    Ok(url)
}
