use crate::core::{Result, SyncError};
use std::time::Duration;

/// API endpoint configuration
///
/// Builder style, like a database connection config: start from `new` or
/// `from_env` and override what differs.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL every route is appended to, without a trailing slash
    pub base_url: String,

    /// Per-request timeout; expiry surfaces as an ordinary request failure
    pub timeout: Duration,

    /// Bearer token sent with every request
    pub token: Option<String>,

    /// User-Agent header value
    pub user_agent: String,
}

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
            token: None,
            user_agent: format!("impactdesk/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Reads `IMPACTDESK_API_URL`, `IMPACTDESK_API_TIMEOUT_SECS` and
    /// `IMPACTDESK_API_TOKEN`, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::new(&env_string("IMPACTDESK_API_URL", DEFAULT_BASE_URL));

        if let Ok(raw) = std::env::var("IMPACTDESK_API_TIMEOUT_SECS") {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                SyncError::Config(format!(
                    "IMPACTDESK_API_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    raw
                ))
            })?;
            config = config.timeout(Duration::from_secs(secs));
        }

        if let Ok(token) = std::env::var("IMPACTDESK_API_TOKEN") {
            if !token.trim().is_empty() {
                config = config.token(token.trim());
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Set request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set bearer token
    pub fn token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    /// Absolute URL for a route path such as `/projects/all`.
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(SyncError::Config(format!(
                "base URL must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }

        if self.timeout.is_zero() {
            return Err(SyncError::Config("timeout must be > 0".to_string()));
        }

        Ok(())
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
