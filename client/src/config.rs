use std::time::Duration;

use crate::error::{ClientError, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Interval at which consumers should poll the online counter
pub const RECOMMENDED_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Connection settings for a [`crate::RemoteForumClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Per-request timeout; expiry surfaces as `Unreachable`
    pub timeout: Duration,
    pub min_password_len: usize,
    /// Body fragments that mark an HTML page as a refusal (bad login, wrong
    /// old password) even though it came back 200
    pub rejection_markers: Vec<String>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            min_password_len: 6,
            rejection_markers: vec![
                "无效的用户名或密码".to_string(),
                "密码错误".to_string(),
                "Invalid username or password".to_string(),
                "Incorrect password".to_string(),
            ],
            user_agent: concat!("stellarsis-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Defaults overridden by `STELLARSIS_URL` and `STELLARSIS_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("STELLARSIS_URL") {
            if !url.trim().is_empty() {
                config.base_url = url.trim().to_string();
            }
        }

        if let Ok(secs) = std::env::var("STELLARSIS_TIMEOUT_SECS") {
            let secs = secs.trim().parse::<u64>().map_err(|_| {
                ClientError::InvalidConfig(format!("STELLARSIS_TIMEOUT_SECS={:?}", secs))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check the settings before any client is built
    pub(crate) fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            ClientError::InvalidConfig(format!("base_url {:?}: {}", self.base_url, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidConfig(format!(
                "base_url must be http or https, got {}",
                url.scheme()
            )));
        }

        if self.timeout.is_zero() {
            return Err(ClientError::InvalidConfig("timeout must be non-zero".to_string()));
        }

        Ok(())
    }

    /// Base URL without a trailing slash, ready for path concatenation
    pub(crate) fn root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub(crate) fn is_rejection_page(&self, body: &str) -> bool {
        self.rejection_markers
            .iter()
            .any(|marker| !marker.is_empty() && body.contains(marker.as_str()))
    }
}
