use std::time::Duration;

use crate::error::ClientError;
use crate::session::SessionContext;

/// Default API base URL for local development.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api/v1";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL without a trailing slash.
    pub base_url: String,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Session built from `VERDANT_API_TOKEN`, if set.
    pub session: Option<SessionContext>,
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default                          |
    /// |--------------------------------|----------------------------------|
    /// | `VERDANT_API_URL`              | `http://localhost:3000/api/v1`   |
    /// | `VERDANT_REQUEST_TIMEOUT_SECS` | `30`                             |
    /// | `VERDANT_API_TOKEN`            | unset (anonymous requests)       |
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("VERDANT_API_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::Config(format!(
                "VERDANT_API_URL must be an http(s) URL, got '{base_url}'"
            )));
        }
        let base_url = base_url.trim_end_matches('/').to_string();

        let request_timeout_secs = match lookup("VERDANT_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                ClientError::Config(format!(
                    "VERDANT_REQUEST_TIMEOUT_SECS must be a whole number, got '{raw}'"
                ))
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let session = lookup("VERDANT_API_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .map(SessionContext::new);

        Ok(Self {
            base_url,
            request_timeout_secs,
            session,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
