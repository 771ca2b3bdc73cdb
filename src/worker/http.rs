//! HTTP client for fetching ranged resources.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::config::FetchConfig;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to build http client: {0}")]
    Build(String),
}

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(10),
            user_agent: concat!("rangefetch/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl From<&FetchConfig> for HttpConfig {
    fn from(fetch: &FetchConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(fetch.connect_timeout_secs),
            request_timeout: Duration::from_secs(fetch.request_timeout_secs),
            user_agent: fetch.user_agent.clone(),
        }
    }
}

/// Thin wrapper over [`reqwest::Client`] with bounded timeouts.
///
/// Redirect handling stays at the transport default and there is no retry
/// here: a task gets exactly one request.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(config: &HttpConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| FetchError::Build(e.to_string()))?;

        Ok(Self { client })
    }

    /// Issues a single GET. Non-success statuses are returned to the caller
    /// for classification; only transport-level failures map to [`FetchError`].
    pub async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        debug!(url, "issuing GET");
        self.client.get(url).send().await.map_err(FetchError::from)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}
