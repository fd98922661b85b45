//! reqwest-backed transport.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

use super::{Endpoint, NewsDataError, Transport};
use crate::config::Config;
use crate::models::ErrorBody;
use crate::utils::QueryMap;

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://newsdata.io/api/1";

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-ACCESS-KEY";

/// HTTP transport with a shared connection pool
#[derive(Clone)]
pub struct HttpTransport {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Create a transport for the production API with default timeouts
    pub fn new(api_key: impl Into<String>) -> Result<Self, NewsDataError> {
        let mut config = Config::default();
        config.api.key = Some(api_key.into());
        Self::from_config(&config)
    }

    /// Create a transport from loaded configuration
    pub fn from_config(config: &Config) -> Result<Self, NewsDataError> {
        let api_key = config
            .api
            .key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| NewsDataError::Config("API key is not set".to_string()))?;

        let client = Client::builder()
            .user_agent(&config.http.user_agent)
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .connect_timeout(Duration::from_secs(config.http.connect_timeout_secs))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| NewsDataError::Config(format!("failed to build HTTP client: {}", e)))?;

        Self::from_client(Arc::new(client), &config.api.base_url, api_key)
    }

    /// Wrap an existing reqwest client
    pub fn from_client(
        client: Arc<Client>,
        base_url: &str,
        api_key: impl Into<String>,
    ) -> Result<Self, NewsDataError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| NewsDataError::Config(format!("invalid base URL {:?}: {}", base_url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(NewsDataError::Config(format!(
                "invalid base URL {:?}",
                base_url
            )));
        }

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path())
    }
}

/// Map a non-2xx response to an API error, preferring the server's message.
fn api_error(status: StatusCode, body: &[u8]) -> NewsDataError {
    match ErrorBody::parse(body) {
        Some(err) => NewsDataError::Api {
            status: status.as_u16(),
            message: err.results.message,
            code: err.results.code,
        },
        None => NewsDataError::Api {
            status: status.as_u16(),
            message: status
                .canonical_reason()
                .unwrap_or("unexpected HTTP status")
                .to_string(),
            code: None,
        },
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, endpoint: Endpoint, params: &QueryMap) -> Result<Vec<u8>, NewsDataError> {
        let started = Instant::now();
        let response = self
            .client
            .get(self.endpoint_url(endpoint))
            .header(API_KEY_HEADER, &self.api_key)
            .query(params)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        debug!(
            %endpoint,
            status = status.as_u16(),
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request finished"
        );

        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        Ok(body.to_vec())
    }
}
