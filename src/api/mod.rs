//! Transport seam, endpoints, errors and the client.
//!
//! The [`Transport`] trait is the only place network I/O happens. The
//! retrieval engine and [`NewsDataClient`] depend on it through an
//! `Arc<dyn Transport>`, so tests can swap in [`MockTransport`] for the
//! reqwest-backed [`HttpTransport`].

mod client;
mod http;
pub mod mock;

pub use client::{NewsDataClient, NewsDataClientBuilder};
pub use http::{HttpTransport, API_KEY_HEADER, DEFAULT_BASE_URL};
pub use mock::MockTransport;

use async_trait::async_trait;
use std::fmt;

use crate::utils::{QueryMap, ValidationError};

/// A NewsData REST resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Latest,
    Archive,
    Crypto,
    Sources,
}

impl Endpoint {
    /// Path segment appended to the base URL
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Latest => "latest",
            Endpoint::Archive => "archive",
            Endpoint::Crypto => "crypto",
            Endpoint::Sources => "sources",
        }
    }

    /// Whether responses carry a continuation token
    pub fn is_paginated(&self) -> bool {
        !matches!(self, Endpoint::Sources)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Performs one GET against an endpoint and returns the raw body.
///
/// Implementations map non-2xx responses to [`NewsDataError::Api`] and
/// connection failures to [`NewsDataError::Network`].
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    async fn get(&self, endpoint: Endpoint, params: &QueryMap) -> Result<Vec<u8>, NewsDataError>;
}

/// Errors returned by the client
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NewsDataError {
    /// A query failed pre-flight validation; nothing was sent
    #[error("invalid query: {0}")]
    Validation(#[from] ValidationError),

    /// Connection, timeout or body-read failure
    #[error("network error: {0}")]
    Network(String),

    /// The API answered with an error. Displays as the server's message.
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
    },

    /// The body was not the expected JSON shape
    #[error("decode error: {0}")]
    Decode(String),

    /// The caller cancelled the retrieval
    #[error("retrieval cancelled")]
    Cancelled,

    /// Missing API key, bad base URL or unreadable configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl NewsDataError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, NewsDataError::Cancelled)
    }

    /// HTTP status for API errors
    pub fn status(&self) -> Option<u16> {
        match self {
            NewsDataError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for NewsDataError {
    fn from(err: reqwest::Error) -> Self {
        NewsDataError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for NewsDataError {
    fn from(err: serde_json::Error) -> Self {
        NewsDataError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(Endpoint::Latest.to_string(), "latest");
        assert_eq!(Endpoint::Crypto.path(), "crypto");
        assert!(Endpoint::Archive.is_paginated());
        assert!(!Endpoint::Sources.is_paginated());
    }

    #[test]
    fn test_api_error_displays_message() {
        let err = NewsDataError::Api {
            status: 429,
            message: "rate limited".to_string(),
            code: Some("429".to_string()),
        };
        assert_eq!(err.to_string(), "rate limited");
        assert_eq!(err.status(), Some(429));
        assert!(!err.is_cancelled());
        assert!(NewsDataError::Cancelled.is_cancelled());
    }

    #[test]
    fn test_validation_error_converts() {
        let err: NewsDataError = ValidationError::InvalidTimeframe("99".into()).into();
        assert!(matches!(err, NewsDataError::Validation(_)));
    }
}
