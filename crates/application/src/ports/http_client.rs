//! HTTP Client port

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use apicheck_domain::{HttpMethod, ResponseRecord};

/// Errors a request executor can fail with.
///
/// `Timeout` and `ConnectionFailed` are the network class: the exchange
/// never completed and the scenario runner may re-issue the call.
/// `Decode` means the exchange completed but the body was not valid JSON.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HttpClientError {
    /// No response was received within the configured timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout that elapsed, in milliseconds.
        timeout_ms: u64,
    },

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The base URL and path did not combine into a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request payload could not be serialized as JSON.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// The response body was not valid JSON.
    #[error("response body is not valid JSON: {0}")]
    Decode(String),

    /// Any other transport-level failure.
    #[error("http error: {0}")]
    Other(String),
}

impl HttpClientError {
    /// True for failures where no response was received, which are the
    /// only ones eligible for retry.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::ConnectionFailed(_) | Self::Other(_)
        )
    }
}

/// Port for executing one HTTP exchange.
///
/// This trait abstracts the HTTP client implementation, allowing the
/// scenario runner to be tested without any network activity.
///
/// Implementations perform exactly one outbound call per invocation and
/// treat non-2xx statuses as data, not errors.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Issues one HTTP call against the configured base URL.
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP method to issue
    /// * `path` - relative URL segment, already template-resolved
    /// * `body` - optional JSON payload
    ///
    /// # Errors
    ///
    /// Returns [`HttpClientError::Timeout`] or
    /// [`HttpClientError::ConnectionFailed`] when no response was
    /// received, and [`HttpClientError::Decode`] when the body could not
    /// be parsed as JSON.
    async fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ResponseRecord, HttpClientError>;
}
