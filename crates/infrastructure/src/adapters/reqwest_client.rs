//! Request executor implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port. It is constructed from
//! an explicit [`HarnessConfig`]; there is no process-wide state. Each
//! `execute` performs exactly one outbound call: retries, if any, are the
//! scenario runner's responsibility.

use std::collections::HashMap;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use url::Url;

use apicheck_application::ports::{HttpClient, HttpClientError};
use apicheck_domain::{HarnessConfig, HttpMethod, ResponseRecord};

/// HTTP request executor backed by `reqwest::Client`.
pub struct ReqwestHttpClient {
    client: Client,
    base_url: Url,
    default_headers: HashMap<String, String>,
    timeout_ms: u64,
}

impl ReqwestHttpClient {
    /// Creates an executor bound to the configuration's base URL,
    /// timeout, and default headers.
    ///
    /// # Errors
    ///
    /// Returns [`HttpClientError::InvalidUrl`] when the base URL does not
    /// validate, and [`HttpClientError::Other`] if the underlying client
    /// cannot be constructed.
    pub fn new(config: &HarnessConfig) -> Result<Self, HttpClientError> {
        let base_url = config
            .validated_base_url()
            .map_err(|e| HttpClientError::InvalidUrl(e.to_string()))?;

        let client = Client::builder()
            .user_agent(concat!("apicheck/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(10))
            .timeout(config.timeout)
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        #[allow(clippy::cast_possible_truncation)]
        let timeout_ms = config.timeout.as_millis() as u64;

        Ok(Self {
            client,
            base_url,
            default_headers: config.default_headers.clone(),
            timeout_ms,
        })
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Joins the base URL and a relative path segment.
    fn join_url(base: &Url, path: &str) -> Result<Url, HttpClientError> {
        let combined = format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&combined).map_err(|e| HttpClientError::InvalidUrl(format!("{e}: {combined}")))
    }

    /// Maps reqwest errors to port errors.
    fn map_error(&self, error: &reqwest::Error) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout {
                timeout_ms: self.timeout_ms,
            };
        }
        if error.is_connect() {
            return HttpClientError::ConnectionFailed(error.to_string());
        }
        HttpClientError::Other(error.to_string())
    }

    /// Decodes a response body. An empty body is JSON null; anything
    /// else must parse.
    fn decode_body(bytes: &[u8]) -> Result<Value, HttpClientError> {
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(bytes).map_err(|e| HttpClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ResponseRecord, HttpClientError> {
        let url = Self::join_url(&self.base_url, path)?;
        tracing::debug!(method = %method, url = %url, "issuing request");

        let mut builder = self.client.request(Self::to_reqwest_method(method), url);
        for (name, value) in &self.default_headers {
            builder = builder.header(name, value);
        }
        if let Some(payload) = body {
            builder = builder.json(payload);
        }

        let start = Instant::now();
        let response = builder.send().await.map_err(|e| self.map_error(&e))?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
            .collect();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.map_error(&e))?;
        let elapsed = start.elapsed();

        let body = Self::decode_body(&bytes)?;

        Ok(ResponseRecord::new(status, headers, body, elapsed))
    }
}
