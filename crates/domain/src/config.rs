//! Harness configuration.
//!
//! Configuration is an explicit value handed to the request executor and
//! scenario runner at construction. There is no process-wide state.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DomainError, DomainResult};

/// Default request timeout: 30 seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default delay between retry attempts.
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(250);

/// Backoff shape between retry attempts of a failed network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backoff {
    /// The same delay before every attempt.
    #[default]
    Fixed,
    /// Delay grows linearly with the attempt number.
    Linear,
}

impl Backoff {
    /// Delay before retry `attempt` (1-based), given the base delay.
    #[must_use]
    pub fn delay(self, base: Duration, attempt: u32) -> Duration {
        match self {
            Self::Fixed => base,
            Self::Linear => base.saturating_mul(attempt),
        }
    }
}

/// Configuration for a harness run.
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    /// Base URL every relative path is joined against. Required.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Bounded retry count for failed network calls. 0 means a single
    /// attempt.
    pub retries: u32,
    /// Backoff shape between retries.
    pub backoff: Backoff,
    /// Base delay used by the backoff shape.
    pub backoff_base: Duration,
    /// Headers applied to every request unless a step overrides them.
    pub default_headers: HashMap<String, String>,
    /// Global deadline for the whole suite. Scenarios still running when
    /// it expires are canceled.
    pub suite_timeout: Option<Duration>,
}

impl HarnessConfig {
    /// Create a configuration for the given base URL with defaults:
    /// 30 s timeout, no retries, fixed 250 ms backoff, JSON accept and
    /// content-type headers, no suite deadline.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut default_headers = HashMap::new();
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert("Content-Type".to_string(), "application/json".to_string());

        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            retries: 0,
            backoff: Backoff::default(),
            backoff_base: DEFAULT_BACKOFF,
            default_headers,
            suite_timeout: None,
        }
    }

    /// Set the per-request timeout (builder pattern).
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry count (builder pattern).
    #[must_use]
    pub const fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Set the backoff shape and base delay (builder pattern).
    #[must_use]
    pub const fn with_backoff(mut self, backoff: Backoff, base: Duration) -> Self {
        self.backoff = backoff;
        self.backoff_base = base;
        self
    }

    /// Replace a default header (builder pattern).
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Set the global suite deadline (builder pattern).
    #[must_use]
    pub const fn with_suite_timeout(mut self, timeout: Duration) -> Self {
        self.suite_timeout = Some(timeout);
        self
    }

    /// Validate the configuration and return the parsed base URL.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingBaseUrl`] for an empty base URL and
    /// [`DomainError::InvalidBaseUrl`] when it does not parse as an
    /// absolute http(s) URL.
    pub fn validated_base_url(&self) -> DomainResult<Url> {
        if self.base_url.trim().is_empty() {
            return Err(DomainError::MissingBaseUrl);
        }
        let url = Url::parse(&self.base_url)
            .map_err(|e| DomainError::InvalidBaseUrl(format!("{}: {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DomainError::InvalidBaseUrl(format!(
                "{}: unsupported scheme '{}'",
                self.base_url,
                url.scheme()
            )));
        }
        Ok(url)
    }
}
