//! Normalized HTTP response record
//!
//! A `ResponseRecord` is the immutable result of exactly one HTTP
//! exchange: status, headers, decoded JSON body, and elapsed time.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The normalized result of one HTTP exchange.
///
/// Produced by the request executor and never mutated afterwards.
/// Non-2xx statuses are data here, not errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    /// HTTP status code.
    pub status: u16,
    /// Response headers. Lookup through [`ResponseRecord::header`] is
    /// case-insensitive.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Decoded JSON body. An empty response body decodes to `Null`.
    #[serde(default)]
    pub body: Value,
    /// Wall-clock time of the exchange.
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
}

impl ResponseRecord {
    /// Creates a new record from raw exchange data.
    #[must_use]
    pub const fn new(
        status: u16,
        headers: HashMap<String, String>,
        body: Value,
        elapsed: Duration,
    ) -> Self {
        Self {
            status,
            headers,
            body,
            elapsed,
        }
    }

    /// Gets a header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Elapsed time in whole milliseconds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn elapsed_millis(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

impl Default for ResponseRecord {
    fn default() -> Self {
        Self {
            status: 0,
            headers: HashMap::new(),
            body: Value::Null,
            elapsed: Duration::ZERO,
        }
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
