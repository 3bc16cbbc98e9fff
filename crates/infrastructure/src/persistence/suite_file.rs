//! YAML suite file loader.
//!
//! A suite file declares configuration overrides and the static list of
//! scenarios. Anything malformed here is a configuration-class failure:
//! it aborts the run before a single request is issued.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use apicheck_domain::{Backoff, DomainError, HarnessConfig, Scenario};

/// Errors loading or validating a suite file.
#[derive(Debug, Error)]
pub enum SuiteFileError {
    /// The file could not be read.
    #[error("cannot read suite file '{path}': {source}")]
    Io {
        /// Path that failed.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid YAML for the expected shape.
    #[error("malformed suite file '{path}': {message}")]
    Malformed {
        /// Path that failed.
        path: String,
        /// Parser message.
        message: String,
    },

    /// The declared configuration or scenarios are invalid.
    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// On-disk suite declaration: configuration plus scenarios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteFile {
    /// Base URL for every scenario in this suite.
    pub base_url: String,
    /// Per-request timeout override, milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Retry count override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
    /// Backoff shape override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backoff: Option<Backoff>,
    /// Backoff base delay override, milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backoff_ms: Option<u64>,
    /// Global suite deadline, milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suite_timeout_ms: Option<u64>,
    /// Extra or replacement default headers.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub default_headers: HashMap<String, String>,
    /// The scenarios to run, in declaration order.
    pub scenarios: Vec<Scenario>,
}

impl SuiteFile {
    /// Load and validate a suite file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteFileError::Io`] when the file cannot be read,
    /// [`SuiteFileError::Malformed`] when it is not valid YAML, and
    /// [`SuiteFileError::Invalid`] when the declarations do not
    /// validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SuiteFileError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SuiteFileError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text).map_err(|e| match e {
            SuiteFileError::Malformed { message, .. } => SuiteFileError::Malformed {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// Parse and validate a suite declaration from YAML text.
    ///
    /// # Errors
    ///
    /// Same as [`SuiteFile::load`], minus I/O.
    pub fn parse(text: &str) -> Result<Self, SuiteFileError> {
        let file: Self =
            serde_yaml::from_str(text).map_err(|e| SuiteFileError::Malformed {
                path: "<inline>".to_string(),
                message: e.to_string(),
            })?;
        file.config().validated_base_url()?;
        for scenario in &file.scenarios {
            scenario.validate()?;
        }
        Ok(file)
    }

    /// Build the harness configuration declared by this file.
    #[must_use]
    pub fn config(&self) -> HarnessConfig {
        let mut config = HarnessConfig::new(self.base_url.clone());
        if let Some(ms) = self.timeout_ms {
            config = config.with_timeout(Duration::from_millis(ms));
        }
        if let Some(retries) = self.retries {
            config = config.with_retries(retries);
        }
        let backoff = self.backoff.unwrap_or_default();
        if let Some(ms) = self.backoff_ms {
            config = config.with_backoff(backoff, Duration::from_millis(ms));
        } else if self.backoff.is_some() {
            config = config.with_backoff(backoff, apicheck_domain::DEFAULT_BACKOFF);
        }
        if let Some(ms) = self.suite_timeout_ms {
            config = config.with_suite_timeout(Duration::from_millis(ms));
        }
        for (name, value) in &self.default_headers {
            config = config.with_header(name.clone(), value.clone());
        }
        config
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const MINIMAL: &str = r"
base_url: https://jsonplaceholder.typicode.com
scenarios:
  - name: list posts
    steps:
      - method: GET
        path: /posts
        expect:
          - type: status_equals
            expected: 200
          - type: array_length
            count: 100
";

    #[test]
    fn test_parse_minimal_suite() {
        let suite = SuiteFile::parse(MINIMAL).unwrap();
        assert_eq!(suite.scenarios.len(), 1);
        assert_eq!(suite.scenarios[0].name, "list posts");
        assert_eq!(suite.scenarios[0].steps[0].expect.len(), 2);

        let config = suite.config();
        assert_eq!(config.base_url, "https://jsonplaceholder.typicode.com");
        assert_eq!(config.timeout, apicheck_domain::DEFAULT_TIMEOUT);
        assert_eq!(config.retries, 0);
    }

    #[test]
    fn test_parse_overrides() {
        let text = r"
base_url: http://localhost:8080
timeout_ms: 5000
retries: 2
backoff: linear
backoff_ms: 100
suite_timeout_ms: 60000
default_headers:
  X-Api-Key: secret
scenarios:
  - name: ping
    steps:
      - path: /health
";
        let suite = SuiteFile::parse(text).unwrap();
        let config = suite.config();
        assert_eq!(config.timeout, Duration::from_millis(5000));
        assert_eq!(config.retries, 2);
        assert_eq!(config.backoff, Backoff::Linear);
        assert_eq!(config.backoff_base, Duration::from_millis(100));
        assert_eq!(config.suite_timeout, Some(Duration::from_millis(60000)));
        assert_eq!(
            config.default_headers.get("X-Api-Key").map(String::as_str),
            Some("secret")
        );
        // Declared headers extend the JSON defaults.
        assert_eq!(
            config.default_headers.get("Accept").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn test_malformed_yaml_is_rejected() {
        let err = SuiteFile::parse("base_url: [unclosed").unwrap_err();
        assert!(matches!(err, SuiteFileError::Malformed { .. }));
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let text = r"
base_url: ''
scenarios:
  - name: x
    steps:
      - path: /posts
";
        let err = SuiteFile::parse(text).unwrap_err();
        assert!(matches!(
            err,
            SuiteFileError::Invalid(DomainError::MissingBaseUrl)
        ));
    }

    #[test]
    fn test_invalid_scenario_is_rejected() {
        let text = r"
base_url: http://localhost
scenarios:
  - name: empty
    steps: []
";
        let err = SuiteFile::parse(text).unwrap_err();
        assert!(matches!(
            err,
            SuiteFileError::Invalid(DomainError::InvalidScenario { .. })
        ));
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();

        let suite = SuiteFile::load(file.path()).unwrap();
        assert_eq!(suite.scenarios.len(), 1);

        let missing = SuiteFile::load("/nonexistent/suite.yaml");
        assert!(matches!(missing, Err(SuiteFileError::Io { .. })));
    }
}
