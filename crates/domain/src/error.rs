//! Domain error types

use thiserror::Error;

/// Configuration-class errors detected before any scenario runs.
///
/// All of these are fatal at suite start: a suite with an invalid
/// declaration is never partially executed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No base URL was configured.
    #[error("missing base URL")]
    MissingBaseUrl,

    /// The configured base URL is invalid or malformed.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The HTTP method is not supported by the harness.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A path template references a parameter with no bound value.
    #[error("unbound path parameter '{param}' in '{path}'")]
    UnboundPathParam {
        /// Parameter name as it appears between braces.
        param: String,
        /// The offending path template.
        path: String,
    },

    /// A scenario declaration has an invalid structure.
    #[error("invalid scenario '{name}': {reason}")]
    InvalidScenario {
        /// Name of the offending scenario.
        name: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
