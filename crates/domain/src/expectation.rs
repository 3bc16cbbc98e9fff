//! Declarative response expectations.
//!
//! An [`Expectation`] is a pure value describing one check against a
//! [`ResponseRecord`](crate::response::ResponseRecord). Evaluation lives in
//! the application layer; nothing here performs I/O or panics.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A declarative check against a response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expectation {
    /// Status code equals a value exactly. No range matching.
    StatusEquals {
        /// Expected status code.
        expected: u16,
    },
    /// Header exists (case-insensitive key) and its value contains a
    /// substring.
    HeaderContains {
        /// Header name.
        name: String,
        /// Substring the header value must contain.
        substring: String,
    },
    /// A dotted/indexed path into the body resolves without error.
    HasProperty {
        /// Accessor path, e.g. `address.city` or `items[0].id`.
        path: String,
    },
    /// The value at a path equals an expected JSON value.
    PropertyEquals {
        /// Accessor path.
        path: String,
        /// Expected value.
        expected: Value,
    },
    /// The value at a path is a string containing a substring.
    PropertyContains {
        /// Accessor path.
        path: String,
        /// Substring the string value must contain.
        substring: String,
    },
    /// The value at a path equals a value captured by an earlier step,
    /// or is a member of it when the captured value is an array.
    PropertyInCaptured {
        /// Accessor path.
        path: String,
        /// Name the earlier step captured the value under.
        capture: String,
    },
    /// The value at a path has the given JSON kind.
    PropertyType {
        /// Accessor path.
        path: String,
        /// Expected kind.
        kind: JsonKind,
    },
    /// The body is an array of exactly this length.
    ArrayLength {
        /// Expected element count.
        count: usize,
    },
    /// Every element of the body array satisfies an inner expectation,
    /// evaluated with the element standing in as the body.
    ArrayAllMatch {
        /// Expectation applied per element.
        each: Box<Expectation>,
    },
    /// The exchange completed in strictly less than this many
    /// milliseconds.
    LatencyBelow {
        /// Threshold in milliseconds (exclusive).
        max_ms: u64,
    },
}

impl Expectation {
    /// Get a human-readable description of this expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::StatusEquals { expected } => format!("status == {expected}"),
            Self::HeaderContains { name, substring } => {
                format!("header '{name}' contains '{substring}'")
            }
            Self::HasProperty { path } => format!("body has property '{path}'"),
            Self::PropertyEquals { path, expected } => {
                format!("body.{path} == {expected}")
            }
            Self::PropertyContains { path, substring } => {
                format!("body.{path} contains '{substring}'")
            }
            Self::PropertyInCaptured { path, capture } => {
                format!("body.{path} is in captured '{capture}'")
            }
            Self::PropertyType { path, kind } => {
                format!("body.{path} is {kind}")
            }
            Self::ArrayLength { count } => format!("body is an array of length {count}"),
            Self::ArrayAllMatch { each } => {
                format!("every element: {}", each.description())
            }
            Self::LatencyBelow { max_ms } => format!("elapsed < {max_ms}ms"),
        }
    }
}

/// The kind of a JSON value, used by [`Expectation::PropertyType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonKind {
    /// A JSON number (integer or float).
    Number,
    /// A JSON string.
    String,
    /// A JSON boolean.
    Boolean,
    /// A JSON object.
    Object,
    /// A JSON array.
    Array,
    /// JSON null.
    Null,
}

impl JsonKind {
    /// The kind of an arbitrary JSON value.
    #[must_use]
    pub const fn of(value: &Value) -> Self {
        match value {
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Bool(_) => Self::Boolean,
            Value::Object(_) => Self::Object,
            Value::Array(_) => Self::Array,
            Value::Null => Self::Null,
        }
    }

    /// The kind as a lowercase static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
