//! Apicheck Domain - Core harness types
//!
//! This crate defines the domain model for the apicheck contract
//! verification harness. All types here are pure Rust with no I/O
//! dependencies.

pub mod config;
pub mod error;
pub mod expectation;
pub mod method;
pub mod outcome;
pub mod response;
pub mod scenario;

pub use config::{Backoff, HarnessConfig, DEFAULT_BACKOFF, DEFAULT_TIMEOUT};
pub use error::{DomainError, DomainResult};
pub use expectation::{Expectation, JsonKind};
pub use method::HttpMethod;
pub use outcome::{ExpectationOutcome, ScenarioResult, ScenarioStatus, SuiteSummary};
pub use response::ResponseRecord;
pub use scenario::{Scenario, ScenarioStep};
