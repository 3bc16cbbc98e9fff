//! Apicheck Application - Orchestration and evaluation
//!
//! This crate holds the pure expectation evaluator, the port the request
//! executor implements, and the scenario runner that ties them together.

pub mod evaluator;
pub mod ports;
pub mod runner;

pub use evaluator::{capture_value, evaluate, evaluate_with};
pub use ports::{HttpClient, HttpClientError};
pub use runner::ScenarioRunner;
