//! Apicheck Infrastructure - Adapters
//!
//! Concrete implementations behind the application-layer ports: the
//! reqwest-backed request executor, the YAML suite loader, and summary
//! rendering.

pub mod adapters;
pub mod persistence;
pub mod report;

pub use adapters::ReqwestHttpClient;
pub use persistence::{SuiteFile, SuiteFileError};
