//! Scenario declarations.
//!
//! A scenario is a named, ordered sequence of HTTP steps plus their
//! expectations, run as one unit. Declarations are plain data so that
//! suites can be written in YAML and validated before anything runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DomainError, DomainResult};
use crate::expectation::Expectation;
use crate::method::HttpMethod;

/// One HTTP step: a request plus the expectations tied to its response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioStep {
    /// HTTP method to issue.
    #[serde(default)]
    pub method: HttpMethod,
    /// Relative path template. Supports `{param}` substitution from
    /// [`ScenarioStep::params`].
    pub path: String,
    /// Values substituted into the path template.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
    /// Optional JSON request payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Body values captured under a name for later steps. Maps a capture
    /// name to an accessor path; `[*]` maps the remaining path over every
    /// element of an array.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub capture: BTreeMap<String, String>,
    /// Expectations evaluated against this step's response.
    #[serde(default)]
    pub expect: Vec<Expectation>,
}

impl ScenarioStep {
    /// Create a step with no body, params, or expectations.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: BTreeMap::new(),
            body: None,
            capture: BTreeMap::new(),
            expect: Vec::new(),
        }
    }

    /// Set the request payload (builder pattern).
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Bind a path template parameter (builder pattern).
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Capture a body value under a name for later steps (builder
    /// pattern).
    #[must_use]
    pub fn capturing(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.capture.insert(name.into(), path.into());
        self
    }

    /// Add an expectation (builder pattern).
    #[must_use]
    pub fn expecting(mut self, expectation: Expectation) -> Self {
        self.expect.push(expectation);
        self
    }

    /// Resolve the path template into a concrete relative path.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnboundPathParam`] if the template names a
    /// parameter with no bound value.
    pub fn resolved_path(&self) -> DomainResult<String> {
        let mut resolved = self.path.clone();
        for (name, value) in &self.params {
            resolved = resolved.replace(&format!("{{{name}}}"), value);
        }
        if let Some(start) = resolved.find('{') {
            let rest = &resolved[start + 1..];
            let param = rest.split('}').next().unwrap_or(rest).to_string();
            return Err(DomainError::UnboundPathParam {
                param,
                path: self.path.clone(),
            });
        }
        Ok(resolved)
    }
}

/// A named, ordered sequence of steps.
///
/// Steps within a scenario run sequentially; scenarios themselves are
/// independent of one another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name, unique within a suite.
    pub name: String,
    /// Ordered steps.
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Create an empty scenario.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Add a step (builder pattern).
    #[must_use]
    pub fn with_step(mut self, step: ScenarioStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Validate the declaration before any network activity.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidScenario`] for an empty name or an
    /// empty step list, and [`DomainError::UnboundPathParam`] for an
    /// unresolvable path template.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidScenario {
                name: self.name.clone(),
                reason: "scenario name is empty".to_string(),
            });
        }
        if self.steps.is_empty() {
            return Err(DomainError::InvalidScenario {
                name: self.name.clone(),
                reason: "scenario has no steps".to_string(),
            });
        }
        for step in &self.steps {
            step.resolved_path()?;
        }
        Ok(())
    }
}
