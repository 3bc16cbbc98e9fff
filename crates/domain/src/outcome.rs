//! Results of running expectations, scenarios, and whole suites.

use serde::{Deserialize, Serialize};

use crate::expectation::Expectation;

/// Result of evaluating a single expectation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectationOutcome {
    /// The expectation that was evaluated.
    pub expectation: Expectation,
    /// Whether it held.
    pub passed: bool,
    /// Human-readable detail: the actual value on success, expected vs.
    /// actual on failure.
    pub detail: String,
}

impl ExpectationOutcome {
    /// Create a passed outcome.
    #[must_use]
    pub fn pass(expectation: Expectation, detail: impl Into<String>) -> Self {
        Self {
            expectation,
            passed: true,
            detail: detail.into(),
        }
    }

    /// Create a failed outcome.
    #[must_use]
    pub fn fail(expectation: Expectation, detail: impl Into<String>) -> Self {
        Self {
            expectation,
            passed: false,
            detail: detail.into(),
        }
    }
}

/// How a scenario finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
    /// Every step ran; outcomes are complete.
    #[default]
    Completed,
    /// A network or decode failure aborted the remaining steps.
    Aborted,
    /// The suite deadline expired before the scenario finished. No
    /// partial outcomes are reported.
    Canceled,
}

/// Accumulated outcomes of one scenario run.
///
/// Created once per run and never mutated after completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Scenario name.
    pub name: String,
    /// How the scenario finished.
    pub status: ScenarioStatus,
    /// Ordered expectation outcomes.
    pub outcomes: Vec<ExpectationOutcome>,
}

impl ScenarioResult {
    /// Create a completed result from accumulated outcomes.
    #[must_use]
    pub fn new(name: impl Into<String>, outcomes: Vec<ExpectationOutcome>) -> Self {
        Self {
            name: name.into(),
            status: ScenarioStatus::Completed,
            outcomes,
        }
    }

    /// Create an aborted result (network/decode failure mid-scenario).
    #[must_use]
    pub fn aborted(name: impl Into<String>, outcomes: Vec<ExpectationOutcome>) -> Self {
        Self {
            name: name.into(),
            status: ScenarioStatus::Aborted,
            outcomes,
        }
    }

    /// Create a canceled result. Carries no partial outcomes.
    #[must_use]
    pub fn canceled(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ScenarioStatus::Canceled,
            outcomes: Vec::new(),
        }
    }

    /// A scenario passes iff it completed and every outcome passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == ScenarioStatus::Completed && self.outcomes.iter().all(|o| o.passed)
    }

    /// Number of passed outcomes.
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }

    /// Number of failed outcomes.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.passed_count()
    }
}

/// Aggregated pass/fail outcome across all scenarios in a run.
///
/// Merging is append-only and commutative: the order in which scenario
/// results arrive does not affect the totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuiteSummary {
    /// Per-scenario detail.
    pub scenarios: Vec<ScenarioResult>,
}

impl SuiteSummary {
    /// Create an empty summary.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scenarios: Vec::new(),
        }
    }

    /// Merge one finished scenario result into the summary.
    pub fn record(&mut self, result: ScenarioResult) {
        self.scenarios.push(result);
    }

    /// Total scenarios recorded.
    #[must_use]
    pub fn scenario_count(&self) -> usize {
        self.scenarios.len()
    }

    /// Total expectations evaluated across all scenarios.
    #[must_use]
    pub fn total_expectations(&self) -> usize {
        self.scenarios.iter().map(|s| s.outcomes.len()).sum()
    }

    /// Passed expectations across all scenarios.
    #[must_use]
    pub fn passed_expectations(&self) -> usize {
        self.scenarios.iter().map(ScenarioResult::passed_count).sum()
    }

    /// Failed expectations across all scenarios.
    #[must_use]
    pub fn failed_expectations(&self) -> usize {
        self.scenarios.iter().map(ScenarioResult::failed_count).sum()
    }

    /// True iff every scenario completed and every expectation passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.scenarios.iter().all(ScenarioResult::passed)
    }
}
