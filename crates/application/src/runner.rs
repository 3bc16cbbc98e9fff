//! Scenario runner.
//!
//! Sequences scenarios against a [`HttpClient`] port, evaluates every
//! expectation, and aggregates a [`SuiteSummary`]. Scenarios are
//! mutually independent and run one tokio task each; steps within a
//! scenario run strictly sequentially. Results merge into the summary
//! only after a scenario finishes, so completion order never affects
//! the totals.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::Instant;

use apicheck_domain::{
    Backoff, DomainResult, ExpectationOutcome, HarnessConfig, Scenario, ScenarioResult,
    SuiteSummary,
};

use std::collections::HashMap;

use serde_json::Value;

use crate::evaluator::{capture_value, evaluate_with};
use crate::ports::{HttpClient, HttpClientError};

/// Runs suites of scenarios against an HTTP client port.
pub struct ScenarioRunner {
    client: Arc<dyn HttpClient>,
    retries: u32,
    backoff: Backoff,
    backoff_base: Duration,
    suite_timeout: Option<Duration>,
}

impl ScenarioRunner {
    /// Create a runner over the given client, taking retry and deadline
    /// settings from the configuration.
    #[must_use]
    pub fn new(client: Arc<dyn HttpClient>, config: &HarnessConfig) -> Self {
        Self {
            client,
            retries: config.retries,
            backoff: config.backoff,
            backoff_base: config.backoff_base,
            suite_timeout: config.suite_timeout,
        }
    }

    /// Run every scenario and aggregate the results.
    ///
    /// Scenarios run concurrently; a global suite deadline, when
    /// configured, cancels still-running scenarios, which report
    /// `Canceled` rather than partial results.
    ///
    /// # Errors
    ///
    /// Returns a configuration error before any network activity if a
    /// scenario declaration is invalid. Per-step failures never escape a
    /// scenario; they are recorded in its result.
    pub async fn run(&self, scenarios: &[Scenario]) -> DomainResult<SuiteSummary> {
        for scenario in scenarios {
            scenario.validate()?;
        }

        let deadline = self.suite_timeout.map(|t| Instant::now() + t);
        let mut tasks: JoinSet<ScenarioResult> = JoinSet::new();

        for scenario in scenarios.iter().cloned() {
            let client = Arc::clone(&self.client);
            let retries = self.retries;
            let backoff = self.backoff;
            let backoff_base = self.backoff_base;

            tasks.spawn(async move {
                let name = scenario.name.clone();
                let fut = run_scenario(client, scenario, retries, backoff, backoff_base);
                match deadline {
                    Some(at) => match tokio::time::timeout_at(at, fut).await {
                        Ok(result) => result,
                        Err(_) => {
                            tracing::warn!(scenario = %name, "suite deadline expired, canceling");
                            ScenarioResult::canceled(name)
                        }
                    },
                    None => fut.await,
                }
            });
        }

        let mut summary = SuiteSummary::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => summary.record(result),
                Err(e) => {
                    // A panicking scenario task must not take the suite
                    // down with it.
                    tracing::error!(error = %e, "scenario task failed to join");
                }
            }
        }
        Ok(summary)
    }
}

/// Run one scenario: steps sequentially, expectations per step.
async fn run_scenario(
    client: Arc<dyn HttpClient>,
    scenario: Scenario,
    retries: u32,
    backoff: Backoff,
    backoff_base: Duration,
) -> ScenarioResult {
    tracing::info!(scenario = %scenario.name, steps = scenario.steps.len(), "running scenario");
    let mut outcomes: Vec<ExpectationOutcome> = Vec::new();
    // Values captured by earlier steps, scoped to this scenario.
    let mut captures: HashMap<String, Value> = HashMap::new();

    for (index, step) in scenario.steps.iter().enumerate() {
        let path = match step.resolved_path() {
            Ok(path) => path,
            Err(e) => {
                // Caught by validate() before run; kept as a guard for
                // directly-constructed runners.
                fail_step(&mut outcomes, step, &e.to_string());
                return ScenarioResult::aborted(scenario.name, outcomes);
            }
        };
        tracing::debug!(
            scenario = %scenario.name,
            step = index,
            method = %step.method,
            path = %path,
            "executing step"
        );

        let mut attempt: u32 = 0;
        let exchange = loop {
            match client.execute(step.method, &path, step.body.as_ref()).await {
                Ok(record) => break Ok(record),
                Err(e) if e.is_network() && attempt < retries => {
                    attempt += 1;
                    let delay = backoff.delay(backoff_base, attempt);
                    tracing::warn!(
                        scenario = %scenario.name,
                        step = index,
                        attempt,
                        error = %e,
                        "network failure, retrying after {:?}",
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => break Err(e),
            }
        };

        match exchange {
            Ok(record) => {
                let mut capture_failure = None;
                for (name, capture_path) in &step.capture {
                    match capture_value(&record.body, capture_path) {
                        Ok(value) => {
                            captures.insert(name.clone(), value);
                        }
                        Err(detail) => {
                            capture_failure = Some(format!("capture '{name}': {detail}"));
                            break;
                        }
                    }
                }
                if let Some(detail) = capture_failure {
                    // The declared data was not in the response; the
                    // step's expectations fail, later steps still run.
                    fail_step(&mut outcomes, step, &detail);
                    continue;
                }
                for expectation in &step.expect {
                    outcomes.push(evaluate_with(&record, expectation, &captures));
                }
            }
            Err(e @ HttpClientError::Decode(_)) => {
                // The exchange completed but the body was unusable; the
                // step's expectations fail, later steps still run.
                fail_step(&mut outcomes, step, &e.to_string());
            }
            Err(e) => {
                // No response received: nothing later in this scenario
                // can be trusted. Other scenarios are unaffected.
                fail_step(&mut outcomes, step, &e.to_string());
                tracing::warn!(scenario = %scenario.name, step = index, error = %e, "aborting scenario");
                return ScenarioResult::aborted(scenario.name, outcomes);
            }
        }
    }

    let result = ScenarioResult::new(scenario.name, outcomes);
    tracing::info!(
        scenario = %result.name,
        passed = result.passed_count(),
        failed = result.failed_count(),
        "scenario finished"
    );
    result
}

/// Record every expectation of a step as failed with the given detail.
fn fail_step(
    outcomes: &mut Vec<ExpectationOutcome>,
    step: &apicheck_domain::ScenarioStep,
    detail: &str,
) {
    for expectation in &step.expect {
        outcomes.push(ExpectationOutcome::fail(expectation.clone(), detail));
    }
}
