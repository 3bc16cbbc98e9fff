//! Suite summary rendering.
//!
//! Presentation is layered on top of the result data: the runner
//! produces a [`SuiteSummary`], and this module renders it as a
//! human-readable listing or as machine-readable JSON.

use std::fmt::Write as _;

use apicheck_domain::{ScenarioResult, ScenarioStatus, SuiteSummary};

/// Render a summary as a human-readable listing, one line per
/// expectation.
#[must_use]
pub fn render_text(summary: &SuiteSummary) -> String {
    let mut out = String::new();

    for scenario in &summary.scenarios {
        let _ = writeln!(out, "{}", scenario_heading(scenario));
        for outcome in &scenario.outcomes {
            let marker = if outcome.passed { "  ok  " } else { "  FAIL" };
            let _ = writeln!(
                out,
                "{marker} {} - {}",
                outcome.expectation.description(),
                outcome.detail
            );
        }
    }

    let verdict = if summary.all_passed() { "PASS" } else { "FAIL" };
    let _ = writeln!(
        out,
        "\n{verdict}: {} scenarios, {}/{} expectations passed",
        summary.scenario_count(),
        summary.passed_expectations(),
        summary.total_expectations()
    );
    out
}

fn scenario_heading(scenario: &ScenarioResult) -> String {
    match scenario.status {
        ScenarioStatus::Canceled => format!("CANCELED {}", scenario.name),
        ScenarioStatus::Aborted => format!(
            "ABORTED {} ({}/{})",
            scenario.name,
            scenario.passed_count(),
            scenario.outcomes.len()
        ),
        ScenarioStatus::Completed => {
            let verdict = if scenario.passed() { "PASS" } else { "FAIL" };
            format!(
                "{verdict} {} ({}/{})",
                scenario.name,
                scenario.passed_count(),
                scenario.outcomes.len()
            )
        }
    }
}

/// Render a summary as pretty-printed JSON.
///
/// # Errors
///
/// Returns a serialization error if the summary cannot be encoded,
/// which only happens on formatter failure.
pub fn render_json(summary: &SuiteSummary) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(summary)
}
