//! apicheck - Main Entry Point
//!
//! Loads a YAML suite declaration, runs every scenario against the
//! configured base URL, prints the report, and exits 0 iff every
//! expectation across every scenario passed.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use apicheck_application::ScenarioRunner;
use apicheck_infrastructure::{ReqwestHttpClient, SuiteFile, report};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run().await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            // Configuration-class failure: nothing ran.
            eprintln!("apicheck: {e:#}");
            ExitCode::from(2)
        }
    }
}

async fn run() -> anyhow::Result<bool> {
    let path = std::env::args()
        .nth(1)
        .context("usage: apicheck <suite.yaml>")?;

    let mut suite = SuiteFile::load(&path)?;
    apply_env_overrides(&mut suite)?;

    let config = suite.config();
    config.validated_base_url()?;

    tracing::info!(
        suite = %path,
        base_url = %config.base_url,
        scenarios = suite.scenarios.len(),
        "starting apicheck v{}",
        env!("CARGO_PKG_VERSION")
    );

    let client = ReqwestHttpClient::new(&config)?;
    let runner = ScenarioRunner::new(Arc::new(client), &config);
    let summary = runner.run(&suite.scenarios).await?;

    let rendered = match std::env::var("APICHECK_REPORT").as_deref() {
        Ok("json") => report::render_json(&summary)?,
        _ => report::render_text(&summary),
    };
    println!("{rendered}");

    Ok(summary.all_passed())
}

/// Environment variables override the suite file's configuration.
fn apply_env_overrides(suite: &mut SuiteFile) -> anyhow::Result<()> {
    if let Ok(base_url) = std::env::var("APICHECK_BASE_URL") {
        suite.base_url = base_url;
    }
    if let Ok(timeout) = std::env::var("APICHECK_TIMEOUT_MS") {
        suite.timeout_ms = Some(
            timeout
                .parse()
                .context("APICHECK_TIMEOUT_MS must be an integer")?,
        );
    }
    if let Ok(retries) = std::env::var("APICHECK_RETRIES") {
        suite.retries = Some(
            retries
                .parse()
                .context("APICHECK_RETRIES must be an integer")?,
        );
    }
    Ok(())
}
