//! # Command line
//!
//! Parses arguments, runs the selected suite and renders the summary. Stdout
//! carries the human-readable report; diagnostics go to stderr via tracing.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use crate::environment::{DEFAULT_BASE_URL, ProbeConfig};
use crate::http::client::ApiClient;
use crate::storage::save_report;
use crate::suites::Suite;
use crate::testing::{RunReport, Tester};

const RULE_WIDTH: usize = 60;

#[derive(Parser, Debug, Clone)]
#[command(name = "ghostchart-probe", version, about = "Status-code test harness for the GhostChart API")]
pub struct Cli {
    /// Which group of test cases to run
    #[arg(value_enum, default_value_t = Suite::Backend)]
    pub suite: Suite,

    /// Service root; requests go to `<BASE_URL>/api/...`
    #[arg(long, env = "GHOSTCHART_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[arg(
        long,
        env = "GHOSTCHART_TIMEOUT_SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Also print the run report in this format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the JSON run report to this file
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Treat workflow warnings as failures for the exit code
    #[arg(long)]
    pub strict: bool,
}

/// Output format for CLI reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Cli {
    pub fn config(&self) -> ProbeConfig {
        ProbeConfig::new(&self.base_url).with_timeout(Duration::from_secs(self.timeout_secs))
    }
}

/// Run the selected suite and return the process exit code.
pub async fn run(cli: Cli) -> Result<i32> {
    let client = ApiClient::new(&cli.config()).context("Failed to build HTTP client")?;

    println!("🚀 Starting {}...", cli.suite.title());
    println!("{}", "=".repeat(RULE_WIDTH));

    let mut tester = Tester::new(client);
    cli.suite.run(&mut tester).await;
    let report = tester.finish(cli.suite.to_string());

    print!("{}", render_summary(&report, cli.suite));
    info!(
        suite = %cli.suite,
        run = report.tally.tests_run,
        passed = report.tally.tests_passed,
        "run finished"
    );

    if cli.format == OutputFormat::Json {
        let raw = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{raw}");
    }

    if let Some(path) = &cli.report {
        save_report(&report, path)?;
        info!(path = %path.display(), "report written");
    }

    Ok(report.exit_code(cli.strict))
}

/// Closing block printed after every case has run.
pub fn render_summary(report: &RunReport, suite: Suite) -> String {
    let tally = report.tally;
    let rate = match tally.success_rate() {
        Some(rate) => format!("{rate:.1}%"),
        None => "0%".to_string(),
    };
    let all_label = match suite {
        Suite::Integration => "ALL INTEGRATION TESTS PASSED!",
        _ => "ALL TESTS PASSED!",
    };
    let some_label = match suite {
        Suite::Integration => "SOME INTEGRATION TESTS FAILED!",
        _ => "SOME TESTS FAILED!",
    };

    let mut out = String::new();
    out.push_str(&format!("\n{}\n", "=".repeat(RULE_WIDTH)));
    out.push_str(&format!("📊 {}:\n", suite.results_heading()));
    out.push_str(&format!("   Tests Run: {}\n", tally.tests_run));
    out.push_str(&format!("   Tests Passed: {}\n", tally.tests_passed));
    out.push_str(&format!("   Tests Failed: {}\n", tally.tests_failed()));
    out.push_str(&format!("   Success Rate: {rate}\n"));
    for failed in report.requests.failures() {
        out.push_str(&format!("   ✗ {} ({} {})\n", failed.name, failed.method, failed.url));
    }
    for workflow in &report.workflows {
        out.push_str(&format!("   Workflow {}: {}\n", workflow.name, workflow.verdict));
    }

    if tally.all_passed() {
        out.push_str(&format!("🎉 {all_label}\n"));
    } else {
        out.push_str(&format!("⚠️  {some_label}\n"));
    }
    out
}
