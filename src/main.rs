mod cli;
mod environment;
mod error;
mod history;
mod http;
mod storage;
mod suites;
mod testing;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    // Stdout is reserved for the test report.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ghostchart_probe=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let code = cli::run(Cli::parse()).await?;
    Ok(if code == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
