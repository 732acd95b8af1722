//! PR template rollout CLI entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Load configuration** - read the optional TOML file, layer flags and
//!    environment variables on top, and validate the result before any
//!    network call is made.
//! 2. **Wire observability** - configure `tracing-subscriber` (text or JSON on
//!    stderr) and, when an endpoint is given, an OpenTelemetry OTLP exporter.
//! 3. **Construct infrastructure** - create the [`azure_devops::AzureDevOpsClient`]
//!    and hand it to [`workflow::run`].
//! 4. **Report** - print the summary on stdout and map it to the exit code:
//!    `0` when no repository failed, `2` when some did. Configuration and
//!    listing errors end the process with `1`.

mod args;
mod config_file;
mod report;
mod telemetry;

use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use azure_devops::AzureDevOpsClient;
use clap::Parser;
use rollout::{
    PersonalAccessToken, RawConfig, RepositoryHost, RolloutConfig, RolloutSummary, RunId,
};
use tracing::info;

use crate::args::{Cli, TOKEN_ENV};

/// Exit code when the run finished but at least one repository failed.
const EXIT_PARTIAL_FAILURE: u8 = 2;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let telemetry = telemetry::init(cli.log_format, cli.otlp_endpoint.as_deref())?;

    let result = run(cli).await;

    telemetry.shutdown();
    result
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let file_layer = match &cli.config {
        Some(path) => config_file::load(path)?,
        None => RawConfig::default(),
    };
    let token = std::env::var(TOKEN_ENV)
        .ok()
        .and_then(PersonalAccessToken::new);
    let config = file_layer
        .merge(cli.overrides(token))
        .validate()
        .context("invalid configuration")?;

    let client = AzureDevOpsClient::new(&config.host).context("creating Azure DevOps client")?;
    let run_id = RunId::new_random();
    info!(
        %run_id,
        organization = %config.host.organization,
        project = %config.host.project,
        excluded = config.exclusions.len(),
        "Starting rollout"
    );

    let stdout = std::io::stdout();
    roll_out(&client, &config, run_id, cli.json, &mut stdout.lock()).await
}

/// Runs the workflow against `host`, writes the summary and returns the exit code.
async fn roll_out<H>(
    host: &H,
    config: &RolloutConfig,
    run_id: RunId,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<ExitCode>
where
    H: RepositoryHost + ?Sized,
{
    let summary = workflow::run(host, config, run_id).await?;

    if json {
        report::write_json(&summary, out)?;
    } else {
        report::write_text(&summary, out)?;
    }

    Ok(ExitCode::from(exit_status(&summary)))
}

/// Maps a finished run to its process exit status.
fn exit_status(summary: &RolloutSummary) -> u8 {
    if summary.has_failures() {
        EXIT_PARTIAL_FAILURE
    } else {
        0
    }
}
