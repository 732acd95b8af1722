//! Rollout orchestration.
//!
//! Lists the project's repositories, drops the excluded ones, and runs the
//! per-repository steps in [`steps`] for each remaining repository, one at a
//! time and in service order.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** This crate sequences calls to the
//! [`rollout::RepositoryHost`] port. It contains no transport details.
//!
//! ## Failure isolation
//!
//! A failure in one repository is recorded in the summary and the run moves
//! on to the next repository. Only a failure to list repositories stops the
//! run, because there is nothing left to process.

pub mod steps;

pub use steps::{process_repository, RepositoryError};

use rollout::{
    RepositoryHost, RepositoryName, RepositoryReport, RolloutConfig, RolloutError,
    RolloutSummary, RunId, Timestamp,
};
use tracing::{info, Instrument};

/// Lists the repositories to process.
///
/// Returns `(to_process, excluded)`, both in service order.
///
/// # Errors
///
/// [`RolloutError::Listing`] if the host call fails.
pub async fn list_repositories<H>(
    host: &H,
    config: &RolloutConfig,
) -> Result<(Vec<RepositoryName>, Vec<RepositoryName>), RolloutError>
where
    H: RepositoryHost + ?Sized,
{
    let all = host
        .list_repositories()
        .await
        .map_err(|source| RolloutError::Listing { source })?;

    let (to_process, excluded) = config.exclusions.partition(all);
    info!(
        to_process = to_process.len(),
        excluded = excluded.len(),
        "Repositories listed"
    );
    Ok((to_process, excluded))
}

/// Runs the whole rollout and returns what happened to each repository.
///
/// # Errors
///
/// [`RolloutError::Listing`] if the repository list cannot be retrieved.
/// Failures of individual repositories are reported in the summary instead.
pub async fn run<H>(
    host: &H,
    config: &RolloutConfig,
    run_id: RunId,
) -> Result<RolloutSummary, RolloutError>
where
    H: RepositoryHost + ?Sized,
{
    let span = tracing::info_span!(
        "rollout",
        %run_id,
        organization = %config.host.organization,
        project = %config.host.project,
        mode = ?config.mode,
    );

    async move {
        let started_at = Timestamp::now();
        let (to_process, excluded) = list_repositories(host, config).await?;

        let mut repositories = Vec::with_capacity(to_process.len());
        for repository in to_process {
            let outcome = process_repository(host, &repository, config).await;
            repositories.push(RepositoryReport {
                repository,
                outcome,
            });
        }

        let summary = RolloutSummary {
            run_id,
            started_at,
            finished_at: Timestamp::now(),
            excluded,
            repositories,
        };
        info!(
            created = summary.created(),
            already_present = summary.already_present(),
            would_create = summary.would_create(),
            failed = summary.failed(),
            "Rollout finished"
        );
        Ok(summary)
    }
    .instrument(span)
    .await
}
