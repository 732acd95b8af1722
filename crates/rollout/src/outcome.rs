//! Per-repository outcomes and the run summary.

use serde::Serialize;

use crate::{CommitSha, PullRequestId, RepositoryName, RunId, Step, Timestamp};

/// How processing of one repository ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RepositoryOutcome {
    /// Branch, commit and pull request were created.
    Created {
        /// Commit the new branch was created from.
        base_commit: CommitSha,
        /// The opened pull request.
        pull_request: PullRequestId,
    },
    /// The template already exists; nothing was done.
    TemplateExists,
    /// Dry run: the template is missing and would have been added.
    WouldCreate,
    /// A call failed; later steps for this repository were not attempted.
    Failed {
        /// Step that failed.
        step: Step,
        /// Human-readable cause.
        reason: String,
    },
}

impl RepositoryOutcome {
    /// Returns `true` for [`RepositoryOutcome::Failed`].
    pub fn is_failure(&self) -> bool {
        matches!(self, RepositoryOutcome::Failed { .. })
    }
}

/// One row of the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryReport {
    /// Repository processed.
    pub repository: RepositoryName,
    /// What happened to it.
    pub outcome: RepositoryOutcome,
}

/// Everything a rollout did, in processing order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RolloutSummary {
    /// Run identifier (matches the `run_id` span field in logs).
    pub run_id: RunId,
    /// When the run started.
    pub started_at: Timestamp,
    /// When the last repository finished.
    pub finished_at: Timestamp,
    /// Repositories skipped because of the exclusion list.
    pub excluded: Vec<RepositoryName>,
    /// Processed repositories, in service order.
    pub repositories: Vec<RepositoryReport>,
}

impl RolloutSummary {
    /// Number of repositories that received a pull request.
    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, RepositoryOutcome::Created { .. }))
    }

    /// Number of repositories that already had the template.
    pub fn already_present(&self) -> usize {
        self.count(|o| matches!(o, RepositoryOutcome::TemplateExists))
    }

    /// Number of repositories a dry run would change.
    pub fn would_create(&self) -> usize {
        self.count(|o| matches!(o, RepositoryOutcome::WouldCreate))
    }

    /// Number of repositories that failed.
    pub fn failed(&self) -> usize {
        self.count(RepositoryOutcome::is_failure)
    }

    /// Returns `true` if any repository failed.
    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    /// Looks up the outcome for `repository`.
    pub fn outcome_of(&self, repository: &str) -> Option<&RepositoryOutcome> {
        self.repositories
            .iter()
            .find(|r| r.repository.as_str() == repository)
            .map(|r| &r.outcome)
    }

    fn count(&self, pred: impl Fn(&RepositoryOutcome) -> bool) -> usize {
        self.repositories.iter().filter(|r| pred(&r.outcome)).count()
    }
}
