//! Error types for the rollout domain.
//!
//! [`HostError`] is what a [`crate::RepositoryHost`] implementation reports for
//! a single call. The workflow turns it into a failed outcome for the affected
//! repository and moves on.
//!
//! [`RolloutError`] covers conditions that stop the run as a whole: there is
//! no repository left to isolate the failure to.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// The host call in progress when an error occurred.
///
/// Carried by every [`HostError`] and by failed outcomes so the summary can
/// say how far a repository got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Listing the repositories of the project.
    ListRepositories,
    /// Asking whether the template file already exists.
    CheckTemplate,
    /// Reading the tip commit of the base branch.
    ReadBaseBranch,
    /// Creating the source branch.
    CreateBranch,
    /// Pushing the commit that adds the template.
    PushCommit,
    /// Opening the pull request.
    OpenPullRequest,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Step::ListRepositories => "list repositories",
            Step::CheckTemplate => "check template",
            Step::ReadBaseBranch => "read base branch",
            Step::CreateBranch => "create branch",
            Step::PushCommit => "push commit",
            Step::OpenPullRequest => "open pull request",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Host errors
// ---------------------------------------------------------------------------

/// Failure of a single call against the repository host.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The request never produced an HTTP response (DNS, TLS, timeout, ...).
    #[error("{step}: transport failure: {message}")]
    Transport {
        /// Call in progress.
        step: Step,
        /// Underlying client error, rendered.
        message: String,
    },

    /// The service answered with a status the call does not accept.
    ///
    /// For the existence check that is anything other than 2xx or 404; for
    /// every other call anything other than 2xx.
    #[error("{step}: unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// Call in progress.
        step: Step,
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// A success response could not be decoded into the expected shape.
    #[error("{step}: invalid response: {message}")]
    InvalidResponse {
        /// Call in progress.
        step: Step,
        /// Decoder error, rendered.
        message: String,
    },

    /// The service accepted the ref update request but refused the update
    /// itself (typically because the branch already exists).
    #[error("create branch: ref update for '{ref_name}' rejected: {status}")]
    RefUpdateRejected {
        /// Fully qualified ref name.
        ref_name: String,
        /// Update status reported by the service.
        status: String,
    },
}

impl HostError {
    /// Returns the step the error occurred in.
    pub fn step(&self) -> Step {
        match self {
            HostError::Transport { step, .. }
            | HostError::UnexpectedStatus { step, .. }
            | HostError::InvalidResponse { step, .. } => *step,
            HostError::RefUpdateRejected { .. } => Step::CreateBranch,
        }
    }
}

// ---------------------------------------------------------------------------
// Run-level errors
// ---------------------------------------------------------------------------

/// Errors that stop the whole rollout.
#[derive(Debug, Error)]
pub enum RolloutError {
    /// The configuration is incomplete or inconsistent.
    ///
    /// Produced before any network call; the run never starts with an
    /// invalid configuration.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },

    /// The repository list could not be retrieved.
    #[error("Could not list repositories")]
    Listing {
        /// The failed host call.
        #[source]
        source: HostError,
    },
}
