//! Domain of the pull request template rollout.
//!
//! This crate contains every domain concept, newtype identifier, configuration
//! type and error type used by the rollout. Infrastructure crates implement the
//! [`RepositoryHost`] port defined here; they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`RepositoryName`, `BranchName`, `CommitSha`, etc.) |
//! | [`types`] | Value types (`TemplatePath`, `TemplateDocument`, `ExclusionList`, `Timestamp`) |
//! | [`config`] | Layered raw configuration and the validated `RolloutConfig` |
//! | [`errors`] | `HostError`, `RolloutError` and the `Step` they refer to |
//! | [`host`] | The `RepositoryHost` port trait and its request types |
//! | [`outcome`] | Per-repository outcomes and the run summary |

pub mod config;
pub mod errors;
pub mod host;
pub mod identifiers;
pub mod outcome;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use config::{
    HostConfig, PersonalAccessToken, PullRequestText, RawConfig, RolloutConfig, RunMode,
};
pub use errors::{HostError, RolloutError, Step};
pub use host::{NewBranch, PullRequestDraft, RepositoryHost, TemplateCommit};
pub use identifiers::{
    BranchName, CommitSha, PullRequestId, RepositoryName, RunId, NULL_OBJECT_ID,
};
pub use outcome::{RepositoryOutcome, RepositoryReport, RolloutSummary};
pub use types::{ExclusionList, TemplateDocument, TemplatePath, Timestamp};
