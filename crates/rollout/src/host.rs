//! The repository host port.
//!
//! [`RepositoryHost`] is the only way the workflow talks to the outside world.
//! The `azure-devops` crate implements it over HTTP; tests implement it in
//! memory.

use async_trait::async_trait;

use crate::{
    BranchName, CommitSha, HostError, PullRequestId, PullRequestText, RepositoryName,
    TemplateDocument, TemplatePath,
};

/// A new branch to create at an existing commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBranch<'a> {
    /// Branch to create.
    pub branch: &'a BranchName,
    /// Commit the branch will point at.
    pub at: &'a CommitSha,
}

/// A single-commit push that adds the template to a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateCommit<'a> {
    /// Branch receiving the commit.
    pub branch: &'a BranchName,
    /// Current tip of `branch`, which becomes the commit's parent.
    pub parent: &'a CommitSha,
    /// Commit message.
    pub message: &'a str,
    /// File to add.
    pub document: &'a TemplateDocument,
}

/// A pull request to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestDraft<'a> {
    /// Branch with the changes.
    pub source: &'a BranchName,
    /// Branch to merge into.
    pub target: &'a BranchName,
    /// Title and description.
    pub text: &'a PullRequestText,
}

/// Operations the rollout needs from a Git hosting service, scoped to one
/// project.
///
/// Every method is a single remote call. Implementations must not retry.
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    /// Lists the names of all repositories in the project, in service order.
    async fn list_repositories(&self) -> Result<Vec<RepositoryName>, HostError>;

    /// Returns `true` if `path` exists in `repository`, `false` if the service
    /// reports it as not found.
    async fn file_exists(
        &self,
        repository: &RepositoryName,
        path: &TemplatePath,
    ) -> Result<bool, HostError>;

    /// Returns the commit at the tip of `branch`, or `None` if the branch has
    /// no refs.
    async fn branch_tip(
        &self,
        repository: &RepositoryName,
        branch: &BranchName,
    ) -> Result<Option<CommitSha>, HostError>;

    /// Creates a branch that does not exist yet.
    async fn create_branch(
        &self,
        repository: &RepositoryName,
        branch: NewBranch<'_>,
    ) -> Result<(), HostError>;

    /// Pushes a single commit adding the template file.
    async fn push_commit(
        &self,
        repository: &RepositoryName,
        commit: TemplateCommit<'_>,
    ) -> Result<(), HostError>;

    /// Opens a pull request and returns its id.
    async fn create_pull_request(
        &self,
        repository: &RepositoryName,
        draft: PullRequestDraft<'_>,
    ) -> Result<PullRequestId, HostError>;
}
