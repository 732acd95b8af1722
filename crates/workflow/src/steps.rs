//! The per-repository steps.
//!
//! Each function performs one step against the [`RepositoryHost`] and logs
//! its success. [`process_repository`] chains them and converts the first
//! failure into a [`RepositoryOutcome::Failed`].

use rollout::{
    BranchName, CommitSha, HostError, NewBranch, PullRequestDraft, PullRequestId,
    RepositoryHost, RepositoryName, RepositoryOutcome, RolloutConfig, RunMode, Step,
    TemplateCommit, TemplateDocument,
};
use thiserror::Error;
use tracing::{info, warn};

/// Why a single repository could not be completed.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A host call failed.
    #[error(transparent)]
    Host(#[from] HostError),

    /// The base branch query returned no refs.
    #[error("base branch '{branch}' has no refs")]
    BaseBranchMissing {
        /// The branch that was looked up.
        branch: BranchName,
    },
}

impl RepositoryError {
    /// Returns the step that failed.
    pub fn step(&self) -> Step {
        match self {
            RepositoryError::Host(err) => err.step(),
            RepositoryError::BaseBranchMissing { .. } => Step::ReadBaseBranch,
        }
    }
}

/// Returns whether `repository` already contains the template.
pub async fn template_exists<H>(
    host: &H,
    repository: &RepositoryName,
    config: &RolloutConfig,
) -> Result<bool, RepositoryError>
where
    H: RepositoryHost + ?Sized,
{
    Ok(host.file_exists(repository, &config.template.path).await?)
}

/// Produces the template document to commit.
///
/// The content is static; every repository gets the same bytes.
pub fn write_template(repository: &RepositoryName, config: &RolloutConfig) -> TemplateDocument {
    let document = config.template.clone();
    info!(%repository, path = %document.path, "Pull request template generated");
    document
}

/// Creates the source branch at the tip of the target branch.
///
/// Returns the commit the branch was created at.
pub async fn create_branch<H>(
    host: &H,
    repository: &RepositoryName,
    config: &RolloutConfig,
) -> Result<CommitSha, RepositoryError>
where
    H: RepositoryHost + ?Sized,
{
    let base_commit = host
        .branch_tip(repository, &config.target_branch)
        .await?
        .ok_or_else(|| RepositoryError::BaseBranchMissing {
            branch: config.target_branch.clone(),
        })?;

    host.create_branch(
        repository,
        NewBranch {
            branch: &config.source_branch,
            at: &base_commit,
        },
    )
    .await?;

    info!(
        %repository,
        branch = %config.source_branch,
        base_commit = %base_commit,
        "Branch created"
    );
    Ok(base_commit)
}

/// Pushes the commit that adds `document` on top of `base_commit`.
pub async fn push_template<H>(
    host: &H,
    repository: &RepositoryName,
    config: &RolloutConfig,
    base_commit: &CommitSha,
    document: &TemplateDocument,
) -> Result<(), RepositoryError>
where
    H: RepositoryHost + ?Sized,
{
    host.push_commit(
        repository,
        TemplateCommit {
            branch: &config.source_branch,
            parent: base_commit,
            message: &config.pull_request.commit_message,
            document,
        },
    )
    .await?;

    info!(%repository, "Commit with new template pushed");
    Ok(())
}

/// Opens the pull request from the source branch to the target branch.
pub async fn open_pull_request<H>(
    host: &H,
    repository: &RepositoryName,
    config: &RolloutConfig,
) -> Result<PullRequestId, RepositoryError>
where
    H: RepositoryHost + ?Sized,
{
    let id = host
        .create_pull_request(
            repository,
            PullRequestDraft {
                source: &config.source_branch,
                target: &config.target_branch,
                text: &config.pull_request,
            },
        )
        .await?;

    info!(%repository, pull_request = %id, "Pull request created");
    Ok(id)
}

/// Runs every step for one repository and reports how it ended.
///
/// Never fails: errors become [`RepositoryOutcome::Failed`].
#[tracing::instrument(name = "repository", skip_all, fields(repository = %repository))]
pub async fn process_repository<H>(
    host: &H,
    repository: &RepositoryName,
    config: &RolloutConfig,
) -> RepositoryOutcome
where
    H: RepositoryHost + ?Sized,
{
    match apply(host, repository, config).await {
        Ok(outcome) => outcome,
        Err(err) => {
            let step = err.step();
            warn!(%repository, %step, error = %err, "Repository failed");
            RepositoryOutcome::Failed {
                step,
                reason: err.to_string(),
            }
        }
    }
}

async fn apply<H>(
    host: &H,
    repository: &RepositoryName,
    config: &RolloutConfig,
) -> Result<RepositoryOutcome, RepositoryError>
where
    H: RepositoryHost + ?Sized,
{
    if template_exists(host, repository, config).await? {
        info!(%repository, "Template already present, skipping");
        return Ok(RepositoryOutcome::TemplateExists);
    }

    if config.mode == RunMode::DryRun {
        info!(%repository, "Template missing (dry run, no changes made)");
        return Ok(RepositoryOutcome::WouldCreate);
    }

    let document = write_template(repository, config);
    let base_commit = create_branch(host, repository, config).await?;
    push_template(host, repository, config, &base_commit, &document).await?;
    let pull_request = open_pull_request(host, repository, config).await?;

    Ok(RepositoryOutcome::Created {
        base_commit,
        pull_request,
    })
}
