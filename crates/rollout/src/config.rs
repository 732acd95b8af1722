//! Rollout configuration.
//!
//! Configuration arrives in layers (TOML file, then flags and environment).
//! Each layer is a [`RawConfig`] with every field optional; layers are
//! combined with [`RawConfig::merge`] and the result is checked once by
//! [`RawConfig::validate`], which fills in defaults and produces the
//! [`RolloutConfig`] the workflow runs with.
//!
//! Secrets never come from a file: [`RawConfig::token`] is skipped by serde and
//! must be supplied by the caller (in practice from the environment).

use std::time::Duration;

use serde::Deserialize;

use crate::{BranchName, ExclusionList, RolloutError, TemplateDocument, TemplatePath};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Root URL of the hosted service; organization and project are appended.
pub const DEFAULT_SERVICE_URL: &str = "https://dev.azure.com";
/// REST API version sent with every request.
pub const DEFAULT_API_VERSION: &str = "6.0";
/// Per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Branch created in every repository to carry the template commit.
pub const DEFAULT_SOURCE_BRANCH: &str = "feature/add-pr-template";
/// Branch the new branch starts from and the pull request targets.
pub const DEFAULT_TARGET_BRANCH: &str = "dev";
/// Directory the service scans for pull request templates.
pub const DEFAULT_TEMPLATE_DIRECTORY: &str = ".azuredevops/pull_request_template";
/// File name of the template inside [`DEFAULT_TEMPLATE_DIRECTORY`].
pub const DEFAULT_TEMPLATE_FILE_NAME: &str = "pull_request_template.md";
/// Markdown committed as the template.
pub const DEFAULT_TEMPLATE_CONTENT: &str = "## Description";
/// Message of the commit that adds the template.
pub const DEFAULT_COMMIT_MESSAGE: &str = "Added PR template for the repository";
/// Title of the pull request.
pub const DEFAULT_PULL_REQUEST_TITLE: &str = "Added PR template for the repository";
/// Description of the pull request.
pub const DEFAULT_PULL_REQUEST_DESCRIPTION: &str =
    "This pull request adds PR template for the repository.";

// ---------------------------------------------------------------------------
// Secrets
// ---------------------------------------------------------------------------

/// A personal access token used as the Basic auth password.
///
/// `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Wraps a token with surrounding whitespace removed, returning `None`
    /// if nothing is left.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let token = token.trim();
        if token.is_empty() {
            None
        } else {
            Some(Self(token.to_string()))
        }
    }

    /// Returns the raw token for placing in an `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for PersonalAccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PersonalAccessToken(<redacted>)")
    }
}

// ---------------------------------------------------------------------------
// Raw (layered) configuration
// ---------------------------------------------------------------------------

/// Connection settings as read from one configuration layer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawHostConfig {
    /// Root URL of the service.
    pub service_url: Option<String>,
    /// Organization name.
    pub organization: Option<String>,
    /// Project name.
    pub project: Option<String>,
    /// REST API version.
    pub api_version: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// Branch names as read from one configuration layer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawBranchConfig {
    /// Branch to create.
    pub source: Option<String>,
    /// Branch to start from and target with the pull request.
    pub target: Option<String>,
}

/// Template settings as read from one configuration layer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawTemplateConfig {
    /// Directory of the template inside each repository.
    pub directory: Option<String>,
    /// File name of the template.
    pub file_name: Option<String>,
    /// Static Markdown content.
    pub content: Option<String>,
}

/// Pull request and commit text as read from one configuration layer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawPullRequestConfig {
    /// Pull request title.
    pub title: Option<String>,
    /// Pull request description.
    pub description: Option<String>,
    /// Commit message.
    pub commit_message: Option<String>,
}

/// One configuration layer. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    /// `[azure_devops]` section.
    pub azure_devops: RawHostConfig,
    /// `[branches]` section.
    pub branches: RawBranchConfig,
    /// `[template]` section.
    pub template: RawTemplateConfig,
    /// `[pull_request]` section.
    pub pull_request: RawPullRequestConfig,
    /// Repository names to skip.
    pub exclude: Vec<String>,
    /// Access token. Never deserialised.
    #[serde(skip)]
    pub token: Option<PersonalAccessToken>,
    /// Only list and check; make no changes.
    #[serde(skip)]
    pub dry_run: bool,
}

impl RawConfig {
    /// Layers `overrides` on top of `self`.
    ///
    /// Scalar values set in `overrides` win. Exclusions accumulate across
    /// layers. `dry_run` is set if either layer sets it.
    pub fn merge(self, overrides: RawConfig) -> RawConfig {
        let mut exclude = self.exclude;
        exclude.extend(overrides.exclude);
        RawConfig {
            azure_devops: RawHostConfig {
                service_url: overrides.azure_devops.service_url.or(self.azure_devops.service_url),
                organization: overrides.azure_devops.organization.or(self.azure_devops.organization),
                project: overrides.azure_devops.project.or(self.azure_devops.project),
                api_version: overrides.azure_devops.api_version.or(self.azure_devops.api_version),
                timeout_secs: overrides.azure_devops.timeout_secs.or(self.azure_devops.timeout_secs),
            },
            branches: RawBranchConfig {
                source: overrides.branches.source.or(self.branches.source),
                target: overrides.branches.target.or(self.branches.target),
            },
            template: RawTemplateConfig {
                directory: overrides.template.directory.or(self.template.directory),
                file_name: overrides.template.file_name.or(self.template.file_name),
                content: overrides.template.content.or(self.template.content),
            },
            pull_request: RawPullRequestConfig {
                title: overrides.pull_request.title.or(self.pull_request.title),
                description: overrides.pull_request.description.or(self.pull_request.description),
                commit_message: overrides
                    .pull_request
                    .commit_message
                    .or(self.pull_request.commit_message),
            },
            exclude,
            token: overrides.token.or(self.token),
            dry_run: self.dry_run || overrides.dry_run,
        }
    }

    /// Applies defaults and checks every invariant.
    ///
    /// # Errors
    ///
    /// [`RolloutError::Configuration`] when organization, project or token is
    /// missing, a value is blank, the service URL is not HTTP(S), or source and
    /// target branches are the same.
    pub fn validate(self) -> Result<RolloutConfig, RolloutError> {
        let organization = required(self.azure_devops.organization, "organization")?;
        let project = required(self.azure_devops.project, "project")?;
        let token = self
            .token
            .ok_or_else(|| config_error("a personal access token is required"))?;

        let service_url = self
            .azure_devops
            .service_url
            .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if !(service_url.starts_with("https://") || service_url.starts_with("http://")) {
            return Err(config_error(format!(
                "service URL must start with http:// or https://, got '{service_url}'"
            )));
        }

        let api_version = non_blank(
            self.azure_devops.api_version,
            DEFAULT_API_VERSION,
            "api_version",
        )?;
        let timeout = match self.azure_devops.timeout_secs {
            Some(0) => return Err(config_error("timeout_secs must be greater than zero")),
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_TIMEOUT,
        };

        let source_branch = branch(self.branches.source, DEFAULT_SOURCE_BRANCH, "source branch")?;
        let target_branch = branch(self.branches.target, DEFAULT_TARGET_BRANCH, "target branch")?;
        // Branch names are case-insensitive on the service.
        if source_branch
            .as_str()
            .eq_ignore_ascii_case(target_branch.as_str())
        {
            return Err(config_error(format!(
                "source and target branch are both '{source_branch}'"
            )));
        }

        let directory = self
            .template
            .directory
            .unwrap_or_else(|| DEFAULT_TEMPLATE_DIRECTORY.to_string());
        let file_name = self
            .template
            .file_name
            .unwrap_or_else(|| DEFAULT_TEMPLATE_FILE_NAME.to_string());
        let path = TemplatePath::new(&directory, &file_name)
            .ok_or_else(|| config_error("template file name must not be empty"))?;
        let content = self
            .template
            .content
            .unwrap_or_else(|| DEFAULT_TEMPLATE_CONTENT.to_string());

        Ok(RolloutConfig {
            host: HostConfig {
                service_url,
                organization,
                project,
                api_version,
                timeout,
                token,
            },
            exclusions: ExclusionList::new(&self.exclude),
            source_branch,
            target_branch,
            template: TemplateDocument { path, content },
            pull_request: PullRequestText {
                title: non_blank(self.pull_request.title, DEFAULT_PULL_REQUEST_TITLE, "title")?,
                description: self
                    .pull_request
                    .description
                    .unwrap_or_else(|| DEFAULT_PULL_REQUEST_DESCRIPTION.to_string()),
                commit_message: non_blank(
                    self.pull_request.commit_message,
                    DEFAULT_COMMIT_MESSAGE,
                    "commit_message",
                )?,
            },
            mode: if self.dry_run {
                RunMode::DryRun
            } else {
                RunMode::Apply
            },
        })
    }
}

fn config_error(message: impl Into<String>) -> RolloutError {
    RolloutError::Configuration {
        message: message.into(),
    }
}

fn required(value: Option<String>, name: &str) -> Result<String, RolloutError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(config_error(format!("{name} is required"))),
    }
}

fn non_blank(value: Option<String>, default: &str, name: &str) -> Result<String, RolloutError> {
    match value {
        None => Ok(default.to_string()),
        Some(v) if v.trim().is_empty() => Err(config_error(format!("{name} must not be blank"))),
        Some(v) => Ok(v),
    }
}

fn branch(value: Option<String>, default: &str, name: &str) -> Result<BranchName, RolloutError> {
    let raw = non_blank(value, default, name)?;
    let trimmed = raw.trim().trim_start_matches("refs/heads/");
    BranchName::new(trimmed).ok_or_else(|| config_error(format!("{name} must not be blank")))
}

// ---------------------------------------------------------------------------
// Validated configuration
// ---------------------------------------------------------------------------

/// Where and how to reach the hosting service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Root URL without trailing slash.
    pub service_url: String,
    /// Organization name.
    pub organization: String,
    /// Project name.
    pub project: String,
    /// REST API version sent as `api-version`.
    pub api_version: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Basic auth password.
    pub token: PersonalAccessToken,
}

/// Fixed text for the commit and pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestText {
    /// Pull request title.
    pub title: String,
    /// Pull request description.
    pub description: String,
    /// Message of the commit adding the template.
    pub commit_message: String,
}

/// Whether the rollout changes anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Create branches, commits and pull requests.
    Apply,
    /// Only list repositories and check for the template.
    DryRun,
}

/// Fully validated configuration for one rollout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolloutConfig {
    /// Service connection.
    pub host: HostConfig,
    /// Repositories to skip.
    pub exclusions: ExclusionList,
    /// Branch created to carry the template.
    pub source_branch: BranchName,
    /// Base branch and pull request target.
    pub target_branch: BranchName,
    /// The template to commit.
    pub template: TemplateDocument,
    /// Commit and pull request text.
    pub pull_request: PullRequestText,
    /// Apply or dry run.
    pub mode: RunMode,
}
