//! Command-line arguments.
//!
//! Every flag except `--config`, `--json` and the logging options maps onto a
//! [`RawConfig`] field; most also fall back to an environment variable. The
//! resulting layer is merged on top of the configuration file.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use rollout::config::{
    RawBranchConfig, RawHostConfig, RawPullRequestConfig, RawTemplateConfig,
};
use rollout::{PersonalAccessToken, RawConfig};

/// Environment variable holding the personal access token.
pub const TOKEN_ENV: &str = "AZURE_DEVOPS_PAT";

/// Log line format on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

/// Adds a pull request template to every repository of an Azure DevOps
/// project that does not have one yet.
///
/// The personal access token is read from the AZURE_DEVOPS_PAT environment
/// variable.
#[derive(Debug, Parser)]
#[command(name = "pr-template-rollout", version)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(long, env = "PR_TEMPLATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Azure DevOps organization.
    #[arg(long, env = "AZURE_DEVOPS_ORG")]
    pub organization: Option<String>,

    /// Azure DevOps project.
    #[arg(long, env = "AZURE_DEVOPS_PROJECT")]
    pub project: Option<String>,

    /// Service root URL [default: https://dev.azure.com].
    #[arg(long, env = "AZURE_DEVOPS_URL")]
    pub service_url: Option<String>,

    /// REST API version [default: 6.0].
    #[arg(long)]
    pub api_version: Option<String>,

    /// Per-request timeout in seconds [default: 30].
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Repository to skip (repeatable, case-insensitive). Adds to the file's list.
    #[arg(long = "exclude", env = "PR_TEMPLATE_EXCLUDE", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Branch to create [default: feature/add-pr-template].
    #[arg(long)]
    pub source_branch: Option<String>,

    /// Branch to start from and open the pull request against [default: dev].
    #[arg(long)]
    pub target_branch: Option<String>,

    /// Template directory inside each repository.
    #[arg(long)]
    pub template_directory: Option<String>,

    /// Template file name.
    #[arg(long)]
    pub template_file_name: Option<String>,

    /// Only list repositories and check for the template; change nothing.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the summary as JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Log format.
    #[arg(long, value_enum, env = "PR_TEMPLATE_LOG_FORMAT", default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// OTLP gRPC endpoint for span export (disabled when unset).
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

impl Cli {
    /// Converts the flags into a configuration layer.
    ///
    /// `token` is taken as a parameter so the environment lookup stays at the
    /// call site.
    pub fn overrides(&self, token: Option<PersonalAccessToken>) -> RawConfig {
        RawConfig {
            azure_devops: RawHostConfig {
                service_url: self.service_url.clone(),
                organization: self.organization.clone(),
                project: self.project.clone(),
                api_version: self.api_version.clone(),
                timeout_secs: self.timeout_secs,
            },
            branches: RawBranchConfig {
                source: self.source_branch.clone(),
                target: self.target_branch.clone(),
            },
            template: RawTemplateConfig {
                directory: self.template_directory.clone(),
                file_name: self.template_file_name.clone(),
                content: None,
            },
            pull_request: RawPullRequestConfig::default(),
            exclude: self.exclude.clone(),
            token,
            dry_run: self.dry_run,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_become_a_configuration_layer() {
        let cli = Cli::try_parse_from([
            "pr-template-rollout",
            "--organization",
            "contoso",
            "--project",
            "Platform",
            "--exclude",
            "Legacy,Sandbox",
            "--exclude",
            "Docs",
            "--target-branch",
            "main",
            "--dry-run",
        ])
        .unwrap();

        let raw = cli.overrides(PersonalAccessToken::new("pat"));

        assert_eq!(raw.azure_devops.organization.as_deref(), Some("contoso"));
        assert_eq!(raw.exclude, vec!["Legacy", "Sandbox", "Docs"]);
        assert_eq!(raw.branches.target.as_deref(), Some("main"));
        assert!(raw.dry_run);
        assert!(raw.token.is_some());
    }
}
