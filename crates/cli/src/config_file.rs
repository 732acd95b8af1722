//! TOML configuration file loading.
//!
//! ```toml
//! exclude = ["Legacy", "Sandbox"]
//!
//! [azure_devops]
//! organization = "contoso"
//! project = "Platform"
//!
//! [branches]
//! source = "feature/add-pr-template"
//! target = "dev"
//!
//! [template]
//! directory = ".azuredevops/pull_request_template"
//! file_name = "pull_request_template.md"
//! content = "## Description"
//!
//! [pull_request]
//! title = "Added PR template for the repository"
//! ```
//!
//! Unknown keys are rejected, which also keeps a `token` key out of the file.

use std::path::Path;

use anyhow::Context;
use rollout::RawConfig;

/// Reads and parses the configuration file at `path`.
pub fn load(path: &Path) -> anyhow::Result<RawConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading configuration file {}", path.display()))?;
    parse(&text).with_context(|| format!("parsing configuration file {}", path.display()))
}

/// Parses configuration file contents.
pub fn parse(text: &str) -> Result<RawConfig, toml::de::Error> {
    toml::from_str(text)
}
