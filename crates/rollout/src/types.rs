//! Shared value types for the rollout domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! values with invariants (paths are relative and non-empty, exclusions compare
//! case-insensitively) and participate in domain decisions.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::RepositoryName;

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

/// Repository-relative path of the pull request template file.
///
/// Built from a directory and a file name; the two are joined with a single
/// `/` regardless of leading or trailing separators in the inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplatePath(String);

impl TemplatePath {
    /// Joins `directory` and `file_name` into a template path.
    ///
    /// Returns `None` if `file_name` is empty after trimming separators.
    /// An empty `directory` places the file at the repository root.
    pub fn new(directory: &str, file_name: &str) -> Option<Self> {
        let file_name = file_name.trim_matches('/');
        if file_name.is_empty() {
            return None;
        }
        let directory = directory.trim_matches('/');
        if directory.is_empty() {
            Some(Self(file_name.to_string()))
        } else {
            Some(Self(format!("{directory}/{file_name}")))
        }
    }

    /// Returns the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TemplatePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The template file as it will be committed: where it goes and what it says.
///
/// Produced once per repository by the template writer and handed directly to
/// the commit pusher. The content is a static string; it is never rendered
/// per repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDocument {
    /// Destination path inside the repository.
    pub path: TemplatePath,
    /// Raw Markdown content of the file.
    pub content: String,
}

// ---------------------------------------------------------------------------
// Exclusions
// ---------------------------------------------------------------------------

/// Repository names that the rollout must never touch.
///
/// Matching is case-insensitive: `"Legacy"` excludes `"legacy"` and `"LEGACY"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionList(BTreeSet<String>);

impl ExclusionList {
    /// Builds an exclusion list from raw names. Blank entries are ignored.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            names
                .into_iter()
                .map(|n| n.as_ref().trim().to_lowercase())
                .filter(|n| !n.is_empty())
                .collect(),
        )
    }

    /// Returns `true` if `name` matches an excluded entry, ignoring case.
    pub fn contains(&self, name: &RepositoryName) -> bool {
        self.0.contains(&name.as_str().to_lowercase())
    }

    /// Number of distinct excluded names.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing is excluded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Splits `repositories` into those to process and those excluded,
    /// preserving the input order in both.
    pub fn partition(
        &self,
        repositories: Vec<RepositoryName>,
    ) -> (Vec<RepositoryName>, Vec<RepositoryName>) {
        repositories.into_iter().partition(|r| !self.contains(r))
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
