//! Wire types for the Azure DevOps Git REST API.
//!
//! Only the fields the rollout reads or writes are modelled; everything else
//! in the service's responses is ignored.

use serde::{Deserialize, Serialize};

/// Envelope used by every list endpoint: `{ "count": n, "value": [...] }`.
#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse<T> {
    pub value: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GitRepository {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GitRef {
    #[serde(default)]
    pub name: Option<String>,
    pub object_id: String,
}

// ---------------------------------------------------------------------------
// Ref updates
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GitRefUpdate<'a> {
    pub name: String,
    pub old_object_id: &'a str,
    pub new_object_id: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GitRefUpdateResult {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub update_status: Option<String>,
}

// ---------------------------------------------------------------------------
// Pushes
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GitPush<'a> {
    pub ref_updates: Vec<GitPushRefUpdate<'a>>,
    pub commits: Vec<GitCommit<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GitPushRefUpdate<'a> {
    pub name: String,
    pub old_object_id: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct GitCommit<'a> {
    pub comment: &'a str,
    pub changes: Vec<GitChange<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GitChange<'a> {
    pub change_type: ChangeType,
    pub item: GitItem<'a>,
    pub new_content: ItemContent<'a>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ChangeType {
    Add,
}

#[derive(Debug, Serialize)]
pub(crate) struct GitItem<'a> {
    pub path: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ItemContent<'a> {
    pub content: &'a str,
    pub content_type: ContentType,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ContentType {
    RawText,
}

// ---------------------------------------------------------------------------
// Pull requests
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GitPullRequestCreate<'a> {
    pub source_ref_name: String,
    pub target_ref_name: String,
    pub title: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GitPullRequest {
    pub pull_request_id: u64,
}
