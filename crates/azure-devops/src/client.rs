//! HTTP client for the Azure DevOps Git REST API.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client as HttpClient, Method, RequestBuilder, Response, Url};
use rollout::{
    BranchName, CommitSha, HostConfig, HostError, NewBranch, PersonalAccessToken,
    PullRequestDraft, PullRequestId, RepositoryHost, RepositoryName, Step, TemplateCommit,
    TemplatePath, NULL_OBJECT_ID,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::models::{
    ChangeType, ContentType, GitChange, GitCommit, GitItem, GitPullRequest, GitPullRequestCreate,
    GitPush, GitPushRefUpdate, GitRef, GitRefUpdate, GitRefUpdateResult, GitRepository,
    ItemContent, ListResponse,
};

/// Longest response body kept in an error message.
const MAX_ERROR_BODY: usize = 512;

/// Errors raised while constructing an [`AzureDevOpsClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The service URL cannot be used as a base for API paths.
    #[error("invalid service URL '{url}': {message}")]
    InvalidServiceUrl {
        /// The offending URL.
        url: String,
        /// Why it was rejected.
        message: String,
    },

    /// The underlying HTTP client could not be built (e.g. TLS backend failure).
    #[error("failed to build HTTP client")]
    Http(#[from] reqwest::Error),
}

/// Azure DevOps implementation of [`RepositoryHost`], scoped to one project.
///
/// Every request uses Basic auth with an empty user name and the personal
/// access token as password, sends `Accept: application/json`, and carries
/// the configured `api-version` query parameter.
#[derive(Debug, Clone)]
pub struct AzureDevOpsClient {
    http: HttpClient,
    project_url: Url,
    api_version: String,
    token: PersonalAccessToken,
}

impl AzureDevOpsClient {
    /// Creates a client for `<service_url>/<organization>/<project>`.
    ///
    /// # Errors
    ///
    /// [`ClientError::InvalidServiceUrl`] if the URL does not parse or cannot
    /// carry a path, [`ClientError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &HostConfig) -> Result<Self, ClientError> {
        let invalid = |message: String| ClientError::InvalidServiceUrl {
            url: config.service_url.clone(),
            message,
        };

        let mut project_url = Url::parse(&config.service_url).map_err(|e| invalid(e.to_string()))?;
        project_url
            .path_segments_mut()
            .map_err(|()| invalid("URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push(&config.organization)
            .push(&config.project);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = HttpClient::builder()
            .user_agent(concat!("pr-template-rollout/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            project_url,
            api_version: config.api_version.clone(),
            token: config.token.clone(),
        })
    }

    /// Returns the project root, `<service_url>/<organization>/<project>`.
    pub fn project_url(&self) -> &Url {
        &self.project_url
    }

    /// Returns `<project>/_apis/git/repositories[/<repository>[/<resource>]]?api-version=..`.
    fn git_url(&self, repository: Option<&RepositoryName>, resource: Option<&str>) -> Url {
        let mut url = self.project_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.extend(["_apis", "git", "repositories"]);
            if let Some(repository) = repository {
                segments.push(repository.as_str());
            }
            if let Some(resource) = resource {
                segments.push(resource);
            }
        }
        url.query_pairs_mut()
            .append_pair("api-version", &self.api_version);
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "Sending request");
        self.http
            .request(method, url)
            .basic_auth("", Some(self.token.expose()))
    }

    async fn send(&self, step: Step, request: RequestBuilder) -> Result<Response, HostError> {
        request.send().await.map_err(|e| HostError::Transport {
            step,
            message: e.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, step: Step, url: Url) -> Result<T, HostError> {
        let response = self.send(step, self.request(Method::GET, url)).await?;
        let response = ensure_success(step, response).await?;
        decode(step, response).await
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        step: Step,
        url: Url,
        body: &B,
    ) -> Result<Response, HostError> {
        let response = self
            .send(step, self.request(Method::POST, url).json(body))
            .await?;
        ensure_success(step, response).await
    }
}

async fn ensure_success(step: Step, response: Response) -> Result<Response, HostError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(HostError::UnexpectedStatus {
        step,
        status: status.as_u16(),
        body: body.chars().take(MAX_ERROR_BODY).collect(),
    })
}

async fn decode<T: DeserializeOwned>(step: Step, response: Response) -> Result<T, HostError> {
    let text = response.text().await.map_err(|e| HostError::Transport {
        step,
        message: e.to_string(),
    })?;
    serde_json::from_str(&text).map_err(|e| HostError::InvalidResponse {
        step,
        message: e.to_string(),
    })
}

#[async_trait]
impl RepositoryHost for AzureDevOpsClient {
    async fn list_repositories(&self) -> Result<Vec<RepositoryName>, HostError> {
        let step = Step::ListRepositories;
        let listing: ListResponse<GitRepository> =
            self.get_json(step, self.git_url(None, None)).await?;

        listing
            .value
            .into_iter()
            .map(|repo| {
                RepositoryName::new(repo.name).ok_or_else(|| HostError::InvalidResponse {
                    step,
                    message: "repository with an empty name".to_string(),
                })
            })
            .collect()
    }

    async fn file_exists(
        &self,
        repository: &RepositoryName,
        path: &TemplatePath,
    ) -> Result<bool, HostError> {
        let step = Step::CheckTemplate;
        let mut url = self.git_url(Some(repository), Some("items"));
        url.query_pairs_mut().append_pair("path", path.as_str());

        let response = self.send(step, self.request(Method::GET, url)).await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(false);
        }
        // The item body is not needed; a 2xx status is the answer.
        ensure_success(step, response).await.map(|_| true)
    }

    async fn branch_tip(
        &self,
        repository: &RepositoryName,
        branch: &BranchName,
    ) -> Result<Option<CommitSha>, HostError> {
        let step = Step::ReadBaseBranch;
        let mut url = self.git_url(Some(repository), Some("refs"));
        url.query_pairs_mut()
            .append_pair("filter", &branch.ref_filter());

        let refs: ListResponse<GitRef> = self.get_json(step, url).await?;
        let Some(first) = refs.value.into_iter().next() else {
            return Ok(None);
        };
        debug!(%repository, ref_name = ?first.name, object_id = %first.object_id, "Base branch tip");

        CommitSha::new(first.object_id)
            .map(Some)
            .ok_or_else(|| HostError::InvalidResponse {
                step,
                message: "ref with an empty objectId".to_string(),
            })
    }

    async fn create_branch(
        &self,
        repository: &RepositoryName,
        branch: NewBranch<'_>,
    ) -> Result<(), HostError> {
        let step = Step::CreateBranch;
        let ref_name = branch.branch.ref_name();
        let body = [GitRefUpdate {
            name: ref_name.clone(),
            old_object_id: NULL_OBJECT_ID,
            new_object_id: branch.at.as_str(),
        }];

        let response = self
            .post_json(step, self.git_url(Some(repository), Some("refs")), &body)
            .await?;
        let results: ListResponse<GitRefUpdateResult> = decode(step, response).await?;

        match results.value.into_iter().find(|r| r.success == Some(false)) {
            Some(rejected) => Err(HostError::RefUpdateRejected {
                ref_name: rejected.name.unwrap_or(ref_name),
                status: rejected
                    .update_status
                    .unwrap_or_else(|| "unknown".to_string()),
            }),
            None => Ok(()),
        }
    }

    async fn push_commit(
        &self,
        repository: &RepositoryName,
        commit: TemplateCommit<'_>,
    ) -> Result<(), HostError> {
        let body = GitPush {
            ref_updates: vec![GitPushRefUpdate {
                name: commit.branch.ref_name(),
                old_object_id: commit.parent.as_str(),
            }],
            commits: vec![GitCommit {
                comment: commit.message,
                changes: vec![GitChange {
                    change_type: ChangeType::Add,
                    item: GitItem {
                        path: commit.document.path.as_str(),
                    },
                    new_content: ItemContent {
                        content: &commit.document.content,
                        content_type: ContentType::RawText,
                    },
                }],
            }],
        };

        self.post_json(
            Step::PushCommit,
            self.git_url(Some(repository), Some("pushes")),
            &body,
        )
        .await
        .map(|_| ())
    }

    async fn create_pull_request(
        &self,
        repository: &RepositoryName,
        draft: PullRequestDraft<'_>,
    ) -> Result<PullRequestId, HostError> {
        let step = Step::OpenPullRequest;
        let body = GitPullRequestCreate {
            source_ref_name: draft.source.ref_name(),
            target_ref_name: draft.target.ref_name(),
            title: &draft.text.title,
            description: &draft.text.description,
        };

        let response = self
            .post_json(
                step,
                self.git_url(Some(repository), Some("pullrequests")),
                &body,
            )
            .await?;
        let created: GitPullRequest = decode(step, response).await?;
        Ok(PullRequestId::new(created.pull_request_id))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn host_config(service_url: &str) -> HostConfig {
        HostConfig {
            service_url: service_url.to_string(),
            organization: "contoso".to_string(),
            project: "Platform Team".to_string(),
            api_version: "6.0".to_string(),
            timeout: Duration::from_secs(5),
            token: PersonalAccessToken::new("pat").unwrap(),
        }
    }

    #[test]
    fn urls_are_scoped_to_the_project_and_versioned() {
        let client = AzureDevOpsClient::new(&host_config("https://dev.azure.com")).unwrap();
        let repository = RepositoryName::new("web app").unwrap();

        assert_eq!(
            client.git_url(None, None).as_str(),
            "https://dev.azure.com/contoso/Platform%20Team/_apis/git/repositories?api-version=6.0"
        );
        assert_eq!(
            client.git_url(Some(&repository), Some("refs")).as_str(),
            "https://dev.azure.com/contoso/Platform%20Team/_apis/git/repositories/web%20app/refs?api-version=6.0"
        );
    }

    #[test]
    fn trailing_slash_in_service_url_is_ignored() {
        let client = AzureDevOpsClient::new(&host_config("http://localhost:8080/tfs/")).unwrap();
        assert_eq!(
            client.project_url().as_str(),
            "http://localhost:8080/tfs/contoso/Platform%20Team"
        );
    }

    #[test]
    fn unparseable_service_url_is_rejected() {
        let err = AzureDevOpsClient::new(&host_config("not a url")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidServiceUrl { .. }));
    }
}
