//! Shared fixtures for tests that run against a mockito server.

#![allow(dead_code)]

use azure_devops::AzureDevOpsClient;
use mockito::{Matcher, Mock, Server};
use rollout::{PersonalAccessToken, RawConfig, RolloutConfig};

/// `base64(":pat")`, the Basic auth value for an empty user and token `pat`.
pub const AUTHORIZATION: &str = "Basic OnBhdA==";

pub const REPOS_PATH: &str = "/contoso/Platform/_apis/git/repositories";

pub const TEMPLATE_PATH: &str = ".azuredevops/pull_request_template/pull_request_template.md";

pub const DEV_TIP: &str = "8d9f4e3c2b1a0f9e8d7c6b5a4f3e2d1c0b9a8f7e";

pub fn config(server: &Server, exclude: &[&str]) -> RolloutConfig {
    let mut raw = RawConfig {
        exclude: exclude.iter().map(|s| s.to_string()).collect(),
        token: PersonalAccessToken::new("pat"),
        ..Default::default()
    };
    raw.azure_devops.service_url = Some(server.url());
    raw.azure_devops.organization = Some("contoso".into());
    raw.azure_devops.project = Some("Platform".into());
    raw.validate().unwrap()
}

pub fn client(config: &RolloutConfig) -> AzureDevOpsClient {
    AzureDevOpsClient::new(&config.host).unwrap()
}

pub fn api_version() -> Matcher {
    Matcher::UrlEncoded("api-version".into(), "6.0".into())
}

pub fn repo_path(repository: &str, resource: &str) -> String {
    format!("{REPOS_PATH}/{repository}/{resource}")
}

pub async fn mock_list(server: &mut Server, names: &[&str]) -> Mock {
    let value: Vec<_> = names
        .iter()
        .map(|n| serde_json::json!({ "id": format!("id-{n}"), "name": n }))
        .collect();
    server
        .mock("GET", REPOS_PATH)
        .match_query(api_version())
        .match_header("authorization", AUTHORIZATION)
        .match_header("accept", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(serde_json::json!({ "count": names.len(), "value": value }).to_string())
        .create_async()
        .await
}

pub async fn mock_check(server: &mut Server, repository: &str, status: usize) -> Mock {
    server
        .mock("GET", repo_path(repository, "items").as_str())
        .match_query(Matcher::AllOf(vec![
            api_version(),
            Matcher::UrlEncoded("path".into(), TEMPLATE_PATH.into()),
        ]))
        .match_header("authorization", AUTHORIZATION)
        .with_status(status)
        .with_body("{}")
        .create_async()
        .await
}

pub async fn mock_tip(server: &mut Server, repository: &str, object_ids: &[&str]) -> Mock {
    let value: Vec<_> = object_ids
        .iter()
        .map(|id| serde_json::json!({ "name": "refs/heads/dev", "objectId": id }))
        .collect();
    server
        .mock("GET", repo_path(repository, "refs").as_str())
        .match_query(Matcher::AllOf(vec![
            api_version(),
            Matcher::UrlEncoded("filter".into(), "heads/dev".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(serde_json::json!({ "count": value.len(), "value": value }).to_string())
        .create_async()
        .await
}

pub async fn mock_create_branch(server: &mut Server, repository: &str, at: &str) -> Mock {
    server
        .mock("POST", repo_path(repository, "refs").as_str())
        .match_query(api_version())
        .match_header("authorization", AUTHORIZATION)
        .match_body(Matcher::Json(serde_json::json!([{
            "name": "refs/heads/feature/add-pr-template",
            "oldObjectId": "0000000000000000000000000000000000000000",
            "newObjectId": at,
        }])))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({
                "count": 1,
                "value": [{
                    "name": "refs/heads/feature/add-pr-template",
                    "newObjectId": at,
                    "oldObjectId": "0000000000000000000000000000000000000000",
                    "success": true,
                    "updateStatus": "succeeded"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await
}

pub async fn mock_push(server: &mut Server, repository: &str, parent: &str) -> Mock {
    server
        .mock("POST", repo_path(repository, "pushes").as_str())
        .match_query(api_version())
        .match_header("authorization", AUTHORIZATION)
        .match_body(Matcher::Json(serde_json::json!({
            "refUpdates": [{
                "name": "refs/heads/feature/add-pr-template",
                "oldObjectId": parent,
            }],
            "commits": [{
                "comment": "Added PR template for the repository",
                "changes": [{
                    "changeType": "add",
                    "item": { "path": TEMPLATE_PATH },
                    "newContent": { "content": "## Description", "contentType": "rawtext" }
                }]
            }]
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"pushId": 1}"#)
        .create_async()
        .await
}

pub async fn mock_pull_request(server: &mut Server, repository: &str, id: u64) -> Mock {
    server
        .mock("POST", repo_path(repository, "pullrequests").as_str())
        .match_query(api_version())
        .match_header("authorization", AUTHORIZATION)
        .match_body(Matcher::Json(serde_json::json!({
            "sourceRefName": "refs/heads/feature/add-pr-template",
            "targetRefName": "refs/heads/dev",
            "title": "Added PR template for the repository",
            "description": "This pull request adds PR template for the repository."
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(serde_json::json!({ "pullRequestId": id, "status": "active" }).to_string())
        .create_async()
        .await
}
