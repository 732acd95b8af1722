//! `AzureDevOpsClient` against a mockito server, one operation at a time.

mod common;

use common::*;
use mockito::Server;
use rollout::{
    BranchName, CommitSha, HostError, NewBranch, PullRequestDraft, RepositoryHost,
    RepositoryName, Step, TemplateCommit,
};

fn repo(name: &str) -> RepositoryName {
    RepositoryName::new(name).unwrap()
}

#[tokio::test]
async fn lists_repository_names_in_service_order() {
    let mut server = Server::new_async().await;
    let list = mock_list(&mut server, &["Zeta", "Alpha", "Mid"]).await;
    let config = config(&server, &[]);

    let names = client(&config).list_repositories().await.unwrap();

    list.assert_async().await;
    assert_eq!(names, vec![repo("Zeta"), repo("Alpha"), repo("Mid")]);
}

#[tokio::test]
async fn listing_rejects_unauthorised() {
    let mut server = Server::new_async().await;
    let list = server
        .mock("GET", REPOS_PATH)
        .match_query(api_version())
        .with_status(401)
        .with_body("TF400813: not authorized")
        .create_async()
        .await;
    let config = config(&server, &[]);

    let err = client(&config).list_repositories().await.unwrap_err();

    list.assert_async().await;
    assert_eq!(
        err,
        HostError::UnexpectedStatus {
            step: Step::ListRepositories,
            status: 401,
            body: "TF400813: not authorized".into(),
        }
    );
}

#[tokio::test]
async fn existence_check_maps_statuses() {
    let mut server = Server::new_async().await;
    let present = mock_check(&mut server, "Present", 200).await;
    let absent = mock_check(&mut server, "Absent", 404).await;
    let broken = mock_check(&mut server, "Broken", 500).await;
    let config = config(&server, &[]);
    let client = client(&config);
    let path = &config.template.path;

    assert!(client.file_exists(&repo("Present"), path).await.unwrap());
    assert!(!client.file_exists(&repo("Absent"), path).await.unwrap());
    let err = client.file_exists(&repo("Broken"), path).await.unwrap_err();

    present.assert_async().await;
    absent.assert_async().await;
    broken.assert_async().await;
    assert!(matches!(
        err,
        HostError::UnexpectedStatus {
            step: Step::CheckTemplate,
            status: 500,
            ..
        }
    ));
}

#[tokio::test]
async fn branch_tip_uses_first_ref() {
    let mut server = Server::new_async().await;
    let tip = mock_tip(
        &mut server,
        "Web",
        &[DEV_TIP, "ffffffffffffffffffffffffffffffffffffffff"],
    )
    .await;
    let config = config(&server, &[]);

    let commit = client(&config)
        .branch_tip(&repo("Web"), &config.target_branch)
        .await
        .unwrap();

    tip.assert_async().await;
    assert_eq!(commit, CommitSha::new(DEV_TIP));
}

#[tokio::test]
async fn branch_tip_without_refs_is_none() {
    let mut server = Server::new_async().await;
    let tip = mock_tip(&mut server, "Web", &[]).await;
    let config = config(&server, &[]);

    let commit = client(&config)
        .branch_tip(&repo("Web"), &BranchName::new("dev").unwrap())
        .await
        .unwrap();

    tip.assert_async().await;
    assert!(commit.is_none());
}

#[tokio::test]
async fn create_branch_sends_null_old_object_id() {
    let mut server = Server::new_async().await;
    let create = mock_create_branch(&mut server, "Web", DEV_TIP).await;
    let config = config(&server, &[]);
    let at = CommitSha::new(DEV_TIP).unwrap();

    client(&config)
        .create_branch(
            &repo("Web"),
            NewBranch {
                branch: &config.source_branch,
                at: &at,
            },
        )
        .await
        .unwrap();

    create.assert_async().await;
}

#[tokio::test]
async fn rejected_ref_update_is_an_error() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", repo_path("Web", "refs").as_str())
        .match_query(api_version())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"count":1,"value":[{"name":"refs/heads/feature/add-pr-template","success":false,"updateStatus":"staleOldObjectId"}]}"#,
        )
        .create_async()
        .await;
    let config = config(&server, &[]);
    let at = CommitSha::new(DEV_TIP).unwrap();

    let err = client(&config)
        .create_branch(
            &repo("Web"),
            NewBranch {
                branch: &config.source_branch,
                at: &at,
            },
        )
        .await
        .unwrap_err();

    create.assert_async().await;
    assert_eq!(
        err,
        HostError::RefUpdateRejected {
            ref_name: "refs/heads/feature/add-pr-template".into(),
            status: "staleOldObjectId".into(),
        }
    );
}

#[tokio::test]
async fn push_carries_template_content() {
    let mut server = Server::new_async().await;
    let push = mock_push(&mut server, "Web", DEV_TIP).await;
    let config = config(&server, &[]);
    let parent = CommitSha::new(DEV_TIP).unwrap();

    client(&config)
        .push_commit(
            &repo("Web"),
            TemplateCommit {
                branch: &config.source_branch,
                parent: &parent,
                message: &config.pull_request.commit_message,
                document: &config.template,
            },
        )
        .await
        .unwrap();

    push.assert_async().await;
}

#[tokio::test]
async fn pull_request_returns_service_id() {
    let mut server = Server::new_async().await;
    let pr = mock_pull_request(&mut server, "Web", 314).await;
    let config = config(&server, &[]);

    let id = client(&config)
        .create_pull_request(
            &repo("Web"),
            PullRequestDraft {
                source: &config.source_branch,
                target: &config.target_branch,
                text: &config.pull_request,
            },
        )
        .await
        .unwrap();

    pr.assert_async().await;
    assert_eq!(id.as_u64(), 314);
}

#[tokio::test]
async fn malformed_success_body_is_invalid_response() {
    let mut server = Server::new_async().await;
    let pr = server
        .mock("POST", repo_path("Web", "pullrequests").as_str())
        .match_query(api_version())
        .with_status(201)
        .with_body("not json")
        .create_async()
        .await;
    let config = config(&server, &[]);

    let err = client(&config)
        .create_pull_request(
            &repo("Web"),
            PullRequestDraft {
                source: &config.source_branch,
                target: &config.target_branch,
                text: &config.pull_request,
            },
        )
        .await
        .unwrap_err();

    pr.assert_async().await;
    assert!(matches!(
        err,
        HostError::InvalidResponse {
            step: Step::OpenPullRequest,
            ..
        }
    ));
}
