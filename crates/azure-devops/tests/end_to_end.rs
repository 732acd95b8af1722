//! Whole rollouts against a mockito server.

mod common;

use common::*;
use mockito::{Matcher, Server};
use rollout::{CommitSha, PullRequestId, RepositoryOutcome, RunId, Step};

#[tokio::test]
async fn missing_template_gets_branch_commit_and_pull_request() {
    let mut server = Server::new_async().await;
    let list = mock_list(&mut server, &["A", "B"]).await;
    let check = mock_check(&mut server, "A", 404).await;
    let tip = mock_tip(&mut server, "A", &[DEV_TIP]).await;
    let branch = mock_create_branch(&mut server, "A", DEV_TIP).await;
    let push = mock_push(&mut server, "A", DEV_TIP).await;
    let pr = mock_pull_request(&mut server, "A", 17).await;
    let untouched = server
        .mock("GET", Matcher::Regex(r"^/contoso/Platform/_apis/git/repositories/B/".into()))
        .expect(0)
        .create_async()
        .await;
    let config = config(&server, &["b"]);

    let summary = workflow::run(&client(&config), &config, RunId::new_random())
        .await
        .unwrap();

    for mock in [&list, &check, &tip, &branch, &push, &pr, &untouched] {
        mock.assert_async().await;
    }
    assert_eq!(
        summary.outcome_of("A"),
        Some(&RepositoryOutcome::Created {
            base_commit: CommitSha::new(DEV_TIP).unwrap(),
            pull_request: PullRequestId::new(17),
        })
    );
    assert!(summary.outcome_of("B").is_none());
    assert_eq!(summary.excluded.len(), 1);
}

#[tokio::test]
async fn existing_template_stops_after_check() {
    let mut server = Server::new_async().await;
    let list = mock_list(&mut server, &["A"]).await;
    let check = mock_check(&mut server, "A", 200).await;
    let writes = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let config = config(&server, &[]);

    let summary = workflow::run(&client(&config), &config, RunId::new_random())
        .await
        .unwrap();

    list.assert_async().await;
    check.assert_async().await;
    writes.assert_async().await;
    assert_eq!(summary.outcome_of("A"), Some(&RepositoryOutcome::TemplateExists));
}

#[tokio::test]
async fn server_error_on_check_fails_only_that_repository() {
    let mut server = Server::new_async().await;
    let list = mock_list(&mut server, &["A", "C"]).await;
    let check_a = mock_check(&mut server, "A", 500).await;
    let check_c = mock_check(&mut server, "C", 200).await;
    let config = config(&server, &[]);

    let summary = workflow::run(&client(&config), &config, RunId::new_random())
        .await
        .unwrap();

    list.assert_async().await;
    check_a.assert_async().await;
    check_c.assert_async().await;
    assert!(matches!(
        summary.outcome_of("A"),
        Some(RepositoryOutcome::Failed {
            step: Step::CheckTemplate,
            ..
        })
    ));
    assert_eq!(summary.outcome_of("C"), Some(&RepositoryOutcome::TemplateExists));
    assert!(summary.has_failures());
}
