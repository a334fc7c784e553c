//! Drives a pull request's tracked issue through `Open_PR` and `Merged_PR`.
//!
//! No mapping from pull request to issue is kept here: the tracker is searched
//! by the `pr-<number>` label whenever an existing issue is needed.

use crate::error::TrackerError;
use crate::event::{PullRequestAction, PullRequestEvent};
use crate::jira::JiraClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SyncStep {
    CreateIssue,
    MoveToMerged,
    /// Closed without merging; the issue stays where it is.
    Abandoned,
    /// New commits on an open pull request.
    KeepOpen,
    Ignore,
}

impl SyncStep {
    pub(crate) fn plan(pr: &PullRequestEvent) -> Self {
        match pr.action {
            PullRequestAction::Opened => SyncStep::CreateIssue,
            PullRequestAction::Closed if pr.merged => SyncStep::MoveToMerged,
            PullRequestAction::Closed => SyncStep::Abandoned,
            PullRequestAction::Synchronize => SyncStep::KeepOpen,
            PullRequestAction::Other(_) => SyncStep::Ignore,
        }
    }
}

#[derive(Debug)]
pub(crate) enum SyncOutcome {
    Created { issue_key: String },
    Merged { issue_key: String },
    Unchanged(SyncStep),
    Failed { step: SyncStep, error: TrackerError },
}

/// Apply the step planned for `pr`. Failures are logged and returned, never retried.
pub(crate) async fn synchronize(
    tracker: &JiraClient,
    pr: &PullRequestEvent,
    changed_files: &[String],
) -> SyncOutcome {
    let step = SyncStep::plan(pr);
    let result = match step {
        SyncStep::CreateIssue => {
            tracing::info!("Creating Jira issue for PR #{} in {}", pr.number, pr.repository);
            tracker
                .create_tracked_issue(pr, changed_files)
                .await
                .map(|issue_key| SyncOutcome::Created { issue_key })
        }
        SyncStep::MoveToMerged => {
            tracing::info!("Moving PR #{} to Merged_PR status in Jira", pr.number);
            tracker
                .move_to_merged(pr.number)
                .await
                .map(|issue_key| SyncOutcome::Merged { issue_key })
        }
        SyncStep::KeepOpen => {
            tracing::info!("PR #{} updated - keeping existing Jira issue", pr.number);
            Ok(SyncOutcome::Unchanged(step))
        }
        SyncStep::Abandoned | SyncStep::Ignore => Ok(SyncOutcome::Unchanged(step)),
    };
    match &result {
        Ok(SyncOutcome::Created { issue_key }) => {
            tracing::info!(
                issue = %issue_key,
                "Created Jira issue for PR #{} in {}",
                pr.number,
                tracker.project()
            );
        }
        Ok(SyncOutcome::Merged { issue_key }) => {
            tracing::info!(issue = %issue_key, "Moved PR #{} to Merged_PR status", pr.number);
        }
        Ok(_) => {}
        Err(error) => {
            tracing::error!(%error, "Jira synchronization for PR #{} failed", pr.number);
        }
    }
    result.unwrap_or_else(|error| SyncOutcome::Failed { step, error })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;
    use wiremock::{
        matchers::{body_partial_json, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;
    use crate::event::PullRequestPayload;
    use crate::fixtures;
    use crate::jira::tests::{client, mount_transitions};

    fn pr(action: &str, merged: bool) -> PullRequestEvent {
        serde_json::from_value::<PullRequestPayload>(fixtures::pull_request(action, merged))
            .unwrap()
            .into()
    }

    #[rstest]
    #[case("opened", false, SyncStep::CreateIssue)]
    #[case("closed", true, SyncStep::MoveToMerged)]
    #[case("closed", false, SyncStep::Abandoned)]
    #[case("synchronize", false, SyncStep::KeepOpen)]
    #[case("reopened", false, SyncStep::Ignore)]
    #[case("edited", true, SyncStep::Ignore)]
    fn test_plan(#[case] action: &str, #[case] merged: bool, #[case] step: SyncStep) {
        assert_eq!(SyncStep::plan(&pr(action, merged)), step);
    }

    async fn mount_create(mock_server: &MockServer, expect: u64) {
        let reply = json!({ "id": "1001", "key": "REP-1" });
        Mock::given(method("POST"))
            .and(path("/rest/api/2/issue"))
            .and(body_partial_json(json!({ "fields": { "labels": ["github-pr", "pr-42"] } })))
            .respond_with(ResponseTemplate::new(201).set_body_json(reply))
            .expect(expect)
            .mount(mock_server)
            .await;
    }

    #[tokio::test]
    async fn test_opened_creates_issue_and_tries_open_transition_once() {
        let mock_server = MockServer::start().await;
        mount_create(&mock_server, 1).await;
        // transition listing fails: the issue is still reported as created
        Mock::given(method("GET"))
            .and(path("/rest/api/2/issue/REP-1/transitions"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&mock_server)
            .await;

        let outcome = synchronize(&client(&mock_server), &pr("opened", false), &[]).await;
        assert!(matches!(outcome, SyncOutcome::Created { ref issue_key } if issue_key == "REP-1"));
    }

    #[tokio::test]
    async fn test_redelivered_opened_creates_two_issues() {
        let mock_server = MockServer::start().await;
        mount_create(&mock_server, 2).await;
        mount_transitions(&mock_server, "REP-1", 2).await;
        Mock::given(method("POST"))
            .and(path("/rest/api/2/issue/REP-1/transitions"))
            .respond_with(ResponseTemplate::new(204))
            .expect(2)
            .mount(&mock_server)
            .await;

        let tracker = client(&mock_server);
        let event = pr("opened", false);
        synchronize(&tracker, &event, &[]).await;
        synchronize(&tracker, &event, &[]).await;
    }

    #[tokio::test]
    async fn test_merged_finds_by_label_then_transitions() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .and(query_param(
                "jql",
                r#"project = "REP" AND labels = "pr-42" ORDER BY created DESC"#,
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 1,
                "issues": [{ "key": "REP-9" }],
            })))
            .expect(1)
            .mount(&mock_server)
            .await;
        mount_transitions(&mock_server, "REP-9", 1).await;
        Mock::given(method("POST"))
            .and(path("/rest/api/2/issue/REP-9/transitions"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let outcome = synchronize(&client(&mock_server), &pr("closed", true), &[]).await;
        assert!(matches!(outcome, SyncOutcome::Merged { ref issue_key } if issue_key == "REP-9"));
    }

    #[tokio::test]
    async fn test_merged_without_issue_never_transitions() {
        let mock_server = MockServer::start().await;
        let reply = json!({ "total": 0, "issues": [] });
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply))
            .expect(1)
            .mount(&mock_server)
            .await;

        let outcome = synchronize(&client(&mock_server), &pr("closed", true), &[]).await;
        assert!(matches!(
            outcome,
            SyncOutcome::Failed {
                step: SyncStep::MoveToMerged,
                error: TrackerError::NotFound { .. }
            }
        ));
        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
    }

    #[rstest]
    #[case("closed", false, SyncStep::Abandoned)]
    #[case("synchronize", false, SyncStep::KeepOpen)]
    #[case("labeled", false, SyncStep::Ignore)]
    #[tokio::test]
    async fn test_no_tracker_calls(
        #[case] action: &str,
        #[case] merged: bool,
        #[case] step: SyncStep,
    ) {
        let mock_server = MockServer::start().await;

        let outcome = synchronize(&client(&mock_server), &pr(action, merged), &[]).await;
        assert!(matches!(outcome, SyncOutcome::Unchanged(s) if s == step));
        let requests = mock_server.received_requests().await.unwrap();
        assert!(requests.is_empty());
    }
}
