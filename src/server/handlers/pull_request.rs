use crate::error::UpstreamError;
use crate::event::{PullRequestEvent, PullRequestPayload};
use crate::github::{GitHubClient, PullRequestDetail};
use crate::jira::JiraClient;
use crate::sync::{synchronize, SyncOutcome};

#[derive(Debug)]
pub(crate) enum PullRequestReport {
    /// Enrichment failed; nothing was synchronized.
    Abandoned(UpstreamError),
    Processed {
        detail: PullRequestDetail,
        sync: Option<SyncOutcome>,
    },
}

pub(crate) fn summarize(payload: &PullRequestPayload) {
    tracing::info!(
        "PR event: {} - #{}: {}",
        payload.action,
        payload.pull_request.number,
        payload.pull_request.title
    );
}

/// Enrich the pull request, then synchronize its tracked issue when a tracker is configured.
pub(crate) async fn process(
    github: &GitHubClient,
    tracker: Option<&JiraClient>,
    payload: PullRequestPayload,
) -> PullRequestReport {
    let pr = PullRequestEvent::from(payload);
    tracing::info!(
        action = %pr.action,
        repository = %pr.repository,
        number = pr.number,
        author = %pr.author,
        "Detailed PR event"
    );

    let detail = match github.fetch_pull_request_detail(&pr.repository, pr.number).await {
        Ok(detail) => detail,
        Err(error) => {
            tracing::error!(%error, "Failed to get PR details");
            return PullRequestReport::Abandoned(error);
        }
    };

    let sync = match tracker {
        Some(tracker) => Some(synchronize(tracker, &pr, &detail.changed_files()).await),
        None => None,
    };
    log_detail(&pr, &detail);
    PullRequestReport::Processed { detail, sync }
}

fn log_detail(pr: &PullRequestEvent, detail: &PullRequestDetail) {
    let fetched = &detail.pull_request;
    tracing::info!(
        title = %fetched.title,
        number = fetched.number,
        author = fetched.user.as_ref().map_or("", |u| u.login.as_str()),
        state = %fetched.state,
        source_branch = %fetched.head.git_ref,
        target_branch = %fetched.base.git_ref,
        files_changed = detail.files.len(),
        reviews = detail.review_count(),
        approvals = detail.approvals(),
        "Pull request {}",
        pr.action.to_string().to_uppercase()
    );
    for (i, file) in detail.files.iter().enumerate() {
        tracing::info!(
            "  {}. {} (+{}/-{}) [{}]",
            i + 1,
            file.filename,
            file.additions,
            file.deletions,
            file.status
        );
    }
}
