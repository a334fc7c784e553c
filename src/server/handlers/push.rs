use chrono::Utc;

use crate::constants::DIFF_UNAVAILABLE;
use crate::event::{PushCommit, PushPayload};
use crate::github::GitHubClient;

/// A pushed commit joined with the stats and diff fetched for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CommitDetail {
    pub sha: String,
    pub message: String,
    pub author_name: String,
    pub author_email: String,
    pub processed_at: String,
    pub files_changed: usize,
    pub additions: u64,
    pub deletions: u64,
    pub repository: String,
    pub branch: String,
    pub diff_text: String,
}

pub(crate) fn summarize(push: &PushPayload) {
    tracing::info!(
        "Push event detected in repo: {} by {}",
        push.repository.name,
        push.pusher.name
    );
}

/// Enrich every pushed commit in order. A commit whose details cannot be fetched is skipped;
/// a missing diff is replaced by a placeholder.
pub(crate) async fn process(github: &GitHubClient, push: &PushPayload) -> Vec<CommitDetail> {
    let repo = push.repository.name.as_str();
    let branch = push.branch();
    let Some(commits) = &push.commits else {
        tracing::error!("No commits found in push payload");
        return Vec::new();
    };
    tracing::info!(
        repository = repo,
        branch,
        pusher = %push.pusher.name,
        commits = commits.len(),
        "Detailed push event"
    );

    let mut details = Vec::with_capacity(commits.len());
    for (i, commit) in commits.iter().enumerate() {
        if commit.id.is_empty() {
            tracing::warn!(position = i + 1, "Skipping commit without an id");
            continue;
        }
        let Some(detail) = enrich(github, repo, branch, commit).await else {
            continue;
        };
        log_commit(i + 1, &detail);
        details.push(detail);
    }
    details
}

async fn enrich(
    github: &GitHubClient,
    repo: &str,
    branch: &str,
    commit: &PushCommit,
) -> Option<CommitDetail> {
    let stats = match github.fetch_commit_detail(repo, &commit.id).await {
        Ok(stats) => stats,
        Err(error) => {
            tracing::error!(%error, "Failed to get commit details");
            return None;
        }
    };
    let diff_text = github
        .fetch_file_diff(repo, &commit.id)
        .await
        .unwrap_or_else(|error| {
            tracing::error!(%error, "Failed to get file diff");
            DIFF_UNAVAILABLE.to_owned()
        });
    let totals = stats.stats();
    Some(CommitDetail {
        sha: commit.id.clone(),
        message: commit.message.clone(),
        author_name: commit.author.name.clone(),
        author_email: commit.author.email.clone().unwrap_or_default(),
        processed_at: Utc::now().to_rfc3339(),
        files_changed: stats.files().len(),
        additions: totals.additions,
        deletions: totals.deletions,
        repository: repo.to_owned(),
        branch: branch.to_owned(),
        diff_text,
    })
}

fn log_commit(position: usize, detail: &CommitDetail) {
    tracing::info!(
        commit = position,
        sha = %detail.sha,
        message = %detail.message,
        author = %detail.author_name,
        email = %detail.author_email,
        repository = %detail.repository,
        branch = %detail.branch,
        files_changed = detail.files_changed,
        additions = detail.additions,
        deletions = detail.deletions,
        date = %detail.processed_at,
        "Commit #{position} details"
    );
    tracing::info!(sha = %detail.sha, "File diff content:\n{}", detail.diff_text);
}
