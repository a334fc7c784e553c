//! Enrichment calls against the GitHub REST API.

use std::fmt::Display;
use std::sync::Arc;

use octocrab::{service::middleware::retry::RetryConfig, Octocrab};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::constants::HOOK_EVENTS;
use crate::error::UpstreamError;

mod models;

pub(crate) use models::{Hook, PullRequestDetail};
use models::{CreateHook, FileChange, HookConfig, PullRequest, RepoCommit, Review};

#[derive(Serialize)]
struct PerPage {
    per_page: u8,
}

const PAGE: PerPage = PerPage { per_page: 100 };

/// Every upstream call is attempted exactly once.
pub(crate) fn build_octocrab(
    token: &SecretString,
    base_uri: Option<&str>,
) -> octocrab::Result<Octocrab> {
    let mut builder = Octocrab::builder()
        .personal_token(token.expose_secret().to_owned());
    builder.add_retry_config(RetryConfig::None);
    if let Some(uri) = base_uri {
        builder = builder.base_uri(uri)?;
    }
    builder.build()
}

/// Read-only after construction; shared by all in-flight deliveries.
#[derive(Debug, Clone)]
pub(crate) struct GitHubClient {
    api: Arc<Octocrab>,
    org: String,
}

impl GitHubClient {
    pub(crate) fn new(api: Arc<Octocrab>, org: impl Into<String>) -> Self {
        Self {
            api,
            org: org.into(),
        }
    }

    fn repo_route(&self, repo: &str) -> String {
        format!("/repos/{}/{repo}", self.org)
    }

    pub(crate) async fn fetch_commit_detail(
        &self,
        repo: &str,
        sha: &str,
    ) -> Result<RepoCommit, UpstreamError> {
        let route = format!("{}/commits/{sha}", self.repo_route(repo));
        self.api
            .get(route, None::<&()>)
            .await
            .map_err(|e| UpstreamError::new(format!("get commit details for {repo}@{sha}"), e))
    }

    /// Fetch a commit and render its per-file patches as text.
    pub(crate) async fn fetch_file_diff(
        &self,
        repo: &str,
        sha: &str,
    ) -> Result<String, UpstreamError> {
        let route = format!("{}/commits/{sha}", self.repo_route(repo));
        let commit: RepoCommit = self
            .api
            .get(route, None::<&()>)
            .await
            .map_err(|e| UpstreamError::new(format!("get commit diff for {repo}@{sha}"), e))?;
        Ok(CommitDiff {
            sha,
            commit: &commit,
        }
        .to_string())
    }

    /// Pull request metadata, files and reviews; any failing call fails the whole fetch.
    pub(crate) async fn fetch_pull_request_detail(
        &self,
        repo: &str,
        number: u64,
    ) -> Result<PullRequestDetail, UpstreamError> {
        let route = format!("{}/pulls/{number}", self.repo_route(repo));
        let pull_request: PullRequest = self
            .api
            .get(&route, None::<&()>)
            .await
            .map_err(|e| UpstreamError::new(format!("get PR details for {repo}#{number}"), e))?;
        let files: Vec<FileChange> = self
            .api
            .get(format!("{route}/files"), Some(&PAGE))
            .await
            .map_err(|e| UpstreamError::new(format!("get PR files for {repo}#{number}"), e))?;
        let reviews: Vec<Review> = self
            .api
            .get(format!("{route}/reviews"), Some(&PAGE))
            .await
            .map_err(|e| UpstreamError::new(format!("get PR reviews for {repo}#{number}"), e))?;
        Ok(PullRequestDetail {
            pull_request,
            files,
            reviews,
        })
    }

    pub(crate) async fn register_webhook(
        &self,
        repo: &str,
        target_url: &str,
    ) -> Result<Hook, UpstreamError> {
        let body = CreateHook {
            name: "web",
            config: HookConfig {
                url: target_url,
                content_type: "json",
                insecure_ssl: "0",
            },
            events: &HOOK_EVENTS,
            active: true,
        };
        self.api
            .post(format!("{}/hooks", self.repo_route(repo)), Some(&body))
            .await
            .map_err(|e| UpstreamError::new(format!("create webhook for repo {repo}"), e))
    }
}

struct CommitDiff<'a> {
    sha: &'a str,
    commit: &'a RepoCommit,
}

impl Display for CommitDiff<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let short = self.sha.get(..8).unwrap_or(self.sha);
        let stats = self.commit.stats();
        let files = self.commit.files();
        writeln!(f, "=== COMMIT DIFF: {short} ===")?;
        writeln!(f, "Total files changed: {}", files.len())?;
        writeln!(f, "Additions: +{}, Deletions: -{}", stats.additions, stats.deletions)?;
        writeln!(f, "{}\n", "=".repeat(51))?;
        for (i, file) in files.iter().enumerate() {
            writeln!(f, "FILE {}: {}", i + 1, file.filename)?;
            writeln!(f, "Status: {}", file.status)?;
            writeln!(f, "Changes: +{}/-{} lines", file.additions, file.deletions)?;
            if let Some(patch) = &file.patch {
                writeln!(f, "DIFF:\n{patch}")?;
            }
            writeln!(f, "{}", "-".repeat(60))?;
        }
        Ok(())
    }
}
