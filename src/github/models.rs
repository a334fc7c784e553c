use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct CommitStats {
    pub additions: u64,
    pub deletions: u64,
}

/// A changed file, as listed on commits and pull requests.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct FileChange {
    pub filename: String,
    pub status: String,
    pub additions: u64,
    pub deletions: u64,
    pub patch: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct RepoCommit {
    pub stats: Option<CommitStats>,
    pub files: Option<Vec<FileChange>>,
}

impl RepoCommit {
    pub(crate) fn stats(&self) -> CommitStats {
        self.stats.clone().unwrap_or_default()
    }

    pub(crate) fn files(&self) -> &[FileChange] {
        self.files.as_deref().unwrap_or_default()
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct User {
    pub login: String,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct Branch {
    #[serde(rename = "ref")]
    pub git_ref: String,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct PullRequest {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub user: Option<User>,
    pub head: Branch,
    pub base: Branch,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct Review {
    pub state: String,
}

/// A pull request together with its changed files and reviews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PullRequestDetail {
    pub pull_request: PullRequest,
    pub files: Vec<FileChange>,
    pub reviews: Vec<Review>,
}

impl PullRequestDetail {
    pub(crate) fn changed_files(&self) -> Vec<String> {
        self.files.iter().map(|f| f.filename.clone()).collect()
    }

    pub(crate) fn review_count(&self) -> usize {
        self.reviews.len()
    }

    pub(crate) fn approvals(&self) -> usize {
        self.reviews.iter().filter(|r| r.state == "APPROVED").count()
    }
}

#[derive(Serialize, Debug)]
pub(crate) struct HookConfig<'a> {
    pub url: &'a str,
    pub content_type: &'a str,
    pub insecure_ssl: &'a str,
}

#[derive(Serialize, Debug)]
pub(crate) struct CreateHook<'a> {
    pub name: &'a str,
    pub config: HookConfig<'a>,
    pub events: &'a [&'a str],
    pub active: bool,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct Hook {
    pub id: u64,
    pub active: bool,
}
