use serde::de::DeserializeOwned;
use std::fmt::Display;

mod github;

pub(crate) use github::{
    PullRequestAction, PullRequestPayload, PushCommit, PushPayload, RepositoryPayload,
};

/// The closed set of webhook event types this service routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EventKind {
    Repository,
    Push,
    PullRequest,
    Ping,
    Other(String),
}

impl From<&str> for EventKind {
    fn from(name: &str) -> Self {
        match name {
            "repository" => EventKind::Repository,
            "push" => EventKind::Push,
            "pull_request" => EventKind::PullRequest,
            "ping" => EventKind::Ping,
            other => EventKind::Other(other.to_owned()),
        }
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            EventKind::Repository => "repository",
            EventKind::Push => "push",
            EventKind::PullRequest => "pull_request",
            EventKind::Ping => "ping",
            EventKind::Other(other) => other,
        })
    }
}

/// A structurally valid webhook delivery: its event type and decoded body.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct InboundEvent {
    pub kind: EventKind,
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    Repository(RepositoryPayload),
    Push(PushPayload),
    PullRequest(PullRequestPayload),
    Ping,
    Other(String),
}

impl InboundEvent {
    pub(crate) fn new(event_type: &str, payload: serde_json::Value) -> Self {
        Self {
            kind: event_type.into(),
            payload,
        }
    }

    /// Parse the payload into the typed view for its kind.
    pub(crate) fn classify(self) -> Event {
        match self.kind {
            EventKind::Repository => Event::Repository(lenient("repository", self.payload)),
            EventKind::Push => Event::Push(lenient("push", self.payload)),
            EventKind::PullRequest => Event::PullRequest(lenient("pull_request", self.payload)),
            EventKind::Ping => Event::Ping,
            EventKind::Other(name) => Event::Other(name),
        }
    }
}

/// Fields already read leniently on their own; this guards the payload as a whole.
fn lenient<T: DeserializeOwned + Default>(kind: &str, payload: serde_json::Value) -> T {
    serde_json::from_value(payload).unwrap_or_else(|error| {
        tracing::warn!(event = kind, %error, "Unexpected payload shape, using empty values");
        T::default()
    })
}

/// Flat view of a pull request delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PullRequestEvent {
    pub action: PullRequestAction,
    pub merged: bool,
    pub number: u64,
    pub title: String,
    pub author: String,
    pub source_branch: String,
    pub target_branch: String,
    pub html_url: String,
    pub repository: String,
}

impl From<PullRequestPayload> for PullRequestEvent {
    fn from(payload: PullRequestPayload) -> Self {
        let pr = payload.pull_request;
        Self {
            action: payload.action,
            merged: pr.merged.unwrap_or(false),
            number: pr.number,
            title: pr.title,
            author: pr.user.login,
            source_branch: pr.head.git_ref,
            target_branch: pr.base.git_ref,
            html_url: pr.html_url,
            repository: payload.repository.name,
        }
    }
}

/// Attributes of a newly created repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RepoCreation {
    pub name: String,
    pub created_by: String,
    pub created_at: String,
    pub description: String,
    pub language: String,
    pub private: bool,
    pub default_branch: String,
    pub clone_url: String,
    pub git_url: String,
    pub ssh_url: String,
}

impl RepositoryPayload {
    /// Only `created` events with a repository object are provisioned.
    pub(crate) fn created(self) -> Option<RepoCreation> {
        if self.action != "created" {
            return None;
        }
        let Some(repo) = self.repository else {
            tracing::error!("Invalid repository data in payload");
            return None;
        };
        Some(RepoCreation {
            name: repo.name,
            created_by: self
                .sender
                .map_or_else(|| "Unknown".to_owned(), |sender| sender.login),
            created_at: repo.created_at.to_string(),
            description: repo.description.unwrap_or_default(),
            language: repo.language.unwrap_or_default(),
            private: repo.private,
            default_branch: repo.default_branch,
            clone_url: repo.clone_url,
            git_url: repo.git_url,
            ssh_url: repo.ssh_url,
        })
    }
}
