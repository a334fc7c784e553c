//! Routes a classified delivery to the handler for its scope.

use std::fmt::Display;

use crate::event::{Event, InboundEvent};
use crate::sync::SyncOutcome;

use super::listener::AppState;

mod pull_request;
mod push;
mod repository;

pub(crate) use pull_request::PullRequestReport;
pub(crate) use push::CommitDetail;
pub(crate) use repository::Provisioning;

/// What handling a delivery amounted to.
#[derive(Debug)]
pub(crate) enum Handled {
    Provisioned(Provisioning),
    Ignored,
    PushSummary,
    Commits(Vec<CommitDetail>),
    PullRequestSummary,
    PullRequest(PullRequestReport),
    Ping,
    Unhandled(String),
}

impl Display for Handled {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Handled::Provisioned(Provisioning {
                repository,
                webhook,
            }) => write!(
                f,
                "provisioned {} (webhook {})",
                repository.name,
                if webhook.is_ok() { "registered" } else { "failed" }
            ),
            Handled::Ignored => f.write_str("ignored"),
            Handled::PushSummary | Handled::PullRequestSummary => f.write_str("summarized"),
            Handled::Commits(commits) => write!(f, "{} commits recorded", commits.len()),
            Handled::PullRequest(PullRequestReport::Abandoned(error)) => {
                write!(f, "pull request abandoned: {error}")
            }
            Handled::PullRequest(PullRequestReport::Processed { detail, sync }) => {
                write!(f, "pull request #{} ", detail.pull_request.number)?;
                match sync {
                    None => f.write_str("processed without tracker"),
                    Some(SyncOutcome::Created { issue_key }) => write!(f, "tracked by {issue_key}"),
                    Some(SyncOutcome::Merged { issue_key }) => write!(f, "merged in {issue_key}"),
                    Some(SyncOutcome::Unchanged(step)) => write!(f, "unchanged ({step:?})"),
                    Some(SyncOutcome::Failed { step, error }) => {
                        write!(f, "failed to apply {step:?}: {error}")
                    }
                }
            }
            Handled::Ping => f.write_str("ping"),
            Handled::Unhandled(name) => write!(f, "unhandled {name} event"),
        }
    }
}

/// Organization webhook: repository provisioning plus push and pull request summaries.
pub(crate) async fn handle_org_event(state: &AppState, event: InboundEvent) -> Handled {
    tracing::debug!(event = %event.kind, "Dispatching organization event");
    match event.classify() {
        Event::Repository(payload) => {
            match repository::provision(&state.github, &state.callback_url, payload).await {
                Some(provisioning) => Handled::Provisioned(provisioning),
                None => Handled::Ignored,
            }
        }
        Event::Push(payload) => {
            push::summarize(&payload);
            Handled::PushSummary
        }
        Event::PullRequest(payload) => {
            pull_request::summarize(&payload);
            Handled::PullRequestSummary
        }
        Event::Ping => {
            tracing::info!("Received ping event from GitHub - webhook setup successful!");
            Handled::Ping
        }
        Event::Other(name) => {
            tracing::info!("Received org-level event: {name}");
            Handled::Unhandled(name)
        }
    }
}

/// Repository webhook: enriched push and pull request handling.
pub(crate) async fn handle_repo_event(state: &AppState, event: InboundEvent) -> Handled {
    tracing::debug!(event = %event.kind, "Dispatching repository event");
    match event.classify() {
        Event::Push(payload) => Handled::Commits(push::process(&state.github, &payload).await),
        Event::PullRequest(payload) => Handled::PullRequest(
            pull_request::process(&state.github, state.tracker.as_deref(), payload).await,
        ),
        Event::Ping => {
            tracing::info!("Received ping event from GitHub - repo webhook setup successful!");
            Handled::Ping
        }
        Event::Repository(_) => {
            tracing::info!("Received repo-level event: repository");
            Handled::Unhandled("repository".to_owned())
        }
        Event::Other(name) => {
            tracing::info!("Received repo-level event: {name}");
            Handled::Unhandled(name)
        }
    }
}
