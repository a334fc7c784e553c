use std::sync::Arc;

use axum::{
    async_trait,
    body::Bytes,
    extract::{DefaultBodyLimit, FromRequest, Request, State},
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{handle_org_event, handle_repo_event};
use crate::constants::{EVENT_HEADER, HEALTH_MESSAGE, ORG_PROCESSED, REPO_PROCESSED};
use crate::error::RequestError;
use crate::event::InboundEvent;
use crate::github::GitHubClient;
use crate::jira::JiraClient;

/// GitHub caps webhook payloads at 25 MB.
const MAX_PAYLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, Clone)]
pub(crate) struct AppState {
    pub github: GitHubClient,
    /// `None` when no tracker is configured.
    pub tracker: Option<Arc<JiraClient>>,
    pub callback_url: Arc<str>,
}

/// A webhook delivery with its event type header and a JSON object body.
pub(crate) struct Delivery(pub InboundEvent);

#[async_trait]
impl<S> FromRequest<S> for Delivery
where
    S: Send + Sync,
{
    type Rejection = RequestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let event_type = req
            .headers()
            .get(EVENT_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_owned);
        let body = Bytes::from_request(req, state).await.map_err(|error| {
            tracing::error!(%error, "Failed to read request body");
            RequestError::UnreadableBody
        })?;
        let event_type = event_type.ok_or(RequestError::MissingEventType)?;
        let payload: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(&body)
            .map_err(|error| {
                tracing::error!(%error, "Failed to parse JSON payload");
                RequestError::InvalidJson
            })?;
        Ok(Self(InboundEvent::new(&event_type, payload.into())))
    }
}

async fn org_webhook(State(state): State<AppState>, Delivery(event): Delivery) -> &'static str {
    let handled = handle_org_event(&state, event).await;
    tracing::debug!("Organization webhook handled: {handled}");
    ORG_PROCESSED
}

async fn repo_webhook(State(state): State<AppState>, Delivery(event): Delivery) -> &'static str {
    let handled = handle_repo_event(&state, event).await;
    tracing::debug!("Repository webhook handled: {handled}");
    REPO_PROCESSED
}

async fn health() -> &'static str {
    HEALTH_MESSAGE
}

pub(crate) fn listen(state: AppState) -> Router {
    Router::new()
        .route("/webhook/org", post(org_webhook))
        .route("/webhook/repo", post(repo_webhook))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_PAYLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
