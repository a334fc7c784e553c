use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// A webhook delivery that cannot be dispatched at all.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum RequestError {
    #[error("Invalid request body")]
    UnreadableBody,
    #[error("Missing event type")]
    MissingEventType,
    #[error("Invalid JSON payload")]
    InvalidJson,
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        tracing::error!("Rejecting webhook delivery: {self}");
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

/// A hosting platform API call failed.
#[derive(Debug, Error)]
#[error("failed to {action}: {source}")]
pub(crate) struct UpstreamError {
    pub action: String,
    #[source]
    pub source: octocrab::Error,
}

impl UpstreamError {
    pub(crate) fn new(action: impl Into<String>, source: octocrab::Error) -> Self {
        Self {
            action: action.into(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum TrackerError {
    #[error("failed to {action}: {source}")]
    Request {
        action: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to {action}: HTTP {status} - {body}")]
    Status {
        action: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("no issue labelled {label} in project {project}")]
    NotFound { project: String, label: String },
    #[error("no transition to status {status} available on {issue_key}")]
    NoSuchTransition { issue_key: String, status: String },
    #[error("failed to render issue description: {0}")]
    Template(#[from] askama::Error),
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    #[tokio::test]
    async fn request_errors_are_plain_text_bad_requests() {
        let res = RequestError::MissingEventType.into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = res.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"Missing event type");
    }

    #[test]
    fn tracker_errors_name_the_missing_transition() {
        let err = TrackerError::NoSuchTransition {
            issue_key: "REP-7".to_owned(),
            status: "Merged_PR".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "no transition to status Merged_PR available on REP-7"
        );
    }
}
