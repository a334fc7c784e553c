use std::future::IntoFuture;
use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::sync::Notify;

use crate::cli::ServeArgs;
use crate::github::{build_octocrab, GitHubClient};
use crate::jira::{JiraAuth, JiraClient};
use crate::utils::get_credential;

mod handlers;
mod listener;

/// In-flight deliveries get this long to finish after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

pub(crate) async fn serve(args: ServeArgs) -> Result<()> {
    // If the token has not been passed via CLI or env, get it as a credential.
    let github_token = args
        .github_token
        .ok_or(())
        .or_else(|()| get_credential("github_token"))
        .context("GITHUB_TOKEN is required")?;
    let api = build_octocrab(&github_token, args.github_api_url.as_deref())?;
    std::mem::drop(github_token);

    let tracker = match (args.jira_base_url, args.jira_email, args.jira_api_token) {
        (Some(base_url), Some(username), Some(api_token)) => {
            tracing::info!("Jira integration enabled for project {}", args.jira_project);
            let auth = JiraAuth {
                username,
                api_token,
            };
            Some(Arc::new(JiraClient::new(&base_url, auth, args.jira_project)))
        }
        _ => {
            tracing::info!("Jira configuration missing - running without Jira integration");
            None
        }
    };

    let state = listener::AppState {
        github: GitHubClient::new(Arc::new(api), args.github_org),
        tracker,
        callback_url: args.webhook_callback_url.into(),
    };
    let service = listener::listen(state);
    let addr = format!("0.0.0.0:{}", args.port);
    let tcp_listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {addr}");
    tracing::info!("Organization webhook URL: http://localhost:{}/webhook/org", args.port);
    tracing::info!("Repository webhook URL: http://localhost:{}/webhook/repo", args.port);

    let stop = Arc::new(Notify::new());
    let server = axum::serve(tcp_listener, service)
        .with_graceful_shutdown({
            let stop = Arc::clone(&stop);
            async move { stop.notified().await }
        })
        .into_future();
    let mut server = pin!(server);

    tokio::select! {
        res = &mut server => return res.map_err(Into::into),
        () = shutdown_signal() => tracing::info!("Shutting down server..."),
    }
    stop.notify_one();
    match tokio::time::timeout(SHUTDOWN_GRACE, server).await {
        Ok(res) => res?,
        Err(_) => tracing::warn!("Server forced to shutdown after {SHUTDOWN_GRACE:?}"),
    }
    tracing::info!("Server gracefully stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
