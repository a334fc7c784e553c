use clap::{Args, Parser, Subcommand};
use secrecy::SecretString;

#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Start web hook server
    Serve(ServeArgs),
}

#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Port to listen on (all interfaces)
    #[arg(long, env, default_value_t = 3000)]
    pub(crate) port: u16,
    /// GitHub token for API calls; falls back to the `github_token` systemd credential
    #[arg(long, env, hide_env_values = true)]
    pub(crate) github_token: Option<SecretString>,
    /// GitHub organization owning the watched repositories
    #[arg(long, env)]
    pub(crate) github_org: String,
    /// Alternative GitHub API base URL
    #[arg(long, env)]
    pub(crate) github_api_url: Option<String>,
    /// URL registered as webhook on newly created repositories
    #[arg(long, env)]
    pub(crate) webhook_callback_url: String,
    /// Jira base URL, e.g. https://example.atlassian.net
    #[arg(long, env)]
    pub(crate) jira_base_url: Option<String>,
    /// Jira account email
    #[arg(long, env)]
    pub(crate) jira_email: Option<String>,
    /// Jira API token
    #[arg(long, env, hide_env_values = true)]
    pub(crate) jira_api_token: Option<SecretString>,
    /// Jira project holding the pull request issues
    #[arg(long, env, default_value = "REP")]
    pub(crate) jira_project: String,
}
