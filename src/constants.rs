pub(crate) const EVENT_HEADER: &str = "X-GitHub-Event";

pub(crate) const HEALTH_MESSAGE: &str = "GitHub Organization Microservice is running!";
pub(crate) const ORG_PROCESSED: &str = "Organization webhook processed successfully";
pub(crate) const REPO_PROCESSED: &str = "Repository webhook processed successfully";

/// Substituted for a commit's diff when the diff fetch fails.
pub(crate) const DIFF_UNAVAILABLE: &str = "Diff unavailable";

pub(crate) const SOURCE_LABEL: &str = "github-pr";
pub(crate) const ISSUE_TYPE: &str = "Task";
pub(crate) const OPEN_STATUS: &str = "Open_PR";
pub(crate) const MERGED_STATUS: &str = "Merged_PR";

/// Events subscribed to by webhooks registered on newly created repositories.
pub(crate) const HOOK_EVENTS: [&str; 6] = [
    "push",
    "pull_request",
    "issues",
    "repository",
    "release",
    "commit_comment",
];

pub(crate) fn pr_label(number: u64) -> String {
    format!("pr-{number}")
}
