//! Typed views over the webhook payloads this service understands.
//!
//! Every field is optional or defaulted: a delivery that is valid JSON but
//! lacks fields, or carries `null` or a wrongly typed value in one, still gets
//! processed with empty/zero values for those fields.

use std::fmt::Display;

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// A `null` or wrongly typed field reads as its default.
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Anything but an array reads as a missing list; entries that are not objects are skipped.
fn commit_list<'de, D>(deserializer: D) -> Result<Option<Vec<PushCommit>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(entries) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(Some(
        entries
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|entry| PushCommit::deserialize(entry).ok())
            .collect(),
    ))
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct Account {
    #[serde(deserialize_with = "or_default")]
    pub login: String,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct RepoName {
    #[serde(deserialize_with = "or_default")]
    pub name: String,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct Pusher {
    #[serde(deserialize_with = "or_default")]
    pub name: String,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct CommitAuthor {
    #[serde(deserialize_with = "or_default")]
    pub name: String,
    #[serde(deserialize_with = "or_default")]
    pub email: Option<String>,
}

/// One entry of a push payload's `commits` array.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct PushCommit {
    #[serde(deserialize_with = "or_default")]
    pub id: String,
    #[serde(deserialize_with = "or_default")]
    pub message: String,
    #[serde(deserialize_with = "or_default")]
    pub author: CommitAuthor,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct PushPayload {
    #[serde(rename = "ref", deserialize_with = "or_default")]
    pub git_ref: String,
    #[serde(deserialize_with = "or_default")]
    pub repository: RepoName,
    #[serde(deserialize_with = "or_default")]
    pub pusher: Pusher,
    /// `None` when the payload carries no `commits` array at all.
    #[serde(deserialize_with = "commit_list")]
    pub commits: Option<Vec<PushCommit>>,
}

impl PushPayload {
    pub(crate) fn branch(&self) -> &str {
        self.git_ref
            .strip_prefix("refs/heads/")
            .unwrap_or(&self.git_ref)
    }
}

/// `created_at` is an ISO string on repository events but epoch seconds on
/// push events.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub(crate) enum Timestamp {
    Text(String),
    Epoch(i64),
}

impl Default for Timestamp {
    fn default() -> Self {
        Timestamp::Text(String::new())
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Timestamp::Text(text) => f.write_str(text),
            Timestamp::Epoch(secs) => write!(f, "{secs}"),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct RepositoryDetails {
    #[serde(deserialize_with = "or_default")]
    pub name: String,
    #[serde(deserialize_with = "or_default")]
    pub description: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub language: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub private: bool,
    #[serde(deserialize_with = "or_default")]
    pub default_branch: String,
    #[serde(deserialize_with = "or_default")]
    pub clone_url: String,
    #[serde(deserialize_with = "or_default")]
    pub git_url: String,
    #[serde(deserialize_with = "or_default")]
    pub ssh_url: String,
    #[serde(deserialize_with = "or_default")]
    pub created_at: Timestamp,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct RepositoryPayload {
    #[serde(deserialize_with = "or_default")]
    pub action: String,
    /// `None` when the payload has no repository object; such events cannot be provisioned.
    #[serde(deserialize_with = "or_default")]
    pub repository: Option<RepositoryDetails>,
    #[serde(deserialize_with = "or_default")]
    pub sender: Option<Account>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct BranchRef {
    #[serde(rename = "ref", deserialize_with = "or_default")]
    pub git_ref: String,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct PullRequestBody {
    #[serde(deserialize_with = "or_default")]
    pub number: u64,
    #[serde(deserialize_with = "or_default")]
    pub title: String,
    #[serde(deserialize_with = "or_default")]
    pub user: Account,
    #[serde(deserialize_with = "or_default")]
    pub head: BranchRef,
    #[serde(deserialize_with = "or_default")]
    pub base: BranchRef,
    #[serde(deserialize_with = "or_default")]
    pub html_url: String,
    #[serde(deserialize_with = "or_default")]
    pub merged: Option<bool>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "String")]
pub(crate) enum PullRequestAction {
    Opened,
    Closed,
    Synchronize,
    Other(String),
}

impl Default for PullRequestAction {
    fn default() -> Self {
        PullRequestAction::Other(String::new())
    }
}

impl From<String> for PullRequestAction {
    fn from(action: String) -> Self {
        match action.as_str() {
            "opened" => PullRequestAction::Opened,
            "closed" => PullRequestAction::Closed,
            "synchronize" => PullRequestAction::Synchronize,
            _ => PullRequestAction::Other(action),
        }
    }
}

impl Display for PullRequestAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PullRequestAction::Opened => "opened",
            PullRequestAction::Closed => "closed",
            PullRequestAction::Synchronize => "synchronize",
            PullRequestAction::Other(other) => other,
        })
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct PullRequestPayload {
    #[serde(deserialize_with = "or_default")]
    pub action: PullRequestAction,
    #[serde(deserialize_with = "or_default")]
    pub pull_request: PullRequestBody,
    #[serde(deserialize_with = "or_default")]
    pub repository: RepoName,
}
