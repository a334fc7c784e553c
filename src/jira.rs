//! Jira REST client for the issues that track pull requests.

use askama::Template;
use chrono::Utc;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};

use crate::constants::{pr_label, ISSUE_TYPE, MERGED_STATUS, OPEN_STATUS, SOURCE_LABEL};
use crate::error::TrackerError;
use crate::event::PullRequestEvent;

mod models;

use models::{
    CreateIssueFields, CreateIssueRequest, CreatedIssue, IssueTypeName, JiraTransitions,
    ProjectKey, SearchResults, TransitionId, TransitionRequest,
};

#[derive(Debug)]
pub(crate) struct JiraAuth {
    pub username: String,
    pub api_token: SecretString,
}

#[derive(Debug)]
pub(crate) struct JiraClient {
    client: Client,
    base_url: String,
    auth: JiraAuth,
    project: String,
}

#[derive(Template)]
#[template(path = "issue_description.txt.j2", escape = "none")]
struct IssueDescription<'a> {
    pr: &'a PullRequestEvent,
    files: &'a [String],
    created: String,
}

async fn ensure_success(
    response: Response,
    action: &'static str,
) -> Result<Response, TrackerError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(TrackerError::Status {
            action,
            status,
            body: response.text().await.unwrap_or_default(),
        })
    }
}

fn request_error(action: &'static str) -> impl FnOnce(reqwest::Error) -> TrackerError {
    move |source| TrackerError::Request { action, source }
}

impl JiraClient {
    pub(crate) fn new(base_url: &str, auth: JiraAuth, project: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            auth,
            project: project.into(),
        }
    }

    pub(crate) fn project(&self) -> &str {
        &self.project
    }

    fn get(&self, route: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}{route}", self.base_url))
            .basic_auth(&self.auth.username, Some(self.auth.api_token.expose_secret()))
    }

    fn post(&self, route: &str) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}{route}", self.base_url))
            .basic_auth(&self.auth.username, Some(self.auth.api_token.expose_secret()))
    }

    /// Create the issue tracking a pull request, then try once to move it to `Open_PR`.
    ///
    /// A failed transition leaves the created issue in place.
    pub(crate) async fn create_tracked_issue(
        &self,
        pr: &PullRequestEvent,
        changed_files: &[String],
    ) -> Result<String, TrackerError> {
        let description = IssueDescription {
            pr,
            files: changed_files,
            created: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
        .render()?;
        let request = CreateIssueRequest {
            fields: CreateIssueFields {
                project: ProjectKey { key: &self.project },
                issue_type: IssueTypeName { name: ISSUE_TYPE },
                summary: format!("PR #{}: {}", pr.number, pr.title),
                description,
                labels: vec![SOURCE_LABEL.to_owned(), pr_label(pr.number)],
            },
        };

        let action = "create issue";
        let response = self
            .post("/rest/api/2/issue")
            .json(&request)
            .send()
            .await
            .map_err(request_error(action))?;
        let issue: CreatedIssue = ensure_success(response, action)
            .await?
            .json()
            .await
            .map_err(request_error(action))?;

        if let Err(error) = self.transition_issue(&issue.key, OPEN_STATUS).await {
            tracing::warn!(issue = %issue.key, %error, "Created issue left in its initial status");
        }
        Ok(issue.key)
    }

    /// Key of the issue labelled with the pull request's number.
    ///
    /// Matches are ordered newest first and only the first is returned.
    pub(crate) async fn find_tracked_issue(&self, number: u64) -> Result<String, TrackerError> {
        let label = pr_label(number);
        let jql = format!(
            r#"project = "{}" AND labels = "{label}" ORDER BY created DESC"#,
            self.project
        );

        let action = "search issues";
        let response = self
            .get("/rest/api/2/search")
            .query(&[("jql", jql.as_str()), ("maxResults", "1"), ("fields", "key")])
            .send()
            .await
            .map_err(request_error(action))?;
        let results: SearchResults = ensure_success(response, action)
            .await?
            .json()
            .await
            .map_err(request_error(action))?;

        if results.total > 1 {
            tracing::warn!(
                %label,
                matches = results.total,
                "Several issues track this pull request, using the most recently created"
            );
        }
        results
            .issues
            .into_iter()
            .next()
            .map(|issue| issue.key)
            .ok_or_else(|| TrackerError::NotFound {
                project: self.project.clone(),
                label,
            })
    }

    /// Perform the transition whose destination status is exactly `status`.
    pub(crate) async fn transition_issue(
        &self,
        issue_key: &str,
        status: &str,
    ) -> Result<(), TrackerError> {
        let route = format!("/rest/api/2/issue/{issue_key}/transitions");

        let list = "list transitions";
        let response = self.get(&route).send().await.map_err(request_error(list))?;
        let available: JiraTransitions = ensure_success(response, list)
            .await?
            .json()
            .await
            .map_err(request_error(list))?;

        let transition = available
            .transitions
            .into_iter()
            .find(|t| t.to.name == status)
            .ok_or_else(|| TrackerError::NoSuchTransition {
                issue_key: issue_key.to_owned(),
                status: status.to_owned(),
            })?;
        tracing::debug!(
            issue = issue_key,
            transition = %transition.name,
            "Transitioning to {status}"
        );

        let action = "transition issue";
        let response = self
            .post(&route)
            .json(&TransitionRequest {
                transition: TransitionId { id: &transition.id },
            })
            .send()
            .await
            .map_err(request_error(action))?;
        ensure_success(response, action).await?;
        Ok(())
    }

    /// Find the pull request's issue and move it to `Merged_PR`; nothing is transitioned if the
    /// search fails.
    pub(crate) async fn move_to_merged(&self, number: u64) -> Result<String, TrackerError> {
        let issue_key = self.find_tracked_issue(number).await?;
        self.transition_issue(&issue_key, MERGED_STATUS).await?;
        Ok(issue_key)
    }
}
