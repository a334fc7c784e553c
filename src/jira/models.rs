use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug)]
pub(crate) struct ProjectKey<'a> {
    pub key: &'a str,
}

#[derive(Serialize, Debug)]
pub(crate) struct IssueTypeName<'a> {
    pub name: &'a str,
}

#[derive(Serialize, Debug)]
pub(crate) struct CreateIssueFields<'a> {
    pub project: ProjectKey<'a>,
    #[serde(rename = "issuetype")]
    pub issue_type: IssueTypeName<'a>,
    pub summary: String,
    pub description: String,
    pub labels: Vec<String>,
}

#[derive(Serialize, Debug)]
pub(crate) struct CreateIssueRequest<'a> {
    pub fields: CreateIssueFields<'a>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct CreatedIssue {
    pub key: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct IssueRef {
    pub key: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct SearchResults {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub issues: Vec<IssueRef>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct JiraStatus {
    pub name: String,
}

/// A workflow transition; `to` is the status it leads to.
#[derive(Deserialize, Debug)]
pub(crate) struct JiraTransition {
    pub id: String,
    pub name: String,
    pub to: JiraStatus,
}

#[derive(Deserialize, Debug)]
pub(crate) struct JiraTransitions {
    pub transitions: Vec<JiraTransition>,
}

#[derive(Serialize, Debug)]
pub(crate) struct TransitionRequest<'a> {
    pub transition: TransitionId<'a>,
}

#[derive(Serialize, Debug)]
pub(crate) struct TransitionId<'a> {
    pub id: &'a str,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_transitions_deserialization() {
        let transitions: JiraTransitions = serde_json::from_value(json!({
            "transitions": [
                { "id": "11", "name": "Review", "to": { "id": "3", "name": "Open_PR" } },
                { "id": "21", "name": "Merge", "to": { "id": "4", "name": "Merged_PR" } },
            ]
        }))
        .unwrap();
        assert_eq!(transitions.transitions.len(), 2);
        assert_eq!(transitions.transitions[1].id, "21");
        assert_eq!(transitions.transitions[1].to.name, "Merged_PR");
    }

    #[test]
    fn test_create_issue_serialization() {
        let request = CreateIssueRequest {
            fields: CreateIssueFields {
                project: ProjectKey { key: "REP" },
                issue_type: IssueTypeName { name: "Task" },
                summary: "PR #1: x".to_owned(),
                description: String::new(),
                labels: vec!["github-pr".to_owned(), "pr-1".to_owned()],
            },
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "fields": {
                    "project": { "key": "REP" },
                    "issuetype": { "name": "Task" },
                    "summary": "PR #1: x",
                    "description": "",
                    "labels": ["github-pr", "pr-1"],
                }
            })
        );
    }
}
