use serde_json::{json, Value};

pub(crate) const ORG: &str = "acme";
pub(crate) const REPO: &str = "widgets";
pub(crate) const PR_NUMBER: u64 = 42;
pub(crate) const FIRST_SHA: &str = "cc6d6ea741ff6c35df3747a95c4869cc3ed5f84e";
pub(crate) const SECOND_SHA: &str = "f88f7bd4250b963752d615e491b7e676ce5eb7f0";

pub(crate) const PUSH: &str = r#"{
  "ref": "refs/heads/main",
  "before": "a4786471ee4d4e894fec150e426c3551db0f31e0",
  "after": "f88f7bd4250b963752d615e491b7e676ce5eb7f0",
  "repository": {
    "id": 1296269,
    "name": "widgets",
    "full_name": "acme/widgets",
    "private": false,
    "created_at": 1700000000
  },
  "pusher": { "name": "octocat", "email": "octocat@example.com" },
  "sender": { "login": "octocat", "id": 1 },
  "commits": [
    {
      "id": "cc6d6ea741ff6c35df3747a95c4869cc3ed5f84e",
      "message": "Add widget factory",
      "timestamp": "2024-05-01T12:00:00Z",
      "author": { "name": "Octo Cat", "email": "octocat@example.com", "username": "octocat" }
    },
    {
      "id": "f88f7bd4250b963752d615e491b7e676ce5eb7f0",
      "message": "Fix widget colours",
      "timestamp": "2024-05-01T12:05:00Z",
      "author": { "name": "Hubot", "email": "hubot@example.com", "username": "hubot" }
    }
  ]
}"#;

pub(crate) fn pull_request(action: &str, merged: bool) -> Value {
    json!({
        "action": action,
        "number": PR_NUMBER,
        "pull_request": {
            "number": PR_NUMBER,
            "state": if action == "closed" { "closed" } else { "open" },
            "title": "Add login page",
            "html_url": format!("https://github.com/{ORG}/{REPO}/pull/{PR_NUMBER}"),
            "user": { "login": "octocat", "id": 1 },
            "head": { "ref": "feature/login", "sha": SECOND_SHA },
            "base": { "ref": "main", "sha": FIRST_SHA },
            "merged": merged,
            "merged_at": null,
        },
        "repository": { "name": REPO, "full_name": format!("{ORG}/{REPO}") },
        "sender": { "login": "octocat", "id": 1 },
    })
}

pub(crate) fn repository(action: &str) -> Value {
    json!({
        "action": action,
        "repository": {
            "name": "fresh-repo",
            "full_name": format!("{ORG}/fresh-repo"),
            "private": true,
            "description": null,
            "language": null,
            "default_branch": "main",
            "clone_url": format!("https://github.com/{ORG}/fresh-repo.git"),
            "git_url": format!("git://github.com/{ORG}/fresh-repo.git"),
            "ssh_url": format!("git@github.com:{ORG}/fresh-repo.git"),
            "created_at": "2024-05-01T12:00:00Z",
        },
        "organization": { "login": ORG },
        "sender": { "login": "octocat", "id": 1 },
    })
}

/// Commit detail as returned by `GET /repos/{org}/{repo}/commits/{sha}`.
pub(crate) fn commit(sha: &str) -> Value {
    json!({
        "sha": sha,
        "html_url": format!("https://github.com/{ORG}/{REPO}/commit/{sha}"),
        "stats": { "total": 12, "additions": 10, "deletions": 2 },
        "files": [
            {
                "filename": "src/widget.rs",
                "status": "modified",
                "additions": 8,
                "deletions": 2,
                "changes": 10,
                "patch": "@@ -1,2 +1,8 @@\n-old\n+new",
            },
            {
                "filename": "README.md",
                "status": "added",
                "additions": 2,
                "deletions": 0,
                "changes": 2,
            },
        ],
    })
}

/// Pull request detail as returned by `GET /repos/{org}/{repo}/pulls/{n}`.
pub(crate) fn pull_request_detail() -> Value {
    let mut pr = pull_request("opened", false)["pull_request"].clone();
    pr["state"] = json!("open");
    pr
}

pub(crate) fn pull_request_files() -> Value {
    json!([
        { "filename": "src/login.rs", "status": "added", "additions": 40, "deletions": 0 },
        { "filename": "src/lib.rs", "status": "modified", "additions": 1, "deletions": 1 },
    ])
}

pub(crate) fn pull_request_reviews() -> Value {
    json!([{ "id": 80, "state": "APPROVED", "user": { "login": "hubot" } }])
}

pub(crate) mod mock_error {
    use serde_json::json;
    use wiremock::{matchers::path_regex, Mock, MockServer, ResponseTemplate};

    // Answers any request with a 500 carrying `message`, which octocrab surfaces as a GitHub
    // error so an unexpected call is easy to spot in a failing test.
    //
    // This handler should always come after your real expectations as it will match any request.
    pub(crate) async fn setup_error_handler(mock_server: &MockServer, message: &str) {
        Mock::given(path_regex(".*"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!( {
                "documentation_url": "",
                "errors": None::<Vec<serde_json::Value>>,
                "message": message,
            })))
            .mount(mock_server)
            .await;
    }
}
