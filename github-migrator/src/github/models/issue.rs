//! Issues and pull requests.

use super::user::{user_or_ghost, User};
use super::Label;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

/// Marker present on issues that are pull requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestMarker {
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Reference to a milestone embedded in issues and events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneRef {
    #[serde(default)]
    pub number: u64,
    pub title: String,
}

/// An issue or pull request from the issues endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(default)]
    pub id: u64,
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub state: IssueState,
    #[serde(default = "User::ghost", deserialize_with = "user_or_ghost")]
    pub user: User,
    #[serde(default)]
    pub assignee: Option<User>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub milestone: Option<MilestoneRef>,
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed_by: Option<User>,
    #[serde(default)]
    pub pull_request: Option<PullRequestMarker>,
}

impl Issue {
    #[must_use]
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    /// Returns "issue" or "pull request".
    #[must_use]
    pub fn kind(&self) -> &'static str {
        if self.is_pull_request() {
            "pull request"
        } else {
            "issue"
        }
    }
}

/// A pull request from `GET /repos/{owner}/{repo}/pulls/{number}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullReq {
    pub number: u64,
    pub html_url: String,
    #[serde(default)]
    pub merged: bool,
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub merged_by: Option<User>,
    #[serde(default)]
    pub merge_commit_sha: Option<String>,
    #[serde(default)]
    pub draft: bool,
    pub head: PullReqRef,
    pub base: PullReqRef,
    #[serde(default)]
    pub commits: u64,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
    #[serde(default)]
    pub changed_files: u64,
}

/// The head or base side of a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullReqRef {
    pub sha: String,
    #[serde(rename = "ref")]
    pub ref_name: String,
}

/// A commit of a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    #[serde(default)]
    pub html_url: String,
    pub commit: CommitDetail,
    #[serde(default)]
    pub author: Option<User>,
    #[serde(default)]
    pub committer: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitDetail {
    pub message: String,
    #[serde(default)]
    pub author: Option<CommitSignature>,
    #[serde(default)]
    pub committer: Option<CommitSignature>,
}

/// Git author or committer line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSignature {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

impl Commit {
    /// Returns the account credited for the commit.
    ///
    /// Prefers the linked committer account, then the linked author, then the
    /// raw git committer name.
    #[must_use]
    pub fn committer_login(&self) -> String {
        self.committer
            .as_ref()
            .or(self.author.as_ref())
            .map(|user| user.login.clone())
            .or_else(|| {
                self.commit
                    .committer
                    .as_ref()
                    .or(self.commit.author.as_ref())
                    .map(|signature| signature.name.clone())
            })
            .unwrap_or_else(|| User::ghost().login)
    }

    /// Returns the commit timestamp, if known.
    #[must_use]
    pub fn committed_at(&self) -> Option<DateTime<Utc>> {
        self.commit
            .committer
            .as_ref()
            .or(self.commit.author.as_ref())
            .and_then(|signature| signature.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_issue() {
        let issue: Issue = serde_json::from_str(
            r#"{
                "id": 101,
                "number": 2,
                "title": "Broken",
                "body": null,
                "state": "closed",
                "user": {"login": "alice"},
                "labels": [{"name": "bug", "color": "d73a4a"}],
                "html_url": "https://github.com/a/b/pull/2",
                "created_at": "2020-01-01T00:00:00Z",
                "updated_at": "2020-01-02T00:00:00Z",
                "closed_at": "2020-01-03T00:00:00Z",
                "pull_request": {"html_url": "https://github.com/a/b/pull/2"}
            }"#,
        )
        .unwrap();

        assert_eq!(issue.state, IssueState::Closed);
        assert_eq!(issue.kind(), "pull request");
        assert_eq!(issue.labels[0].name, "bug");
        assert!(issue.closed_at.is_some());
    }

    #[test]
    fn test_committer_fallbacks() {
        let commit: Commit = serde_json::from_str(
            r#"{
                "sha": "0123456789abcdef",
                "commit": {"message": "Fix", "committer": {"name": "Jane Doe", "date": "2020-01-01T00:00:00Z"}},
                "author": null,
                "committer": null
            }"#,
        )
        .unwrap();

        assert_eq!(commit.committer_login(), "Jane Doe");
        assert!(commit.committed_at().is_some());
    }

    #[test]
    fn test_decode_fork_pull_request() {
        let pull: PullReq = serde_json::from_str(
            r#"{
                "number": 9,
                "html_url": "https://github.com/a/b/pull/9",
                "merged": false,
                "head": {"sha": "bbbb", "ref": "patch-1", "repo": {"full_name": "fork/b"}},
                "base": {"sha": "aaaa", "ref": "main", "repo": {"full_name": "a/b"}}
            }"#,
        )
        .unwrap();

        assert_eq!(pull.base.sha, "aaaa");
        assert_eq!(pull.head.ref_name, "patch-1");
        assert_eq!(pull.merged_by, None);
    }
}
