//! Issue comments, reviews and review comments.

use super::user::{user_or_ghost, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment on an issue or pull request conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(default = "User::ghost", deserialize_with = "user_or_ghost")]
    pub user: User,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
    Pending,
    Dismissed,
}

/// A pull request review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: u64,
    pub state: ReviewState,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub html_url: String,
    #[serde(default = "User::ghost", deserialize_with = "user_or_ghost")]
    pub user: User,
    #[serde(default)]
    pub commit_id: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// An inline comment anchored to a diff location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewComment {
    pub id: u64,
    pub path: String,
    #[serde(default)]
    pub line: Option<u64>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub diff_hunk: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(default = "User::ghost", deserialize_with = "user_or_ghost")]
    pub user: User,
    #[serde(default)]
    pub in_reply_to_id: Option<u64>,
    pub created_at: DateTime<Utc>,
}
