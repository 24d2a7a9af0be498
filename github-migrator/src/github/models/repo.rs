//! Repository metadata.

use serde::{Deserialize, Serialize};

/// A repository as returned by `GET /repos/{owner}/{repo}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub private: bool,
}

impl Repo {
    /// Returns the owner login taken from `full_name`.
    #[must_use]
    pub fn owner(&self) -> &str {
        self.full_name
            .split_once('/')
            .map_or(self.full_name.as_str(), |(owner, _)| owner)
    }
}

/// Body of `PATCH /repos/{owner}/{repo}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateRepoParams {
    pub name: String,
    pub description: String,
    pub homepage: String,
    pub private: bool,
}
