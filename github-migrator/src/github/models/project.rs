//! Classic projects, their columns and cards.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectState {
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub number: u64,
    pub state: ProjectState,
    #[serde(default)]
    pub html_url: String,
}

/// Body of `POST /repos/{owner}/{repo}/projects`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateProjectParams {
    pub name: String,
    pub body: String,
}

/// Body of `PATCH /projects/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateProjectParams {
    pub body: String,
    pub state: ProjectState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectColumn {
    pub id: u64,
    pub name: String,
}

/// Body of `POST /projects/{id}/columns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectColumnParams {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCard {
    pub id: u64,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub content_url: Option<String>,
}

impl ProjectCard {
    /// Returns the number of the linked issue, parsed from `content_url`.
    #[must_use]
    pub fn issue_number(&self) -> Option<u64> {
        let url = self.content_url.as_deref()?;
        let (prefix, number) = url.rsplit_once('/')?;
        if !prefix.ends_with("/issues") && !prefix.ends_with("/pulls") {
            return None;
        }
        number.parse().ok()
    }

    /// Returns the note text, treating an empty note as absent.
    #[must_use]
    pub fn note_text(&self) -> Option<&str> {
        self.note.as_deref().filter(|note| !note.is_empty())
    }
}

/// Body of `POST /projects/columns/{id}/cards`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProjectCardParams {
    Note { note: String },
    Content { content_id: u64, content_type: String },
}
