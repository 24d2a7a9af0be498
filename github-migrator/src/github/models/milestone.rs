//! Milestones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneState {
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    #[serde(default)]
    pub id: u64,
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub state: MilestoneState,
    #[serde(default)]
    pub due_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub html_url: String,
}

/// Body of milestone create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MilestoneParams {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub state: MilestoneState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<DateTime<Utc>>,
}

impl From<&Milestone> for MilestoneParams {
    fn from(milestone: &Milestone) -> Self {
        Self {
            title: milestone.title.clone(),
            description: milestone.description.clone(),
            state: milestone.state,
            due_on: milestone.due_on,
        }
    }
}
