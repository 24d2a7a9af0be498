//! Issue timeline events.
//!
//! GitHub delivers events as flat objects tagged by `event`; they are decoded
//! into [`EventKind`], a closed union with one variant per supported kind.

use super::issue::MilestoneRef;
use super::user::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event kinds that are known but never rendered.
pub const IGNORED_KINDS: &[&str] = &[
    "referenced",
    "mentioned",
    "comment_deleted",
    "subscribed",
    "unsubscribed",
    "base_ref_changed",
];

/// A timeline event with its actor and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawEvent")]
pub struct Event {
    pub id: u64,
    pub actor: User,
    pub created_at: DateTime<Utc>,
    pub kind: EventKind,
}

impl Event {
    /// Returns the user the event is attributed to.
    ///
    /// Assignment events are attributed to the assigner rather than the
    /// account the API reports as actor.
    #[must_use]
    pub fn acting_user(&self) -> &User {
        match &self.kind {
            EventKind::Assigned { assigner, .. } | EventKind::Unassigned { assigner, .. } => {
                assigner
            }
            _ => &self.actor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLabel {
    pub name: String,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rename {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DismissedReview {
    #[serde(default)]
    pub state: String,
    pub review_id: u64,
    #[serde(default)]
    pub dismissal_message: Option<String>,
}

/// Project card payload of project events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventProjectCard {
    #[serde(default)]
    pub id: u64,
    pub project_id: u64,
    #[serde(default)]
    pub column_name: String,
    #[serde(default)]
    pub previous_column_name: Option<String>,
}

/// Review request target: a user or a team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reviewer {
    User(User),
    Team(Team),
}

/// Kind-specific payload of an [`Event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Closed { commit_id: Option<String> },
    Merged { commit_id: Option<String> },
    Reopened,
    Labeled { label: EventLabel },
    Unlabeled { label: EventLabel },
    Renamed { rename: Rename },
    HeadRefDeleted,
    HeadRefRestored,
    HeadRefForcePushed,
    BaseRefForcePushed,
    Locked { lock_reason: Option<String> },
    Unlocked,
    Pinned,
    Unpinned,
    Assigned { assignee: User, assigner: User },
    Unassigned { assignee: User, assigner: User },
    ReviewRequested { reviewer: Reviewer },
    ReviewRequestRemoved { reviewer: Reviewer },
    ReviewDismissed { review: DismissedReview },
    ReadyForReview,
    ConvertToDraft,
    ConvertedNoteToIssue { card: EventProjectCard },
    AddedToProject { card: EventProjectCard },
    MovedColumnsInProject { card: EventProjectCard },
    RemovedFromProject { card: EventProjectCard },
    Milestoned { milestone: MilestoneRef },
    Demilestoned { milestone: MilestoneRef },
    Deployed,
    /// A known kind that carries nothing worth rendering.
    Ignored(String),
    /// A kind this migrator does not understand.
    Unknown(String),
}

impl EventKind {
    /// Returns the kind name as used by the API.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Closed { .. } => "closed",
            Self::Merged { .. } => "merged",
            Self::Reopened => "reopened",
            Self::Labeled { .. } => "labeled",
            Self::Unlabeled { .. } => "unlabeled",
            Self::Renamed { .. } => "renamed",
            Self::HeadRefDeleted => "head_ref_deleted",
            Self::HeadRefRestored => "head_ref_restored",
            Self::HeadRefForcePushed => "head_ref_force_pushed",
            Self::BaseRefForcePushed => "base_ref_force_pushed",
            Self::Locked { .. } => "locked",
            Self::Unlocked => "unlocked",
            Self::Pinned => "pinned",
            Self::Unpinned => "unpinned",
            Self::Assigned { .. } => "assigned",
            Self::Unassigned { .. } => "unassigned",
            Self::ReviewRequested { .. } => "review_requested",
            Self::ReviewRequestRemoved { .. } => "review_request_removed",
            Self::ReviewDismissed { .. } => "review_dismissed",
            Self::ReadyForReview => "ready_for_review",
            Self::ConvertToDraft => "convert_to_draft",
            Self::ConvertedNoteToIssue { .. } => "converted_note_to_issue",
            Self::AddedToProject { .. } => "added_to_project",
            Self::MovedColumnsInProject { .. } => "moved_columns_in_project",
            Self::RemovedFromProject { .. } => "removed_from_project",
            Self::Milestoned { .. } => "milestoned",
            Self::Demilestoned { .. } => "demilestoned",
            Self::Deployed => "deployed",
            Self::Ignored(name) | Self::Unknown(name) => name,
        }
    }

    /// Returns the project card payload of project events.
    #[must_use]
    pub fn project_card(&self) -> Option<&EventProjectCard> {
        match self {
            Self::ConvertedNoteToIssue { card }
            | Self::AddedToProject { card }
            | Self::MovedColumnsInProject { card }
            | Self::RemovedFromProject { card } => Some(card),
            _ => None,
        }
    }
}

/// Wire shape of an event; every kind-specific field is optional.
#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(default)]
    id: u64,
    #[serde(default)]
    actor: Option<User>,
    event: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    commit_id: Option<String>,
    #[serde(default)]
    label: Option<EventLabel>,
    #[serde(default)]
    rename: Option<Rename>,
    #[serde(default)]
    lock_reason: Option<String>,
    #[serde(default)]
    assignee: Option<User>,
    #[serde(default)]
    assigner: Option<User>,
    #[serde(default)]
    requested_reviewer: Option<User>,
    #[serde(default)]
    requested_team: Option<Team>,
    #[serde(default)]
    dismissed_review: Option<DismissedReview>,
    #[serde(default)]
    project_card: Option<EventProjectCard>,
    #[serde(default)]
    milestone: Option<MilestoneRef>,
}

fn required<T>(value: Option<T>, event: &str, field: &str) -> Result<T, String> {
    value.ok_or_else(|| format!("`{event}` event is missing `{field}`"))
}

impl TryFrom<RawEvent> for Event {
    type Error = String;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        let name = raw.event.as_str();
        let actor = raw.actor.unwrap_or_else(User::ghost);
        let kind = match name {
            "closed" => EventKind::Closed {
                commit_id: raw.commit_id,
            },
            "merged" => EventKind::Merged {
                commit_id: raw.commit_id,
            },
            "reopened" => EventKind::Reopened,
            "labeled" => EventKind::Labeled {
                label: required(raw.label, name, "label")?,
            },
            "unlabeled" => EventKind::Unlabeled {
                label: required(raw.label, name, "label")?,
            },
            "renamed" => EventKind::Renamed {
                rename: required(raw.rename, name, "rename")?,
            },
            "head_ref_deleted" => EventKind::HeadRefDeleted,
            "head_ref_restored" => EventKind::HeadRefRestored,
            "head_ref_force_pushed" => EventKind::HeadRefForcePushed,
            "base_ref_force_pushed" => EventKind::BaseRefForcePushed,
            "locked" => EventKind::Locked {
                lock_reason: raw.lock_reason,
            },
            "unlocked" => EventKind::Unlocked,
            "pinned" => EventKind::Pinned,
            "unpinned" => EventKind::Unpinned,
            "assigned" | "unassigned" => {
                let assignee = raw.assignee.unwrap_or_else(User::ghost);
                let assigner = raw.assigner.unwrap_or_else(|| actor.clone());
                if name == "assigned" {
                    EventKind::Assigned { assignee, assigner }
                } else {
                    EventKind::Unassigned { assignee, assigner }
                }
            }
            "review_requested" | "review_request_removed" => {
                let reviewer = match (raw.requested_reviewer, raw.requested_team) {
                    (_, Some(team)) => Reviewer::Team(team),
                    (Some(user), None) => Reviewer::User(user),
                    (None, None) => Reviewer::User(User::ghost()),
                };
                if name == "review_requested" {
                    EventKind::ReviewRequested { reviewer }
                } else {
                    EventKind::ReviewRequestRemoved { reviewer }
                }
            }
            "review_dismissed" => EventKind::ReviewDismissed {
                review: required(raw.dismissed_review, name, "dismissed_review")?,
            },
            "ready_for_review" => EventKind::ReadyForReview,
            "convert_to_draft" => EventKind::ConvertToDraft,
            "converted_note_to_issue" => EventKind::ConvertedNoteToIssue {
                card: required(raw.project_card, name, "project_card")?,
            },
            "added_to_project" => EventKind::AddedToProject {
                card: required(raw.project_card, name, "project_card")?,
            },
            "moved_columns_in_project" => EventKind::MovedColumnsInProject {
                card: required(raw.project_card, name, "project_card")?,
            },
            "removed_from_project" => EventKind::RemovedFromProject {
                card: required(raw.project_card, name, "project_card")?,
            },
            "milestoned" => EventKind::Milestoned {
                milestone: required(raw.milestone, name, "milestone")?,
            },
            "demilestoned" => EventKind::Demilestoned {
                milestone: required(raw.milestone, name, "milestone")?,
            },
            "deployed" => EventKind::Deployed,
            other if IGNORED_KINDS.contains(&other) => EventKind::Ignored(other.to_string()),
            other => EventKind::Unknown(other.to_string()),
        };

        Ok(Self {
            id: raw.id,
            actor,
            created_at: raw.created_at,
            kind,
        })
    }
}
