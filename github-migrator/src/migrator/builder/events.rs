//! Timeline event grouping and narration.

use super::html::{escape, join_phrases, plural_unit};
use super::{BuildError, Builder};
use crate::github::models::{Event, EventKind, ImportComment, Reviewer, User};
use chrono::TimeDelta;

/// Events of one category by one user close in time render as one comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    State,
    Label,
    Rename,
    HeadRef,
    ForcePush,
    Lock,
    Pin,
    Assignment,
    Review,
    Project,
    Milestone,
    Deployment,
    /// Known kinds that are never rendered.
    Silent,
}

impl EventCategory {
    /// Returns the category of `kind`, or `None` for unknown kinds.
    #[must_use]
    pub fn of(kind: &EventKind) -> Option<Self> {
        let category = match kind {
            EventKind::Closed { .. } | EventKind::Merged { .. } | EventKind::Reopened => {
                Self::State
            }
            EventKind::Labeled { .. } | EventKind::Unlabeled { .. } => Self::Label,
            EventKind::Renamed { .. } => Self::Rename,
            EventKind::HeadRefDeleted | EventKind::HeadRefRestored => Self::HeadRef,
            EventKind::HeadRefForcePushed | EventKind::BaseRefForcePushed => Self::ForcePush,
            EventKind::Locked { .. } | EventKind::Unlocked => Self::Lock,
            EventKind::Pinned | EventKind::Unpinned => Self::Pin,
            EventKind::Assigned { .. } | EventKind::Unassigned { .. } => Self::Assignment,
            EventKind::ReviewRequested { .. }
            | EventKind::ReviewRequestRemoved { .. }
            | EventKind::ReviewDismissed { .. }
            | EventKind::ReadyForReview
            | EventKind::ConvertToDraft => Self::Review,
            EventKind::ConvertedNoteToIssue { .. }
            | EventKind::AddedToProject { .. }
            | EventKind::MovedColumnsInProject { .. }
            | EventKind::RemovedFromProject { .. } => Self::Project,
            EventKind::Milestoned { .. } | EventKind::Demilestoned { .. } => Self::Milestone,
            EventKind::Deployed => Self::Deployment,
            EventKind::Ignored(_) => Self::Silent,
            EventKind::Unknown(_) => return None,
        };
        Some(category)
    }
}

/// Partitions events into groups rendered as single comments.
///
/// Events are visited in timestamp order. Each joins the first group whose
/// first event has the same acting user and category and lies less than
/// `window` away; otherwise it opens a new group.
///
/// # Errors
///
/// Returns [`BuildError::UnknownEvent`] for any event of an unknown kind.
pub fn group_events<'a>(
    events: impl IntoIterator<Item = &'a Event>,
    window: TimeDelta,
) -> Result<Vec<Vec<&'a Event>>, BuildError> {
    let mut events: Vec<&Event> = events.into_iter().collect();
    events.sort_by_key(|event| event.created_at);

    let mut groups: Vec<(EventCategory, Vec<&Event>)> = Vec::new();
    for event in events {
        let category = EventCategory::of(&event.kind).ok_or_else(|| unknown(event))?;
        let joined = groups.iter_mut().find(|(group_category, group)| {
            let first = group[0];
            *group_category == category
                && first.acting_user().login == event.acting_user().login
                && (first.created_at - event.created_at).abs() < window
        });
        match joined {
            Some((_, group)) => group.push(event),
            None => groups.push((category, vec![event])),
        }
    }
    Ok(groups.into_iter().map(|(_, group)| group).collect())
}

fn unknown(event: &Event) -> BuildError {
    BuildError::UnknownEvent {
        id: event.id,
        kind: event.kind.name().to_string(),
    }
}

fn quote_labels(names: &[&str]) -> String {
    names
        .iter()
        .map(|name| format!("<b><code>{}</code></b>", escape(name)))
        .collect::<Vec<_>>()
        .join(" ")
}

impl Builder<'_> {
    /// Renders one comment per non-silent event group.
    pub(super) fn event_comments(&self, events: &[&Event]) -> Result<Vec<ImportComment>, BuildError> {
        let mut comments = Vec::new();
        for group in group_events(events.iter().copied(), self.ctx.group_window)? {
            let Some(action) = self.narrate(&group)? else {
                continue;
            };
            let first = group[0];
            comments.push(ImportComment {
                body: self.user_action_body(first.acting_user(), &action, ""),
                created_at: first.created_at,
            });
        }
        Ok(comments)
    }

    /// Describes a group as a single action, or `None` if nothing renders.
    fn narrate(&self, group: &[&Event]) -> Result<Option<String>, BuildError> {
        let merged = group
            .iter()
            .any(|event| matches!(event.kind, EventKind::Merged { .. }));
        let mut actions = Vec::new();
        let mut added = Vec::new();
        let mut removed = Vec::new();

        for event in group {
            let action = match &event.kind {
                EventKind::Closed { .. } if merged => continue,
                EventKind::Closed { .. } => self.closed_phrase().to_string(),
                EventKind::Merged { commit_id } => {
                    self.merged_phrase(commit_id.as_deref())?
                }
                EventKind::Reopened => format!("reopened the {}", self.bundle.issue.kind()),
                EventKind::Labeled { label } => {
                    added.push(label.name.as_str());
                    continue;
                }
                EventKind::Unlabeled { label } => {
                    removed.push(label.name.as_str());
                    continue;
                }
                EventKind::Renamed { rename } => format!(
                    "changed the title <b><s>{}</s></b> <b>{}</b>",
                    escape(&rename.from),
                    escape(&rename.to)
                ),
                EventKind::HeadRefDeleted => format!(
                    "deleted the <code>{}</code> branch",
                    escape(&self.pull_req()?.head.ref_name)
                ),
                EventKind::HeadRefRestored => format!(
                    "restored the <code>{}</code> branch",
                    escape(&self.pull_req()?.head.ref_name)
                ),
                EventKind::HeadRefForcePushed => format!(
                    "force-pushed the <code>{}</code> branch",
                    escape(&self.pull_req()?.head.ref_name)
                ),
                EventKind::BaseRefForcePushed => format!(
                    "force-pushed the <code>{}</code> branch",
                    escape(&self.pull_req()?.base.ref_name)
                ),
                EventKind::Locked { lock_reason } => match lock_reason.as_deref() {
                    Some(reason) if !reason.is_empty() => format!(
                        "locked as <b>{}</b> and limited conversation to collaborators",
                        escape(&reason.replace('-', " "))
                    ),
                    _ => "locked and limited conversation to collaborators".to_string(),
                },
                EventKind::Unlocked => "unlocked this conversation".to_string(),
                EventKind::Pinned => "pinned this issue".to_string(),
                EventKind::Unpinned => "unpinned this issue".to_string(),
                EventKind::Assigned { assignee, assigner } => {
                    if group.len() == 1 && assignee.login == assigner.login {
                        return Ok(Some("self-assigned this".to_string()));
                    }
                    format!("assigned {}", self.mention(assignee))
                }
                EventKind::Unassigned { assignee, assigner } => {
                    if group.len() == 1 && assignee.login == assigner.login {
                        return Ok(Some("removed their assignment".to_string()));
                    }
                    format!("unassigned {}", self.mention(assignee))
                }
                EventKind::ReviewRequested { reviewer }
                | EventKind::ReviewRequestRemoved { reviewer } => {
                    let requested = matches!(event.kind, EventKind::ReviewRequested { .. });
                    let own = matches!(reviewer, Reviewer::User(user) if user.login == event.actor.login);
                    if group.len() == 1 && own {
                        let action = if requested {
                            "self-requested a review"
                        } else {
                            "removed their request for review"
                        };
                        return Ok(Some(action.to_string()));
                    }
                    self.review_request(reviewer, requested)
                }
                EventKind::ReviewDismissed { review } => {
                    let message = escape(review.dismissal_message.as_deref().unwrap_or_default());
                    let author = self
                        .bundle
                        .reviews
                        .iter()
                        .find(|candidate| candidate.id == review.review_id)
                        .map(|candidate| &candidate.user);
                    match author {
                        Some(user) => format!(
                            "dismissed @{}'s review<br>{message}",
                            self.ctx.filters.apply(&user.login)
                        ),
                        None => format!("dismissed a review<br>{message}"),
                    }
                }
                EventKind::ReadyForReview => {
                    "marked this pull request as ready for review".to_string()
                }
                EventKind::ConvertToDraft => "marked this pull request as draft".to_string(),
                EventKind::ConvertedNoteToIssue { card } => format!(
                    "created this issue from a note in {} (<code>{}</code>)",
                    self.project_link(card.project_id)?,
                    escape(&card.column_name)
                ),
                EventKind::AddedToProject { card } => format!(
                    "added this to <code>{}</code> in {}",
                    escape(&card.column_name),
                    self.project_link(card.project_id)?
                ),
                EventKind::MovedColumnsInProject { card } => format!(
                    "moved this from <code>{}</code> to <code>{}</code> in {}",
                    escape(card.previous_column_name.as_deref().unwrap_or_default()),
                    escape(&card.column_name),
                    self.project_link(card.project_id)?
                ),
                EventKind::RemovedFromProject { card } => format!(
                    "removed this from <code>{}</code> in {}",
                    escape(&card.column_name),
                    self.project_link(card.project_id)?
                ),
                EventKind::Milestoned { milestone } => format!(
                    "added this to the {} milestone",
                    self.milestone_link(&milestone.title)
                ),
                EventKind::Demilestoned { milestone } => format!(
                    "removed this from the {} milestone",
                    self.milestone_link(&milestone.title)
                ),
                EventKind::Deployed => "deployed this".to_string(),
                EventKind::Ignored(_) => continue,
                EventKind::Unknown(_) => return Err(unknown(event)),
            };
            actions.push(action);
        }

        if !actions.is_empty() {
            return Ok(Some(join_phrases(&actions)));
        }
        if added.is_empty() && removed.is_empty() {
            return Ok(None);
        }
        let mut action = String::new();
        if !added.is_empty() {
            action.push_str(&format!("added {}", quote_labels(&added)));
        }
        if !removed.is_empty() {
            if !action.is_empty() {
                action.push_str(" and ");
            }
            action.push_str(&format!("removed {}", quote_labels(&removed)));
        }
        action.push_str(&plural_unit((added.len() + removed.len()) as u64, " label"));
        Ok(Some(action))
    }

    fn review_request(&self, reviewer: &Reviewer, requested: bool) -> String {
        let action = if requested {
            "requested a review"
        } else {
            "removed the request for review"
        };
        match reviewer {
            Reviewer::Team(team) => format!(
                "{action} from <b>{}</b>",
                self.ctx.filters.apply(&team.name)
            ),
            Reviewer::User(user) => format!("{action} from {}", self.mention(user)),
        }
    }

    fn mention(&self, user: &User) -> String {
        format!("@{}", self.ctx.filters.apply(&user.login))
    }

    fn project_link(&self, id: u64) -> Result<String, BuildError> {
        let project = self
            .ctx
            .projects
            .get(&id)
            .ok_or(BuildError::MissingProject { id })?;
        Ok(format!(
            "<b><a href=\"{}\">{}</a></b>",
            project.html_url,
            escape(&project.name)
        ))
    }

    fn milestone_link(&self, title: &str) -> String {
        match self.ctx.milestones.get(title) {
            Some(milestone) => format!(
                "<b><a href=\"{}\">{}</a></b>",
                milestone.html_url,
                escape(title)
            ),
            None => format!("<b>{}</b>", escape(title)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::models::EventLabel;
    use chrono::{DateTime, Utc};

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_600_000_000 + seconds, 0).unwrap()
    }

    fn event(id: u64, actor: &str, seconds: i64, kind: EventKind) -> Event {
        Event {
            id,
            actor: User::new(actor),
            created_at: at(seconds),
            kind,
        }
    }

    fn labeled(name: &str) -> EventKind {
        EventKind::Labeled {
            label: EventLabel {
                name: name.to_string(),
                color: String::new(),
            },
        }
    }

    fn ids(groups: &[Vec<&Event>]) -> Vec<Vec<u64>> {
        groups
            .iter()
            .map(|group| group.iter().map(|event| event.id).collect())
            .collect()
    }

    #[test]
    fn test_same_user_category_and_window_group() {
        let events = vec![
            event(1, "alice", 0, labeled("bug")),
            event(2, "alice", 5, EventKind::Unlabeled {
                label: EventLabel {
                    name: "design".to_string(),
                    color: String::new(),
                },
            }),
            event(3, "alice", 6, EventKind::Closed { commit_id: None }),
            event(4, "bob", 7, labeled("ui")),
            event(5, "alice", 30, labeled("late")),
        ];

        let groups = group_events(&events, TimeDelta::seconds(10)).unwrap();

        assert_eq!(ids(&groups), vec![vec![1, 2], vec![3], vec![4], vec![5]]);
    }

    #[test]
    fn test_groups_follow_timestamps_not_input_order() {
        let events = vec![
            event(2, "alice", 8, labeled("b")),
            event(1, "alice", 0, labeled("a")),
            event(3, "alice", 12, labeled("c")),
        ];

        let groups = group_events(&events, TimeDelta::seconds(10)).unwrap();

        // anchored on the first event of each group
        assert_eq!(ids(&groups), vec![vec![1, 2], vec![3]]);
    }

    #[test]
    fn test_assignment_groups_by_assigner() {
        let assigned = |id, seconds| {
            event(id, "bot", seconds, EventKind::Assigned {
                assignee: User::new("bob"),
                assigner: User::new("alice"),
            })
        };
        let events = vec![assigned(1, 0), assigned(2, 1)];

        let groups = group_events(&events, TimeDelta::seconds(10)).unwrap();

        assert_eq!(ids(&groups), vec![vec![1, 2]]);
        assert_eq!(groups[0][0].acting_user().login, "alice");
    }

    #[test]
    fn test_unknown_kind_is_fatal() {
        let events = vec![
            event(1, "alice", 0, labeled("bug")),
            event(9, "alice", 1, EventKind::Unknown("sparkled".to_string())),
        ];

        let err = group_events(&events, TimeDelta::seconds(10)).unwrap_err();

        assert!(matches!(err, BuildError::UnknownEvent { id: 9, ref kind } if kind == "sparkled"));
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            EventCategory::of(&EventKind::Merged { commit_id: None }),
            EventCategory::of(&EventKind::Reopened)
        );
        assert_eq!(
            EventCategory::of(&EventKind::ConvertToDraft),
            Some(EventCategory::Review)
        );
        assert_eq!(
            EventCategory::of(&EventKind::Ignored("mentioned".to_string())),
            Some(EventCategory::Silent)
        );
        assert_ne!(
            EventCategory::of(&EventKind::Pinned),
            EventCategory::of(&EventKind::Unlocked)
        );
    }
}
