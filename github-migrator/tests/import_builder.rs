use std::path::PathBuf;

use github_migrator::github::models::{Comment, Event, Issue, Milestone, Repo};
use github_migrator::migrator::filter::CommentFilters;
use github_migrator::{build_import, BuildContext, BuildError, IssueBundle, UserMapping};
use serde::de::DeserializeOwned;

fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load<T: DeserializeOwned>(path: &str) -> T {
    let content = std::fs::read_to_string(fixtures_root().join(path)).unwrap();
    serde_json::from_str(&content).unwrap()
}

fn context() -> BuildContext {
    let source: Repo = load("repos/source.json");
    let target: Repo = load("repos/target.json");
    let mapping = UserMapping::parse("alice:alice-corp");
    let filters = CommentFilters::for_repos(&source, &target, &mapping);
    let milestone: Milestone = serde_json::from_value(serde_json::json!({
        "number": 7,
        "title": "v1.2",
        "state": "open",
        "html_url": "https://ghe.example.com/corp/widgets/milestone/7",
    }))
    .unwrap();
    BuildContext::new(source, target, filters)
        .with_identities(["alice-corp", "bob"])
        .with_milestones([milestone])
}

fn bundle(events: &str) -> IssueBundle {
    let issue: Issue = load("issue-42/issue.json");
    let mut bundle = IssueBundle::new(issue);
    bundle.comments = load::<Vec<Comment>>("issue-42/comments.json");
    bundle.events = load::<Vec<Event>>(events);
    bundle
}

#[test]
fn build_issue_from_fixture() {
    let import = build_import(&context(), &bundle("issue-42/events.json")).unwrap();

    let issue = &import.issue;
    assert_eq!(issue.title, "Crash when <config> is empty");
    assert!(issue.closed);
    assert_eq!(issue.labels, vec!["bug".to_string(), "ui".to_string()]);
    assert_eq!(issue.assignee.as_deref(), Some("bob"));
    assert_eq!(issue.milestone, Some(7));
    assert!(issue
        .body
        .contains("<img src=\"https://ghe.example.com/alice-corp.png\" width=\"35\">"));
    assert!(issue.body.contains("@alice-corp created the original issue"));
    assert!(issue
        .body
        .contains("imported from <a href=\"https://github.com/octo/widgets/issues/42\">octo/widgets#42</a>"));
    assert!(issue
        .body
        .contains("Stack trace in https://ghe.example.com/corp/widgets/issues/41"));
    assert!(issue.body.contains(
        "<a href=\"https://github.com/user-attachments/assets/trace.png\">![trace](https://github.com/user-attachments/assets/trace.png)</a>"
    ));

    let bodies: Vec<&str> = import
        .comments
        .iter()
        .map(|comment| comment.body.as_str())
        .collect();
    assert_eq!(bodies.len(), 5);
    assert!(bodies[0].contains("@bob commented"));
    assert!(bodies[0].contains("@alice-corp can you attach the config?"));
    assert!(bodies[1].contains("@ghost commented"));
    assert!(bodies[1].contains("https://ghe.example.com/ghost.png"));
    assert!(bodies[2].contains("@bob added <b><code>bug</code></b> <b><code>ui</code></b> labels"));
    assert!(bodies[3].contains(
        "@alice-corp changed the title <b><s>Crash</s></b> <b>Crash when &lt;config&gt; is empty</b>"
    ));
    assert!(bodies[4].contains("@bob closed the issue"));
    assert_eq!(
        import.comments[4].created_at,
        "2021-03-04T12:00:00Z".parse::<chrono::DateTime<chrono::Utc>>().unwrap()
    );
}

#[test]
fn unknown_event_kind_is_fatal() {
    let result = build_import(&context(), &bundle("issue-42/events-unknown.json"));

    assert!(matches!(
        result,
        Err(BuildError::UnknownEvent { id: 7101, ref kind }) if kind == "transferred_to_mars"
    ));
}

#[test]
fn import_payload_serializes_for_the_api() {
    let import = build_import(&context(), &bundle("issue-42/events.json")).unwrap();

    let value = serde_json::to_value(&import).unwrap();

    assert_eq!(value["issue"]["milestone"], 7);
    assert_eq!(value["issue"]["closed_at"], "2021-03-04T12:00:00Z");
    assert_eq!(value["comments"].as_array().unwrap().len(), 5);
}
