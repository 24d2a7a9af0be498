//! Template rendering using Handlebars.
//!
//! Placeholder payloads that stand in for content deleted on the source are
//! rendered from the templates registered here.

mod error;
mod renderer;

pub use error::TemplateError;
pub use renderer::{create_handlebars_registry, TemplateRenderer};

/// Title of issues imported in place of deleted source issues.
pub const DELETED_ISSUE_TITLE: &str = "[Deleted issue]";

/// Title of milestones created to keep numbers aligned.
pub const DELETED_MILESTONE_TITLE: &str = "[Deleted milestone]";

/// Body of a deleted issue placeholder.
pub const DELETED_ISSUE_TEMPLATE: &str = r#"<table>
<tr>
  <td>This issue was imported from <a href="{{url}}">{{repo}}#{{number}}</a>, which has already been deleted.</td>
</tr>
</table>
"#;
