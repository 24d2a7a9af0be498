//! Template renderer.

use super::{TemplateError, DELETED_ISSUE_TEMPLATE};
use handlebars::Handlebars;
use serde_json::json;

const DELETED_ISSUE: &str = "deleted_issue";

/// Creates a Handlebars registry in strict mode.
///
/// Values are HTML-escaped since every template renders into an HTML body.
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();

    // Enable strict mode to catch missing variables
    hbs.set_strict_mode(true);

    hbs
}

/// Renders placeholder bodies.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl TemplateRenderer {
    /// Creates a renderer with every placeholder template registered.
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in template fails to compile.
    pub fn new() -> Result<Self, TemplateError> {
        let mut handlebars = create_handlebars_registry();
        handlebars
            .register_template_string(DELETED_ISSUE, DELETED_ISSUE_TEMPLATE)
            .map_err(|source| TemplateError::Compile {
                name: DELETED_ISSUE,
                source: Box::new(source),
            })?;
        Ok(Self { handlebars })
    }

    fn render(&self, name: &'static str, data: &serde_json::Value) -> Result<String, TemplateError> {
        self.handlebars
            .render(name, data)
            .map_err(|source| TemplateError::Render { name, source })
    }

    /// Renders the body of a `[Deleted issue]` placeholder.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_deleted_issue(
        &self,
        repo: &str,
        number: u64,
        url: &str,
    ) -> Result<String, TemplateError> {
        let data = json!({
            "repo": repo,
            "number": number,
            "url": url,
        });
        self.render(DELETED_ISSUE, &data)
    }
}
