//! Placeholder template errors.

/// Failure to prepare or fill one of the placeholder templates.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("placeholder template `{name}` does not compile: {source}")]
    Compile {
        name: &'static str,
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    #[error("placeholder template `{name}` failed to render: {source}")]
    Render {
        name: &'static str,
        #[source]
        source: handlebars::RenderError,
    },
}
