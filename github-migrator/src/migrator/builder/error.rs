//! Import builder error types.

use thiserror::Error;

/// Errors raised while building an import payload.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The timeline holds an event kind without a rendering.
    #[error("unknown event `{kind}` (id {id})")]
    UnknownEvent { id: u64, kind: String },

    /// A project event references a project that was not resolved.
    #[error("project {id} referenced by a timeline event is unknown")]
    MissingProject { id: u64 },

    /// A pull request was built without its pull request details.
    #[error("pull request #{number} is missing its pull request details")]
    MissingPullRequest { number: u64 },
}
