//! Error types for capturing and trimming traces.

use thiserror::Error;

/// Result type alias for trace operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A trim was asked to cut through a function that is not on the trace.
    #[error("no frame named any of {targets:?} in trace")]
    FrameNotFound {
        /// The function names that were searched for.
        targets: Vec<String>,
    },

    /// The stack walker or the symbolizer could not be used at all.
    #[error("stack collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    /// Writing a rendered trace failed.
    #[error("failed to write trace: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize trace: {0}")]
    Json(#[from] serde_json::Error),
}
