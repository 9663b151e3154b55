//! Error types for webfont generation.

use std::path::PathBuf;

/// Result type for generation stages.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the generation pipeline.
///
/// [`Error::Validation`] carries a concise, user-correctable message. Every
/// other variant is a passthrough that keeps its full diagnostic chain.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad arguments, missing files or malformed codepoint data.
    #[error("{0}")]
    Validation(String),

    /// Filesystem failure outside of validation.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The progress report could not be written.
    #[error("failed to write report: {0}")]
    Report(#[source] std::io::Error),

    /// A background filesystem task died before reporting its result.
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// JSON output could not be serialized.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Anything raised by the compilation engine, passed through unchanged.
    #[error(transparent)]
    Engine(#[from] anyhow::Error),
}

impl Error {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error is user-correctable.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}
