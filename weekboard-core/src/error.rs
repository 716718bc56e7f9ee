//! Error types for the weekboard pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building or publishing the week view.
///
/// Every variant is fatal to the run: the pipeline has no retry logic and no
/// partial-success mode. Callers decide how to report the failure.
#[derive(Error, Debug)]
pub enum WeekboardError {
    #[error("malformed event timestamp '{value}': {source}")]
    MalformedTimestamp {
        value: String,
        source: chrono::ParseError,
    },

    #[error("failed to render template '{template}': {source}")]
    TemplateRender {
        template: &'static str,
        source: askama::Error,
    },

    #[error("failed to publish artifact to {path}: {source}")]
    Publish {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type alias for weekboard operations.
pub type WeekboardResult<T> = Result<T, WeekboardError>;
