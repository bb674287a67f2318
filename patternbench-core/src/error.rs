//! Error types for the telemetry pipeline.
//!
//! Every failure a pipeline stage can report is an explicit variant.
//! Malformed input is per-message and recoverable by the caller; sink
//! failures end the run.

use thiserror::Error;

/// Errors raised while pushing a message through a pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The message text is not well-formed JSON or lacks a required field.
    #[error("Malformed input: {reason}")]
    MalformedInput { reason: String },

    #[error("Failed to encode record: {reason}")]
    Encode { reason: String },

    #[error("Sink error: {context} - {source}")]
    Sink {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// True for errors that only affect the current message.
    pub fn is_per_message(&self) -> bool {
        matches!(self, PipelineError::MalformedInput { .. })
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::MalformedInput {
            reason: err.to_string(),
        }
    }
}

/// Result type alias using PipelineError.
pub type PipelineResult<T> = Result<T, PipelineError>;
