//! Error handling for the job matcher

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobMatcherError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Embedding dimensions don't match: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    #[error("Request already in progress: {0}")]
    RequestInProgress(String),

    #[error("Processing error: {0}")]
    Processing(String),
}

impl JobMatcherError {
    /// Errors scoped to a single job record. The engine skips the job and keeps going.
    pub fn is_per_job(&self) -> bool {
        matches!(
            self,
            JobMatcherError::DimensionMismatch { .. } | JobMatcherError::CorruptRecord(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, JobMatcherError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for JobMatcherError {
    fn from(err: anyhow::Error) -> Self {
        JobMatcherError::Processing(err.to_string())
    }
}
