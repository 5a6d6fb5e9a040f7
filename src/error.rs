use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Failures of the ingestion pipeline, one variant per stage
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Feed unreachable or unparseable
    #[error("Failed to fetch feed {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// No capacity could be acquired (cancelled or closed limiter)
    #[error("Failed to acquire capacity: {0}")]
    Acquire(String),

    /// Extraction service call failed
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// Extraction payload did not match the expected shape
    #[error("Failed to decode extraction payload: {0}")]
    Decode(String),

    #[error("Storage error: {0}")]
    Storage(String),

    /// Batch task panicked or was aborted
    #[error("Batch task did not finish: {0}")]
    Task(String),
}

impl PipelineError {
    pub fn fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        PipelineError::Fetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Short stage label used in logs and reports
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Fetch { .. } => "fetch",
            PipelineError::Acquire(_) => "acquire",
            PipelineError::Extraction(_) => "extraction",
            PipelineError::Decode(_) => "decode",
            PipelineError::Storage(_) => "storage",
            PipelineError::Task(_) => "task",
        }
    }
}

impl From<sqlx::Error> for PipelineError {
    fn from(e: sqlx::Error) -> Self {
        PipelineError::Storage(e.to_string())
    }
}
