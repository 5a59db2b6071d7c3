use thiserror::Error;

/// Errors raised while extracting, storing or analysing positions
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("invalid evaluation '{0}'")]
    InvalidEvaluation(String),

    #[error("malformed input row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    #[error("store error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("failed to encode square list: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("failed to read positions: {0}")]
    Csv(#[from] csv::Error),

    #[error("store schema version {found} is not supported (expected {expected})")]
    SchemaVersion { found: i64, expected: i64 },

    #[error("regression failed: {0}")]
    Regression(String),
}

impl AnalysisError {
    /// Errors confined to a single input row. The batch reports and skips them;
    /// every other error aborts the run.
    pub fn is_row_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::InvalidFen { .. }
                | AnalysisError::InvalidEvaluation(_)
                | AnalysisError::MalformedRow { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
