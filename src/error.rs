use thiserror::Error;

/// Main error type for the analysis tool
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("entropy source failure: {0}")]
    Entropy(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("worker pool failure: {0}")]
    Pool(String),
}

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
