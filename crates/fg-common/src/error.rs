//! Error types for Fraudgate.

use thiserror::Error;

/// Result type alias for Fraudgate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for Fraudgate.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid preprocessor artifact: {0}")]
    InvalidArtifact(String),

    // Input errors (20-29)
    #[error("invalid input record: {0}")]
    Validation(String),

    // Transform errors (30-39)
    #[error("transform failed: {0}")]
    Transform(String),

    // Scoring service errors (40-49)
    #[error("scoring service returned status {status}: {body}")]
    ServiceStatus { status: u16, body: String },

    #[error("scoring service call failed: {0}")]
    ServiceCall(String),

    #[error("unparseable scoring response: {0}")]
    ServiceResponse(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    /// Doubles as the process exit code for the scoring CLI.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidArtifact(_) => 10,
            Error::Validation(_) => 11,
            Error::Transform(_) => 12,
            Error::ServiceStatus { .. } => 13,
            Error::ServiceCall(_) => 13,
            Error::ServiceResponse(_) => 13,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Stable tag for the failure output contract.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config(_) | Error::InvalidArtifact(_) => "config",
            Error::Validation(_) => "validation",
            Error::Transform(_) => "transform",
            Error::ServiceStatus { .. } | Error::ServiceCall(_) | Error::ServiceResponse(_) => {
                "service"
            }
            Error::Io(_) => "io",
            Error::Json(_) => "io",
        }
    }
}
