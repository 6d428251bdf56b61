//! Exit codes for the fg-core CLI.
//!
//! Exit codes communicate operation outcome without requiring output
//! parsing. They track the error taxonomy in `fg_common::error`.

use fg_common::Error;

/// Exit codes for fg-core operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Record scored (or artifact fitted/validated) successfully
    Success = 0,

    /// Configuration error (artifact missing, unreadable, or invalid)
    ConfigError = 10,

    /// Malformed input record
    ValidationError = 11,

    /// Record could not be coerced to the feature schema
    TransformError = 12,

    /// Scoring service failure (network, timeout, status, bad response)
    ServiceError = 13,

    /// I/O error
    IoError = 60,

    /// Internal/unknown error
    InternalError = 99,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this exit code indicates success.
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Success)
    }

    /// Check if this exit code indicates an error requiring attention.
    pub fn is_error(self) -> bool {
        (self as i32) >= 10
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err.kind() {
            "config" => ExitCode::ConfigError,
            "validation" => ExitCode::ValidationError,
            "transform" => ExitCode::TransformError,
            "service" => ExitCode::ServiceError,
            "io" => ExitCode::IoError,
            _ => ExitCode::InternalError,
        }
    }
}
