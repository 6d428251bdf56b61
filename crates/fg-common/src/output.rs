//! Process output contracts.
//!
//! Every invocation emits exactly one line of JSON: [`ScoreOutput`] on
//! stdout for success, [`FailureOutput`] on stderr for failure. The failure
//! shape is tagged so a pipeline error can never be read as a benign
//! negative prediction.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Successful scoring result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreOutput {
    /// Predicted label: 1 = fraud, 0 = legitimate.
    pub fraud_bool: u8,
    /// Width of the feature vector sent to the scoring service.
    pub n_features: usize,
}

/// Artifact check report (`check` subcommand).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutput {
    pub status: String,
    pub path: String,
    pub n_features: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Tagged error payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable error class: config, validation, transform, service, io.
    pub kind: String,
    pub message: String,
    /// Numeric error code, also used as the process exit code.
    pub code: u32,
}

/// Failed scoring result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureOutput {
    pub error: ErrorBody,
}

impl From<&Error> for FailureOutput {
    fn from(err: &Error) -> Self {
        FailureOutput {
            error: ErrorBody {
                kind: err.kind().to_string(),
                message: err.to_string(),
                code: err.code(),
            },
        }
    }
}
