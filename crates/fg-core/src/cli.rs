//! Command-line interface for fg-core.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::client::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};

/// Fraud scoring pipeline: preprocess one application record and score it
/// against a remote model server.
#[derive(Parser, Debug)]
#[command(name = "fg-core", version)]
pub struct Cli {
    /// Path to the fitted preprocessor artifact.
    ///
    /// Falls back to $FRAUDGATE_PREPROCESSOR, then the per-user data
    /// directory, then ./preprocessor.json.
    #[arg(long, global = true, value_name = "PATH")]
    pub preprocessor: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score one record read as a JSON object from stdin
    Score {
        /// Scoring service endpoint
        #[arg(long, env = "FRAUDGATE_SCORING_URL", default_value = DEFAULT_ENDPOINT)]
        endpoint: String,

        /// Request timeout in seconds
        #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout_secs: u64,
    },

    /// Fit a preprocessor from a training table and persist it
    Fit {
        /// Training table (CSV with a header row covering the schema)
        #[arg(long, value_name = "CSV")]
        input: PathBuf,

        /// Artifact destination (defaults to the resolved preprocessor path)
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Validate the fitted artifact and report its shape
    Check,
}
