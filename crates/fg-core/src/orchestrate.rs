//! Single-record scoring pipeline.
//!
//! Drives one record through `Parsing → Transforming → Predicting →
//! Emitting`; any error short-circuits to the failure emit. The fitted
//! preprocessor is loaded exactly once, before any input is read, and
//! passed by reference into the transform; there is no lazy global.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use fg_common::schema::FeatureSchema;
use fg_common::{CheckOutput, Error, FailureOutput, Record, Result, ScoreOutput};
use fg_config::Preprocessor;

use crate::client::InferenceClient;
use crate::exit_codes::ExitCode;
use crate::fit;
use crate::transform::transform;

/// Pipeline stage, carried in structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Parsing,
    Transforming,
    Predicting,
    Emitting,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Parsing => "parsing",
            Stage::Transforming => "transforming",
            Stage::Predicting => "predicting",
            Stage::Emitting => "emitting",
        };
        write!(f, "{name}")
    }
}

/// Configuration for one scoring invocation.
#[derive(Debug, Clone)]
pub struct ScoreConfig {
    pub artifact_path: PathBuf,
    pub endpoint: String,
    pub timeout: Duration,
}

/// Score one record: read JSON from `input`, emit one line of JSON.
///
/// Success goes to `success_out` with exit 0; failure goes to `failure_out`
/// as a tagged error object with a matching non-zero exit code. Exactly one
/// of the two channels receives output.
pub fn run_score(
    config: &ScoreConfig,
    input: &mut dyn Read,
    success_out: &mut dyn Write,
    failure_out: &mut dyn Write,
) -> ExitCode {
    match score_one(config, input, success_out) {
        Ok(()) => ExitCode::Success,
        Err(err) => emit_failure(&err, failure_out),
    }
}

fn score_one(config: &ScoreConfig, input: &mut dyn Read, out: &mut dyn Write) -> Result<()> {
    // Startup check: the artifact must load before any record is touched.
    let schema = FeatureSchema::baseline();
    let preprocessor = Preprocessor::load(&config.artifact_path, &schema)?;

    tracing::debug!(stage = %Stage::Parsing, artifact = %config.artifact_path.display());
    let mut raw = String::new();
    input.read_to_string(&mut raw)?;
    let record = Record::from_json_str(&raw)?;

    tracing::debug!(stage = %Stage::Transforming, fields = record.len());
    let features = transform(&preprocessor, &record)?;

    tracing::debug!(stage = %Stage::Predicting, n_features = features.len(), endpoint = %config.endpoint);
    let client = InferenceClient::new(config.endpoint.clone(), config.timeout);
    let label = client.predict(&features)?;

    tracing::debug!(stage = %Stage::Emitting, label);
    let output = ScoreOutput {
        fraud_bool: label,
        n_features: features.len(),
    };
    writeln!(out, "{}", serde_json::to_string(&output)?)?;
    Ok(())
}

/// Fit a preprocessor and report `{rows, n_features}`.
pub fn run_fit(
    input: &Path,
    output_path: &Path,
    success_out: &mut dyn Write,
    failure_out: &mut dyn Write,
) -> ExitCode {
    let schema = FeatureSchema::baseline();
    match fit::run_fit(input, output_path, &schema)
        .and_then(|summary| Ok(writeln!(success_out, "{}", serde_json::to_string(&summary)?)?))
    {
        Ok(()) => ExitCode::Success,
        Err(err) => emit_failure(&err, failure_out),
    }
}

/// Load and validate the artifact, reporting its shape.
pub fn run_check(
    artifact_path: &Path,
    success_out: &mut dyn Write,
    failure_out: &mut dyn Write,
) -> ExitCode {
    let schema = FeatureSchema::baseline();
    let result = Preprocessor::load(artifact_path, &schema).and_then(|preprocessor| {
        let output = CheckOutput {
            status: "ok".into(),
            path: artifact_path.display().to_string(),
            n_features: preprocessor.output_len(),
            created_at: preprocessor.created_at.clone(),
        };
        Ok(writeln!(success_out, "{}", serde_json::to_string(&output)?)?)
    });

    match result {
        Ok(()) => ExitCode::Success,
        Err(err) => emit_failure(&err, failure_out),
    }
}

fn emit_failure(err: &Error, out: &mut dyn Write) -> ExitCode {
    let code = ExitCode::from(err);
    // The JSON line below is the error surface; log at debug so the default
    // filter keeps the failure channel to exactly one line.
    tracing::debug!(kind = err.kind(), code = code.as_i32(), "{err}");

    let failure = FailureOutput::from(err);
    if let Ok(line) = serde_json::to_string(&failure) {
        let _ = writeln!(out, "{line}");
    }
    code
}
