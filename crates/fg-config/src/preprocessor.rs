//! Fitted preprocessor artifact types.
//!
//! A [`Preprocessor`] wraps the fitted parameters with metadata for
//! versioning and integrity verification. The artifact is produced once by
//! the offline fitter, persisted as self-contained JSON, loaded read-only at
//! process start, and never mutated during serving; replacing it is a
//! whole-file atomic rename, never field-by-field mutation.
//!
//! # Fallback Behavior
//!
//! There is none: a missing, unreadable, tampered, or schema-incompatible
//! artifact is a fatal configuration error naming the `fit` remediation.
//! Serving against silently-degraded parameters would corrupt every
//! downstream prediction.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use fg_common::schema::{is_compatible, FeatureSchema, ARTIFACT_SCHEMA_VERSION};
use fg_common::{Error, Result};

// ── Artifact types ──────────────────────────────────────────────────────

/// Fit-time statistics for one numeric feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericStats {
    pub feature: String,
    pub mean: f64,
    pub stddev: f64,
}

/// Fitted category list for one categorical feature.
///
/// The reference (dropped) category is persisted explicitly so that a refit
/// elsewhere cannot silently change which level the all-zero block encodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryMap {
    pub feature: String,
    /// Observed categories in fit order.
    pub categories: Vec<String>,
    /// The category encoded by the all-zero indicator block.
    pub reference: String,
}

impl CategoryMap {
    /// Indicator columns this feature contributes: `|categories| - 1`.
    pub fn indicator_width(&self) -> usize {
        self.categories.len().saturating_sub(1)
    }
}

/// The fitted parameters: one entry per schema feature, in schema order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessorParams {
    pub numeric: Vec<NumericStats>,
    pub categorical: Vec<CategoryMap>,
}

/// A versioned, integrity-hashed fitted preprocessor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preprocessor {
    /// Artifact format version (for forward-compatible schema evolution).
    pub schema_version: String,

    /// ISO-8601 timestamp of the fit.
    #[serde(default)]
    pub created_at: Option<String>,

    /// The fitted parameters.
    pub params: PreprocessorParams,

    /// SHA-256 hash of the JSON-serialized `params` field.
    /// Populated on creation; verified on load.
    #[serde(default)]
    pub params_hash: Option<String>,
}

// ── Artifact implementation ─────────────────────────────────────────────

impl Preprocessor {
    /// Wrap freshly fitted parameters, stamping version, time, and hash.
    pub fn new(params: PreprocessorParams) -> Result<Self> {
        let params_json = serde_json::to_string(&params)?;
        let hash = sha256_hex(params_json.as_bytes());

        Ok(Preprocessor {
            schema_version: ARTIFACT_SCHEMA_VERSION.to_string(),
            created_at: Some(chrono::Utc::now().to_rfc3339()),
            params,
            params_hash: Some(hash),
        })
    }

    /// Width of the output feature vector:
    /// `|numeric| + Σ(|categories_i| − 1)`.
    ///
    /// Fixed once fitted; every vector produced against this artifact has
    /// exactly this length.
    pub fn output_len(&self) -> usize {
        self.params.numeric.len()
            + self
                .params
                .categorical
                .iter()
                .map(CategoryMap::indicator_width)
                .sum::<usize>()
    }

    /// Load and fully validate the artifact for serving.
    ///
    /// Called once at startup, never per record. Absence is reported with
    /// the expected location and the offline remediation.
    pub fn load(path: &Path, schema: &FeatureSchema) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Config(format!(
                "preprocessor artifact not found at {}; run `fg-core fit --input <training.csv> --output {}` first",
                path.display(),
                path.display(),
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read preprocessor at {}: {e}", path.display()))
        })?;

        let artifact = Self::from_json(&content)?;
        artifact.validate(schema)?;
        Ok(artifact)
    }

    /// Parse from JSON and verify the integrity hash.
    pub fn from_json(content: &str) -> Result<Self> {
        let artifact: Preprocessor = serde_json::from_str(content)
            .map_err(|e| Error::InvalidArtifact(format!("JSON parse error: {e}")))?;

        if !is_compatible(&artifact.schema_version) {
            return Err(Error::InvalidArtifact(format!(
                "unsupported artifact version: {}",
                artifact.schema_version
            )));
        }

        if let Some(expected) = &artifact.params_hash {
            let params_json = serde_json::to_string(&artifact.params)?;
            let actual = sha256_hex(params_json.as_bytes());
            if &actual != expected {
                return Err(Error::InvalidArtifact(format!(
                    "params hash mismatch: expected {expected}, got {actual}"
                )));
            }
        }

        Ok(artifact)
    }

    /// Validate the fitted parameters against the compiled-in schema.
    ///
    /// The artifact must cover exactly the schema's features, in schema
    /// order; anything else would silently reorder output columns.
    pub fn validate(&self, schema: &FeatureSchema) -> Result<()> {
        if self.params.numeric.len() != schema.numeric.len() {
            return Err(Error::InvalidArtifact(format!(
                "expected {} numeric features, artifact has {}",
                schema.numeric.len(),
                self.params.numeric.len()
            )));
        }
        for (stats, expected) in self.params.numeric.iter().zip(schema.numeric) {
            if stats.feature != *expected {
                return Err(Error::InvalidArtifact(format!(
                    "numeric feature order mismatch: expected '{expected}', got '{}'",
                    stats.feature
                )));
            }
            if !stats.mean.is_finite() || !stats.stddev.is_finite() || stats.stddev < 0.0 {
                return Err(Error::InvalidArtifact(format!(
                    "degenerate statistics for '{}': mean={}, stddev={}",
                    stats.feature, stats.mean, stats.stddev
                )));
            }
        }

        if self.params.categorical.len() != schema.categorical.len() {
            return Err(Error::InvalidArtifact(format!(
                "expected {} categorical features, artifact has {}",
                schema.categorical.len(),
                self.params.categorical.len()
            )));
        }
        for (map, expected) in self.params.categorical.iter().zip(schema.categorical) {
            if map.feature != *expected {
                return Err(Error::InvalidArtifact(format!(
                    "categorical feature order mismatch: expected '{expected}', got '{}'",
                    map.feature
                )));
            }
            if map.categories.is_empty() {
                return Err(Error::InvalidArtifact(format!(
                    "categorical feature '{}' has no fitted categories",
                    map.feature
                )));
            }
            if !map.categories.contains(&map.reference) {
                return Err(Error::InvalidArtifact(format!(
                    "reference category '{}' of '{}' is not in its category list",
                    map.reference, map.feature
                )));
            }
            let mut seen = std::collections::HashSet::new();
            for cat in &map.categories {
                if !seen.insert(cat) {
                    return Err(Error::InvalidArtifact(format!(
                        "duplicate category '{cat}' for '{}'",
                        map.feature
                    )));
                }
            }
        }

        Ok(())
    }

    /// Fitted statistics for a numeric feature.
    pub fn numeric_stats(&self, feature: &str) -> Option<&NumericStats> {
        self.params.numeric.iter().find(|s| s.feature == feature)
    }

    /// Fitted categories for a categorical feature.
    pub fn category_map(&self, feature: &str) -> Option<&CategoryMap> {
        self.params.categorical.iter().find(|m| m.feature == feature)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Persist atomically: write a sibling temp file, then rename over the
    /// destination. A serving process never observes a half-written artifact.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = self.to_json()?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &json)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
