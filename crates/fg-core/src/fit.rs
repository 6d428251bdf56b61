//! Offline preprocessor fitting.
//!
//! Consumes a headered CSV training table, computes per-feature statistics
//! and category vocabularies, and persists the result as the serving
//! artifact. Runs offline only, never on the scoring hot path.
//!
//! Fitting policy (recorded in DESIGN.md):
//! - Rows whose cells are all empty are dropped.
//! - The label column is never fitted as a feature.
//! - Numeric statistics are population mean/stddev (ddof = 0) over present
//!   values; empty cells are excluded from the computation.
//! - Categories are collected in first-observation order; the first observed
//!   becomes the persisted reference level.

use std::path::Path;

use serde::{Deserialize, Serialize};

use fg_common::schema::FeatureSchema;
use fg_common::{Error, Result};
use fg_config::{CategoryMap, NumericStats, Preprocessor, PreprocessorParams};

/// One-line JSON report for the `fit` subcommand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitSummary {
    /// Training rows used (after dropping all-empty rows).
    pub rows: usize,
    /// Width of the vectors the fitted artifact will produce.
    pub n_features: usize,
}

/// Welford running mean/variance accumulator.
///
/// Single-pass and numerically stable for the wide value ranges in the
/// training table (velocities up to 1e5+ next to similarity scores in
/// [0, 1]).
#[derive(Debug, Default, Clone)]
struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    fn push(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Population standard deviation (ddof = 0).
    fn stddev(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.m2 / self.count as f64).sqrt()
        }
    }
}

/// Fit a preprocessor from a CSV training table.
///
/// Returns the fitted preprocessor and the number of rows used.
pub fn fit_table(input: &Path, schema: &FeatureSchema) -> Result<(Preprocessor, usize)> {
    let mut reader = csv::Reader::from_path(input).map_err(|e| {
        Error::Validation(format!("cannot open training table {}: {e}", input.display()))
    })?;

    let headers = reader
        .headers()
        .map_err(|e| Error::Validation(format!("cannot read CSV header: {e}")))?
        .clone();

    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::Validation(format!("training table is missing column '{name}'")))
    };

    let numeric_cols: Vec<usize> = schema
        .numeric
        .iter()
        .map(|name| column(name))
        .collect::<Result<_>>()?;
    let categorical_cols: Vec<usize> = schema
        .categorical
        .iter()
        .map(|name| column(name))
        .collect::<Result<_>>()?;

    let mut numeric_stats = vec![RunningStats::default(); schema.numeric.len()];
    let mut categories: Vec<Vec<String>> = vec![Vec::new(); schema.categorical.len()];

    let mut rows = 0usize;
    for (row_idx, result) in reader.records().enumerate() {
        let record =
            result.map_err(|e| Error::Validation(format!("CSV row {}: {e}", row_idx + 1)))?;

        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        rows += 1;

        for (feature_idx, &col_idx) in numeric_cols.iter().enumerate() {
            let cell = record.get(col_idx).unwrap_or("").trim();
            if cell.is_empty() {
                continue;
            }
            let value: f64 = cell.parse().map_err(|_| {
                Error::Validation(format!(
                    "row {}: numeric feature '{}' has unparseable value '{cell}'",
                    row_idx + 1,
                    schema.numeric[feature_idx]
                ))
            })?;
            numeric_stats[feature_idx].push(value);
        }

        for (feature_idx, &col_idx) in categorical_cols.iter().enumerate() {
            let cell = record.get(col_idx).unwrap_or("").trim();
            if cell.is_empty() {
                continue;
            }
            if !categories[feature_idx].iter().any(|c| c == cell) {
                categories[feature_idx].push(cell.to_string());
            }
        }
    }

    if rows == 0 {
        return Err(Error::Validation(format!(
            "training table {} has no usable rows",
            input.display()
        )));
    }

    let numeric = schema
        .numeric
        .iter()
        .zip(&numeric_stats)
        .map(|(name, stats)| NumericStats {
            feature: name.to_string(),
            mean: stats.mean(),
            stddev: stats.stddev(),
        })
        .collect();

    let categorical = schema
        .categorical
        .iter()
        .zip(categories)
        .map(|(name, observed)| {
            let reference = observed.first().cloned().ok_or_else(|| {
                Error::Validation(format!(
                    "categorical feature '{name}' has no observed categories"
                ))
            })?;
            Ok(CategoryMap {
                feature: name.to_string(),
                categories: observed,
                reference,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let preprocessor = Preprocessor::new(PreprocessorParams {
        numeric,
        categorical,
    })?;
    Ok((preprocessor, rows))
}

/// Fit and persist: the whole offline step.
pub fn run_fit(input: &Path, output: &Path, schema: &FeatureSchema) -> Result<FitSummary> {
    let (preprocessor, rows) = fit_table(input, schema)?;
    preprocessor.validate(schema)?;
    preprocessor.save(output)?;

    let summary = FitSummary {
        rows,
        n_features: preprocessor.output_len(),
    };
    tracing::info!(
        rows = summary.rows,
        n_features = summary.n_features,
        artifact = %output.display(),
        "preprocessor fitted"
    );
    Ok(summary)
}
