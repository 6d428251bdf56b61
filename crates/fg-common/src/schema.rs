//! Feature schema and artifact versioning.

/// Current schema version for persisted preprocessor artifacts.
///
/// Follows semver: MAJOR.MINOR.PATCH
/// - MAJOR: Breaking changes (parameter layout, encoding semantics)
/// - MINOR: Additive changes (new optional metadata)
/// - PATCH: Bug fixes, documentation
pub const ARTIFACT_SCHEMA_VERSION: &str = "1.0.0";

/// Label column name in training tables. Never a feature.
pub const LABEL_COLUMN: &str = "fraud_bool";

/// Numeric features, in output-column order.
pub const NUMERIC_FEATURES: &[&str] = &[
    "income",
    "name_email_similarity",
    "prev_address_months_count",
    "current_address_months_count",
    "customer_age",
    "days_since_request",
    "intended_balcon_amount",
    "zip_count_4w",
    "velocity_6h",
    "velocity_24h",
    "velocity_4w",
    "bank_branch_count_8w",
    "date_of_birth_distinct_emails_4w",
    "credit_risk_score",
    "email_is_free",
    "phone_home_valid",
    "phone_mobile_valid",
    "bank_months_count",
    "has_other_cards",
    "proposed_credit_limit",
    "foreign_request",
    "session_length_in_minutes",
    "device_distinct_emails_8w",
    "device_fraud_count",
    "month",
];

/// Categorical features, in output-block order (after all numeric columns).
pub const CATEGORICAL_FEATURES: &[&str] = &[
    "payment_type",
    "employment_status",
    "housing_status",
    "source",
    "device_os",
];

/// The ordered feature lists a fitted preprocessor must cover.
///
/// Order is contractual: it fixes the column order of every emitted
/// feature vector, so it must match the order used at model training time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSchema {
    pub numeric: &'static [&'static str],
    pub categorical: &'static [&'static str],
}

impl FeatureSchema {
    /// The compiled-in bank-account application schema.
    pub const fn baseline() -> Self {
        FeatureSchema {
            numeric: NUMERIC_FEATURES,
            categorical: CATEGORICAL_FEATURES,
        }
    }

    /// All feature names, numeric first, in schema order.
    pub fn all_features(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.numeric.iter().chain(self.categorical.iter()).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.all_features().any(|f| f == name)
    }
}

/// Check if an artifact schema version is compatible with current.
pub fn is_compatible(version: &str) -> bool {
    // Parse major versions and compare
    let current_major = ARTIFACT_SCHEMA_VERSION
        .split('.')
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(0);

    let other_major = version
        .split('.')
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(0);

    current_major == other_major
}
