//! Fraudgate common types and errors.
//!
//! This crate provides foundational types shared across fg-config and
//! fg-core:
//! - The compiled-in feature schema
//! - The checked input record type
//! - Common error types
//! - Success/failure output contracts

pub mod error;
pub mod output;
pub mod record;
pub mod schema;

pub use error::{Error, Result};
pub use output::{CheckOutput, ErrorBody, FailureOutput, ScoreOutput};
pub use record::{FieldValue, Record};
pub use schema::{FeatureSchema, ARTIFACT_SCHEMA_VERSION};
