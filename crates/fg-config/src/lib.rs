//! Fraudgate preprocessor artifact loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for the fitted-preprocessor artifact
//! - Integrity-hashed JSON persistence with atomic replacement
//! - Validation against the compiled-in feature schema
//! - Artifact path resolution (CLI → env → data dir → cwd)

pub mod preprocessor;
pub mod resolve;

pub use preprocessor::{CategoryMap, NumericStats, Preprocessor, PreprocessorParams};
pub use resolve::{resolve_artifact_path, DEFAULT_ARTIFACT_FILE, PREPROCESSOR_ENV};
