//! Fraudgate core engine.
//!
//! Converts one raw application record into a fixed-length feature vector
//! matching the model's training-time schema, then obtains a binary fraud
//! classification from a remote scoring service.
//!
//! The serving path is `orchestrate::run_score`: load the fitted
//! preprocessor once, read one JSON record from stdin, transform, call the
//! scoring service, emit one line of JSON. The offline path is `fit`, which
//! produces the artifact the serving path consumes.

pub mod cli;
pub mod client;
pub mod exit_codes;
pub mod fit;
pub mod orchestrate;
pub mod transform;

pub use exit_codes::ExitCode;
