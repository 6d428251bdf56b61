//! CLI E2E tests for the scoring path.
//!
//! Validates:
//! - Happy path against a stub scoring service (label and vector width)
//! - Wire format of the request the stub receives
//! - Timeout produces a service-tagged failure and exit 13
//! - Non-2xx service status produces a service-tagged failure
//! - Malformed stdin produces a validation-tagged failure and exit 11
//! - Missing artifact fails with config before any record is parsed
//! - Exactly one JSON line per invocation, on exactly one channel

use std::io::Read;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::tempdir;

use fg_common::schema::{CATEGORICAL_FEATURES, NUMERIC_FEATURES};
use fg_config::{CategoryMap, NumericStats, Preprocessor, PreprocessorParams};

// ============================================================================
// Helpers
// ============================================================================

/// Get a Command for the fg-core binary, isolated from ambient env.
fn fg_core() -> Command {
    let mut cmd = Command::cargo_bin("fg-core").unwrap();
    cmd.timeout(Duration::from_secs(60));
    cmd.env_remove("FRAUDGATE_PREPROCESSOR");
    cmd.env_remove("FRAUDGATE_SCORING_URL");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Write a full-schema artifact: unit-normal numeric stats, categories
/// AA/AB/AC per categorical feature (AA is the reference). Vector width is
/// 25 + 5 * 2 = 35.
fn write_artifact(path: &std::path::Path) {
    let params = PreprocessorParams {
        numeric: NUMERIC_FEATURES
            .iter()
            .map(|name| NumericStats {
                feature: name.to_string(),
                mean: 0.0,
                stddev: 1.0,
            })
            .collect(),
        categorical: CATEGORICAL_FEATURES
            .iter()
            .map(|name| CategoryMap {
                feature: name.to_string(),
                categories: vec!["AA".into(), "AB".into(), "AC".into()],
                reference: "AA".into(),
            })
            .collect(),
    };
    Preprocessor::new(params).unwrap().save(path).unwrap();
}

/// A record covering every schema field with valid values.
fn full_record() -> String {
    let mut map = serde_json::Map::new();
    for name in NUMERIC_FEATURES {
        map.insert(name.to_string(), json!(0.5));
    }
    for name in CATEGORICAL_FEATURES {
        map.insert(name.to_string(), json!("AB"));
    }
    Value::Object(map).to_string()
}

/// Stub scoring service answering one request with the given body, relaying
/// the request body it received.
fn spawn_stub(response_body: &'static str) -> (String, mpsc::Receiver<String>) {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        if let Ok(mut request) = server.recv() {
            let mut body = String::new();
            let _ = request.as_reader().read_to_string(&mut body);
            let _ = tx.send(body);

            let response = tiny_http::Response::from_string(response_body).with_header(
                tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                    .unwrap(),
            );
            let _ = request.respond(response);
        }
    });

    (format!("http://127.0.0.1:{port}/predict"), rx)
}

fn parse_line(bytes: &[u8]) -> Value {
    let text = String::from_utf8_lossy(bytes);
    let line = text.lines().next().expect("one line of output");
    serde_json::from_str(line).expect("line is JSON")
}

// ============================================================================
// Scoring: Success Path
// ============================================================================

#[test]
fn scores_a_valid_record_as_fraud() {
    let dir = tempdir().unwrap();
    let artifact = dir.path().join("preprocessor.json");
    write_artifact(&artifact);

    let (endpoint, received) = spawn_stub(r#"{"predictions": [1]}"#);

    let output = fg_core()
        .args([
            "score",
            "--preprocessor",
            artifact.to_str().unwrap(),
            "--endpoint",
            &endpoint,
        ])
        .write_stdin(full_record())
        .assert()
        .success()
        .code(0)
        .get_output()
        .stdout
        .clone();

    let json = parse_line(&output);
    assert_eq!(json["fraud_bool"], 1);
    assert_eq!(json["n_features"], 35);

    // The stub saw one row, every position named.
    let request: Value = serde_json::from_str(&received.recv().unwrap()).unwrap();
    let columns = request["dataframe_split"]["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 35);
    assert_eq!(columns[0], "feature_0");
    assert_eq!(columns[34], "feature_34");
    let data = request["dataframe_split"]["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0].as_array().unwrap().len(), 35);
}

#[test]
fn scores_a_sparse_record_with_imputed_defaults() {
    // Missing schema fields are allowed; they impute downstream.
    let dir = tempdir().unwrap();
    let artifact = dir.path().join("preprocessor.json");
    write_artifact(&artifact);

    let (endpoint, _received) = spawn_stub(r#"{"predictions": [0]}"#);

    fg_core()
        .args([
            "score",
            "--preprocessor",
            artifact.to_str().unwrap(),
            "--endpoint",
            &endpoint,
        ])
        .write_stdin(r#"{"income": 0.5, "unrecognized_key": "ignored"}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""fraud_bool":0"#))
        .stdout(predicate::str::contains(r#""n_features":35"#));
}

// ============================================================================
// Scoring: Service Failures
// ============================================================================

#[test]
fn timeout_is_a_service_failure() {
    let dir = tempdir().unwrap();
    let artifact = dir.path().join("preprocessor.json");
    write_artifact(&artifact);

    // Accept the connection, then stall past the client timeout.
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();
    let handle = thread::spawn(move || {
        if let Ok(request) = server.recv() {
            thread::sleep(Duration::from_secs(3));
            drop(request);
        }
    });

    let output = fg_core()
        .args([
            "score",
            "--preprocessor",
            artifact.to_str().unwrap(),
            "--endpoint",
            &format!("http://127.0.0.1:{port}/predict"),
            "--timeout-secs",
            "1",
        ])
        .write_stdin(full_record())
        .assert()
        .failure()
        .code(13)
        .get_output()
        .clone();

    assert!(output.stdout.is_empty());
    let failure = parse_line(&output.stderr);
    assert_eq!(failure["error"]["kind"], "service");

    handle.join().unwrap();
}

#[test]
fn service_error_status_carries_status_and_body() {
    let dir = tempdir().unwrap();
    let artifact = dir.path().join("preprocessor.json");
    write_artifact(&artifact);

    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();
    thread::spawn(move || {
        if let Ok(request) = server.recv() {
            let response =
                tiny_http::Response::from_string("model exploded").with_status_code(500);
            let _ = request.respond(response);
        }
    });

    let output = fg_core()
        .args([
            "score",
            "--preprocessor",
            artifact.to_str().unwrap(),
            "--endpoint",
            &format!("http://127.0.0.1:{port}/predict"),
        ])
        .write_stdin(full_record())
        .assert()
        .failure()
        .code(13)
        .get_output()
        .stderr
        .clone();

    let failure = parse_line(&output);
    assert_eq!(failure["error"]["kind"], "service");
    let message = failure["error"]["message"].as_str().unwrap();
    assert!(message.contains("500"));
    assert!(message.contains("model exploded"));
}

#[test]
fn unparseable_service_response_is_a_service_failure() {
    let dir = tempdir().unwrap();
    let artifact = dir.path().join("preprocessor.json");
    write_artifact(&artifact);

    let (endpoint, _received) = spawn_stub(r#"{"scores": [0.97]}"#);

    let output = fg_core()
        .args([
            "score",
            "--preprocessor",
            artifact.to_str().unwrap(),
            "--endpoint",
            &endpoint,
        ])
        .write_stdin(full_record())
        .assert()
        .failure()
        .code(13)
        .get_output()
        .stderr
        .clone();

    assert_eq!(parse_line(&output)["error"]["kind"], "service");
}

// ============================================================================
// Scoring: Input and Config Failures
// ============================================================================

#[test]
fn malformed_stdin_is_a_validation_failure() {
    let dir = tempdir().unwrap();
    let artifact = dir.path().join("preprocessor.json");
    write_artifact(&artifact);

    let output = fg_core()
        .args(["score", "--preprocessor", artifact.to_str().unwrap()])
        .write_stdin("{definitely not json")
        .assert()
        .failure()
        .code(11)
        .get_output()
        .clone();

    assert!(output.stdout.is_empty());
    let failure = parse_line(&output.stderr);
    assert_eq!(failure["error"]["kind"], "validation");
    assert_eq!(failure["error"]["code"], 11);
}

#[test]
fn missing_artifact_fails_with_config_before_parsing() {
    let dir = tempdir().unwrap();
    let artifact = dir.path().join("preprocessor.json");

    // Stdin is malformed on purpose: a config failure proves the record was
    // never parsed.
    let output = fg_core()
        .args(["score", "--preprocessor", artifact.to_str().unwrap()])
        .write_stdin("{definitely not json")
        .assert()
        .failure()
        .code(10)
        .get_output()
        .clone();

    assert!(output.stdout.is_empty());
    let failure = parse_line(&output.stderr);
    assert_eq!(failure["error"]["kind"], "config");
    let message = failure["error"]["message"].as_str().unwrap();
    assert!(message.contains("fg-core fit"));
    assert!(message.contains("preprocessor.json"));
}

#[test]
fn type_mismatch_is_a_transform_failure() {
    let dir = tempdir().unwrap();
    let artifact = dir.path().join("preprocessor.json");
    write_artifact(&artifact);

    let output = fg_core()
        .args(["score", "--preprocessor", artifact.to_str().unwrap()])
        .write_stdin(r#"{"income": "sixty thousand"}"#)
        .assert()
        .failure()
        .code(12)
        .get_output()
        .stderr
        .clone();

    let failure = parse_line(&output);
    assert_eq!(failure["error"]["kind"], "transform");
    assert!(failure["error"]["message"]
        .as_str()
        .unwrap()
        .contains("income"));
}
