//! Scoring-service client.
//!
//! One synchronous POST per prediction, bounded by a fixed timeout. No
//! retry, no caching: a failed or slow call is a fatal outcome for the
//! request, surfaced as a service error.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use fg_common::{Error, Result};

/// Default scoring endpoint (MLflow-style model server).
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/predict";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Request body: the vector as a single named row.
#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    dataframe_split: DataframeSplit<'a>,
}

#[derive(Debug, Serialize)]
struct DataframeSplit<'a> {
    columns: Vec<String>,
    data: Vec<&'a [f64]>,
}

/// Expected success body.
#[derive(Debug, Deserialize)]
struct PredictResponse {
    predictions: Vec<serde_json::Value>,
}

/// Synchronous client for the remote scoring service.
pub struct InferenceClient {
    endpoint: String,
    agent: ureq::Agent,
}

impl InferenceClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        InferenceClient {
            endpoint: endpoint.into(),
            agent,
        }
    }

    /// Score one feature vector, returning the predicted label.
    ///
    /// Vector positions are named `feature_0 … feature_{L-1}`; the service
    /// must answer `{"predictions": [label, ...]}` with the first element an
    /// integer 0 or 1.
    pub fn predict(&self, features: &[f64]) -> Result<u8> {
        let body = request_body(features);

        let response = match self.agent.post(&self.endpoint).send_json(&body) {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                return Err(Error::ServiceStatus { status, body });
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(Error::ServiceCall(transport.to_string()));
            }
        };

        let parsed: PredictResponse = response
            .into_json()
            .map_err(|e| Error::ServiceResponse(e.to_string()))?;
        extract_label(&parsed)
    }
}

fn request_body(features: &[f64]) -> PredictRequest<'_> {
    PredictRequest {
        dataframe_split: DataframeSplit {
            columns: (0..features.len()).map(|i| format!("feature_{i}")).collect(),
            data: vec![features],
        },
    }
}

/// Read the first prediction and cast it to a binary label.
fn extract_label(response: &PredictResponse) -> Result<u8> {
    let first = response
        .predictions
        .first()
        .ok_or_else(|| Error::ServiceResponse("empty predictions array".into()))?;

    let label = first
        .as_i64()
        .or_else(|| first.as_f64().map(|f| f as i64))
        .ok_or_else(|| Error::ServiceResponse(format!("non-numeric prediction: {first}")))?;

    match label {
        0 => Ok(0),
        1 => Ok(1),
        other => Err(Error::ServiceResponse(format!(
            "prediction {other} is outside the binary label domain"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_names_every_position() {
        let features = [0.5, -1.0, 2.25];
        let body = serde_json::to_value(request_body(&features)).unwrap();

        let columns = body["dataframe_split"]["columns"].as_array().unwrap();
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0], "feature_0");
        assert_eq!(columns[2], "feature_2");

        let data = body["dataframe_split"]["data"].as_array().unwrap();
        assert_eq!(data.len(), 1, "exactly one row");
        assert_eq!(data[0].as_array().unwrap().len(), 3);
        assert_eq!(data[0][2], 2.25);
    }

    fn response(json: &str) -> PredictResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn first_prediction_wins() {
        let label = extract_label(&response(r#"{"predictions": [1, 0, 0]}"#)).unwrap();
        assert_eq!(label, 1);
    }

    #[test]
    fn float_predictions_cast_to_integer() {
        let label = extract_label(&response(r#"{"predictions": [0.0]}"#)).unwrap();
        assert_eq!(label, 0);
    }

    #[test]
    fn empty_predictions_is_a_service_error() {
        let err = extract_label(&response(r#"{"predictions": []}"#)).unwrap_err();
        assert_eq!(err.kind(), "service");
    }

    #[test]
    fn non_numeric_prediction_is_a_service_error() {
        let err = extract_label(&response(r#"{"predictions": ["fraud"]}"#)).unwrap_err();
        assert_eq!(err.kind(), "service");
    }

    #[test]
    fn out_of_domain_label_is_a_service_error() {
        let err = extract_label(&response(r#"{"predictions": [2]}"#)).unwrap_err();
        assert!(err.to_string().contains("binary label domain"));
    }

    #[test]
    fn unreachable_endpoint_is_a_service_error() {
        // Reserved TEST-NET address, nothing listens there.
        let client = InferenceClient::new(
            "http://192.0.2.1:9/predict",
            Duration::from_millis(200),
        );
        let err = client.predict(&[0.0]).unwrap_err();
        assert_eq!(err.kind(), "service");
    }
}
