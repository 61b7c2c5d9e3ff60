//! HTTP client wrapper - executes prediction requests and interprets bodies

use std::time::{Duration, Instant};

use serde::Deserialize;
use serde_json::Value;

use crate::constants::BATCH_FILE_FIELD;
use crate::error::RequestError;
use crate::messages::NetworkResponse;
use crate::models::{HealthStatus, Prediction, SelectedFile};

#[derive(Debug, Deserialize)]
struct PredictBody {
    #[serde(default)]
    success: bool,
    prediction: Option<f64>,
    #[serde(default)]
    input_data: serde_json::Map<String, Value>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Interpret a `/predict` body. The HTTP status is ignored: the server
/// reports failures with `success: false` and a 400.
pub fn interpret_predict_body(body: &str) -> Result<Prediction, RequestError> {
    let parsed: PredictBody = serde_json::from_str(body)
        .map_err(|e| RequestError::Parse(format!("Invalid prediction response: {}", e)))?;

    if !parsed.success {
        return Err(RequestError::Server(parsed.error.unwrap_or_default()));
    }

    let price = parsed
        .prediction
        .ok_or_else(|| RequestError::Parse("Prediction missing from response".to_string()))?;

    let input_echo = parsed
        .input_data
        .into_iter()
        .map(|(field, value)| (field, display_value(value)))
        .collect();

    Ok(Prediction { price, input_echo })
}

/// Interpret the body of a failed `/batch_predict`
pub fn interpret_batch_error(body: &str) -> RequestError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => RequestError::Server(parsed.error.unwrap_or_default()),
        Err(e) => RequestError::Parse(format!("Invalid error response: {}", e)),
    }
}

/// String form of an echoed value, with no further formatting
fn display_value(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn transport_error(e: &reqwest::Error) -> RequestError {
    let msg = if e.is_timeout() {
        "Request timed out".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        format!("Request failed: {}", e)
    };
    RequestError::Network(msg)
}

/// Execute a single prediction
pub async fn execute_predict(
    client: &reqwest::Client,
    endpoint: &str,
    form: &[(String, String)],
    request_id: u64,
) -> NetworkResponse {
    let start = Instant::now();
    let result = client.post(endpoint).form(form).send().await;

    let outcome = match result {
        Ok(resp) => match resp.text().await {
            Ok(body) => interpret_predict_body(&body),
            Err(e) => Err(RequestError::Network(format!("Error reading body: {}", e))),
        },
        Err(e) => Err(transport_error(&e)),
    };

    NetworkResponse::Prediction {
        id: request_id,
        outcome,
        time_ms: start.elapsed().as_millis() as u64,
    }
}

/// Upload a CSV for batch prediction, returning the result file on success
pub async fn execute_batch(
    client: &reqwest::Client,
    endpoint: &str,
    file: &SelectedFile,
    request_id: u64,
) -> NetworkResponse {
    let start = Instant::now();
    let outcome = upload_batch(client, endpoint, file).await;

    NetworkResponse::Batch {
        id: request_id,
        outcome,
        time_ms: start.elapsed().as_millis() as u64,
    }
}

async fn upload_batch(
    client: &reqwest::Client,
    endpoint: &str,
    file: &SelectedFile,
) -> Result<Vec<u8>, RequestError> {
    let bytes = tokio::fs::read(&file.path)
        .await
        .map_err(|e| RequestError::FileType(format!("Could not read {}: {}", file.name, e)))?;

    let part = reqwest::multipart::Part::bytes(bytes)
        .file_name(file.name.clone())
        .mime_str("text/csv")
        .map_err(|e| transport_error(&e))?;
    let form = reqwest::multipart::Form::new().part(BATCH_FILE_FIELD, part);

    let resp = client
        .post(endpoint)
        .multipart(form)
        .send()
        .await
        .map_err(|e| transport_error(&e))?;

    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        tracing::warn!(status, "Batch prediction rejected");
        return Err(interpret_batch_error(&body));
    }

    resp.bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|e| RequestError::Network(format!("Error reading body: {}", e)))
}

/// Fetch service health
pub async fn execute_health(
    client: &reqwest::Client,
    endpoint: &str,
    request_id: u64,
) -> NetworkResponse {
    let outcome = match client.get(endpoint).send().await {
        Ok(resp) => resp
            .json::<HealthStatus>()
            .await
            .map_err(|e| RequestError::Parse(format!("Invalid health response: {}", e))),
        Err(e) => Err(transport_error(&e)),
    };

    NetworkResponse::Health {
        id: request_id,
        outcome,
    }
}

/// Create an HTTP client with the configured timeout
pub fn create_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_body_keeps_echo_order() {
        let body = r#"{"success": true, "prediction": 54999.99, "input_data": {"Brand": "Dell", "RAM": "8GB"}}"#;
        let prediction = interpret_predict_body(body).unwrap();
        assert_eq!(prediction.price, 54999.99);
        assert_eq!(
            prediction.input_echo,
            vec![
                ("Brand".to_string(), "Dell".to_string()),
                ("RAM".to_string(), "8GB".to_string()),
            ]
        );
    }

    #[test]
    fn test_echo_values_are_stringified_verbatim() {
        let body = r#"{"success": true, "prediction": 1, "input_data": {"Weight": 1.5, "Cores": 8, "Touch": false, "Zeta": "z"}}"#;
        let prediction = interpret_predict_body(body).unwrap();
        let values: Vec<&str> = prediction.input_echo.iter().map(|(_, v)| v.as_str()).collect();
        assert_eq!(values, vec!["1.5", "8", "false", "z"]);
        assert_eq!(prediction.input_echo[3].0, "Zeta");
    }

    #[test]
    fn test_failure_body_carries_server_message() {
        let body = r#"{"success": false, "error": "could not convert string to float"}"#;
        assert_eq!(
            interpret_predict_body(body),
            Err(RequestError::Server("could not convert string to float".to_string()))
        );
    }

    #[test]
    fn test_unparsable_body_is_parse_error() {
        assert!(matches!(
            interpret_predict_body("<html>502 Bad Gateway</html>"),
            Err(RequestError::Parse(_))
        ));
        assert!(matches!(
            interpret_predict_body(r#"{"success": true}"#),
            Err(RequestError::Parse(_))
        ));
    }

    #[test]
    fn test_batch_error_body() {
        assert_eq!(
            interpret_batch_error(r#"{"success": false, "error": "Invalid columns"}"#),
            RequestError::Server("Invalid columns".to_string())
        );
        assert_eq!(interpret_batch_error("{}"), RequestError::Server(String::new()));
        assert!(matches!(interpret_batch_error("oops"), RequestError::Parse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let client = create_client(Duration::from_secs(2));
        let response = execute_predict(&client, "http://127.0.0.1:9/predict", &[], 7).await;
        match response {
            NetworkResponse::Prediction { id, outcome, .. } => {
                assert_eq!(id, 7);
                assert!(matches!(outcome, Err(RequestError::Network(_))));
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_upload_file_is_reported_before_sending() {
        let client = create_client(Duration::from_secs(2));
        let file = SelectedFile {
            name: "missing.csv".to_string(),
            path: std::path::PathBuf::from("/nonexistent/missing.csv"),
        };
        let response = execute_batch(&client, "http://127.0.0.1:9/batch_predict", &file, 3).await;
        match response {
            NetworkResponse::Batch { outcome, .. } => {
                assert!(matches!(outcome, Err(RequestError::FileType(_))));
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }
}
