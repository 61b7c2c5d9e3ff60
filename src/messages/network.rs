//! Network messages - communication between App and Network layers

use crate::error::RequestError;
use crate::models::{HealthStatus, Prediction, SelectedFile};

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Form-encoded single prediction
    Predict {
        id: u64,
        endpoint: String,
        form: Vec<(String, String)>,
    },
    /// Multipart upload of a CSV for batch prediction
    BatchPredict {
        id: u64,
        endpoint: String,
        file: SelectedFile,
    },
    /// Query the service health endpoint
    CheckHealth {
        id: u64,
        endpoint: String,
    },
    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer.
///
/// Bodies are already interpreted: callers never see raw JSON.
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    Prediction {
        id: u64,
        outcome: Result<Prediction, RequestError>,
        time_ms: u64,
    },
    /// Batch result: the CSV payload on success
    Batch {
        id: u64,
        outcome: Result<Vec<u8>, RequestError>,
        time_ms: u64,
    },
    Health {
        id: u64,
        outcome: Result<HealthStatus, RequestError>,
    },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::Prediction { id, .. } => *id,
            NetworkResponse::Batch { id, .. } => *id,
            NetworkResponse::Health { id, .. } => *id,
        }
    }

    pub fn is_ok(&self) -> bool {
        match self {
            NetworkResponse::Prediction { outcome, .. } => outcome.is_ok(),
            NetworkResponse::Batch { outcome, .. } => outcome.is_ok(),
            NetworkResponse::Health { outcome, .. } => outcome.is_ok(),
        }
    }
}
