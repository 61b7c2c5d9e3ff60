//! Application constants
//!
//! Centralized location for endpoints, timings and user-facing messages.

/// Default prediction server
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Environment variable overriding the configured server URL
pub const SERVER_URL_ENV: &str = "PRICECAST_SERVER_URL";

/// Single prediction endpoint (form-encoded POST)
pub const PREDICT_PATH: &str = "/predict";

/// Batch prediction endpoint (multipart POST)
pub const BATCH_PREDICT_PATH: &str = "/batch_predict";

/// Service health endpoint
pub const HEALTH_PATH: &str = "/health";

/// Multipart field carrying the uploaded CSV
pub const BATCH_FILE_FIELD: &str = "file";

/// Name given to every batch download
pub const DOWNLOAD_FILENAME: &str = "predictions.csv";

/// Only files with this exact suffix are uploaded
pub const CSV_EXTENSION: &str = ".csv";

/// Default HTTP timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Lifetime of error and success banners
pub const BANNER_TTL_MS: u64 = 5000;

/// Counter animation length
pub const COUNTER_DURATION_MS: u64 = 1000;

/// Counter animation frame interval (~60 fps)
pub const FRAME_INTERVAL_MS: u64 = 16;

/// Label shown when no batch file is selected
pub const NO_FILE_LABEL: &str = "No file selected";

pub const NOT_CSV_REASON: &str = "not a csv file";
pub const MISSING_FIELDS_PREFIX: &str = "Please select values for: ";
pub const PREDICT_FALLBACK_ERROR: &str = "Prediction failed. Please try again.";
pub const BATCH_FALLBACK_ERROR: &str = "Batch prediction failed. Please try again.";
pub const NO_FILE_ERROR: &str = "Please select a CSV file first";
pub const INVALID_FILE_ERROR: &str = "Please select a valid CSV file";

/// Application name
pub const APP_NAME: &str = "Pricecast";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
