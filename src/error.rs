//! Error kinds surfaced by the prediction flows

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can end a single or batch flow early.
///
/// Every variant is recoverable: the coordinator shows its message in an
/// error banner and the flow returns to idle.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    /// Required form fields have no value
    #[error("{}{}", crate::constants::MISSING_FIELDS_PREFIX, .0.join(", "))]
    Validation(Vec<String>),

    /// Selected batch file is not a `.csv`
    #[error("{0}")]
    FileType(String),

    /// Structured error message returned by the backend
    #[error("{0}")]
    Server(String),

    /// The request could not complete (connect failure, timeout, unreadable upload)
    #[error("{0}")]
    Network(String),

    /// Response body could not be interpreted
    #[error("{0}")]
    Parse(String),

    /// Batch payload could not be written locally
    #[error("{0}")]
    Download(String),
}

/// Failure to materialize a batch payload on disk
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Download directory does not exist: {0}")]
    MissingDirectory(PathBuf),

    #[error("Could not write download: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not save download: {0}")]
    Persist(std::io::Error),
}

impl From<DownloadError> for RequestError {
    fn from(err: DownloadError) -> Self {
        RequestError::Download(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_fields_in_order() {
        let err = RequestError::Validation(vec!["Brand".into(), "RAM".into()]);
        assert_eq!(err.to_string(), "Please select values for: Brand, RAM");
    }

    #[test]
    fn test_server_message_is_passed_through() {
        let err = RequestError::Server("Invalid columns".into());
        assert_eq!(err.to_string(), "Invalid columns");
    }
}
