//! Delivery of batch prediction payloads as local files

use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;

use crate::error::DownloadError;

/// Destination for a completed batch payload
pub trait DownloadSink: Send {
    /// Materialize `payload` under `filename`, returning where it landed
    fn deliver(&mut self, payload: &[u8], filename: &str) -> Result<PathBuf, DownloadError>;
}

/// Writes downloads into a directory on disk
#[derive(Debug, Clone)]
pub struct FileDownloadTrigger {
    dir: PathBuf,
}

impl FileDownloadTrigger {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileDownloadTrigger { dir: dir.into() }
    }
}

impl DownloadSink for FileDownloadTrigger {
    fn deliver(&mut self, payload: &[u8], filename: &str) -> Result<PathBuf, DownloadError> {
        if !self.dir.is_dir() {
            return Err(DownloadError::MissingDirectory(self.dir.clone()));
        }

        // The temp file is removed on drop unless persisted, so a failed
        // write or rename never leaves a partial download behind.
        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(payload)?;
        staged.flush()?;

        // A failed persist hands the temp file back; drop it here rather
        // than carrying it inside the error.
        let target = self.dir.join(filename);
        staged
            .persist(&target)
            .map_err(|err| DownloadError::Persist(err.error))?;

        tracing::info!(path = %target.display(), bytes = payload.len(), "Download saved");
        Ok(target)
    }
}
