//! Transient staging of uploaded payloads.
//!
//! The cabinet's upload primitive requires a seekable file-backed source, so incoming bytes
//! are materialized into a uniquely named file in the scratch directory for the duration of
//! one upload. Removal is guaranteed on every exit path: the happy path releases the file
//! explicitly, and `Drop` covers errors and cancelled requests.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Transient local copy of an uploaded payload.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    released: bool,
}

impl StagedFile {
    /// Copy `bytes` into a fresh scratch file named after a random identifier plus the
    /// original file's extension.
    pub async fn create(bytes: &[u8], original_name: &str) -> io::Result<Self> {
        let mut file_name = Uuid::new_v4().to_string();
        if let Some(extension) = Path::new(original_name)
            .extension()
            .and_then(OsStr::to_str)
        {
            file_name.push('.');
            file_name.push_str(extension);
        }

        let path = std::env::temp_dir().join(file_name);
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(path = %path.display(), size = bytes.len(), "Staged upload payload");
        Ok(Self {
            path,
            released: false,
        })
    }

    /// Location of the staged file on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the staged file from disk.
    pub async fn release(mut self) -> io::Result<()> {
        self.released = true;
        tokio::fs::remove_file(&self.path).await
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.released {
            if let Err(err) = std::fs::remove_file(&self.path) {
                tracing::warn!(path = %self.path.display(), error = %err, "Failed to remove staged file");
            }
        }
    }
}
