//! On-disk retention of raw uploads.

use std::io;
use std::path::PathBuf;

use sanitize_filename::sanitize;

/// Directory that keeps every uploaded document under its sanitized filename.
///
/// Files are never cleaned up and a second upload with the same name replaces the first.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    /// Create the store, ensuring the directory exists.
    pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Strip path separators and reserved characters from a client-supplied filename.
    ///
    /// Returns `None` when nothing usable is left.
    pub fn sanitize_filename(filename: &str) -> Option<String> {
        let safe = sanitize(filename.trim());
        let safe = safe.trim_matches(|c: char| c == '.' || c.is_whitespace());
        if safe.is_empty() {
            None
        } else {
            Some(safe.to_string())
        }
    }

    /// Write `bytes` under the already sanitized `filename`, returning the stored path.
    pub fn save(&self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.root.join(filename);
        std::fs::write(&path, bytes)?;
        tracing::debug!(path = %path.display(), size = bytes.len(), "Stored upload");
        Ok(path)
    }
}
