//! File-backed watermark store.
//!
//! The watermark is a single scalar: the id of the most recently fully
//! processed circular. It is kept as one human-inspectable line in a plain
//! text file and replaced atomically on every write, so a crash mid-write can
//! never leave a corrupt or half-written value behind.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::contract::{PortError, StateStore};

/// Watermark store backed by a single text file.
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl StateStore for FileStateStore {
    fn read(&self) -> Result<Option<String>, PortError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No watermark file present");
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)
            .map_err(|e| -> PortError { format!("failed to read watermark file: {e}").into() })?;
        let id = raw.trim();
        if id.is_empty() {
            debug!(path = %self.path.display(), "Watermark file is empty");
            return Ok(None);
        }
        Ok(Some(id.to_string()))
    }

    fn write(&self, id: &str) -> Result<(), PortError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent).map_err(|e| -> PortError {
                    format!("failed to create watermark directory: {e}").into()
                })?;
                parent.to_path_buf()
            }
            _ => PathBuf::from("."),
        };

        // Write-to-temp-then-replace keeps the visible file whole at all times.
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)
            .map_err(|e| -> PortError { format!("failed to create temp watermark: {e}").into() })?;
        writeln!(tmp, "{id}")
            .map_err(|e| -> PortError { format!("failed to write watermark: {e}").into() })?;
        tmp.persist(&self.path)
            .map_err(|e| -> PortError { format!("failed to replace watermark file: {e}").into() })?;

        info!(id = %id, path = %self.path.display(), "Advanced watermark");
        Ok(())
    }
}
