//! Storage adapter: publishes payloads into a year/month archive on the local
//! filesystem and hands back stable locators.
//!
//! The hierarchy mirrors how the compliance archive is browsed:
//! `<root>/<year>/<month name>/<artifact>`. File writes are
//! temp-then-rename so a crash never leaves a truncated artifact at a
//! published path.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use regex::Regex;
use tracing::{error, info};

use crate::contract::{ListingEntry, PayloadKind, PortError, StorePort};

/// Filesystem-backed archive store.
pub struct FsArchiveStore {
    root: PathBuf,
    unsafe_chars: Regex,
}

impl FsArchiveStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            unsafe_chars: Regex::new(r"[^\w\-.]").unwrap(),
        }
    }

    fn file_name(&self, kind: PayloadKind, entry: &ListingEntry) -> String {
        let prefix = match kind {
            PayloadKind::Pdf | PayloadKind::HtmlDerivedPdf => "Circular",
            PayloadKind::Checklist => "Checklist",
        };
        let safe_number = self.unsafe_chars.replace_all(&entry.number, "_");
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        format!("{prefix}_{safe_number}_{stamp}.pdf")
    }
}

#[async_trait::async_trait]
impl StorePort for FsArchiveStore {
    async fn publish(
        &self,
        bytes: &[u8],
        kind: PayloadKind,
        entry: &ListingEntry,
    ) -> Result<String, PortError> {
        let now = chrono::Local::now();
        let dir = self
            .root
            .join(now.format("%Y").to_string())
            .join(now.format("%B").to_string());
        fs::create_dir_all(&dir).map_err(|e| -> PortError {
            error!(error = ?e, path = %dir.display(), "Failed to create archive directory");
            format!("failed to create archive directory: {e}").into()
        })?;

        let path = dir.join(self.file_name(kind, entry));
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)
            .map_err(|e| -> PortError { format!("failed to create temp artifact: {e}").into() })?;
        tmp.write_all(bytes)
            .map_err(|e| -> PortError { format!("failed to write artifact: {e}").into() })?;
        tmp.persist(&path)
            .map_err(|e| -> PortError { format!("failed to place artifact: {e}").into() })?;

        info!(
            path = %path.display(),
            size = bytes.len(),
            kind = ?kind,
            number = %entry.number,
            "Published artifact"
        );
        Ok(path.display().to_string())
    }
}
