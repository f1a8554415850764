//! Transient staging of uploaded SKUD workbooks.
//!
//! The HTTP boundary receives an XLSX as multipart bytes; `calamine`
//! needs a path (it reads via `BufReader<File>`, not an in-memory
//! buffer), so each upload is staged to a uniquely named file under a
//! directory and removed once the handler is done with it, success or
//! failure alike.

use crate::error::{ReconError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A staged upload. Deletes its backing file on drop, so callers don't
/// need a try/finally dance to clean up after a parse error.
pub struct StagedUpload {
    path: PathBuf,
}

impl StagedUpload {
    /// Writes `bytes` to a fresh randomly named file under `dir`, with
    /// `.xlsx` as the extension so `calamine`'s format sniffing (which
    /// partly relies on the extension) behaves.
    pub fn stage(dir: &Path, bytes: &[u8]) -> Result<Self> {
        fs::create_dir_all(dir)
            .map_err(|e| ReconError::Other(anyhow::anyhow!("creating upload dir {}: {e}", dir.display())))?;

        let filename = format!("{}.xlsx", Uuid::new_v4());
        let path = dir.join(filename);
        fs::write(&path, bytes)
            .map_err(|e| ReconError::Other(anyhow::anyhow!("writing staged upload {}: {e}", path.display())))?;

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to clean up staged upload");
            }
        }
    }
}
