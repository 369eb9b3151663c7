//! Turns the user's input path into a directory we can walk.
//!
//! Zip archives are unpacked into a scratch directory that lives exactly as
//! long as the [`ResolvedInput`] that owns it.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::error::{CaptionerError, Result};

const ZIP_SIGNATURES: [[u8; 4]; 3] = [
    [b'P', b'K', 0x03, 0x04],
    [b'P', b'K', 0x05, 0x06],
    [b'P', b'K', 0x07, 0x08],
];

#[derive(Debug)]
pub struct ResolvedInput {
    root: PathBuf,
    scratch: Option<TempDir>,
}

impl ResolvedInput {
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Removes the scratch directory, if any. A failed removal is only logged
    /// so it can never replace the outcome of the run itself.
    pub fn close(self) {
        if let Some(scratch) = self.scratch {
            let path = scratch.path().to_path_buf();
            match scratch.close() {
                Ok(()) => debug!("Removed scratch directory {}", path.display()),
                Err(e) => warn!("Failed to remove scratch directory {}: {}", path.display(), e),
            }
        }
    }
}

pub fn is_zip_archive(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }

    let has_zip_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("zip"))
        .unwrap_or(false);
    if has_zip_extension {
        return true;
    }

    let mut magic = [0u8; 4];
    File::open(path)
        .and_then(|mut file| file.read_exact(&mut magic))
        .map(|_| ZIP_SIGNATURES.contains(&magic))
        .unwrap_or(false)
}

/// Resolves `path`, extracting archives into a fresh directory under
/// `scratch_parent` (the system temp dir when `None`).
pub fn resolve_input(path: &Path, scratch_parent: Option<&Path>) -> Result<ResolvedInput> {
    if !path.exists() {
        return Err(CaptionerError::Archive {
            path: path.to_path_buf(),
            reason: "input path does not exist".to_string(),
        });
    }

    if !is_zip_archive(path) {
        return Ok(ResolvedInput {
            root: path.to_path_buf(),
            scratch: None,
        });
    }

    let parent = scratch_parent
        .map(Path::to_path_buf)
        .unwrap_or_else(std::env::temp_dir);
    let scratch = tempfile::Builder::new()
        .prefix("dataset-captioner-")
        .tempdir_in(&parent)
        .map_err(|e| CaptionerError::io(&parent, e))?;

    // On error `scratch` is dropped here, which removes whatever was written.
    extract_into(path, scratch.path())?;

    info!(
        "Extracted {} into {}",
        path.display(),
        scratch.path().display()
    );

    Ok(ResolvedInput {
        root: scratch.path().to_path_buf(),
        scratch: Some(scratch),
    })
}

fn extract_into(archive_path: &Path, target: &Path) -> Result<()> {
    let archive_error = |reason: String| CaptionerError::Archive {
        path: archive_path.to_path_buf(),
        reason,
    };

    let file = File::open(archive_path).map_err(|e| CaptionerError::io(archive_path, e))?;
    let mut archive = ZipArchive::new(file).map_err(|e| archive_error(e.to_string()))?;
    archive
        .extract(target)
        .map_err(|e| archive_error(e.to_string()))
}
