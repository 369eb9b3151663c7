use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::allow_list::AllowList;

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    pub path: PathBuf,
    /// Bare filename, as written to the CSV.
    pub file_name: String,
}

pub fn is_image_file(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

/// Walks `root` and returns every image file whose name is allow-listed.
///
/// Entries are sorted by name within each directory while walking, so the
/// order (and with it the CSV row order) is the same for every run over the
/// same tree. Symlinks are followed; a link keeps its own name in the CSV.
pub fn find_images(root: &Path, allow_list: &AllowList) -> Vec<ImageEntry> {
    let mut images = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(file_name) = entry.file_name().to_str() else {
            debug!("Skipping non UTF-8 filename {}", entry.path().display());
            continue;
        };
        if !is_image_file(file_name) || !allow_list.contains(file_name) {
            continue;
        }

        images.push(ImageEntry {
            path: entry.path().to_path_buf(),
            file_name: file_name.to_string(),
        });
    }

    images
}
