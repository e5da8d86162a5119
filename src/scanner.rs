//! Recursive directory listing.

use crate::config::CompiledFilters;
use crate::file_organizer::{OrganizeError, OrganizeResult};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Lists every file under `root`, depth-first, including files in subdirectories.
///
/// The listing is collected in full before it is returned, so callers can move or
/// rename the files without the walk seeing them again. Directory symlinks are not
/// followed; a symlink to a file is listed like a file. Files rejected by `filters`
/// (matched against their path relative to `root`) are left out.
///
/// # Errors
///
/// Returns [`OrganizeError::Scan`] if `root` or any directory below it cannot be read.
pub fn scan_directory(root: &Path, filters: &CompiledFilters) -> OrganizeResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| OrganizeError::Scan {
            path: e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf()),
            source: e,
        })?;

        if entry.file_type().is_dir() || entry.path().is_dir() {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if !filters.should_include(relative) {
            trace!(path = %entry.path().display(), "excluded by filters");
            continue;
        }

        files.push(entry.into_path());
    }

    debug!(root = %root.display(), count = files.len(), "scanned directory");
    Ok(files)
}
