use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{FinderError, Result};

/// Extensions worth opening: class files, sources and zip-like containers.
pub const SEARCHABLE_EXTENSIONS: [&str; 7] = ["class", "java", "jar", "war", "ear", "zip", "rar"];

pub fn is_searchable(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            SEARCHABLE_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(e))
        })
}

/// Lists searchable files under `base_path`, sorted by name within each
/// directory. Only the top level is listed unless `recursive` is set. A
/// searchable file given directly is returned as the only candidate.
pub fn scan_candidates(base_path: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !base_path.exists() {
        return Err(FinderError::MissingDirectory(base_path.to_path_buf()));
    }
    if base_path.is_file() {
        return Ok(if is_searchable(base_path) {
            vec![base_path.to_path_buf()]
        } else {
            Vec::new()
        });
    }

    let walker = WalkBuilder::new(base_path)
        .hidden(false)
        .ignore(false)
        .parents(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .max_depth(if recursive { None } else { Some(1) })
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable path under {}: {e}", base_path.display());
                continue;
            }
        };
        let is_file = entry.file_type().is_some_and(|t| t.is_file());
        if is_file && is_searchable(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Splits the legacy `dir1;dir2` form into separate paths.
pub fn split_directory_list(raw: &str) -> Vec<PathBuf> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}
