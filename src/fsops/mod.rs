pub mod exclusion;
pub mod relocator;
pub mod sweeper;

pub use exclusion::ExclusionPolicy;
pub use relocator::{move_file, relocate, replace_file};
pub use sweeper::sweep;

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::common::errors::{FsOp, PipelineError};

/// Collect every non-excluded file under `root`, in sorted walk order.
///
/// Excluded directories are pruned at any depth (the root itself is always
/// walked). Symlinks to directories are neither followed nor returned.
/// A missing root yields an empty list.
pub fn collect_files(root: &Path, policy: &ExclusionPolicy) -> Result<Vec<PathBuf>, PipelineError> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0 || !(e.file_type().is_dir() && policy.is_excluded_dir(e.file_name()))
        });

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| PipelineError::walk(root, e))?;
        if entry.file_type().is_dir() {
            continue;
        }
        if entry.path_is_symlink() && entry.path().is_dir() {
            continue;
        }
        if policy.is_excluded_file(entry.file_name()) {
            continue;
        }
        files.push(entry.into_path());
    }

    Ok(files)
}

/// Remove a single file, treating absence as success. Returns whether it existed.
pub fn remove_if_exists(path: &Path) -> Result<bool, PipelineError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(PipelineError::fs(FsOp::Remove, path, e)),
    }
}

/// Create a directory and its parents
pub fn ensure_dir(path: &Path) -> Result<(), PipelineError> {
    std::fs::create_dir_all(path).map_err(|e| PipelineError::fs(FsOp::CreateDir, path, e))
}
