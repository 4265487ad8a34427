use std::path::Path;

use super::{collect_files, ensure_dir, ExclusionPolicy};
use crate::common::errors::{FsOp, PipelineError};

/// Move every non-excluded file under `source` directly into `dest`.
///
/// The tree is flattened: only base file names survive. Files are visited in
/// sorted walk order, so when two files share a name the one walked last
/// wins. `dest` is created when missing; a missing `source` moves nothing.
///
/// Returns the number of files moved.
pub fn relocate(source: &Path, dest: &Path, policy: &ExclusionPolicy) -> Result<usize, PipelineError> {
    let files = collect_files(source, policy)?;
    if files.is_empty() {
        return Ok(0);
    }

    ensure_dir(dest)?;

    for file in &files {
        // collect_files never yields a path without a final component
        let Some(name) = file.file_name() else {
            continue;
        };
        let target = dest.join(name);
        if target.exists() {
            tracing::debug!(path = %target.display(), "overwriting");
        }
        move_file(file, &target)?;
    }

    tracing::debug!(
        source = %source.display(),
        dest = %dest.display(),
        moved = files.len(),
        "relocated"
    );

    Ok(files.len())
}

/// Move one file, replacing anything already at `to`.
///
/// Tries a rename first (same filesystem, replaces `to` atomically), then
/// falls back to copy + delete. The copy overwrites `to` in place, so the old
/// file survives until new contents are written.
pub fn move_file(from: &Path, to: &Path) -> Result<(), PipelineError> {
    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }

    // Fallback: copy then delete (cross-filesystem)
    std::fs::copy(from, to).map_err(|e| PipelineError::fs(FsOp::Move, from, e))?;
    std::fs::remove_file(from).map_err(|e| PipelineError::fs(FsOp::Remove, from, e))?;

    Ok(())
}

/// Move a single named file if it exists, creating the destination's parent.
///
/// A missing `from` is not an error. Returns whether a file was moved.
pub fn replace_file(from: &Path, to: &Path) -> Result<bool, PipelineError> {
    if !from.is_file() {
        return Ok(false);
    }
    if let Some(parent) = to.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    move_file(from, to)?;
    Ok(true)
}
