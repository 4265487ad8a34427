use std::path::Path;

use super::{collect_files, remove_if_exists, ExclusionPolicy};
use crate::common::errors::PipelineError;

/// Remove every non-excluded file under `root`.
///
/// Directories are emptied, never removed. Excluded directories are skipped
/// entirely and excluded files are kept. A missing `root` is a no-op, so
/// sweeping an output directory that was never created is fine.
///
/// Returns the number of files deleted.
pub fn sweep(root: &Path, policy: &ExclusionPolicy) -> Result<usize, PipelineError> {
    let mut removed = 0usize;

    for file in collect_files(root, policy)? {
        if remove_if_exists(&file)? {
            tracing::debug!(path = %file.display(), "swept");
            removed += 1;
        }
    }

    if removed > 0 {
        tracing::debug!(root = %root.display(), removed, "sweep complete");
    }

    Ok(removed)
}
