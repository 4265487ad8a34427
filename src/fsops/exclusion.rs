use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ffi::OsStr;

/// Names that destructive sweeps and moves never touch.
///
/// Matching is by exact entry name and applies at every depth: an excluded
/// directory removes its whole subtree from a walk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExclusionPolicy {
    /// Directory names pruned from traversal
    #[serde(default = "default_dirs")]
    pub dirs: BTreeSet<String>,

    /// File names never deleted or moved
    #[serde(default = "default_files")]
    pub files: BTreeSet<String>,
}

fn default_dirs() -> BTreeSet<String> {
    [".svn"].iter().map(|s| s.to_string()).collect()
}

fn default_files() -> BTreeSet<String> {
    [".gitignore"].iter().map(|s| s.to_string()).collect()
}

impl Default for ExclusionPolicy {
    fn default() -> Self {
        Self {
            dirs: default_dirs(),
            files: default_files(),
        }
    }
}

impl ExclusionPolicy {
    pub fn new<D, F>(dirs: D, files: F) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
            files: files.into_iter().map(Into::into).collect(),
        }
    }

    /// Policy that excludes nothing
    pub fn none() -> Self {
        Self {
            dirs: BTreeSet::new(),
            files: BTreeSet::new(),
        }
    }

    /// Whether a directory with this name is pruned from traversal
    pub fn is_excluded_dir(&self, name: &OsStr) -> bool {
        name.to_str().is_some_and(|n| self.dirs.contains(n))
    }

    /// Whether a file with this name must be preserved
    pub fn is_excluded_file(&self, name: &OsStr) -> bool {
        name.to_str().is_some_and(|n| self.files.contains(n))
    }
}
