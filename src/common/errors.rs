use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Typed errors for pipeline operations.
/// The binary uses `anyhow` at the top level, but these variants let
/// callers tell a failed generator apart from a failed move or delete.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A directory that must exist for the run does not
    #[error("Missing path: '{}'", path.display())]
    MissingPath { path: PathBuf },

    /// The external generator could not be started or did not succeed
    #[error("Generator invocation failed ({failure}): {command}")]
    GeneratorInvocation {
        command: String,
        failure: GeneratorFailure,
    },

    /// Delete, move, or traversal failed on the filesystem
    #[error("Failed to {op} '{}': {source}", path.display())]
    FilesystemOperation {
        op: FsOp,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is unreadable or inconsistent
    #[error("Config error in '{}': {message}", path.display())]
    Config { path: PathBuf, message: String },
}

/// Why a generator invocation was rejected
#[derive(Debug, Error)]
pub enum GeneratorFailure {
    #[error("could not spawn process: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("exited with status {0}")]
    ExitCode(i32),

    #[error("terminated by signal")]
    Signal,

    #[error("timed out after {}s", .0.as_secs())]
    TimedOut(Duration),
}

/// Filesystem operation kinds, used in error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsOp {
    Walk,
    Remove,
    Move,
    CreateDir,
}

impl std::fmt::Display for FsOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FsOp::Walk => write!(f, "walk"),
            FsOp::Remove => write!(f, "remove"),
            FsOp::Move => write!(f, "move"),
            FsOp::CreateDir => write!(f, "create directory"),
        }
    }
}

impl PipelineError {
    pub fn fs(op: FsOp, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::FilesystemOperation {
            op,
            path: path.into(),
            source,
        }
    }

    /// Convert a traversal error, keeping the offending path when walkdir knows it
    pub fn walk(root: &std::path::Path, err: walkdir::Error) -> Self {
        let path = err
            .path()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| root.to_path_buf());
        PipelineError::FilesystemOperation {
            op: FsOp::Walk,
            path,
            source: std::io::Error::from(err),
        }
    }

    /// Process exit code for this error class
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::GeneratorInvocation { .. } => 2,
            PipelineError::FilesystemOperation { .. } => 3,
            PipelineError::MissingPath { .. } => 4,
            PipelineError::Config { .. } => 5,
        }
    }
}
