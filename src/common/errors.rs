use std::path::PathBuf;

use thiserror::Error;

/// Typed errors for declutter operations.
///
/// Per-item failures during a clean batch are not errors in this sense —
/// they are collected into `Summary.errors` and the batch continues. An
/// `Error` here means the operation as a whole did not happen.
#[derive(Debug, Error)]
pub enum Error {
    /// The path guard refused a destructive operation.
    #[error("unsafe path blocked: {}", .0.display())]
    UnsafePath(PathBuf),

    /// A discovery module failed while scanning.
    #[error("scan failed in '{module}': {message}")]
    ScanFailure { module: String, message: String },

    /// File system operation failed.
    #[error("I/O error at '{}': {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Whitelist/history/config persistence failed.
    #[error("store error at '{}': {}", .path.display(), .message)]
    Store { path: PathBuf, message: String },

    /// A workflow operation was invoked from the wrong phase.
    #[error("operation '{operation}' is not valid in phase {phase:?}")]
    InvalidPhase {
        operation: &'static str,
        phase: crate::workflow::WorkflowPhase,
    },

    /// No home directory could be resolved for the current user.
    #[error("cannot resolve the user home directory")]
    NoHome,
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn store(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Error::Store {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
