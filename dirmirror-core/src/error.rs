//! Error types for dirmirror-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from root-pair validation and engine I/O.
///
/// Per-entry failures during a reconciliation pass are not surfaced here;
/// they are logged and the affected entry is retried on the next pass.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// The source root did not exist at startup.
    #[error("source directory not found: {path}")]
    SourceMissing { path: PathBuf },

    /// A root argument names an existing entry that is not a directory.
    #[error("not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Source and destination name the same path.
    #[error("source and destination are the same directory: {path}")]
    IdenticalRoots { path: PathBuf },

    /// Underlying I/O failure (file not found, permission denied, etc.).
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> MirrorError {
    MirrorError::Io {
        path: path.into(),
        source,
    }
}
