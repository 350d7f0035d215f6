//! Domain types for the dirmirror engine.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem
//! paths.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{io_err, MirrorError};

/// The fixed (source, destination) directory pair a mirror operates on.
///
/// Both roots are fixed for the process lifetime. The source must exist as a
/// directory when the pair is constructed; the destination directory is
/// created at the start of every reconciliation pass if missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootPair {
    source: PathBuf,
    dest: PathBuf,
}

impl RootPair {
    /// Validate and construct a root pair.
    ///
    /// Fails when the source is missing or not a directory, when an existing
    /// destination is not a directory, or when both arguments name the same
    /// path.
    pub fn new(
        source: impl Into<PathBuf>,
        dest: impl Into<PathBuf>,
    ) -> Result<Self, MirrorError> {
        let source = source.into();
        let dest = dest.into();

        if source == dest {
            return Err(MirrorError::IdenticalRoots { path: source });
        }

        match fs::metadata(&source) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(MirrorError::NotADirectory { path: source }),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(MirrorError::SourceMissing { path: source });
            }
            Err(err) => return Err(io_err(&source, err)),
        }

        match fs::metadata(&dest) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(MirrorError::NotADirectory { path: dest }),
            // A missing destination is created at the start of each pass.
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(io_err(&dest, err)),
        }

        Ok(Self { source, dest })
    }

    /// The directory mirrored from. Never modified.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The directory mirrored into.
    pub fn dest(&self) -> &Path {
        &self.dest
    }
}
