//! Copy and delete reconciliation visitors.
//!
//! Both visitors are driven by [`walk`](crate::walk::walk) and translate
//! paths between the roots with [`map_to_root`](crate::paths::map_to_root).
//! [`CopyReconciler`] walks the source tree and brings the destination up to
//! date; [`DeleteReconciler`] walks the destination tree and removes entries
//! whose source counterpart is gone.
//!
//! Every per-entry I/O failure is logged and skipped: reconciliation is
//! state-driven, so a failed entry is simply retried on the next pass.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::paths::map_to_root;
use crate::walk::{self, Visitor};

// ---------------------------------------------------------------------------
// CopyReconciler
// ---------------------------------------------------------------------------

/// Visitor over the source tree that copies new and size-changed entries
/// into the destination tree.
pub struct CopyReconciler {
    source_root: PathBuf,
    dest_root: PathBuf,
    copied: usize,
}

impl CopyReconciler {
    pub fn new(source_root: &Path, dest_root: &Path) -> Self {
        Self {
            source_root: source_root.to_path_buf(),
            dest_root: dest_root.to_path_buf(),
            copied: 0,
        }
    }

    /// Number of copies (file copies and directory creations) performed.
    pub fn copied(&self) -> usize {
        self.copied
    }

    fn reconcile(&mut self, path: &Path) {
        let dest = map_to_root(path, &self.source_root, &self.dest_root);
        match copy_if_stale(path, &dest) {
            Ok(true) => {
                self.copied += 1;
                tracing::info!("File \"{}\" was copied.", dest.display());
            }
            Ok(false) => {}
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "copy failed, entry stays stale until the next pass",
                );
            }
        }
    }
}

impl Visitor for CopyReconciler {
    fn pre_visit_dir(&mut self, dir: &Path) {
        if dir != self.source_root {
            self.reconcile(dir);
        }
    }

    fn visit_file(&mut self, file: &Path) {
        self.reconcile(file);
    }
}

/// Copy `source` over `dest` when `dest` is missing or differs in size.
///
/// Directories are "copied" by ensuring the destination directory exists;
/// files are overwritten whole. Returns whether anything was done. A source
/// that vanished between the staleness check and the copy lost a race with
/// a concurrent filesystem mutation and is skipped.
fn copy_if_stale(source: &Path, dest: &Path) -> std::io::Result<bool> {
    if !is_stale(source, dest)? {
        return Ok(false);
    }

    let meta = match fs::metadata(source) {
        Ok(meta) => meta,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };

    if meta.is_dir() {
        fs::create_dir_all(dest)?;
    } else {
        match fs::copy(source, dest) {
            Ok(_) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(false),
            Err(err) => return Err(err),
        }
    }
    Ok(true)
}

/// Missing destination, or file sizes differ. The size branch only means
/// something for regular files; an existing destination directory never
/// needs re-creating.
fn is_stale(source: &Path, dest: &Path) -> std::io::Result<bool> {
    let dest_meta = match fs::metadata(dest) {
        Ok(meta) => meta,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(true),
        Err(err) => return Err(err),
    };

    let source_meta = match fs::metadata(source) {
        Ok(meta) => meta,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };

    if source_meta.is_dir() {
        return Ok(false);
    }
    Ok(source_meta.len() != dest_meta.len())
}

// ---------------------------------------------------------------------------
// DeleteReconciler
// ---------------------------------------------------------------------------

/// Visitor over the destination tree that removes entries whose mapped
/// source path no longer exists.
///
/// `source_root`/`dest_root` are the *active* pair: the real roots at the
/// top level, or a rebased pair while clearing an orphaned directory.
pub struct DeleteReconciler {
    source_root: PathBuf,
    dest_root: PathBuf,
    deleted: usize,
}

impl DeleteReconciler {
    pub fn new(source_root: &Path, dest_root: &Path) -> Self {
        Self {
            source_root: source_root.to_path_buf(),
            dest_root: dest_root.to_path_buf(),
            deleted: 0,
        }
    }

    /// Number of deletions performed, recursive cleanups included.
    pub fn deleted(&self) -> usize {
        self.deleted
    }

    fn reconcile(&mut self, path: &Path) {
        let source = map_to_root(path, &self.dest_root, &self.source_root);
        if source.exists() {
            return;
        }

        // An orphaned directory's contents are orphaned by construction.
        // Clear it with a reconciler rebased to the orphan pair, so children
        // are removed before the directory itself.
        if path.is_dir() {
            let mut inner = DeleteReconciler::new(&source, path);
            walk::walk(path, &mut inner);
            self.deleted += inner.deleted;
        }

        match remove_entry(path) {
            Ok(true) => {
                self.deleted += 1;
                tracing::info!("File \"{}\" was deleted.", path.display());
            }
            Ok(false) => {}
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "delete failed, entry retried on the next pass",
                );
            }
        }
    }
}

impl Visitor for DeleteReconciler {
    fn pre_visit_dir(&mut self, dir: &Path) {
        if dir != self.dest_root {
            self.reconcile(dir);
        }
    }

    fn visit_file(&mut self, file: &Path) {
        self.reconcile(file);
    }
}

/// Delete a file or an (emptied) directory. Already-gone entries count as
/// success, so deletion is idempotent.
fn remove_entry(path: &Path) -> std::io::Result<bool> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };

    let removal = if meta.is_dir() {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    };
    match removal {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}
