//! Depth-first tree traversal with per-subtree failure isolation.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Callbacks invoked by [`walk`] for every entry under a root.
///
/// Reconciliation behavior (copy vs. delete) is injected through this trait;
/// the traversal itself stays identical for both passes.
pub trait Visitor {
    /// Called for every directory, including the walk root itself, before
    /// any of its children are visited. Visitors that must treat the root
    /// specially compare the visited path against it.
    fn pre_visit_dir(&mut self, dir: &Path);

    /// Called for every regular file.
    fn visit_file(&mut self, file: &Path);
}

/// Walk `root` depth-first, in pre-order, children in byte-wise name order.
///
/// A missing root is a no-op, not an error. An unreadable subtree is logged
/// and skipped while unrelated subtrees continue. Entries that disappear
/// mid-walk (the delete pass removes directories out from under the active
/// walk) are skipped silently.
pub fn walk(root: &Path, visitor: &mut dyn Visitor) {
    match fs::metadata(root) {
        Ok(meta) if meta.is_dir() => walk_dir(root, visitor),
        Ok(_) => visitor.visit_file(root),
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => {
            tracing::warn!(path = %root.display(), error = %err, "cannot stat walk root");
        }
    }
}

fn walk_dir(dir: &Path, visitor: &mut dyn Visitor) {
    visitor.pre_visit_dir(dir);

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => return,
        Err(err) => {
            tracing::warn!(path = %dir.display(), error = %err, "cannot read directory, skipping subtree");
            return;
        }
    };

    let mut children: Vec<(PathBuf, bool)> = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(path = %dir.display(), error = %err, "unreadable directory entry, skipping");
                continue;
            }
        };
        match entry.file_type() {
            Ok(ty) => children.push((entry.path(), ty.is_dir())),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(path = %entry.path().display(), error = %err, "cannot stat entry, skipping");
            }
        }
    }
    children.sort();

    for (child, is_dir) in children {
        if is_dir {
            walk_dir(&child, visitor);
        } else {
            visitor.visit_file(&child);
        }
    }
}
