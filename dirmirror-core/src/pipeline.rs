//! One-pass reconciliation entrypoint shared by the CLI and the watch loop.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::reconcile::{CopyReconciler, DeleteReconciler};
use crate::types::RootPair;
use crate::walk;

/// Outcome of a single reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassSummary {
    /// Entries copied or created under the destination root.
    pub copied: usize,
    /// Entries removed from the destination root.
    pub deleted: usize,
    /// Wall-clock duration of the pass.
    pub duration: Duration,
}

/// Run one full reconciliation pass.
///
/// Ensures the destination root exists, then walks the source tree with the
/// copy visitor, then walks the destination tree with the delete visitor.
/// The copy pass always completes before the delete pass starts, so an entry
/// recreated under a new name within one interval is confirmed at its new
/// destination before the old destination is removed.
pub fn run_pass(pair: &RootPair) -> PassSummary {
    let started = Instant::now();

    ensure_dest_root(pair.dest());

    let mut copier = CopyReconciler::new(pair.source(), pair.dest());
    walk::walk(pair.source(), &mut copier);

    let mut deleter = DeleteReconciler::new(pair.source(), pair.dest());
    walk::walk(pair.dest(), &mut deleter);

    PassSummary {
        copied: copier.copied(),
        deleted: deleter.deleted(),
        duration: started.elapsed(),
    }
}

/// Create the single destination root directory if missing — never parents.
/// Failure is logged; the pass proceeds best-effort and the copy visitor
/// reports the individual entries it cannot place.
fn ensure_dest_root(dest: &Path) {
    if dest.exists() {
        return;
    }
    match fs::create_dir(dest) {
        Ok(()) => {}
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {}
        Err(err) => {
            tracing::warn!(
                path = %dest.display(),
                error = %err,
                "cannot create destination root",
            );
        }
    }
}
