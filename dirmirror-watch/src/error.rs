use thiserror::Error;

/// Error surface for the watch-loop runtime.
///
/// Per-entry reconciliation failures never reach this type; the loop cannot
/// run at all without a registered watch or a runtime, and those are the
/// only fatal conditions.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("notify error: {0}")]
    Notify(#[from] notify::Error),

    #[error("runtime error: {0}")]
    Runtime(String),
}
