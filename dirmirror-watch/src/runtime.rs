//! The sync loop: notify watcher + settle/wait/reconcile cycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use notify::{recommended_watcher, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{broadcast, mpsc};
use tokio::time::{sleep, timeout};

use dirmirror_core::{pipeline, RootPair};

use crate::error::WatchError;

/// Default settle interval between cycles, coalescing change bursts.
pub const SETTLE_INTERVAL: Duration = Duration::from_secs(1);

/// Default upper bound on waiting for a change notification.
pub const WAKE_TIMEOUT: Duration = Duration::from_secs(5);

/// Intervals governing one watch cycle.
#[derive(Debug, Clone, Copy)]
pub struct LoopConfig {
    /// Sleep at the top of each cycle so a burst of changes lands in a
    /// single reconciliation pass.
    pub settle: Duration,
    /// Upper bound on waiting for a change notification before the pass
    /// runs anyway.
    pub wake_timeout: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            settle: SETTLE_INTERVAL,
            wake_timeout: WAKE_TIMEOUT,
        }
    }
}

/// Cooperative stop signal for the watch loop.
///
/// Cloneable; hand one clone to the loop and keep another to stop it. The
/// loop observes a stop at the top of each cycle and inside both bounded
/// waits; an in-progress reconciliation pass finishes before the loop exits,
/// so stopping can take up to settle + wake timeout + pass duration.
#[derive(Debug, Clone)]
pub struct StopToken {
    stopped: Arc<AtomicBool>,
    tx: broadcast::Sender<()>,
}

impl StopToken {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            stopped: Arc::new(AtomicBool::new(false)),
            tx,
        }
    }

    /// Request loop exit. Safe to call repeatedly, and before the loop
    /// starts — a pre-stopped loop exits without reconciling.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Relaxed);
        let _ = self.tx.send(());
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }
}

impl Default for StopToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Start the watch loop on a dedicated runtime and block until it exits.
pub fn start_blocking(
    pair: RootPair,
    config: LoopConfig,
    token: StopToken,
) -> Result<(), WatchError> {
    init_tracing();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| WatchError::Runtime(format!("tokio runtime: {err}")))?;
    runtime.block_on(run(pair, config, token))
}

/// Run the watch loop until `token` is stopped.
///
/// Registers a recursive watcher on the source root — registration failure
/// is fatal, the loop never starts reconciling without a watch — then
/// repeats: settle sleep, bounded wait for a change notification, one full
/// reconciliation pass. The pass runs every cycle whether or not a
/// notification arrived, so missed or coalesced events only delay
/// convergence by one cycle; the notification payload is never inspected.
pub async fn run(pair: RootPair, config: LoopConfig, token: StopToken) -> Result<(), WatchError> {
    let mut stop_rx = token.subscribe();

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<notify::Result<notify::Event>>();
    let mut watcher: RecommendedWatcher = recommended_watcher(move |event| {
        let _ = event_tx.send(event);
    })?;
    watcher.watch(pair.source(), RecursiveMode::Recursive)?;

    tracing::info!(
        source = %pair.source().display(),
        dest = %pair.dest().display(),
        "mirroring started",
    );

    while !token.is_stopped() {
        tokio::select! {
            _ = stop_rx.recv() => break,
            _ = sleep(config.settle) => {}
        }

        tokio::select! {
            _ = stop_rx.recv() => break,
            woke = timeout(config.wake_timeout, event_rx.recv()) => {
                if let Ok(Some(Err(err))) = woke {
                    tracing::warn!(error = %err, "watcher event error");
                }
            }
        }

        let pass_pair = pair.clone();
        let summary = tokio::task::spawn_blocking(move || pipeline::run_pass(&pass_pair))
            .await
            .map_err(|err| WatchError::Runtime(format!("reconcile task join error: {err}")))?;
        tracing::debug!(
            copied = summary.copied,
            deleted = summary.deleted,
            duration_ms = summary.duration.as_millis(),
            "reconciliation pass finished",
        );

        // Everything queued while the pass ran is already covered by it.
        while event_rx.try_recv().is_ok() {}
    }

    tracing::info!("mirroring stopped");
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Instant;

    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn pre_stopped_token_exits_before_any_pass() {
        let source = TempDir::new().expect("source");
        let dest = TempDir::new().expect("dest");
        fs::write(source.path().join("a.txt"), b"hello").expect("write source file");

        let pair = RootPair::new(source.path(), dest.path()).expect("pair");
        let token = StopToken::new();
        token.stop();

        run(pair, LoopConfig::default(), token).await.expect("run");

        assert!(
            !dest.path().join("a.txt").exists(),
            "a stopped loop must not reconcile"
        );
    }

    #[tokio::test]
    async fn loop_mirrors_a_new_source_file() {
        let source = TempDir::new().expect("source");
        let dest = TempDir::new().expect("dest");
        fs::write(source.path().join("a.txt"), b"hello").expect("write source file");

        let pair = RootPair::new(source.path(), dest.path()).expect("pair");
        let token = StopToken::new();
        let config = LoopConfig {
            settle: Duration::from_millis(10),
            wake_timeout: Duration::from_millis(50),
        };

        let handle = tokio::spawn(run(pair, config, token.clone()));

        let copied = dest.path().join("a.txt");
        let deadline = Instant::now() + Duration::from_secs(10);
        while !copied.exists() && Instant::now() < deadline {
            sleep(Duration::from_millis(20)).await;
        }
        assert!(copied.is_file(), "file mirrored within the deadline");

        token.stop();
        handle.await.expect("join").expect("run");
    }

    #[tokio::test]
    async fn stop_interrupts_the_bounded_waits_promptly() {
        let source = TempDir::new().expect("source");
        let dest = TempDir::new().expect("dest");

        let pair = RootPair::new(source.path(), dest.path()).expect("pair");
        let token = StopToken::new();
        // Long enough that a full cycle cannot elapse during the test.
        let config = LoopConfig {
            settle: Duration::from_secs(60),
            wake_timeout: Duration::from_secs(60),
        };

        let handle = tokio::spawn(run(pair, config, token.clone()));
        sleep(Duration::from_millis(50)).await;

        let stopped_at = Instant::now();
        token.stop();
        handle.await.expect("join").expect("run");

        assert!(
            stopped_at.elapsed() < Duration::from_secs(5),
            "stop must interrupt the sleep instead of waiting it out"
        );
    }
}
