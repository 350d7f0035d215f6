//! Watch-loop runtime: filesystem notifications gate periodic full-tree
//! reconciliation passes over a [`RootPair`](dirmirror_core::RootPair).

mod error;
mod runtime;

pub use error::WatchError;
pub use runtime::{run, start_blocking, LoopConfig, StopToken, SETTLE_INTERVAL, WAKE_TIMEOUT};
