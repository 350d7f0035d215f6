//! # dirmirror-core
//!
//! One-way directory reconciliation engine.
//!
//! Call [`pipeline::run_pass`] to reconcile a destination tree with a source
//! tree once: new and size-changed entries are copied over, and destination
//! entries with no remaining source counterpart are removed, children before
//! parents.

pub mod error;
pub mod paths;
pub mod pipeline;
pub mod reconcile;
pub mod types;
pub mod walk;

pub use error::MirrorError;
pub use pipeline::{run_pass, PassSummary};
pub use types::RootPair;
