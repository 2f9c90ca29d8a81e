//! Trigger effects.
//!
//! ## Key Components
//!
//! - [`TriggerExecutor`]: the closed set of effect kinds
//! - [`ExecOutcome`]: completed, skipped, or a registry request
//! - [`AdminOp`]: trigger bookkeeping only the registry can apply
//!
//! ## Design Philosophy
//!
//! Executors mutate the world only through the [`WorldContext`] seam and
//! never touch registry internals directly; anything that changes trigger
//! bookkeeping comes back as an [`AdminOp`] for the registry to apply
//! in-pass. This keeps the firing loop free of re-entrancy.
//!
//! [`WorldContext`]: crate::world::WorldContext

mod executor;

pub use executor::{AdminOp, ExecOutcome, TriggerExecutor};
