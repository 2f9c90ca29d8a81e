//! Trigger definitions and the registry that drives them.
//!
//! ## Key Components
//!
//! - [`Trigger`]: conditions, executors, and scope bindings, built with a
//!   fluent builder
//! - [`TriggerState`]: active / disabled / fired lifecycle
//! - [`TriggerRegistry`]: owns every trigger and evaluates one tick at a
//!   time via [`TriggerRegistry::tick`]
//!
//! ## Design Philosophy
//!
//! The registry is the only mutable meeting point of the engine: triggers,
//! variables, the tag index, the event queue and the RNG all live here, so
//! one serialized snapshot captures everything needed to resume a
//! scenario deterministically.

mod registry;
mod trigger;

pub use registry::TriggerRegistry;
pub use trigger::{Trigger, TriggerState};
