//! Scenario events and the per-tick batch.
//!
//! ## Key Components
//!
//! - [`ScenarioEvent`]: an immutable tagged record of something that
//!   happened during a tick
//! - [`EventKind`]: fieldless discriminant for filtering
//! - [`EventQueue`]: the `dispatch` entry point, swapped at tick boundaries
//! - [`EventBatch`]: the frozen event set one tick's conditions read
//!
//! ## Design Philosophy
//!
//! Events are cheap, owned values with no identity beyond their fields.
//! They carry everything a condition might need to know about the moment
//! they describe (including the owner and kind of an object that no longer
//! exists) so conditions never have to chase stale references.

mod event;
mod queue;

pub use event::{EventKind, ScenarioEvent};
pub use queue::{EventBatch, EventQueue};
