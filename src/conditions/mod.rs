//! Trigger condition evaluation.
//!
//! ## Key Components
//!
//! - [`TriggerCondition`]: the closed set of condition kinds
//! - [`ConditionState`]: persistent per-slot counters and timers
//! - [`ConditionContext`]: what one check may read
//! - [`FireResult`]: yes/no or a resolved target list
//!
//! ## Design Philosophy
//!
//! Conditions are data, not behavior objects. A condition variant holds only
//! its parameters; everything that changes over time lives in a separate
//! [`ConditionState`] record, so evaluation is a pure function of
//! (parameters, state, tick context) and snapshots serialize cleanly.

mod condition;

pub use condition::{ConditionContext, ConditionState, FireResult, TriggerCondition};
