//! # mission-script
//!
//! A mission-scripting trigger engine for real-time strategy simulations.
//!
//! ## Design Principles
//!
//! 1. **Simulation-Agnostic**: The engine never touches the host's object
//!    graph. All world access goes through the `WorldContext` capability
//!    trait; scenarios configure tick rate, map format and RNG seed via
//!    `ScenarioConfig`.
//!
//! 2. **Deterministic**: Same scenario, same seed, same event stream, same
//!    firings. Randomized delays draw from a seeded RNG whose position
//!    serializes with the registry snapshot.
//!
//! 3. **Fail-Loud at Load, Fail-Soft at Runtime**: Malformed scenario data
//!    is a `ScenarioError` before the mission starts. A reference that
//!    goes stale mid-mission (a destroyed target, a defeated house) is
//!    skipped with a diagnostic, never a panic.
//!
//! ## Architecture
//!
//! - **Frozen event batches**: Events raised during a tick accumulate in
//!   a queue; at the tick boundary the queue is swapped and every trigger
//!   condition reads the same frozen batch. Executor-raised events land
//!   in the next tick's batch.
//!
//! - **In-pass administration**: Executors that change trigger
//!   bookkeeping (enable, disable, force, destroy) apply immediately, so
//!   a trigger disabled early in a pass is not evaluated later that tick.
//!
//! ## Modules
//!
//! - `core`: Identifier newtypes, houses, RNG, configuration
//! - `events`: Scenario events, the queue and the per-tick batch
//! - `world`: The `WorldContext` seam, cell tags, a reference world
//! - `conditions`: The condition taxonomy and its persistent state
//! - `executors`: The effect taxonomy and registry admin operations
//! - `triggers`: Trigger definitions and the registry tick pass
//! - `scenario`: Decoding raw scenario records into typed triggers

pub mod conditions;
pub mod core;
pub mod events;
pub mod executors;
pub mod scenario;
pub mod triggers;
pub mod world;

// Re-export commonly used types
pub use crate::core::{
    HouseFilter, HouseId, MapFormat, ObjectId, ObjectKind, ObjectTypeId, ScenarioConfig,
    ScenarioRng, ScenarioRngState, SoundId, SpeechId, TagId, TextId, TriggerId, VariableId,
    WaypointId,
};

pub use crate::events::{EventBatch, EventKind, EventQueue, ScenarioEvent};

pub use crate::world::{CellCoord, CellTagTable, CountdownOp, SimWorld, WorldContext};

pub use crate::conditions::{ConditionContext, ConditionState, FireResult, TriggerCondition};

pub use crate::executors::{AdminOp, ExecOutcome, TriggerExecutor};

pub use crate::triggers::{Trigger, TriggerRegistry, TriggerState};

pub use crate::scenario::{
    build_trigger, condition_from_params, executor_from_params, load_cell_tags, ActionParams,
    RawTriggerDef, ScenarioError, ANY_HOUSE,
};
