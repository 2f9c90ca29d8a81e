//! Core engine types: objects, houses, identifiers, RNG, configuration.
//!
//! This module contains the fundamental building blocks that are
//! scenario-agnostic. Scenarios configure these via `ScenarioConfig`
//! rather than modifying the core.

pub mod object;
pub mod house;
pub mod rng;
pub mod config;

pub use object::{ObjectId, ObjectKind};
pub use house::{HouseFilter, HouseId};
pub use rng::{ScenarioRng, ScenarioRngState};
pub use config::{
    MapFormat, ObjectTypeId, ScenarioConfig, SoundId, SpeechId, TagId, TextId, TriggerId,
    VariableId, WaypointId,
};
