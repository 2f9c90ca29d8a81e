//! Scenario configuration and opaque scenario identifiers.
//!
//! Scenarios configure the engine at load time via `ScenarioConfig`:
//! the simulation tick rate, the map coordinate format, and the RNG seed
//! for randomized delays. The engine never hardcodes a tick rate.
//!
//! The identifier newtypes here (`WaypointId`, `VariableId`, `TagId`, the
//! presentation ids) are opaque to the engine - scenario data and the world
//! collaborator assign meaning.

use serde::{Deserialize, Serialize};

/// Waypoint identifier, resolved to a map cell by the world collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WaypointId(pub u16);

impl WaypointId {
    /// Create a new waypoint ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for WaypointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Waypoint({})", self.0)
    }
}

/// Index into the global or per-house boolean variable table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VariableId(pub u16);

impl VariableId {
    /// Create a new variable ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for VariableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Variable({})", self.0)
    }
}

/// Tag identifier binding map cells (or trigger-graph nodes) to triggers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagId(pub u32);

impl TagId {
    /// Create a new tag ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TagId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tag({})", self.0)
    }
}

/// Object type identifier used by production-complete conditions.
///
/// The engine compares these for equality only; scenario data assigns
/// meaning (which building/unit type the number refers to).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectTypeId(pub u16);

impl ObjectTypeId {
    /// Create a new object type ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }
}

/// Sound effect identifier for presentation-signal executors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SoundId(pub u16);

impl SoundId {
    /// Create a new sound ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }
}

/// Speech line identifier for presentation-signal executors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpeechId(pub u16);

impl SpeechId {
    /// Create a new speech ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }
}

/// On-screen text identifier for presentation-signal executors
/// and countdown labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextId(pub u16);

impl TextId {
    /// Create a new text ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }
}

/// Registry-scoped trigger identifier.
///
/// Assigned by the registry at registration time and stable for the life
/// of the scenario, so admin executors can reference other triggers (or
/// the trigger they belong to) by id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TriggerId(pub u32);

impl TriggerId {
    /// Create a new trigger ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TriggerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Trigger({})", self.0)
    }
}

/// Map coordinate format for cell tag decoding.
///
/// Scenario files store cell tag positions in world units; the divisor that
/// converts world units to cells differs between the older and the newer
/// map format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapFormat {
    /// Older maps: 128 world units per cell.
    Legacy,
    /// Newer maps: 256 world units per cell.
    #[default]
    Modern,
}

impl MapFormat {
    /// World units per map cell.
    #[must_use]
    pub const fn cell_divisor(self) -> i32 {
        match self {
            MapFormat::Legacy => 128,
            MapFormat::Modern => 256,
        }
    }
}

/// Complete scenario configuration.
///
/// Scenarios provide this at load time to configure the registry.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Simulation ticks per second; converts configured seconds into
    /// tick thresholds for timer conditions.
    pub ticks_per_second: u32,

    /// Map coordinate format for cell tag decoding.
    pub map_format: MapFormat,

    /// Seed for the deterministic RNG used by randomized delays.
    pub seed: u64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: 30,
            map_format: MapFormat::default(),
            seed: 0,
        }
    }
}

impl ScenarioConfig {
    /// Create a configuration with the given tick rate.
    #[must_use]
    pub fn new(ticks_per_second: u32) -> Self {
        assert!(ticks_per_second > 0, "Tick rate must be positive");
        Self {
            ticks_per_second,
            ..Self::default()
        }
    }

    /// Set the map format.
    #[must_use]
    pub fn with_map_format(mut self, format: MapFormat) -> Self {
        self.map_format = format;
        self
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waypoint_id() {
        let id = WaypointId::new(5);
        assert_eq!(id.raw(), 5);
        assert_eq!(format!("{}", id), "Waypoint(5)");
    }

    #[test]
    fn test_tag_id() {
        let id = TagId::new(7);
        assert_eq!(id.raw(), 7);
        assert_eq!(format!("{}", id), "Tag(7)");
    }

    #[test]
    fn test_map_format_divisors() {
        assert_eq!(MapFormat::Legacy.cell_divisor(), 128);
        assert_eq!(MapFormat::Modern.cell_divisor(), 256);
        assert_eq!(MapFormat::default(), MapFormat::Modern);
    }

    #[test]
    fn test_config_builder() {
        let config = ScenarioConfig::new(15)
            .with_map_format(MapFormat::Legacy)
            .with_seed(42);

        assert_eq!(config.ticks_per_second, 15);
        assert_eq!(config.map_format, MapFormat::Legacy);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_config_default() {
        let config = ScenarioConfig::default();
        assert_eq!(config.ticks_per_second, 30);
    }

    #[test]
    #[should_panic(expected = "Tick rate must be positive")]
    fn test_config_zero_tick_rate() {
        ScenarioConfig::new(0);
    }
}
