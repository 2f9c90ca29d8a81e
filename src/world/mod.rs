//! World collaborator interface and map/tag indices.
//!
//! The trigger engine never holds references into the simulation's object
//! graph. Instead it talks to the world through [`WorldContext`], a narrow
//! capability interface exposing exactly the queries conditions need and
//! the mutations executors perform. Conditions receive `&dyn WorldContext`
//! (read-only by construction); executors receive `&mut dyn WorldContext`.
//!
//! ## Key Components
//!
//! - [`WorldContext`]: the dependency-injected world capability trait
//! - [`CellCoord`]: a map cell position
//! - [`CellTagTable`]: the cell -> tag index read at scenario load
//! - [`CountdownOp`]: mission countdown timer control operations
//! - [`SimWorld`]: an in-memory reference implementation for tests/demos

mod sim;

pub use sim::SimWorld;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{HouseId, MapFormat, ObjectId, ObjectKind, TagId, TextId, WaypointId};

/// A map cell position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    /// Create a new cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Decode a world-unit position into a cell.
    ///
    /// Scenario files store cell tag positions in world units; the divisor
    /// is format-dependent (see [`MapFormat`]).
    #[must_use]
    pub const fn from_world(x: i32, y: i32, format: MapFormat) -> Self {
        let divisor = format.cell_divisor();
        Self {
            x: x / divisor,
            y: y / divisor,
        }
    }
}

impl std::fmt::Display for CellCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cell({}, {})", self.x, self.y)
    }
}

/// Mapping from map cells to tag identifiers.
///
/// Built once at scenario load and immutable thereafter, except that
/// destroying a tag removes its cells.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CellTagTable {
    cells: FxHashMap<CellCoord, TagId>,
}

impl CellTagTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate a cell with a tag. A later insert for the same cell wins.
    pub fn insert(&mut self, cell: CellCoord, tag: TagId) {
        self.cells.insert(cell, tag);
    }

    /// Get the tag at a cell, if any.
    #[must_use]
    pub fn tag_at(&self, cell: CellCoord) -> Option<TagId> {
        self.cells.get(&cell).copied()
    }

    /// Remove every cell bound to a tag. Returns how many cells were removed.
    pub fn remove_tag(&mut self, tag: TagId) -> usize {
        let before = self.cells.len();
        self.cells.retain(|_, t| *t != tag);
        before - self.cells.len()
    }

    /// Number of tagged cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if no cells are tagged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Mission countdown timer control.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountdownOp {
    /// Set the remaining time and start counting.
    Start { seconds: u32 },
    /// Pause the countdown, keeping the remaining time.
    Stop,
    /// Set the remaining time without changing the running state.
    Set { seconds: u32 },
    /// Set the on-screen label shown next to the countdown.
    SetText(TextId),
}

/// Capability interface to the live simulation.
///
/// This is everything the trigger engine is allowed to see and touch.
/// Query methods return `Option`/defaults instead of panicking so that
/// scenario data referencing a vanished house or object degrades to
/// "no match" rather than aborting the tick pass.
pub trait WorldContext {
    // === House queries ===

    /// All houses currently present in the scenario.
    fn houses(&self) -> Vec<HouseId>;

    /// Whether the house is present.
    fn house_exists(&self, house: HouseId) -> bool;

    /// Whether two houses are allied. A house is allied with itself.
    fn are_allied(&self, a: HouseId, b: HouseId) -> bool;

    /// Current credits of a house, `None` if the house is missing.
    fn credits(&self, house: HouseId) -> Option<i64>;

    /// Whether the house is in a low-power state.
    fn is_low_power(&self, house: HouseId) -> bool;

    /// Number of production structures the house still owns.
    fn factory_count(&self, house: HouseId) -> usize;

    // === Object queries ===

    /// Whether the object is still in the simulation (not destroyed
    /// or unspawned).
    fn is_live(&self, object: ObjectId) -> bool;

    /// Owning house of an object, `None` if it has left the simulation.
    fn object_house(&self, object: ObjectId) -> Option<HouseId>;

    /// Kind of an object, `None` if it has left the simulation.
    fn object_kind(&self, object: ObjectId) -> Option<ObjectKind>;

    // === Map queries ===

    /// Resolve a waypoint to a cell. `None` for invalid waypoints.
    fn resolve_waypoint(&self, waypoint: WaypointId) -> Option<CellCoord>;

    // === Object mutators ===

    /// Remove an object from the simulation. Must be a no-op for objects
    /// that are already gone.
    fn destroy_object(&mut self, object: ObjectId);

    /// Sell a building back for credits.
    fn sell_building(&mut self, building: ObjectId);

    /// Order the occupants of a building to leave.
    fn evacuate_garrison(&mut self, building: ObjectId);

    /// Switch a building's power consumption on or off.
    fn set_building_powered(&mut self, building: ObjectId, powered: bool);

    // === Map mutators ===

    /// Reveal shroud in a radius around a cell, for one house or for all.
    fn reveal_around(&mut self, house: Option<HouseId>, center: CellCoord, radius: u16);

    /// Re-shroud a radius around a cell, for one house or for all.
    fn unreveal_around(&mut self, house: Option<HouseId>, center: CellCoord, radius: u16);

    /// Reset a house's entire shroud to unexplored.
    fn reset_shroud(&mut self, house: HouseId);

    /// Adjust ambient lighting: target intensity, per-step delta, and
    /// ticks between steps.
    fn set_ambient_light(&mut self, intensity: i32, step: i32, rate: u32);

    /// Restrict the scrollable viewport.
    fn set_viewport_bounds(&mut self, x: i32, y: i32, width: u32, height: u32);

    /// Control the mission countdown timer.
    fn control_countdown(&mut self, op: CountdownOp);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_decode_legacy() {
        let cell = CellCoord::from_world(384, 640, MapFormat::Legacy);
        assert_eq!(cell, CellCoord::new(3, 5));
    }

    #[test]
    fn test_cell_decode_modern() {
        let cell = CellCoord::from_world(384, 640, MapFormat::Modern);
        assert_eq!(cell, CellCoord::new(1, 2));
    }

    #[test]
    fn test_cell_tag_table() {
        let mut table = CellTagTable::new();
        assert!(table.is_empty());

        table.insert(CellCoord::new(3, 5), TagId::new(7));
        table.insert(CellCoord::new(4, 5), TagId::new(7));
        table.insert(CellCoord::new(9, 9), TagId::new(8));

        assert_eq!(table.len(), 3);
        assert_eq!(table.tag_at(CellCoord::new(3, 5)), Some(TagId::new(7)));
        assert_eq!(table.tag_at(CellCoord::new(0, 0)), None);

        assert_eq!(table.remove_tag(TagId::new(7)), 2);
        assert_eq!(table.tag_at(CellCoord::new(3, 5)), None);
        assert_eq!(table.tag_at(CellCoord::new(9, 9)), Some(TagId::new(8)));
    }

    #[test]
    fn test_cell_serialization() {
        let cell = CellCoord::new(-2, 17);
        let json = serde_json::to_string(&cell).unwrap();
        let deserialized: CellCoord = serde_json::from_str(&json).unwrap();
        assert_eq!(cell, deserialized);
    }
}
