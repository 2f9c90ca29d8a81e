//! World object identification.
//!
//! Every watchable game object (building, unit, aircraft, vessel) has a
//! unique `ObjectId`. The engine never dereferences these ids itself; it
//! hands them to the `WorldContext` collaborator for liveness, ownership
//! and kind queries.

use serde::{Deserialize, Serialize};

/// Unique identifier for a world object.
///
/// Allocated by the simulation, opaque to the trigger engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl ObjectId {
    /// Create a new object ID.
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

impl From<u32> for ObjectId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Object({})", self.0)
    }
}

/// Broad category of a world object.
///
/// Executors use this as a type guard (selling only applies to buildings);
/// counting conditions use it to separate building losses from unit losses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Building,
    Infantry,
    Vehicle,
    Aircraft,
    Vessel,
}

impl ObjectKind {
    /// Whether this kind counts as a mobile unit rather than a structure.
    #[must_use]
    pub const fn is_unit(self) -> bool {
        !matches!(self, ObjectKind::Building)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id() {
        let id = ObjectId::new(7);
        assert_eq!(id.raw(), 7);
        assert_eq!(format!("{}", id), "Object(7)");
        assert_eq!(ObjectId::from(7u32), id);
    }

    #[test]
    fn test_kind_unit_split() {
        assert!(!ObjectKind::Building.is_unit());
        assert!(ObjectKind::Infantry.is_unit());
        assert!(ObjectKind::Vehicle.is_unit());
        assert!(ObjectKind::Aircraft.is_unit());
        assert!(ObjectKind::Vessel.is_unit());
    }

    #[test]
    fn test_serialization() {
        let id = ObjectId(123);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
