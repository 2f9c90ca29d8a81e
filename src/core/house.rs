//! House (player/faction) identification and filtering.
//!
//! ## HouseId
//!
//! Type-safe house identifier. Houses own objects and triggers, hold
//! credits and power state, and can be allied with each other.
//!
//! ## HouseFilter
//!
//! Scenario data frequently filters events by the house that caused them.
//! `HouseFilter::Any` is the distinguished "any house" sentinel: filtering
//! conditions degrade to unconditional matches when no house is specified.

use serde::{Deserialize, Serialize};

/// House identifier supporting up to 255 houses.
///
/// House indices are 0-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HouseId(pub u8);

impl HouseId {
    /// Create a new house ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw house index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for HouseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "House {}", self.0)
    }
}

/// A house filter parameter for event-filtering conditions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HouseFilter {
    /// Match events from every house, including events with no house.
    Any,
    /// Match only events whose resolved house equals this one.
    Only(HouseId),
}

impl HouseFilter {
    /// Check whether an event's (possibly missing) house passes the filter.
    #[must_use]
    pub fn matches(self, house: Option<HouseId>) -> bool {
        match self {
            HouseFilter::Any => true,
            HouseFilter::Only(expected) => house == Some(expected),
        }
    }
}

impl From<Option<HouseId>> for HouseFilter {
    fn from(house: Option<HouseId>) -> Self {
        match house {
            Some(h) => HouseFilter::Only(h),
            None => HouseFilter::Any,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_house_id() {
        let id = HouseId::new(3);
        assert_eq!(id.index(), 3);
        assert_eq!(format!("{}", id), "House 3");
    }

    #[test]
    fn test_any_matches_everything() {
        assert!(HouseFilter::Any.matches(Some(HouseId::new(0))));
        assert!(HouseFilter::Any.matches(Some(HouseId::new(200))));
        assert!(HouseFilter::Any.matches(None));
    }

    #[test]
    fn test_only_matches_exact_house() {
        let filter = HouseFilter::Only(HouseId::new(2));
        assert!(filter.matches(Some(HouseId::new(2))));
        assert!(!filter.matches(Some(HouseId::new(3))));
        assert!(!filter.matches(None));
    }

    #[test]
    fn test_from_option() {
        assert_eq!(HouseFilter::from(None), HouseFilter::Any);
        assert_eq!(
            HouseFilter::from(Some(HouseId::new(1))),
            HouseFilter::Only(HouseId::new(1))
        );
    }

    #[test]
    fn test_serialization() {
        let filter = HouseFilter::Only(HouseId::new(5));
        let json = serde_json::to_string(&filter).unwrap();
        let deserialized: HouseFilter = serde_json::from_str(&json).unwrap();
        assert_eq!(filter, deserialized);
    }
}
