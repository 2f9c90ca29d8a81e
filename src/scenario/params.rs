//! Raw scenario parameter lists.
//!
//! Scenario files encode condition and executor parameters as flat integer
//! lists. `ActionParams` wraps one list with fail-closed typed accessors:
//! a missing slot or an out-of-range value is a [`ScenarioError`], never a
//! silent default. Authoring mistakes surface at load time, not as a
//! trigger that quietly misbehaves mid-mission.

use serde::{Deserialize, Serialize};

use crate::core::{HouseFilter, HouseId};

use super::ScenarioError;

/// House parameter value meaning "any house".
pub const ANY_HOUSE: i64 = -1;

/// A flat integer parameter list from scenario data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionParams(pub Vec<i64>);

impl ActionParams {
    /// Wrap a raw parameter list.
    #[must_use]
    pub fn new(values: Vec<i64>) -> Self {
        Self(values)
    }

    /// Raw value at a slot.
    pub fn get(&self, index: usize) -> Result<i64, ScenarioError> {
        self.0
            .get(index)
            .copied()
            .ok_or(ScenarioError::MissingParam { index })
    }

    /// A `u32` slot (delays, counts, radii).
    pub fn u32_at(&self, index: usize) -> Result<u32, ScenarioError> {
        let value = self.get(index)?;
        u32::try_from(value).map_err(|_| ScenarioError::ParamOutOfRange { index, value })
    }

    /// A `u16` slot (waypoints, variables, presentation ids).
    pub fn u16_at(&self, index: usize) -> Result<u16, ScenarioError> {
        let value = self.get(index)?;
        u16::try_from(value).map_err(|_| ScenarioError::ParamOutOfRange { index, value })
    }

    /// An `i32` slot (rows, columns, light levels).
    pub fn i32_at(&self, index: usize) -> Result<i32, ScenarioError> {
        let value = self.get(index)?;
        i32::try_from(value).map_err(|_| ScenarioError::ParamOutOfRange { index, value })
    }

    /// A strict boolean slot: 0 or 1 only.
    pub fn bool_at(&self, index: usize) -> Result<bool, ScenarioError> {
        match self.get(index)? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(ScenarioError::ParamOutOfRange { index, value }),
        }
    }

    /// A house filter slot: `-1` means any house.
    pub fn house_filter_at(&self, index: usize) -> Result<HouseFilter, ScenarioError> {
        let value = self.get(index)?;
        if value == ANY_HOUSE {
            return Ok(HouseFilter::Any);
        }
        self.house_from(index, value).map(HouseFilter::Only)
    }

    /// A concrete house slot; `-1` is not accepted here.
    pub fn house_at(&self, index: usize) -> Result<HouseId, ScenarioError> {
        let value = self.get(index)?;
        self.house_from(index, value)
    }

    fn house_from(&self, index: usize, value: i64) -> Result<HouseId, ScenarioError> {
        u8::try_from(value)
            .map(HouseId::new)
            .map_err(|_| ScenarioError::ParamOutOfRange { index, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors() {
        let params = ActionParams::new(vec![300, -1, 1, 65000]);

        assert_eq!(params.get(0).unwrap(), 300);
        assert_eq!(params.u32_at(0).unwrap(), 300);
        assert_eq!(params.bool_at(2).unwrap(), true);
        assert_eq!(params.u16_at(3).unwrap(), 65000);
    }

    #[test]
    fn test_missing_slot_is_loud() {
        let params = ActionParams::new(vec![1]);
        assert!(matches!(
            params.get(1),
            Err(ScenarioError::MissingParam { index: 1 })
        ));
    }

    #[test]
    fn test_out_of_range_is_loud() {
        let params = ActionParams::new(vec![-5, 70000, 2]);

        assert!(matches!(
            params.u32_at(0),
            Err(ScenarioError::ParamOutOfRange { index: 0, value: -5 })
        ));
        assert!(matches!(
            params.u16_at(1),
            Err(ScenarioError::ParamOutOfRange { index: 1, value: 70000 })
        ));
        // Booleans are strict: 2 is not "true".
        assert!(params.bool_at(2).is_err());
    }

    #[test]
    fn test_house_filter_sentinel() {
        let params = ActionParams::new(vec![-1, 3, -2]);

        assert_eq!(params.house_filter_at(0).unwrap(), HouseFilter::Any);
        assert_eq!(
            params.house_filter_at(1).unwrap(),
            HouseFilter::Only(HouseId::new(3))
        );
        assert!(params.house_filter_at(2).is_err());
        // A concrete house slot rejects the sentinel.
        assert!(params.house_at(0).is_err());
    }
}
