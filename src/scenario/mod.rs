//! Scenario data decoding.
//!
//! Bridges raw scenario file records (integer kind codes plus flat
//! parameter lists) into typed [`Trigger`] values. Decoding is fail-loud:
//! an unknown kind code, a missing parameter, or an out-of-range value is
//! a [`ScenarioError`] at load time. Runtime leniency (stale targets,
//! vanished houses) is the engine's job; authoring mistakes are not.
//!
//! ## Kind codes
//!
//! Condition codes:
//!
//! | Code | Condition                | Params                      |
//! |------|--------------------------|-----------------------------|
//! | 0    | `Never`                  |                             |
//! | 1    | `Always`                 |                             |
//! | 2    | `EnteredBy`              | house                       |
//! | 3    | `AttackedBy`             | house                       |
//! | 4    | `DestroyedBy`            | house                       |
//! | 5    | `AnyCratePickedUp`       | house                       |
//! | 6    | `MissionTimerExpired`    |                             |
//! | 7    | `ObjectTypeBuilt`        | house, object type          |
//! | 8    | `UnitDeployed`           | house                       |
//! | 9    | `CrossedHorizontal`      | row, house                  |
//! | 10   | `CrossedVertical`        | column, house               |
//! | 11   | `BuildingsDestroyedReach`| house, count                |
//! | 12   | `UnitsDestroyedReach`    | house, count                |
//! | 13   | `ElapsedTime`            | seconds                     |
//! | 14   | `RandomDelay`            | seconds                     |
//! | 15   | `CreditsReach`           | house, credits              |
//! | 16   | `LowPower`               | house                       |
//! | 17   | `NoFactoriesLeft`        | house                       |
//!
//! Executor codes:
//!
//! | Code | Executor                 | Params                      |
//! |------|--------------------------|-----------------------------|
//! | 0    | `DestroyTargets`         |                             |
//! | 1    | `SellTargets`            |                             |
//! | 2    | `EvacuateTargets`        |                             |
//! | 3    | `SetTargetsPowered`      | powered                     |
//! | 4    | `EnableTrigger`          | trigger                     |
//! | 5    | `DisableTrigger`         | trigger                     |
//! | 6    | `ForceTrigger`           | trigger                     |
//! | 7    | `DestroyTrigger`         | trigger                     |
//! | 8    | `DestroyTag`             | tag                         |
//! | 9    | `SetGlobal`              | variable, value             |
//! | 10   | `SetLocal`               | house, variable, value      |
//! | 11   | `RevealAroundWaypoint`   | waypoint, radius            |
//! | 12   | `UnrevealAroundWaypoint` | waypoint, radius            |
//! | 13   | `RevealAll`              |                             |
//! | 14   | `ResetShroud`            |                             |
//! | 15   | `SetAmbientLight`        | intensity, step, rate       |
//! | 16   | `SetViewportBounds`      | x, y, width, height         |
//! | 17   | `StartCountdown`         | seconds                     |
//! | 18   | `StopCountdown`          |                             |
//! | 19   | `SetCountdown`           | seconds                     |
//! | 20   | `SetCountdownText`       | text                        |
//! | 21   | `PlaySound`              | sound                       |
//! | 22   | `PlaySpeech`             | speech                      |
//! | 23   | `ShowText`               | text                        |

mod params;

pub use params::{ActionParams, ANY_HOUSE};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::conditions::TriggerCondition;
use crate::core::{
    MapFormat, ObjectId, ObjectTypeId, SoundId, SpeechId, TagId, TextId, TriggerId, VariableId,
    WaypointId,
};
use crate::executors::TriggerExecutor;
use crate::triggers::Trigger;
use crate::world::{CellCoord, CellTagTable};

/// A scenario-authoring failure caught at load time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScenarioError {
    /// Condition kind code not in the table.
    #[error("unknown condition kind {0}")]
    UnknownConditionKind(i64),

    /// Executor kind code not in the table.
    #[error("unknown executor kind {0}")]
    UnknownExecutorKind(i64),

    /// Parameter list shorter than the kind requires.
    #[error("missing parameter at slot {index}")]
    MissingParam { index: usize },

    /// Parameter present but outside the slot's domain.
    #[error("parameter at slot {index} out of range: {value}")]
    ParamOutOfRange { index: usize, value: i64 },

    /// A trigger definition with no conditions at all.
    #[error("trigger {name:?} has no conditions")]
    NoConditions { name: String },

    /// An entry condition on a trigger that carries no cell tag.
    #[error("trigger {name:?} watches cell entry but has no cell tag")]
    MissingTag { name: String },
}

/// Decode one condition from its kind code and parameter list.
pub fn condition_from_params(
    kind: i64,
    params: &ActionParams,
) -> Result<TriggerCondition, ScenarioError> {
    match kind {
        0 => Ok(TriggerCondition::Never),
        1 => Ok(TriggerCondition::Always),
        2 => Ok(TriggerCondition::EnteredBy(params.house_filter_at(0)?)),
        3 => Ok(TriggerCondition::AttackedBy(params.house_filter_at(0)?)),
        4 => Ok(TriggerCondition::DestroyedBy(params.house_filter_at(0)?)),
        5 => Ok(TriggerCondition::AnyCratePickedUp(params.house_filter_at(0)?)),
        6 => Ok(TriggerCondition::MissionTimerExpired),
        7 => Ok(TriggerCondition::ObjectTypeBuilt {
            house: params.house_filter_at(0)?,
            object_type: ObjectTypeId::new(params.u16_at(1)?),
        }),
        8 => Ok(TriggerCondition::UnitDeployed(params.house_filter_at(0)?)),
        9 => Ok(TriggerCondition::CrossedHorizontal {
            row: params.i32_at(0)?,
            house: params.house_filter_at(1)?,
        }),
        10 => Ok(TriggerCondition::CrossedVertical {
            column: params.i32_at(0)?,
            house: params.house_filter_at(1)?,
        }),
        11 => Ok(TriggerCondition::BuildingsDestroyedReach {
            house: params.house_at(0)?,
            count: params.u32_at(1)?,
        }),
        12 => Ok(TriggerCondition::UnitsDestroyedReach {
            house: params.house_at(0)?,
            count: params.u32_at(1)?,
        }),
        13 => Ok(TriggerCondition::ElapsedTime {
            seconds: params.u32_at(0)?,
        }),
        14 => Ok(TriggerCondition::RandomDelay {
            seconds: params.u32_at(0)?,
        }),
        15 => Ok(TriggerCondition::CreditsReach {
            house: params.house_at(0)?,
            credits: params.get(1)?,
        }),
        16 => Ok(TriggerCondition::LowPower {
            house: params.house_at(0)?,
        }),
        17 => Ok(TriggerCondition::NoFactoriesLeft {
            house: params.house_at(0)?,
        }),
        _ => Err(ScenarioError::UnknownConditionKind(kind)),
    }
}

/// Decode one executor from its kind code and parameter list.
pub fn executor_from_params(
    kind: i64,
    params: &ActionParams,
) -> Result<TriggerExecutor, ScenarioError> {
    match kind {
        0 => Ok(TriggerExecutor::DestroyTargets),
        1 => Ok(TriggerExecutor::SellTargets),
        2 => Ok(TriggerExecutor::EvacuateTargets),
        3 => Ok(TriggerExecutor::SetTargetsPowered {
            powered: params.bool_at(0)?,
        }),
        4 => Ok(TriggerExecutor::EnableTrigger(trigger_at(params, 0)?)),
        5 => Ok(TriggerExecutor::DisableTrigger(trigger_at(params, 0)?)),
        6 => Ok(TriggerExecutor::ForceTrigger(trigger_at(params, 0)?)),
        7 => Ok(TriggerExecutor::DestroyTrigger(trigger_at(params, 0)?)),
        8 => Ok(TriggerExecutor::DestroyTag(TagId::new(params.u32_at(0)?))),
        9 => Ok(TriggerExecutor::SetGlobal {
            variable: VariableId::new(params.u16_at(0)?),
            value: params.bool_at(1)?,
        }),
        10 => Ok(TriggerExecutor::SetLocal {
            house: params.house_at(0)?,
            variable: VariableId::new(params.u16_at(1)?),
            value: params.bool_at(2)?,
        }),
        11 => Ok(TriggerExecutor::RevealAroundWaypoint {
            waypoint: WaypointId::new(params.u16_at(0)?),
            radius: params.u16_at(1)?,
        }),
        12 => Ok(TriggerExecutor::UnrevealAroundWaypoint {
            waypoint: WaypointId::new(params.u16_at(0)?),
            radius: params.u16_at(1)?,
        }),
        13 => Ok(TriggerExecutor::RevealAll),
        14 => Ok(TriggerExecutor::ResetShroud),
        15 => Ok(TriggerExecutor::SetAmbientLight {
            intensity: params.i32_at(0)?,
            step: params.i32_at(1)?,
            rate: params.u32_at(2)?,
        }),
        16 => Ok(TriggerExecutor::SetViewportBounds {
            x: params.i32_at(0)?,
            y: params.i32_at(1)?,
            width: params.u32_at(2)?,
            height: params.u32_at(3)?,
        }),
        17 => Ok(TriggerExecutor::StartCountdown {
            seconds: params.u32_at(0)?,
        }),
        18 => Ok(TriggerExecutor::StopCountdown),
        19 => Ok(TriggerExecutor::SetCountdown {
            seconds: params.u32_at(0)?,
        }),
        20 => Ok(TriggerExecutor::SetCountdownText(TextId::new(
            params.u16_at(0)?,
        ))),
        21 => Ok(TriggerExecutor::PlaySound(SoundId::new(params.u16_at(0)?))),
        22 => Ok(TriggerExecutor::PlaySpeech(SpeechId::new(params.u16_at(0)?))),
        23 => Ok(TriggerExecutor::ShowText(TextId::new(params.u16_at(0)?))),
        _ => Err(ScenarioError::UnknownExecutorKind(kind)),
    }
}

fn trigger_at(params: &ActionParams, index: usize) -> Result<TriggerId, ScenarioError> {
    Ok(TriggerId::new(params.u32_at(index)?))
}

/// One trigger as it appears in scenario data, before decoding.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawTriggerDef {
    pub name: String,
    /// Owning house, or the [`ANY_HOUSE`] sentinel for none.
    pub house: i64,
    pub tag: Option<u32>,
    pub link: Option<u32>,
    pub repeating: bool,
    pub disabled: bool,
    pub watched: Vec<u32>,
    /// (kind code, params) per condition slot.
    pub conditions: Vec<(i64, ActionParams)>,
    /// (kind code, params) per executor slot.
    pub executors: Vec<(i64, ActionParams)>,
}

impl Default for RawTriggerDef {
    fn default() -> Self {
        Self {
            name: String::new(),
            house: ANY_HOUSE,
            tag: None,
            link: None,
            repeating: false,
            disabled: false,
            watched: Vec::new(),
            conditions: Vec::new(),
            executors: Vec::new(),
        }
    }
}

/// Decode a raw trigger definition into a registrable [`Trigger`].
pub fn build_trigger(def: &RawTriggerDef) -> Result<Trigger, ScenarioError> {
    let mut conditions = def.conditions.iter();
    let Some((first_kind, first_params)) = conditions.next() else {
        return Err(ScenarioError::NoConditions {
            name: def.name.clone(),
        });
    };

    let mut trigger = Trigger::new(
        def.name.clone(),
        condition_from_params(*first_kind, first_params)?,
    );
    for (kind, params) in conditions {
        trigger = trigger.and(condition_from_params(*kind, params)?);
    }
    // Entry conditions match events against the trigger's cell tag; a
    // tagless entry trigger could never fire, so reject it here.
    if def.tag.is_none()
        && trigger
            .conditions
            .iter()
            .any(|c| matches!(c, TriggerCondition::EnteredBy(_)))
    {
        return Err(ScenarioError::MissingTag {
            name: def.name.clone(),
        });
    }
    for (kind, params) in &def.executors {
        trigger = trigger.then(executor_from_params(*kind, params)?);
    }

    if def.house != ANY_HOUSE {
        let params = ActionParams::new(vec![def.house]);
        trigger = trigger.with_house(params.house_at(0)?);
    }
    if let Some(tag) = def.tag {
        trigger = trigger.with_tag(TagId::new(tag));
    }
    if let Some(link) = def.link {
        trigger = trigger.linked_to(TriggerId::new(link));
    }
    trigger = trigger.watching(def.watched.iter().map(|id| ObjectId::new(*id)));
    if def.repeating {
        trigger = trigger.repeating();
    }
    if def.disabled {
        trigger = trigger.disabled();
    }
    Ok(trigger)
}

/// Build the cell tag index from world-unit tag placements.
///
/// Scenario files place tags in world units; the cell divisor depends on
/// the map format.
#[must_use]
pub fn load_cell_tags(entries: &[(i32, i32, TagId)], format: MapFormat) -> CellTagTable {
    let mut table = CellTagTable::new();
    for &(x, y, tag) in entries {
        table.insert(CellCoord::from_world(x, y, format), tag);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{HouseFilter, HouseId};
    use crate::triggers::TriggerState;

    #[test]
    fn test_condition_decoding() {
        let condition =
            condition_from_params(4, &ActionParams::new(vec![-1])).unwrap();
        assert_eq!(condition, TriggerCondition::DestroyedBy(HouseFilter::Any));

        let condition =
            condition_from_params(11, &ActionParams::new(vec![2, 3])).unwrap();
        assert_eq!(
            condition,
            TriggerCondition::BuildingsDestroyedReach {
                house: HouseId::new(2),
                count: 3,
            }
        );
    }

    #[test]
    fn test_unknown_condition_kind() {
        assert_eq!(
            condition_from_params(99, &ActionParams::default()),
            Err(ScenarioError::UnknownConditionKind(99))
        );
    }

    #[test]
    fn test_condition_missing_params() {
        assert_eq!(
            condition_from_params(13, &ActionParams::default()),
            Err(ScenarioError::MissingParam { index: 0 })
        );
    }

    #[test]
    fn test_executor_decoding() {
        let executor = executor_from_params(11, &ActionParams::new(vec![5, 4])).unwrap();
        assert_eq!(
            executor,
            TriggerExecutor::RevealAroundWaypoint {
                waypoint: WaypointId::new(5),
                radius: 4,
            }
        );

        assert_eq!(
            executor_from_params(99, &ActionParams::default()),
            Err(ScenarioError::UnknownExecutorKind(99))
        );
    }

    #[test]
    fn test_build_trigger() {
        let def = RawTriggerDef {
            name: "base-falls".into(),
            house: 0,
            tag: Some(7),
            link: None,
            repeating: false,
            disabled: false,
            watched: vec![10, 11],
            conditions: vec![(4, ActionParams::new(vec![-1]))],
            executors: vec![(8, ActionParams::new(vec![7]))],
        };

        let trigger = build_trigger(&def).unwrap();
        assert_eq!(trigger.name, "base-falls");
        assert_eq!(trigger.house, Some(HouseId::new(0)));
        assert_eq!(trigger.tag, Some(TagId::new(7)));
        assert_eq!(trigger.watched.len(), 2);
        assert_eq!(trigger.conditions.len(), 1);
        assert_eq!(trigger.executors.len(), 1);
        assert_eq!(trigger.state(), TriggerState::Active);
    }

    #[test]
    fn test_build_trigger_requires_conditions() {
        let def = RawTriggerDef {
            name: "empty".into(),
            house: ANY_HOUSE,
            ..RawTriggerDef::default()
        };
        assert!(matches!(
            build_trigger(&def),
            Err(ScenarioError::NoConditions { .. })
        ));
    }

    #[test]
    fn test_build_trigger_entry_requires_tag() {
        let def = RawTriggerDef {
            name: "ambush".into(),
            conditions: vec![(2, ActionParams::new(vec![-1]))],
            ..RawTriggerDef::default()
        };
        assert!(matches!(
            build_trigger(&def),
            Err(ScenarioError::MissingTag { .. })
        ));

        let tagged = RawTriggerDef {
            tag: Some(3),
            ..def
        };
        assert!(build_trigger(&tagged).is_ok());
    }

    #[test]
    fn test_build_trigger_bad_executor_is_loud() {
        let def = RawTriggerDef {
            name: "broken".into(),
            house: ANY_HOUSE,
            conditions: vec![(1, ActionParams::default())],
            executors: vec![(9, ActionParams::new(vec![2]))], // value slot missing
            ..RawTriggerDef::default()
        };
        assert!(matches!(
            build_trigger(&def),
            Err(ScenarioError::MissingParam { index: 1 })
        ));
    }

    #[test]
    fn test_load_cell_tags_per_format() {
        let entries = [(384, 640, TagId::new(7))];

        let legacy = load_cell_tags(&entries, MapFormat::Legacy);
        assert_eq!(legacy.tag_at(CellCoord::new(3, 5)), Some(TagId::new(7)));

        let modern = load_cell_tags(&entries, MapFormat::Modern);
        assert_eq!(modern.tag_at(CellCoord::new(1, 2)), Some(TagId::new(7)));
    }
}
