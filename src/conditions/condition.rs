//! Trigger conditions.
//!
//! Conditions decide, once per tick, whether their trigger fires. Each
//! variant carries only the parameters its kind needs; persistent scalar
//! state (counters, elapsed ticks, a memoized random threshold) lives in
//! the [`ConditionState`] slot the registry keeps alongside the condition,
//! never inside the variant itself. That keeps `check` deterministic for a
//! given state and batch, and makes save/restore a plain serialization of
//! the state record.
//!
//! ## Evaluation semantics
//!
//! - *Event-filtering, target-directed* kinds scan the batch and return the
//!   distinct qualifying targets; every matching event in the batch
//!   contributes, not just the first.
//! - *Event-filtering, boolean* kinds return a plain yes/no; the executors
//!   then run against the trigger's statically bound watch set.
//! - *Accumulating counters* latch permanently once their threshold is
//!   reached and short-circuit further scanning.
//! - *Timers* count every evaluation. When a timer fires it subtracts the
//!   threshold, carrying the remainder, so a repeating 10 s trigger at
//!   30 ticks/s fires at tick 301, 601, 901 and so on.
//! - *Instantaneous* kinds read the world directly and hold no state,
//!   except that the low-power check resolves its house once and keeps
//!   the resolution.
//!
//! A condition referencing a house that does not exist yields "does not
//! fire" rather than an error; malformed scenario data must not take down
//! the tick loop.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{
    HouseFilter, HouseId, ObjectId, ObjectTypeId, ScenarioRng, TagId,
};
use crate::events::{EventBatch, ScenarioEvent};
use crate::world::{CellTagTable, WorldContext};

/// Jitter band for the randomized delay, as a percentage of the base.
const RANDOM_DELAY_JITTER_PERCENT: u32 = 50;

/// A condition that must be met for a trigger to fire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerCondition {
    // === Event-filtering, target-directed ===

    /// A watched object was attacked by a matching house.
    AttackedBy(HouseFilter),

    /// A watched object was destroyed by a matching house.
    DestroyedBy(HouseFilter),

    /// An object of a matching house entered a cell bound to this
    /// trigger's tag.
    EnteredBy(HouseFilter),

    /// An object of a matching house entered a cell on the given row.
    CrossedHorizontal { row: i32, house: HouseFilter },

    /// An object of a matching house entered a cell on the given column.
    CrossedVertical { column: i32, house: HouseFilter },

    // === Event-filtering, boolean ===

    /// Any crate was picked up by a matching house.
    AnyCratePickedUp(HouseFilter),

    /// The mission countdown timer reached zero.
    MissionTimerExpired,

    /// A matching house finished producing the given object type.
    ObjectTypeBuilt {
        house: HouseFilter,
        object_type: ObjectTypeId,
    },

    /// A unit of a matching house deployed.
    UnitDeployed(HouseFilter),

    // === Accumulating counters, latching ===

    /// N buildings owned by the house have been destroyed.
    BuildingsDestroyedReach { house: HouseId, count: u32 },

    /// N units owned by the house have been destroyed.
    UnitsDestroyedReach { house: HouseId, count: u32 },

    // === Elapsed-time timers, resettable ===

    /// A fixed delay measured in scenario seconds.
    ElapsedTime { seconds: u32 },

    /// A delay jittered within a fixed band around the configured seconds.
    /// The jittered threshold is drawn once, lazily, and kept until reset.
    RandomDelay { seconds: u32 },

    // === Instantaneous world-state queries ===

    /// The house's credits have reached the threshold.
    CreditsReach { house: HouseId, credits: i64 },

    /// The house is in a low-power state.
    LowPower { house: HouseId },

    /// The house has no production structures left.
    NoFactoriesLeft { house: HouseId },

    /// Always fires (used with force-fire-only and linked triggers).
    Always,

    /// Never fires (disabled scripting).
    Never,
}

/// Outcome of a condition check.
///
/// Conditions either report a plain yes/no, or a resolved target list.
/// A target-directed result fires exactly when the list is non-empty;
/// callers never rely on truthiness of an empty list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FireResult {
    /// Does not fire this tick.
    No,
    /// Fires; executors run against the trigger's static watch set.
    Yes,
    /// Fires with exactly these targets, if non-empty.
    Targets(SmallVec<[ObjectId; 4]>),
}

impl FireResult {
    /// Whether the trigger fires.
    #[must_use]
    pub fn fired(&self) -> bool {
        match self {
            FireResult::No => false,
            FireResult::Yes => true,
            FireResult::Targets(targets) => !targets.is_empty(),
        }
    }

    fn from_bool(fired: bool) -> Self {
        if fired {
            FireResult::Yes
        } else {
            FireResult::No
        }
    }
}

/// Persistent per-slot condition state.
///
/// One record per (trigger, condition slot), owned by the trigger and thus
/// serialized with it. Counters are monotone until [`ConditionState::reset`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionState {
    /// Qualifying events seen so far (counting conditions).
    pub counter: u32,
    /// Set once a counting condition reaches its threshold; never cleared
    /// except by reset.
    pub latched: bool,
    /// Evaluations seen since the last fire or reset (timer conditions).
    pub ticks: u32,
    /// Memoized jittered threshold of a randomized delay.
    pub threshold_ticks: Option<u32>,
    /// Whether the low-power house reference has been resolved yet.
    pub house_resolved: bool,
    /// The resolved house, kept across resets.
    pub cached_house: Option<HouseId>,
}

impl ConditionState {
    /// Re-arm the condition: zero counters and timers, drop the memoized
    /// random threshold. The cached house resolution is an init-time
    /// binding and survives.
    pub fn reset(&mut self) {
        self.counter = 0;
        self.latched = false;
        self.ticks = 0;
        self.threshold_ticks = None;
    }
}

/// Everything a condition may read during one check.
pub struct ConditionContext<'a> {
    /// Read-only world access.
    pub world: &'a dyn WorldContext,
    /// This tick's frozen event batch.
    pub batch: &'a EventBatch,
    /// Cell -> tag index for location-bound conditions.
    pub cell_tags: &'a CellTagTable,
    /// RNG for drawing randomized delay thresholds.
    pub rng: &'a mut ScenarioRng,
    /// Simulation tick rate, for seconds-to-ticks conversion.
    pub ticks_per_second: u32,
    /// Owning house of the trigger, if any.
    pub owner: Option<HouseId>,
    /// The trigger's watched target set.
    pub watched: &'a [ObjectId],
    /// The trigger's cell tag, if any.
    pub tag: Option<TagId>,
}

impl TriggerCondition {
    /// Check whether the trigger should fire this tick.
    ///
    /// May advance the persistent `state` it owns but never mutates world
    /// objects; the world is only reachable through a shared reference.
    pub fn check(&self, state: &mut ConditionState, ctx: &mut ConditionContext) -> FireResult {
        match self {
            TriggerCondition::AttackedBy(filter) => {
                FireResult::Targets(collect_hostile_targets(ctx, *filter, false))
            }

            TriggerCondition::DestroyedBy(filter) => {
                FireResult::Targets(collect_hostile_targets(ctx, *filter, true))
            }

            TriggerCondition::EnteredBy(filter) => {
                // Location-bound: only meaningful for triggers with a tag.
                let Some(tag) = ctx.tag else {
                    return FireResult::Targets(SmallVec::new());
                };
                let mut targets: SmallVec<[ObjectId; 4]> = SmallVec::new();
                for event in ctx.batch.iter() {
                    if let ScenarioEvent::CellEntered { object, house, cell, .. } = event {
                        if filter.matches(Some(*house))
                            && ctx.cell_tags.tag_at(*cell) == Some(tag)
                            && !targets.contains(object)
                        {
                            targets.push(*object);
                        }
                    }
                }
                FireResult::Targets(targets)
            }

            TriggerCondition::CrossedHorizontal { row, house } => {
                FireResult::Targets(collect_line_crossers(ctx, *house, |cell| cell.y == *row))
            }

            TriggerCondition::CrossedVertical { column, house } => {
                FireResult::Targets(collect_line_crossers(ctx, *house, |cell| cell.x == *column))
            }

            TriggerCondition::AnyCratePickedUp(filter) => {
                let found = ctx.batch.iter().any(|event| {
                    matches!(event, ScenarioEvent::CratePickedUp { house, .. }
                        if filter.matches(Some(*house)))
                });
                FireResult::from_bool(found)
            }

            TriggerCondition::MissionTimerExpired => FireResult::from_bool(
                ctx.batch
                    .iter()
                    .any(|event| matches!(event, ScenarioEvent::TimerExpired)),
            ),

            TriggerCondition::ObjectTypeBuilt { house, object_type } => {
                let found = ctx.batch.iter().any(|event| {
                    matches!(event, ScenarioEvent::ProductionCompleted { house: h, object_type: t, .. }
                        if house.matches(Some(*h)) && t == object_type)
                });
                FireResult::from_bool(found)
            }

            TriggerCondition::UnitDeployed(filter) => {
                let found = ctx.batch.iter().any(|event| {
                    matches!(event, ScenarioEvent::ObjectDeployed { house, .. }
                        if filter.matches(Some(*house)))
                });
                FireResult::from_bool(found)
            }

            TriggerCondition::BuildingsDestroyedReach { house, count } => {
                check_destruction_counter(state, ctx, *house, *count, |kind| {
                    kind == crate::core::ObjectKind::Building
                })
            }

            TriggerCondition::UnitsDestroyedReach { house, count } => {
                check_destruction_counter(state, ctx, *house, *count, |kind| kind.is_unit())
            }

            TriggerCondition::ElapsedTime { seconds } => {
                let threshold = seconds.saturating_mul(ctx.ticks_per_second);
                state.ticks += 1;
                if state.ticks > threshold {
                    // Carry the remainder so repeating triggers keep period.
                    state.ticks -= threshold;
                    FireResult::Yes
                } else {
                    FireResult::No
                }
            }

            TriggerCondition::RandomDelay { seconds } => {
                let threshold = match state.threshold_ticks {
                    Some(t) => t,
                    None => {
                        let base = seconds.saturating_mul(ctx.ticks_per_second);
                        let drawn = ctx.rng.jitter(base, RANDOM_DELAY_JITTER_PERCENT);
                        state.threshold_ticks = Some(drawn);
                        drawn
                    }
                };
                state.ticks += 1;
                if state.ticks > threshold {
                    // Rearm with a fresh draw next evaluation.
                    state.ticks = 0;
                    state.threshold_ticks = None;
                    FireResult::Yes
                } else {
                    FireResult::No
                }
            }

            TriggerCondition::CreditsReach { house, credits } => match ctx.world.credits(*house) {
                Some(current) => FireResult::from_bool(current >= *credits),
                None => FireResult::No,
            },

            TriggerCondition::LowPower { house } => {
                if !state.house_resolved {
                    state.house_resolved = true;
                    state.cached_house = ctx.world.house_exists(*house).then_some(*house);
                }
                match state.cached_house {
                    Some(resolved) => FireResult::from_bool(ctx.world.is_low_power(resolved)),
                    None => FireResult::No,
                }
            }

            TriggerCondition::NoFactoriesLeft { house } => FireResult::from_bool(
                ctx.world.house_exists(*house) && ctx.world.factory_count(*house) == 0,
            ),

            TriggerCondition::Always => FireResult::Yes,

            TriggerCondition::Never => FireResult::No,
        }
    }
}

/// Scan the batch for attack/destroy events against the watched set.
///
/// Incidental damage never qualifies, and neither do events sourced from
/// the owning house itself or one of its allies.
fn collect_hostile_targets(
    ctx: &ConditionContext,
    filter: HouseFilter,
    destroyed: bool,
) -> SmallVec<[ObjectId; 4]> {
    let mut targets: SmallVec<[ObjectId; 4]> = SmallVec::new();

    for event in ctx.batch.iter() {
        let (target, attacker_house, incidental) = match event {
            ScenarioEvent::ObjectDestroyed {
                target,
                attacker_house,
                incidental,
                ..
            } if destroyed => (*target, *attacker_house, *incidental),
            ScenarioEvent::ObjectAttacked {
                target,
                attacker_house,
                incidental,
                ..
            } if !destroyed => (*target, *attacker_house, *incidental),
            _ => continue,
        };

        if incidental || !ctx.watched.contains(&target) || !filter.matches(attacker_house) {
            continue;
        }
        if let (Some(owner), Some(source)) = (ctx.owner, attacker_house) {
            if ctx.world.are_allied(owner, source) {
                continue;
            }
        }
        if !targets.contains(&target) {
            targets.push(target);
        }
    }

    targets
}

/// Scan the batch for cell entries on a line.
fn collect_line_crossers(
    ctx: &ConditionContext,
    filter: HouseFilter,
    on_line: impl Fn(&crate::world::CellCoord) -> bool,
) -> SmallVec<[ObjectId; 4]> {
    let mut targets: SmallVec<[ObjectId; 4]> = SmallVec::new();
    for event in ctx.batch.iter() {
        if let ScenarioEvent::CellEntered { object, house, cell, .. } = event {
            if filter.matches(Some(*house)) && on_line(cell) && !targets.contains(object) {
                targets.push(*object);
            }
        }
    }
    targets
}

/// Advance a latching destruction counter.
///
/// Already-latched counters short-circuit without scanning the batch.
fn check_destruction_counter(
    state: &mut ConditionState,
    ctx: &ConditionContext,
    house: HouseId,
    count: u32,
    kind_matches: impl Fn(crate::core::ObjectKind) -> bool,
) -> FireResult {
    if state.latched {
        return FireResult::Yes;
    }

    for event in ctx.batch.iter() {
        if let ScenarioEvent::ObjectDestroyed {
            target_house: Some(h),
            target_kind: Some(kind),
            ..
        } = event
        {
            if *h == house && kind_matches(*kind) {
                state.counter += 1;
            }
        }
    }

    if state.counter >= count {
        state.latched = true;
        FireResult::Yes
    } else {
        FireResult::No
    }
}
