//! Trigger definition and lifecycle state.
//!
//! A trigger couples one or more conditions to a list of executors, plus
//! the bindings that scope them: an owning house, a cell tag, a statically
//! watched object set, and an optional linked trigger that force-fires
//! whenever this one does.
//!
//! Conditions on one trigger are conjunctive: all must fire on the same
//! tick. Target-directed conditions contribute their resolved targets to
//! the firing's target set (a union, in slot order); if no condition
//! produced dynamic targets, the executors run against the static watch
//! set instead.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::conditions::{ConditionContext, ConditionState, FireResult, TriggerCondition};
use crate::core::{HouseId, ObjectId, TagId, TriggerId};
use crate::executors::TriggerExecutor;

/// Lifecycle state of a registered trigger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerState {
    /// Evaluated every tick.
    #[default]
    Active,
    /// Registered but not evaluated; may be enabled later.
    Disabled,
    /// A one-shot that has fired. Stays registered so admin executors can
    /// still reference it; only a rearm brings it back.
    Fired,
}

/// A scripted trigger: conditions, executors, and their bindings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Trigger {
    pub(crate) id: TriggerId,
    /// Scenario-author label, for diagnostics only.
    pub name: String,
    /// Owning house: scopes hostility checks and house-directed executors.
    pub house: Option<HouseId>,
    /// Cell tag binding for location conditions.
    pub tag: Option<TagId>,
    /// Trigger force-fired whenever this one fires.
    pub link: Option<TriggerId>,
    /// Statically watched objects.
    pub watched: Vec<ObjectId>,
    /// Conjunctive conditions, evaluated in slot order.
    pub conditions: Vec<TriggerCondition>,
    /// Per-slot persistent condition state, parallel to `conditions`.
    pub(crate) condition_states: Vec<ConditionState>,
    /// Effects run on every firing, in order.
    pub executors: Vec<TriggerExecutor>,
    /// Repeating triggers re-arm after firing; one-shots move to `Fired`.
    pub repeating: bool,
    pub(crate) state: TriggerState,
}

impl Trigger {
    /// Create a one-shot trigger with a single condition and no executors.
    #[must_use]
    pub fn new(name: impl Into<String>, condition: TriggerCondition) -> Self {
        Self {
            id: TriggerId::new(0),
            name: name.into(),
            house: None,
            tag: None,
            link: None,
            watched: Vec::new(),
            conditions: vec![condition],
            condition_states: vec![ConditionState::default()],
            executors: Vec::new(),
            repeating: false,
            state: TriggerState::Active,
        }
    }

    /// Add a further condition; all conditions must fire on the same tick.
    #[must_use]
    pub fn and(mut self, condition: TriggerCondition) -> Self {
        self.conditions.push(condition);
        self.condition_states.push(ConditionState::default());
        self
    }

    /// Append an executor.
    #[must_use]
    pub fn then(mut self, executor: TriggerExecutor) -> Self {
        self.executors.push(executor);
        self
    }

    /// Set the owning house.
    #[must_use]
    pub fn with_house(mut self, house: HouseId) -> Self {
        self.house = Some(house);
        self
    }

    /// Bind to a cell tag.
    #[must_use]
    pub fn with_tag(mut self, tag: TagId) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Force-fire another trigger whenever this one fires.
    #[must_use]
    pub fn linked_to(mut self, link: TriggerId) -> Self {
        self.link = Some(link);
        self
    }

    /// Watch a set of objects.
    #[must_use]
    pub fn watching(mut self, objects: impl IntoIterator<Item = ObjectId>) -> Self {
        self.watched.extend(objects);
        self
    }

    /// Re-arm after every firing instead of firing once.
    #[must_use]
    pub fn repeating(mut self) -> Self {
        self.repeating = true;
        self
    }

    /// Register in a disabled state; an admin executor or a registry call
    /// enables it later.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.state = TriggerState::Disabled;
        self
    }

    /// The registry-assigned identifier.
    #[must_use]
    pub fn id(&self) -> TriggerId {
        self.id
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> TriggerState {
        self.state
    }

    /// Evaluate all conditions against one tick.
    ///
    /// Returns the firing's resolved targets if every condition fired, or
    /// `None`. Condition state advances for every slot that was evaluated,
    /// including slots before a failing one; a short-circuit here would
    /// stall timers behind an unmet event condition.
    pub(crate) fn evaluate(&mut self, ctx_parts: TriggerCtx<'_>) -> Option<Vec<ObjectId>> {
        let mut targets: SmallVec<[ObjectId; 4]> = SmallVec::new();
        let mut dynamic = false;
        let mut all_fired = true;

        for (condition, state) in self.conditions.iter().zip(&mut self.condition_states) {
            let mut ctx = ConditionContext {
                world: ctx_parts.world,
                batch: ctx_parts.batch,
                cell_tags: ctx_parts.cell_tags,
                rng: ctx_parts.rng,
                ticks_per_second: ctx_parts.ticks_per_second,
                owner: self.house,
                watched: &self.watched,
                tag: self.tag,
            };
            match condition.check(state, &mut ctx) {
                FireResult::No => all_fired = false,
                FireResult::Yes => {}
                FireResult::Targets(slot_targets) => {
                    dynamic = true;
                    if slot_targets.is_empty() {
                        all_fired = false;
                    } else {
                        for target in slot_targets {
                            if !targets.contains(&target) {
                                targets.push(target);
                            }
                        }
                    }
                }
            }
        }

        if !all_fired {
            return None;
        }
        if dynamic {
            Some(targets.into_vec())
        } else {
            Some(self.watched.clone())
        }
    }

    /// Zero all condition state, returning a fired one-shot to service.
    pub(crate) fn rearm(&mut self) {
        for state in &mut self.condition_states {
            state.reset();
        }
        if self.state == TriggerState::Fired {
            self.state = TriggerState::Active;
        }
    }
}

/// Borrowed registry pieces a trigger evaluation needs.
///
/// Split out so the registry can lend its own fields (tag table, RNG,
/// batch) alongside a mutable borrow of the trigger itself.
pub(crate) struct TriggerCtx<'a> {
    pub world: &'a dyn crate::world::WorldContext,
    pub batch: &'a crate::events::EventBatch,
    pub cell_tags: &'a crate::world::CellTagTable,
    pub rng: &'a mut crate::core::ScenarioRng,
    pub ticks_per_second: u32,
}
