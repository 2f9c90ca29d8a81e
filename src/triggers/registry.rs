//! Trigger registry and the per-tick evaluation pass.
//!
//! The registry owns every registered trigger, the scenario's boolean
//! variable tables, the cell tag index, the event queue and the delay RNG.
//! Once per simulation tick the host calls [`TriggerRegistry::tick`]:
//!
//! 1. The pending event queue is swapped out as this tick's frozen batch.
//! 2. Triggers are evaluated in registration order against that batch.
//! 3. Each firing trigger runs its executors immediately, before the next
//!    trigger is considered. Admin operations (enable, disable, destroy,
//!    force) apply in-pass, so a trigger disabled early in the pass is not
//!    evaluated later the same tick.
//!
//! Events dispatched during the pass (by executors or by the host between
//! ticks) accumulate for the next batch; no condition ever sees a
//! half-built batch.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{
    HouseId, ObjectId, ScenarioConfig, ScenarioRng, ScenarioRngState, TagId, TriggerId, VariableId,
};
use crate::events::{EventQueue, ScenarioEvent};
use crate::executors::{AdminOp, ExecOutcome};
use crate::world::{CellCoord, CellTagTable, WorldContext};

use super::trigger::{Trigger, TriggerCtx, TriggerState};

/// Owns all triggers of one scenario and drives their evaluation.
#[derive(Debug)]
pub struct TriggerRegistry {
    config: ScenarioConfig,
    triggers: FxHashMap<TriggerId, Trigger>,
    /// Evaluation order: registration order, stable across enable/disable.
    order: Vec<TriggerId>,
    next_id: u32,
    globals: FxHashMap<VariableId, bool>,
    locals: FxHashMap<(HouseId, VariableId), bool>,
    cell_tags: CellTagTable,
    events: EventQueue,
    rng: ScenarioRng,
    ticks: u64,
    /// Triggers currently mid-fire; breaks force-fire cycles.
    firing: Vec<TriggerId>,
}

impl TriggerRegistry {
    /// Create an empty registry for a scenario.
    #[must_use]
    pub fn new(config: ScenarioConfig) -> Self {
        Self {
            config,
            triggers: FxHashMap::default(),
            order: Vec::new(),
            next_id: 1,
            globals: FxHashMap::default(),
            locals: FxHashMap::default(),
            cell_tags: CellTagTable::new(),
            events: EventQueue::new(),
            rng: ScenarioRng::new(config.seed),
            ticks: 0,
            firing: Vec::new(),
        }
    }

    /// The scenario configuration the registry was built with.
    #[must_use]
    pub fn config(&self) -> ScenarioConfig {
        self.config
    }

    /// Ticks evaluated so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    // === Registration ===

    /// Register a trigger, assigning it the next free id.
    pub fn register(&mut self, mut trigger: Trigger) -> TriggerId {
        let id = TriggerId::new(self.next_id);
        self.next_id += 1;
        trigger.id = id;
        debug!(trigger = id.raw(), name = %trigger.name, "trigger registered");
        self.triggers.insert(id, trigger);
        self.order.push(id);
        id
    }

    /// Look up a registered trigger.
    #[must_use]
    pub fn trigger(&self, id: TriggerId) -> Option<&Trigger> {
        self.triggers.get(&id)
    }

    /// Number of registered triggers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if no triggers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // === Cell tags ===

    /// Bind a cell to a tag for location conditions.
    pub fn bind_cell(&mut self, cell: CellCoord, tag: TagId) {
        self.cell_tags.insert(cell, tag);
    }

    /// The cell -> tag index.
    #[must_use]
    pub fn cell_tags(&self) -> &CellTagTable {
        &self.cell_tags
    }

    // === Events ===

    /// Raise an event for the next tick's batch.
    pub fn dispatch(&mut self, event: ScenarioEvent) {
        self.events.dispatch(event);
    }

    // === The tick pass ===

    /// Evaluate one simulation tick. Returns the tick number just evaluated.
    pub fn tick(&mut self, world: &mut dyn WorldContext) -> u64 {
        self.ticks += 1;
        let batch = self.events.take_batch();

        // Evaluate against a stable copy of the order; admin ops may add
        // or remove triggers mid-pass.
        let order = self.order.clone();
        for id in order {
            let fired = {
                let Some(trigger) = self.triggers.get_mut(&id) else {
                    continue;
                };
                if trigger.state != TriggerState::Active {
                    continue;
                }
                trigger.evaluate(TriggerCtx {
                    world: &*world,
                    batch: &batch,
                    cell_tags: &self.cell_tags,
                    rng: &mut self.rng,
                    ticks_per_second: self.config.ticks_per_second,
                })
            };
            if let Some(targets) = fired {
                self.fire(id, targets, world);
            }
        }

        self.ticks
    }

    /// Run a firing trigger's executors and its linked trigger.
    fn fire(&mut self, id: TriggerId, targets: Vec<ObjectId>, world: &mut dyn WorldContext) {
        if self.firing.contains(&id) {
            warn!(trigger = id.raw(), "force-fire cycle broken");
            return;
        }

        // One-shots leave service before their executors run, so a
        // self-referencing force terminates. The executor list is moved
        // out for the run, not cloned; repeating triggers fire every tick
        // and the per-fire allocation adds up.
        let (owner, executors, link) = {
            let Some(trigger) = self.triggers.get_mut(&id) else {
                return;
            };
            if !trigger.repeating {
                trigger.state = TriggerState::Fired;
            }
            (
                trigger.house,
                std::mem::take(&mut trigger.executors),
                trigger.link,
            )
        };

        debug!(trigger = id.raw(), targets = targets.len(), "trigger fired");
        self.firing.push(id);

        for executor in &executors {
            if let ExecOutcome::Admin(op) =
                executor.execute(owner, world, &mut self.events, &targets)
            {
                self.apply_admin(op, world);
            }
        }
        // Hand the list back, unless an admin op destroyed the trigger
        // mid-fire.
        if let Some(trigger) = self.triggers.get_mut(&id) {
            trigger.executors = executors;
        }
        if let Some(link) = link {
            self.force(link, world);
        }

        self.firing.pop();
    }

    fn apply_admin(&mut self, op: AdminOp, world: &mut dyn WorldContext) {
        match op {
            AdminOp::Enable(id) => self.enable_trigger(id),
            AdminOp::Disable(id) => self.disable_trigger(id),
            AdminOp::Force(id) => self.force(id, world),
            AdminOp::Destroy(id) => self.destroy_trigger(id),
            AdminOp::DestroyTag(tag) => self.destroy_tag(tag),
            AdminOp::SetGlobal(variable, value) => self.set_global(variable, value),
            AdminOp::SetLocal(house, variable, value) => self.set_local(house, variable, value),
        }
    }

    // === Trigger administration ===

    /// Return a disabled trigger to service. Fired one-shots stay fired;
    /// use [`TriggerRegistry::rearm_trigger`] for those.
    pub fn enable_trigger(&mut self, id: TriggerId) {
        match self.triggers.get_mut(&id) {
            Some(trigger) if trigger.state == TriggerState::Disabled => {
                trigger.state = TriggerState::Active;
            }
            Some(_) => {}
            None => warn!(trigger = id.raw(), "enable skipped: unknown trigger"),
        }
    }

    /// Take a trigger out of service, keeping its condition state.
    pub fn disable_trigger(&mut self, id: TriggerId) {
        match self.triggers.get_mut(&id) {
            Some(trigger) => trigger.state = TriggerState::Disabled,
            None => warn!(trigger = id.raw(), "disable skipped: unknown trigger"),
        }
    }

    /// Fire a trigger now, bypassing its conditions. Disabled and
    /// already-fired triggers are left alone.
    pub fn force_trigger(&mut self, id: TriggerId, world: &mut dyn WorldContext) {
        self.force(id, world);
    }

    fn force(&mut self, id: TriggerId, world: &mut dyn WorldContext) {
        let targets = match self.triggers.get(&id) {
            Some(trigger) if trigger.state == TriggerState::Active => trigger.watched.clone(),
            Some(_) => return,
            None => {
                warn!(trigger = id.raw(), "force skipped: unknown trigger");
                return;
            }
        };
        self.fire(id, targets, world);
    }

    /// Remove a trigger permanently.
    pub fn destroy_trigger(&mut self, id: TriggerId) {
        if self.triggers.remove(&id).is_some() {
            self.order.retain(|t| *t != id);
            debug!(trigger = id.raw(), "trigger destroyed");
        } else {
            warn!(trigger = id.raw(), "destroy skipped: unknown trigger");
        }
    }

    /// Destroy every trigger bound to a tag and unbind the tag's cells.
    pub fn destroy_tag(&mut self, tag: TagId) {
        let doomed: Vec<TriggerId> = self
            .triggers
            .values()
            .filter(|t| t.tag == Some(tag))
            .map(|t| t.id)
            .collect();
        for id in doomed {
            self.destroy_trigger(id);
        }
        self.cell_tags.remove_tag(tag);
    }

    /// Reset a trigger's condition state and return a fired one-shot to
    /// service.
    pub fn rearm_trigger(&mut self, id: TriggerId) {
        match self.triggers.get_mut(&id) {
            Some(trigger) => trigger.rearm(),
            None => warn!(trigger = id.raw(), "rearm skipped: unknown trigger"),
        }
    }

    // === Scenario variables ===

    /// Read a scenario-global boolean variable. Unset variables are false.
    #[must_use]
    pub fn global(&self, variable: VariableId) -> bool {
        self.globals.get(&variable).copied().unwrap_or(false)
    }

    /// Set a scenario-global boolean variable.
    pub fn set_global(&mut self, variable: VariableId, value: bool) {
        self.globals.insert(variable, value);
    }

    /// Read a per-house boolean variable. Unset variables are false.
    #[must_use]
    pub fn local(&self, house: HouseId, variable: VariableId) -> bool {
        self.locals.get(&(house, variable)).copied().unwrap_or(false)
    }

    /// Set a per-house boolean variable.
    pub fn set_local(&mut self, house: HouseId, variable: VariableId, value: bool) {
        self.locals.insert((house, variable), value);
    }

    /// Flip a scenario-global boolean variable, returning the new value.
    pub fn toggle_global(&mut self, variable: VariableId) -> bool {
        let value = !self.global(variable);
        self.set_global(variable, value);
        value
    }

    /// Flip a per-house boolean variable, returning the new value.
    pub fn toggle_local(&mut self, house: HouseId, variable: VariableId) -> bool {
        let value = !self.local(house, variable);
        self.set_local(house, variable, value);
        value
    }

    // === Snapshots ===

    /// Serialize the full registry state, including the RNG position and
    /// events pending for the next tick.
    pub fn snapshot(&self) -> Result<Vec<u8>, bincode::Error> {
        let mut globals: Vec<_> = self.globals.iter().map(|(k, v)| (*k, *v)).collect();
        globals.sort_by_key(|(k, _)| *k);
        let mut locals: Vec<_> = self.locals.iter().map(|(k, v)| (*k, *v)).collect();
        locals.sort_by_key(|(k, _)| *k);

        let snapshot = RegistrySnapshot {
            config: self.config,
            ticks: self.ticks,
            next_id: self.next_id,
            triggers: self
                .order
                .iter()
                .filter_map(|id| self.triggers.get(id))
                .cloned()
                .collect(),
            globals,
            locals,
            cell_tags: self.cell_tags.clone(),
            pending_events: self.events.pending().to_vec(),
            rng: self.rng.state(),
        };
        bincode::serialize(&snapshot)
    }

    /// Rebuild a registry from a snapshot. The restored registry resumes
    /// exactly where the saved one stopped, including randomized delays.
    pub fn restore(bytes: &[u8]) -> Result<Self, bincode::Error> {
        let snapshot: RegistrySnapshot = bincode::deserialize(bytes)?;

        let mut triggers = FxHashMap::default();
        let mut order = Vec::with_capacity(snapshot.triggers.len());
        for trigger in snapshot.triggers {
            order.push(trigger.id);
            triggers.insert(trigger.id, trigger);
        }

        Ok(Self {
            config: snapshot.config,
            triggers,
            order,
            next_id: snapshot.next_id,
            globals: snapshot.globals.into_iter().collect(),
            locals: snapshot.locals.into_iter().collect(),
            cell_tags: snapshot.cell_tags,
            events: EventQueue::from_pending(snapshot.pending_events),
            rng: ScenarioRng::from_state(&snapshot.rng),
            ticks: snapshot.ticks,
            firing: Vec::new(),
        })
    }
}

/// Wire form of a saved registry.
#[derive(Serialize, Deserialize)]
struct RegistrySnapshot {
    config: ScenarioConfig,
    ticks: u64,
    next_id: u32,
    /// Triggers in registration order.
    triggers: Vec<Trigger>,
    globals: Vec<(VariableId, bool)>,
    locals: Vec<((HouseId, VariableId), bool)>,
    cell_tags: CellTagTable,
    pending_events: Vec<ScenarioEvent>,
    rng: ScenarioRngState,
}
