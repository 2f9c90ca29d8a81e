//! Trigger executors.
//!
//! Executors are the effect half of a trigger: once the condition fires,
//! each attached executor runs exactly once against the resolved target
//! set. An executor either mutates the world through [`WorldContext`],
//! queues a presentation signal as an event, or returns an [`AdminOp`]
//! asking the registry to change trigger bookkeeping it cannot reach
//! itself.
//!
//! Failure policy: an executor whose referent is gone (a stale target, a
//! missing waypoint, a vanished house) skips quietly with a diagnostic.
//! Firing is already committed by the time executors run, so a dangling
//! reference must not abort the rest of the trigger's effect list.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{
    HouseId, ObjectId, SoundId, SpeechId, TagId, TextId, TriggerId, VariableId, WaypointId,
};
use crate::events::{EventQueue, ScenarioEvent};
use crate::world::{CountdownOp, WorldContext};

/// The effect half of a trigger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerExecutor {
    // === Target-directed ===

    /// Destroy every resolved target still alive.
    DestroyTargets,

    /// Sell every resolved target that is a live building.
    SellTargets,

    /// Evacuate the garrison of every resolved target.
    EvacuateTargets,

    /// Power every resolved target building on or off.
    SetTargetsPowered { powered: bool },

    // === Trigger administration (returned to the registry) ===

    /// Enable another trigger (or this one).
    EnableTrigger(TriggerId),

    /// Disable another trigger (or this one).
    DisableTrigger(TriggerId),

    /// Force another trigger to fire, bypassing its condition.
    ForceTrigger(TriggerId),

    /// Destroy another trigger outright.
    DestroyTrigger(TriggerId),

    /// Destroy every trigger bound to a cell tag and unbind the tag.
    DestroyTag(TagId),

    /// Set a scenario-global boolean variable.
    SetGlobal { variable: VariableId, value: bool },

    /// Set a per-house boolean variable.
    SetLocal {
        house: HouseId,
        variable: VariableId,
        value: bool,
    },

    // === Map and presentation ===

    /// Reveal cells around a waypoint for the owning house.
    RevealAroundWaypoint { waypoint: WaypointId, radius: u16 },

    /// Re-shroud cells around a waypoint for the owning house.
    UnrevealAroundWaypoint { waypoint: WaypointId, radius: u16 },

    /// Reveal the whole map for the owning house.
    RevealAll,

    /// Reset the owning house's shroud to fully hidden.
    ResetShroud,

    /// Fade the ambient light toward an intensity.
    SetAmbientLight {
        intensity: i32,
        step: i32,
        rate: u32,
    },

    /// Restrict the tactical viewport to a rectangle.
    SetViewportBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    /// Start the mission countdown.
    StartCountdown { seconds: u32 },

    /// Stop the mission countdown.
    StopCountdown,

    /// Overwrite the countdown's remaining time.
    SetCountdown { seconds: u32 },

    /// Replace the countdown's on-screen label.
    SetCountdownText(TextId),

    /// Queue a sound effect for the owning house (or everyone).
    PlaySound(SoundId),

    /// Queue a speech line for the owning house (or everyone).
    PlaySpeech(SpeechId),

    /// Queue on-screen text.
    ShowText(TextId),
}

/// Registry bookkeeping an executor asked for.
///
/// Applied by the registry immediately after the executor returns, within
/// the same firing pass, so a disable takes effect before later triggers
/// in the same tick are evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdminOp {
    Enable(TriggerId),
    Disable(TriggerId),
    Force(TriggerId),
    Destroy(TriggerId),
    DestroyTag(TagId),
    SetGlobal(VariableId, bool),
    SetLocal(HouseId, VariableId, bool),
}

/// What one executor run produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecOutcome {
    /// Ran to completion.
    Completed,
    /// Referent was gone; nothing happened.
    Skipped,
    /// Registry bookkeeping requested.
    Admin(AdminOp),
}

impl TriggerExecutor {
    /// Run this executor.
    ///
    /// `targets` is the resolved target set of the firing (the condition's
    /// dynamic targets, or the trigger's static watch set). Target-directed
    /// executors skip stale entries individually and report [`Completed`]
    /// when at least one target was affected.
    ///
    /// [`Completed`]: ExecOutcome::Completed
    pub fn execute(
        &self,
        owner: Option<HouseId>,
        world: &mut dyn WorldContext,
        events: &mut EventQueue,
        targets: &[ObjectId],
    ) -> ExecOutcome {
        match self {
            TriggerExecutor::DestroyTargets => {
                for_live_targets(world, targets, |world, target| world.destroy_object(target))
            }

            TriggerExecutor::SellTargets => {
                for_live_targets(world, targets, |world, target| world.sell_building(target))
            }

            TriggerExecutor::EvacuateTargets => {
                for_live_targets(world, targets, |world, target| {
                    world.evacuate_garrison(target)
                })
            }

            TriggerExecutor::SetTargetsPowered { powered } => {
                for_live_targets(world, targets, |world, target| {
                    world.set_building_powered(target, *powered)
                })
            }

            TriggerExecutor::EnableTrigger(id) => ExecOutcome::Admin(AdminOp::Enable(*id)),
            TriggerExecutor::DisableTrigger(id) => ExecOutcome::Admin(AdminOp::Disable(*id)),
            TriggerExecutor::ForceTrigger(id) => ExecOutcome::Admin(AdminOp::Force(*id)),
            TriggerExecutor::DestroyTrigger(id) => ExecOutcome::Admin(AdminOp::Destroy(*id)),
            TriggerExecutor::DestroyTag(tag) => ExecOutcome::Admin(AdminOp::DestroyTag(*tag)),

            TriggerExecutor::SetGlobal { variable, value } => {
                ExecOutcome::Admin(AdminOp::SetGlobal(*variable, *value))
            }

            TriggerExecutor::SetLocal {
                house,
                variable,
                value,
            } => ExecOutcome::Admin(AdminOp::SetLocal(*house, *variable, *value)),

            TriggerExecutor::RevealAroundWaypoint { waypoint, radius } => {
                match world.resolve_waypoint(*waypoint) {
                    Some(cell) => {
                        world.reveal_around(owner, cell, *radius);
                        ExecOutcome::Completed
                    }
                    None => {
                        warn!(waypoint = waypoint.raw(), "reveal skipped: unknown waypoint");
                        ExecOutcome::Skipped
                    }
                }
            }

            TriggerExecutor::UnrevealAroundWaypoint { waypoint, radius } => {
                match world.resolve_waypoint(*waypoint) {
                    Some(cell) => {
                        world.unreveal_around(owner, cell, *radius);
                        ExecOutcome::Completed
                    }
                    None => {
                        warn!(waypoint = waypoint.raw(), "unreveal skipped: unknown waypoint");
                        ExecOutcome::Skipped
                    }
                }
            }

            TriggerExecutor::RevealAll => {
                world.reveal_around(owner, crate::world::CellCoord::new(0, 0), u16::MAX);
                ExecOutcome::Completed
            }

            TriggerExecutor::ResetShroud => match owner {
                Some(house) if world.house_exists(house) => {
                    world.reset_shroud(house);
                    ExecOutcome::Completed
                }
                _ => {
                    warn!("shroud reset skipped: trigger has no live owning house");
                    ExecOutcome::Skipped
                }
            },

            TriggerExecutor::SetAmbientLight {
                intensity,
                step,
                rate,
            } => {
                world.set_ambient_light(*intensity, *step, *rate);
                ExecOutcome::Completed
            }

            TriggerExecutor::SetViewportBounds {
                x,
                y,
                width,
                height,
            } => {
                world.set_viewport_bounds(*x, *y, *width, *height);
                ExecOutcome::Completed
            }

            TriggerExecutor::StartCountdown { seconds } => {
                world.control_countdown(CountdownOp::Start { seconds: *seconds });
                ExecOutcome::Completed
            }

            TriggerExecutor::StopCountdown => {
                world.control_countdown(CountdownOp::Stop);
                ExecOutcome::Completed
            }

            TriggerExecutor::SetCountdown { seconds } => {
                world.control_countdown(CountdownOp::Set { seconds: *seconds });
                ExecOutcome::Completed
            }

            TriggerExecutor::SetCountdownText(text) => {
                world.control_countdown(CountdownOp::SetText(*text));
                ExecOutcome::Completed
            }

            TriggerExecutor::PlaySound(sound) => {
                events.dispatch(ScenarioEvent::SoundQueued {
                    sound: *sound,
                    house: owner,
                });
                ExecOutcome::Completed
            }

            TriggerExecutor::PlaySpeech(speech) => {
                events.dispatch(ScenarioEvent::SpeechQueued {
                    speech: *speech,
                    house: owner,
                });
                ExecOutcome::Completed
            }

            TriggerExecutor::ShowText(text) => {
                events.dispatch(ScenarioEvent::TextQueued { text: *text });
                ExecOutcome::Completed
            }
        }
    }
}

/// Apply an effect to each live target, skipping stale ones quietly.
fn for_live_targets(
    world: &mut dyn WorldContext,
    targets: &[ObjectId],
    mut effect: impl FnMut(&mut dyn WorldContext, ObjectId),
) -> ExecOutcome {
    let mut touched = false;
    for &target in targets {
        if world.is_live(target) {
            effect(world, target);
            touched = true;
        } else {
            warn!(object = target.raw(), "target effect skipped: object is gone");
        }
    }
    if touched {
        ExecOutcome::Completed
    } else {
        ExecOutcome::Skipped
    }
}
