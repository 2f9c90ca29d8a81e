//! Scenario event types.
//!
//! Events represent things that happened during a simulation tick. They are
//! produced by combat, movement, construction and production subsystems and
//! consumed by trigger conditions; the engine itself only raises the
//! presentation-signal kinds.
//!
//! Each event is an immutable tagged record carrying exactly the fields its
//! kind needs. Events have no identity beyond their fields and live only as
//! long as the tick's batch.

use serde::{Deserialize, Serialize};

use crate::core::{HouseId, ObjectId, ObjectKind, ObjectTypeId, SoundId, SpeechId, TextId};
use crate::world::CellCoord;

/// Something that happened during a tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioEvent {
    /// An object was removed from the simulation by damage.
    ObjectDestroyed {
        target: ObjectId,
        /// Owner of the destroyed object. Carried on the event because the
        /// object can no longer be queried once it is gone.
        target_house: Option<HouseId>,
        target_kind: Option<ObjectKind>,
        attacker: Option<ObjectId>,
        attacker_house: Option<HouseId>,
        /// Splash damage, crushing and similar side effects.
        incidental: bool,
    },

    /// An object took damage but survived.
    ObjectAttacked {
        target: ObjectId,
        attacker: Option<ObjectId>,
        attacker_house: Option<HouseId>,
        damage: i32,
        previous_health: i32,
        current_health: i32,
        incidental: bool,
    },

    /// An object entered a map cell.
    CellEntered {
        object: ObjectId,
        house: HouseId,
        cell: CellCoord,
        /// Arrival by chronoshift rather than ordinary movement.
        is_chronoshift: bool,
    },

    /// An object picked up a crate.
    CratePickedUp {
        object: ObjectId,
        house: HouseId,
        cell: CellCoord,
    },

    /// The mission countdown timer reached zero.
    TimerExpired,

    /// A house finished producing an object.
    ProductionCompleted {
        house: HouseId,
        object_type: ObjectTypeId,
        object: ObjectId,
    },

    /// A unit deployed or morphed in place.
    ObjectDeployed {
        object: ObjectId,
        house: HouseId,
        /// Facing at the moment of deployment, 0-7 clockwise from north.
        direction: u8,
    },

    /// A sound effect was queued for the presentation layer.
    SoundQueued {
        sound: SoundId,
        house: Option<HouseId>,
    },

    /// A speech line was queued for the presentation layer.
    SpeechQueued {
        speech: SpeechId,
        house: Option<HouseId>,
    },

    /// On-screen text was queued for the presentation layer.
    TextQueued { text: TextId },
}

/// Fieldless discriminant of [`ScenarioEvent`], for batch filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    ObjectDestroyed,
    ObjectAttacked,
    CellEntered,
    CratePickedUp,
    TimerExpired,
    ProductionCompleted,
    ObjectDeployed,
    SoundQueued,
    SpeechQueued,
    TextQueued,
}

impl ScenarioEvent {
    /// The kind tag of this event.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            ScenarioEvent::ObjectDestroyed { .. } => EventKind::ObjectDestroyed,
            ScenarioEvent::ObjectAttacked { .. } => EventKind::ObjectAttacked,
            ScenarioEvent::CellEntered { .. } => EventKind::CellEntered,
            ScenarioEvent::CratePickedUp { .. } => EventKind::CratePickedUp,
            ScenarioEvent::TimerExpired => EventKind::TimerExpired,
            ScenarioEvent::ProductionCompleted { .. } => EventKind::ProductionCompleted,
            ScenarioEvent::ObjectDeployed { .. } => EventKind::ObjectDeployed,
            ScenarioEvent::SoundQueued { .. } => EventKind::SoundQueued,
            ScenarioEvent::SpeechQueued { .. } => EventKind::SpeechQueued,
            ScenarioEvent::TextQueued { .. } => EventKind::TextQueued,
        }
    }

    /// The object this event is directed at, if any.
    #[must_use]
    pub fn target(&self) -> Option<ObjectId> {
        match self {
            ScenarioEvent::ObjectDestroyed { target, .. }
            | ScenarioEvent::ObjectAttacked { target, .. } => Some(*target),
            ScenarioEvent::CellEntered { object, .. }
            | ScenarioEvent::CratePickedUp { object, .. }
            | ScenarioEvent::ObjectDeployed { object, .. } => Some(*object),
            ScenarioEvent::ProductionCompleted { object, .. } => Some(*object),
            _ => None,
        }
    }

    /// The house that caused this event, if any.
    #[must_use]
    pub fn source_house(&self) -> Option<HouseId> {
        match self {
            ScenarioEvent::ObjectDestroyed { attacker_house, .. }
            | ScenarioEvent::ObjectAttacked { attacker_house, .. } => *attacker_house,
            ScenarioEvent::CellEntered { house, .. }
            | ScenarioEvent::CratePickedUp { house, .. }
            | ScenarioEvent::ObjectDeployed { house, .. }
            | ScenarioEvent::ProductionCompleted { house, .. } => Some(*house),
            _ => None,
        }
    }
}

/// Constructors for common event shapes.
impl ScenarioEvent {
    /// A deliberate (non-incidental) kill.
    pub fn destroyed(
        target: ObjectId,
        target_house: HouseId,
        target_kind: ObjectKind,
        attacker: ObjectId,
        attacker_house: HouseId,
    ) -> Self {
        Self::ObjectDestroyed {
            target,
            target_house: Some(target_house),
            target_kind: Some(target_kind),
            attacker: Some(attacker),
            attacker_house: Some(attacker_house),
            incidental: false,
        }
    }

    /// A deliberate attack that the target survived.
    pub fn attacked(
        target: ObjectId,
        attacker: ObjectId,
        attacker_house: HouseId,
        damage: i32,
        previous_health: i32,
    ) -> Self {
        Self::ObjectAttacked {
            target,
            attacker: Some(attacker),
            attacker_house: Some(attacker_house),
            damage,
            previous_health,
            current_health: previous_health - damage,
            incidental: false,
        }
    }

    /// An ordinary (non-chronoshift) cell entry.
    pub fn entered(object: ObjectId, house: HouseId, cell: CellCoord) -> Self {
        Self::CellEntered {
            object,
            house,
            cell,
            is_chronoshift: false,
        }
    }
}
