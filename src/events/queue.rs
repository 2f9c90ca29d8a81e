//! Per-tick event collection and batch swapping.
//!
//! Subsystems raise events through [`EventQueue::dispatch`] at any point
//! during a tick. At the tick boundary the registry swaps the pending
//! queue for a fresh empty one, freezing the accumulated events into an
//! [`EventBatch`] that every condition evaluated that tick reads. Events
//! dispatched while executors run therefore land in the next tick's batch;
//! no condition ever observes a partially filled batch.

use serde::{Deserialize, Serialize};

use super::event::{EventKind, ScenarioEvent};

/// Collects events raised during the current tick.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventQueue {
    pending: Vec<ScenarioEvent>,
}

impl EventQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event to the current tick's pending set.
    ///
    /// Never blocks and never re-enters evaluation.
    pub fn dispatch(&mut self, event: ScenarioEvent) {
        self.pending.push(event);
    }

    /// Swap the pending events out as a frozen batch, leaving the queue
    /// empty for the next tick.
    #[must_use]
    pub fn take_batch(&mut self) -> EventBatch {
        EventBatch {
            events: std::mem::take(&mut self.pending),
        }
    }

    /// Events dispatched since the last swap (for snapshots).
    #[must_use]
    pub fn pending(&self) -> &[ScenarioEvent] {
        &self.pending
    }

    /// Rebuild a queue from saved pending events.
    #[must_use]
    pub fn from_pending(pending: Vec<ScenarioEvent>) -> Self {
        Self { pending }
    }
}

/// The frozen, ordered event set of exactly one tick.
///
/// Read-only to consumers; created and discarded by the registry each tick.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventBatch {
    events: Vec<ScenarioEvent>,
}

impl EventBatch {
    /// An empty batch.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a batch directly from events (test scaffolding).
    #[must_use]
    pub fn from_events(events: Vec<ScenarioEvent>) -> Self {
        Self { events }
    }

    /// Iterate all events in dispatch order.
    pub fn iter(&self) -> impl Iterator<Item = &ScenarioEvent> {
        self.events.iter()
    }

    /// Iterate events of one kind, in dispatch order.
    pub fn of_kind(&self, kind: EventKind) -> impl Iterator<Item = &ScenarioEvent> {
        self.events.iter().filter(move |e| e.kind() == kind)
    }

    /// Whether any event of the kind is present.
    #[must_use]
    pub fn contains_kind(&self, kind: EventKind) -> bool {
        self.events.iter().any(|e| e.kind() == kind)
    }

    /// Number of events in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the batch is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{HouseId, ObjectId};
    use crate::world::CellCoord;

    #[test]
    fn test_dispatch_and_swap() {
        let mut queue = EventQueue::new();
        queue.dispatch(ScenarioEvent::TimerExpired);
        queue.dispatch(ScenarioEvent::entered(
            ObjectId::new(1),
            HouseId::new(0),
            CellCoord::new(4, 4),
        ));

        assert_eq!(queue.pending().len(), 2);

        let batch = queue.take_batch();
        assert_eq!(batch.len(), 2);
        assert!(queue.pending().is_empty());

        // Next swap yields an empty batch.
        let next = queue.take_batch();
        assert!(next.is_empty());
    }

    #[test]
    fn test_dispatch_after_swap_lands_in_next_batch() {
        let mut queue = EventQueue::new();
        queue.dispatch(ScenarioEvent::TimerExpired);

        let first = queue.take_batch();
        queue.dispatch(ScenarioEvent::TimerExpired);

        assert_eq!(first.len(), 1);
        assert_eq!(queue.pending().len(), 1);
    }

    #[test]
    fn test_batch_preserves_order() {
        let mut queue = EventQueue::new();
        for i in 0..4 {
            queue.dispatch(ScenarioEvent::entered(
                ObjectId::new(i),
                HouseId::new(0),
                CellCoord::new(i as i32, 0),
            ));
        }

        let batch = queue.take_batch();
        let targets: Vec<_> = batch.iter().filter_map(|e| e.target()).collect();
        assert_eq!(
            targets,
            vec![ObjectId::new(0), ObjectId::new(1), ObjectId::new(2), ObjectId::new(3)]
        );
    }

    #[test]
    fn test_of_kind_filter() {
        let batch = EventBatch::from_events(vec![
            ScenarioEvent::TimerExpired,
            ScenarioEvent::entered(ObjectId::new(1), HouseId::new(0), CellCoord::new(0, 0)),
            ScenarioEvent::TimerExpired,
        ]);

        assert_eq!(batch.of_kind(EventKind::TimerExpired).count(), 2);
        assert_eq!(batch.of_kind(EventKind::CellEntered).count(), 1);
        assert!(batch.contains_kind(EventKind::TimerExpired));
        assert!(!batch.contains_kind(EventKind::CratePickedUp));
    }
}
