//! Presentation request bus (spec.md §6.3): the status runtime and functor
//! executor publish typed records here instead of calling into the
//! presentation layer directly. `ddrc-core` never awaits on a sink — it
//! publishes and returns, exactly like the teacher crate's own
//! callback-free "typed request record on a bounded channel" design for
//! anything that would otherwise suspend (spec.md §9 design note).

use crate::types::{DamageType, EntityId};

/// One fact the core reports about something that just happened, for the
/// presentation layer (VFX, combat log, animation) to react to. `ddrc-core`
/// has no opinion on how these are rendered.
#[derive(Clone, Debug, PartialEq)]
pub enum PresentationEvent {
    DamageDealt { source: EntityId, target: EntityId, amount: u32, damage_type: DamageType, is_critical: bool },
    HealApplied { source: EntityId, target: EntityId, amount: u32 },
    StatusApplied { source: EntityId, target: EntityId, status_id: String },
    StatusRemoved { target: EntityId, status_id: String },
    AttackResolved { source: EntityId, target: EntityId, hit: bool, is_critical: bool },
    SaveResolved { who: EntityId, ability: String, dc: i32, success: bool },
}

/// Narrow sink the core publishes [`PresentationEvent`]s to. The
/// embedding game supplies the real implementation (an in-process
/// channel, an ECS event queue, ...); `ddrc-core` only needs something
/// that can accept an event without blocking.
pub trait EventSink {
    fn publish(&mut self, event: PresentationEvent);
}

/// A sink that discards every event — the default for call sites (tests,
/// ad-hoc queries) that don't care about presentation fan-out.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&mut self, _event: PresentationEvent) {}
}

/// A sink that records every event in arrival order, for tests that
/// assert on exactly what the core published.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<PresentationEvent>,
}

impl EventSink for RecordingSink {
    fn publish(&mut self, event: PresentationEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_preserves_order() {
        let mut sink = RecordingSink::default();
        sink.publish(PresentationEvent::HealApplied { source: EntityId(1), target: EntityId(1), amount: 4 });
        sink.publish(PresentationEvent::StatusRemoved { target: EntityId(1), status_id: "BLEEDING".into() });
        assert_eq!(sink.events.len(), 2);
        assert!(matches!(sink.events[0], PresentationEvent::HealApplied { .. }));
    }
}
