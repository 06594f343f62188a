//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::broadcast;

use tactics_core::{MatchEvent, Phase};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Phase and turn changes
    Phase = 0,
    /// Unit movement, damage, healing, status, abilities
    Units = 1,
    /// Zone lifecycle, resonance and void spaces
    Zones = 2,
    /// Match outcome
    Match = 3,
}

impl Topic {
    pub const ALL: [Topic; 4] = [Topic::Phase, Topic::Units, Topic::Zones, Topic::Match];

    /// Routes an engine event to its topic.
    pub fn of(event: &MatchEvent) -> Self {
        match event {
            MatchEvent::PhaseChanged { .. } | MatchEvent::TurnChanged { .. } => Topic::Phase,
            MatchEvent::UnitMoved { .. }
            | MatchEvent::MoveRejected { .. }
            | MatchEvent::UnitDamaged { .. }
            | MatchEvent::UnitHealed { .. }
            | MatchEvent::UnitDied { .. }
            | MatchEvent::StatusApplied { .. }
            | MatchEvent::StatusExpired { .. }
            | MatchEvent::AbilityUsed { .. } => Topic::Units,
            MatchEvent::ZoneCreated { .. }
            | MatchEvent::ZoneMerged { .. }
            | MatchEvent::ZoneExpired { .. }
            | MatchEvent::UnstableResonance { .. }
            | MatchEvent::VoidExpired { .. } => Topic::Zones,
            MatchEvent::MatchEnded { .. } => Topic::Match,
        }
    }
}

/// A match event stamped with the turn and phase in effect when it was raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub turn: u32,
    pub phase: Phase,
    pub payload: MatchEvent,
}

impl Event {
    pub fn topic(&self) -> Topic {
        Topic::of(&self.payload)
    }
}

/// Topic-based event bus
///
/// Channels are created up front, one per topic. Publishing never blocks:
/// a topic without subscribers simply drops the event.
#[derive(Clone)]
pub struct EventBus {
    channels: [broadcast::Sender<Event>; 4],
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Topic::ALL.map(|_| broadcast::channel(capacity).0),
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        &self.channels[topic as usize]
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Publish a drained batch, preserving order.
    ///
    /// `turn` and `phase` are the stamp in effect before the batch. The stamp
    /// then follows the batch: a `PhaseChanged` carries its destination phase
    /// and a `TurnChanged` its new turn, as does everything after them.
    /// Returns the stamp left after the last event.
    pub fn publish_all(
        &self,
        turn: u32,
        phase: Phase,
        events: impl IntoIterator<Item = MatchEvent>,
    ) -> (u32, Phase) {
        let (mut turn, mut phase) = (turn, phase);
        for payload in events {
            match &payload {
                MatchEvent::PhaseChanged { to, .. } => phase = *to,
                MatchEvent::TurnChanged { turn: next } => turn = *next,
                _ => {}
            }
            self.publish(Event {
                turn,
                phase,
                payload,
            });
        }
        (turn, phase)
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
