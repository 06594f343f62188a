//! Cloneable façade for issuing requests to the match worker.
//!
//! [`MatchHandle`] hides channel plumbing and offers async helpers for
//! submitting commands, inspecting state, and streaming events from
//! specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use tactics_core::{Command, MatchSnapshot, MatchState, Phase, WireMap};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::session::{Checkpoint, Reply};
use crate::workers::Request;

/// Client-facing handle to interact with a running match
#[derive(Clone)]
pub struct MatchHandle {
    request_tx: mpsc::Sender<Request>,
    event_bus: EventBus,
}

impl MatchHandle {
    pub(crate) fn new(request_tx: mpsc::Sender<Request>, event_bus: EventBus) -> Self {
        Self {
            request_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Request) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.request_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Validate and execute a command against the live state.
    pub async fn submit(&self, command: Command) -> Result<Reply> {
        self.request(|reply| Request::Submit { command, reply }).await
    }

    /// Decode and execute a flat wire map.
    pub async fn submit_wire(&self, wire: WireMap) -> Result<Reply> {
        self.request(|reply| Request::SubmitWire { wire, reply }).await
    }

    /// Queue a command on its player's FIFO. Returns the total queued.
    pub async fn enqueue(&self, command: Command) -> Result<usize> {
        self.request(|reply| Request::Enqueue { command, reply }).await
    }

    /// Process all queued commands, alternating between players.
    pub async fn drain_queues(&self) -> Result<Vec<Reply>> {
        self.request(|reply| Request::DrainQueues { reply }).await
    }

    pub async fn snapshot(&self) -> Result<MatchSnapshot> {
        self.request(|reply| Request::Snapshot { reply }).await
    }

    /// Query the full match state (read-only clone)
    pub async fn query_state(&self) -> Result<MatchState> {
        self.request(|reply| Request::QueryState { reply }).await
    }

    /// Jump straight to `phase`, discarding pending moves.
    pub async fn force_phase(&self, phase: Phase) -> Result<()> {
        self.request(|reply| Request::ForcePhase { phase, reply })
            .await
    }

    /// Overwrite the authoritative state (desync recovery).
    pub async fn replace_state(&self, state: MatchState) -> Result<()> {
        self.request(|reply| Request::ReplaceState {
            state: Box::new(state),
            reply,
        })
        .await
    }

    pub async fn checkpoint(&self) -> Result<Checkpoint> {
        self.request(|reply| Request::Checkpoint { reply }).await?
    }

    pub async fn restore(&self, checkpoint: Checkpoint) -> Result<()> {
        self.request(|reply| Request::Restore {
            checkpoint: Box::new(checkpoint),
            reply,
        })
        .await?
    }

    /// SHA-256 digest of the live state, for comparing with peers.
    pub async fn digest(&self) -> Result<String> {
        self.request(|reply| Request::Digest { reply }).await?
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Phase` - phase and turn changes
    /// - `Topic::Units` - movement, damage, healing, statuses, ability use
    /// - `Topic::Zones` - zone lifecycle, resonance, void spaces
    /// - `Topic::Match` - match outcome
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
