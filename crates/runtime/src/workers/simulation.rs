//! Match worker that owns the authoritative [`crate::session::MatchSession`].
//!
//! Receives requests from [`crate::MatchHandle`], runs them through the
//! session, and publishes every drained event to the [`EventBus`].

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use tactics_core::{Command, MatchEvent, MatchSnapshot, MatchState, Phase, WireMap};

use crate::api::Result;
use crate::events::EventBus;
use crate::session::{Checkpoint, MatchSession, Reply};

/// Requests that can be sent to the match worker
pub enum Request {
    /// Validate and execute one command immediately.
    Submit {
        command: Command,
        reply: oneshot::Sender<Reply>,
    },
    /// Decode a wire map, then execute it.
    SubmitWire {
        wire: WireMap,
        reply: oneshot::Sender<Reply>,
    },
    /// Queue a command on its player's FIFO.
    Enqueue {
        command: Command,
        reply: oneshot::Sender<usize>,
    },
    /// Process every queued command round-robin.
    DrainQueues { reply: oneshot::Sender<Vec<Reply>> },
    Snapshot { reply: oneshot::Sender<MatchSnapshot> },
    /// Full state clone (read-only).
    QueryState { reply: oneshot::Sender<MatchState> },
    ForcePhase {
        phase: Phase,
        reply: oneshot::Sender<()>,
    },
    ReplaceState {
        state: Box<MatchState>,
        reply: oneshot::Sender<()>,
    },
    Checkpoint {
        reply: oneshot::Sender<Result<Checkpoint>>,
    },
    Restore {
        checkpoint: Box<Checkpoint>,
        reply: oneshot::Sender<Result<()>>,
    },
    Digest { reply: oneshot::Sender<Result<String>> },
}

/// Background task that processes match requests.
pub struct MatchWorker {
    session: MatchSession,
    request_rx: mpsc::Receiver<Request>,
    event_bus: EventBus,
}

impl MatchWorker {
    pub fn new(session: MatchSession, request_rx: mpsc::Receiver<Request>, event_bus: EventBus) -> Self {
        tracing::info!(
            "MatchWorker initialized at turn {} ({}), units: {}",
            session.state().turn_number(),
            session.state().current_phase(),
            session.state().units.len()
        );

        Self {
            session,
            request_rx,
            event_bus,
        }
    }

    /// Main worker loop. Ends when every handle has been dropped.
    pub async fn run(mut self) {
        while let Some(request) = self.request_rx.recv().await {
            self.handle_request(request);
        }
        debug!("MatchWorker stopped: request channel closed");
    }

    fn handle_request(&mut self, request: Request) {
        match request {
            Request::Submit { command, reply } => {
                let stamp = self.stamp();
                let result = self.session.handle(&command);
                self.publish_reply(stamp, &result);
                if reply.send(result).is_err() {
                    debug!("Submit reply channel closed (caller dropped)");
                }
            }
            Request::SubmitWire { wire, reply } => {
                let stamp = self.stamp();
                let result = self.session.handle_wire(&wire);
                self.publish_reply(stamp, &result);
                if reply.send(result).is_err() {
                    debug!("SubmitWire reply channel closed (caller dropped)");
                }
            }
            Request::Enqueue { command, reply } => {
                self.session.enqueue(command);
                if reply.send(self.session.queued()).is_err() {
                    debug!("Enqueue reply channel closed (caller dropped)");
                }
            }
            Request::DrainQueues { reply } => {
                let mut stamp = self.stamp();
                let results = self.session.drain_queues();
                for result in &results {
                    stamp = self.publish_reply(stamp, result);
                }
                if reply.send(results).is_err() {
                    debug!("DrainQueues reply channel closed (caller dropped)");
                }
            }
            Request::Snapshot { reply } => {
                if reply.send(self.session.snapshot()).is_err() {
                    debug!("Snapshot reply channel closed (caller dropped)");
                }
            }
            Request::QueryState { reply } => {
                if reply.send(self.session.state().clone()).is_err() {
                    debug!("QueryState reply channel closed (caller dropped)");
                }
            }
            Request::ForcePhase { phase, reply } => {
                let stamp = self.stamp();
                let events = self.session.force_phase(phase);
                self.publish(stamp, events);
                if reply.send(()).is_err() {
                    debug!("ForcePhase reply channel closed (caller dropped)");
                }
            }
            Request::ReplaceState { state, reply } => {
                self.session.replace_state(*state);
                if reply.send(()).is_err() {
                    debug!("ReplaceState reply channel closed (caller dropped)");
                }
            }
            Request::Checkpoint { reply } => {
                if reply.send(self.session.checkpoint()).is_err() {
                    debug!("Checkpoint reply channel closed (caller dropped)");
                }
            }
            Request::Restore { checkpoint, reply } => {
                if reply.send(self.session.restore(&checkpoint)).is_err() {
                    debug!("Restore reply channel closed (caller dropped)");
                }
            }
            Request::Digest { reply } => {
                if reply.send(self.session.digest()).is_err() {
                    debug!("Digest reply channel closed (caller dropped)");
                }
            }
        }
    }

    /// Turn and phase before a request runs; events raised by the request
    /// are stamped forward from here.
    fn stamp(&self) -> (u32, Phase) {
        let state = self.session.state();
        (state.turn_number(), state.current_phase())
    }

    fn publish_reply(&self, stamp: (u32, Phase), reply: &Reply) -> (u32, Phase) {
        match reply {
            Reply::Accepted { events, .. } => self.publish(stamp, events.iter().cloned()),
            Reply::Rejected { .. } => stamp,
        }
    }

    fn publish(
        &self,
        (turn, phase): (u32, Phase),
        events: impl IntoIterator<Item = MatchEvent>,
    ) -> (u32, Phase) {
        self.event_bus.publish_all(turn, phase, events)
    }
}
