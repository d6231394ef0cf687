//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! dispatching triggers, answering prompts or streaming events from specific
//! topics.
use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};

use script_core::{MapId, PlayerId, Reply, Trigger};

use super::errors::{Result, RuntimeError};
use super::session::{SessionInfo, TriggerOutcome};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Dispatch a trigger fired by `player`.
    ///
    /// Returns [`TriggerOutcome::Unbound`] when no script is bound to the
    /// trigger, and [`TriggerOutcome::Queued`] when the same trigger is still
    /// running for the player. Fails with `SessionBusy` when that session waits
    /// on a prompt, or when an NPC is triggered while another dialogue is open.
    pub async fn trigger(&self, player: PlayerId, trigger: Trigger) -> Result<TriggerOutcome> {
        self.request(|reply| Command::Trigger {
            player,
            trigger,
            reply,
        })
        .await?
    }

    /// Answer the prompt the player's script is suspended on.
    pub async fn respond(&self, player: PlayerId, reply: Reply) -> Result<()> {
        self.request(|ack| Command::Respond { player, reply, ack })
            .await?
    }

    /// Cancel all of the player's sessions, whatever their state.
    ///
    /// Returns true if any session was cancelled.
    pub async fn disconnect(&self, player: PlayerId) -> Result<bool> {
        self.request(|ack| Command::Disconnect { player, ack }).await
    }

    /// Report that the player is now on `map`.
    ///
    /// A session suspended on a prompt is cancelled when `map` differs from
    /// the map its trigger fired on. Returns true if a session was cancelled.
    pub async fn player_moved(&self, player: PlayerId, map: MapId) -> Result<bool> {
        self.request(|ack| Command::PlayerMoved { player, map, ack })
            .await
    }

    /// Snapshot of active sessions, ordered by id.
    pub async fn sessions(&self) -> Result<Vec<SessionInfo>> {
        self.request(|reply| Command::Sessions { reply }).await
    }

    pub(crate) async fn shutdown(&self) -> Result<usize> {
        self.request(|ack| Command::Shutdown { ack }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Dialogue` - Prompts shown to players
    /// - `Topic::Effect` - Effects applied on behalf of scripts
    /// - `Topic::Session` - Session start and end
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use script_runtime::Topic;
    ///
    /// let mut dialogue_rx = handle.subscribe(Topic::Dialogue);
    /// while let Ok(event) = dialogue_rx.recv().await {
    ///     // Render the prompt
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    ///
    /// Returns a map of topic to receiver for each requested topic.
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }
}
