//! Session worker that owns every running script conversation.
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), spawns one
//! task per accepted trigger, parks suspended tasks until the player answers,
//! and publishes dialogue and session events on the [`EventBus`].

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::ops::ControlFlow;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use script_core::{
    CancelReason, MapId, MapView, PlayerId, PlayerView, Prompt, Reply, Script, ScriptContext,
    ScriptError, ScriptResult, Trigger, TriggerKey, TriggerKind,
};

use super::channel::SessionChannel;
use crate::api::{
    EffectOrigin, HostWorld, Result, RuntimeError, SessionId, SessionInfo, SessionState,
    TriggerOutcome, TriggerRegistry,
};
use crate::events::{DialogueEvent, Event, EventBus, SessionEvent, SessionOutcome};

/// Commands that can be sent to the session worker
pub(crate) enum Command {
    /// Run the script bound to `trigger` for `player`.
    Trigger {
        player: PlayerId,
        trigger: Trigger,
        reply: oneshot::Sender<Result<TriggerOutcome>>,
    },
    /// Resume the player's suspended script with `reply`.
    Respond {
        player: PlayerId,
        reply: Reply,
        ack: oneshot::Sender<Result<()>>,
    },
    /// The player's connection is gone. Acks whether a session was cancelled.
    Disconnect {
        player: PlayerId,
        ack: oneshot::Sender<bool>,
    },
    /// The player is now on `map`. Acks whether a session was cancelled.
    PlayerMoved {
        player: PlayerId,
        map: MapId,
        ack: oneshot::Sender<bool>,
    },
    /// Snapshot of active sessions, ordered by id.
    Sessions {
        reply: oneshot::Sender<Vec<SessionInfo>>,
    },
    /// Cancel everything and stop. Acks the number of cancelled sessions.
    Shutdown { ack: oneshot::Sender<usize> },
}

/// Messages from script tasks back to the worker.
pub(crate) enum Notice {
    Suspended {
        session: SessionId,
        prompt: Prompt,
        resume: oneshot::Sender<Reply>,
    },
    Finished {
        session: SessionId,
        result: ScriptResult<()>,
    },
}

enum Phase {
    Running,
    Suspended {
        prompt: Prompt,
        resume: oneshot::Sender<Reply>,
    },
}

struct ActiveSession {
    id: SessionId,
    player: PlayerId,
    trigger: Trigger,
    phase: Phase,
    task: JoinHandle<()>,
    /// Re-triggers of the same (player, trigger) that arrived while running.
    queued: VecDeque<(SessionId, Trigger)>,
}

impl ActiveSession {
    fn is_suspended(&self) -> bool {
        matches!(self.phase, Phase::Suspended { .. })
    }

    fn info(&self) -> SessionInfo {
        let state = match &self.phase {
            Phase::Running => SessionState::Running,
            Phase::Suspended { prompt, .. } => SessionState::Suspended(prompt.clone()),
        };
        SessionInfo {
            id: self.id,
            player: self.player,
            trigger: self.trigger,
            state,
        }
    }
}

/// Background task that owns the session table.
///
/// At most one session exists per (player, trigger key), and at most one
/// session per player is suspended on a prompt. Script tasks never touch the
/// table; they report through [`Notice`]s processed on this task, so every
/// state change happens in one place.
pub(crate) struct SessionWorker {
    registry: TriggerRegistry,
    world: Arc<dyn HostWorld>,
    sessions: BTreeMap<SessionId, ActiveSession>,
    by_trigger: HashMap<(PlayerId, TriggerKey), SessionId>,
    next_session: u64,
    command_rx: mpsc::Receiver<Command>,
    notice_tx: mpsc::Sender<Notice>,
    notice_rx: mpsc::Receiver<Notice>,
    event_bus: EventBus,
}

impl SessionWorker {
    pub(crate) fn new(
        registry: TriggerRegistry,
        world: Arc<dyn HostWorld>,
        command_rx: mpsc::Receiver<Command>,
        notice_buffer_size: usize,
        event_bus: EventBus,
    ) -> Self {
        let (notice_tx, notice_rx) = mpsc::channel(notice_buffer_size);
        Self {
            registry,
            world,
            sessions: BTreeMap::new(),
            by_trigger: HashMap::new(),
            next_session: 1,
            command_rx,
            notice_tx,
            notice_rx,
            event_bus,
        }
    }

    /// Main worker loop.
    ///
    /// Runs until a shutdown command arrives or every command sender is gone.
    pub(crate) async fn run(mut self) {
        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => {
                        if self.handle_command(cmd).is_break() {
                            break;
                        }
                    }
                    None => {
                        self.cancel_all(CancelReason::Shutdown);
                        break;
                    }
                },
                Some(notice) = self.notice_rx.recv() => self.handle_notice(notice),
            }
        }
        debug!(target: "script_runtime::sessions", "Session worker stopped");
    }

    fn handle_command(&mut self, cmd: Command) -> ControlFlow<()> {
        match cmd {
            Command::Trigger {
                player,
                trigger,
                reply,
            } => {
                let _ = reply.send(self.trigger(player, trigger));
            }
            Command::Respond { player, reply, ack } => {
                let _ = ack.send(self.respond(player, reply));
            }
            Command::Disconnect { player, ack } => {
                let _ = ack.send(self.disconnect(player));
            }
            Command::PlayerMoved { player, map, ack } => {
                let _ = ack.send(self.player_moved(player, map));
            }
            Command::Sessions { reply } => {
                let sessions = self.sessions.values().map(ActiveSession::info).collect();
                let _ = reply.send(sessions);
            }
            Command::Shutdown { ack } => {
                let _ = ack.send(self.cancel_all(CancelReason::Shutdown));
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn handle_notice(&mut self, notice: Notice) {
        match notice {
            Notice::Suspended {
                session,
                prompt,
                resume,
            } => self.suspend(session, prompt, resume),
            Notice::Finished { session, result } => self.finish(session, result),
        }
    }

    fn trigger(&mut self, player: PlayerId, trigger: Trigger) -> Result<TriggerOutcome> {
        let Some(script) = self.registry.get(&trigger.key).cloned() else {
            debug!(
                target: "script_runtime::sessions",
                player = %player,
                trigger = %trigger,
                "No script bound, ignoring trigger"
            );
            return Ok(TriggerOutcome::Unbound);
        };

        let same_trigger = self
            .by_trigger
            .get(&(player, trigger.key))
            .and_then(|id| self.sessions.get(id))
            .map(|active| (active.id, active.trigger, active.is_suspended()));
        if let Some((running, active, suspended)) = same_trigger {
            if suspended {
                return Err(RuntimeError::SessionBusy { player, active });
            }
            if self.world.player(player).is_none() {
                return Err(RuntimeError::UnknownPlayer(player));
            }
            let id = self.allocate_id();
            if let Some(active) = self.sessions.get_mut(&running) {
                active.queued.push_back((id, trigger));
            }
            debug!(
                target: "script_runtime::sessions",
                session = %id,
                running = %running,
                player = %player,
                trigger = %trigger,
                "Trigger queued behind running session"
            );
            return Ok(TriggerOutcome::Queued(id));
        }

        // NPC conversations are exclusive; reactors may still fire.
        if trigger.key.kind == TriggerKind::Npc {
            if let Some(open) = self.suspended_session(player) {
                return Err(RuntimeError::SessionBusy {
                    player,
                    active: open.trigger,
                });
            }
        }

        let view = self
            .world
            .player(player)
            .ok_or(RuntimeError::UnknownPlayer(player))?;
        let id = self.allocate_id();
        self.spawn(id, view, trigger, script, VecDeque::new());
        Ok(TriggerOutcome::Started(id))
    }

    fn allocate_id(&mut self) -> SessionId {
        let id = SessionId(self.next_session);
        self.next_session += 1;
        id
    }

    fn spawn(
        &mut self,
        id: SessionId,
        view: PlayerView,
        trigger: Trigger,
        script: Arc<dyn Script>,
        queued: VecDeque<(SessionId, Trigger)>,
    ) {
        let player = view.id;
        let map = self
            .world
            .map(trigger.map)
            .unwrap_or_else(|| MapView::new(trigger.map));
        let party = self.world.party_of(player);

        info!(
            target: "script_runtime::sessions",
            session = %id,
            player = %player,
            trigger = %trigger,
            script = script.name(),
            "Session started"
        );
        // Published before the task exists so it precedes any effect event.
        self.event_bus.publish(Event::Session(SessionEvent::Started {
            session: id,
            player,
            trigger,
        }));

        let channel = SessionChannel::new(
            id,
            EffectOrigin { player, trigger },
            self.notice_tx.clone(),
            Arc::clone(&self.world),
            self.event_bus.clone(),
        );
        let mut ctx = ScriptContext::new(trigger, view, map, party, Box::new(channel));
        let notice_tx = self.notice_tx.clone();
        let task = tokio::spawn(async move {
            let result = script.invoke(&mut ctx).await;
            let _ = notice_tx
                .send(Notice::Finished {
                    session: id,
                    result,
                })
                .await;
        });

        self.by_trigger.insert((player, trigger.key), id);
        self.sessions.insert(
            id,
            ActiveSession {
                id,
                player,
                trigger,
                phase: Phase::Running,
                task,
                queued,
            },
        );
    }

    /// Starts the next queued re-trigger once its predecessor has ended.
    fn start_queued(&mut self, player: PlayerId, mut queued: VecDeque<(SessionId, Trigger)>) {
        let Some((id, trigger)) = queued.pop_front() else {
            return;
        };
        let script = self.registry.get(&trigger.key).cloned();
        let view = self.world.player(player);
        let (Some(script), Some(view)) = (script, view) else {
            debug!(
                target: "script_runtime::sessions",
                session = %id,
                player = %player,
                dropped = queued.len() + 1,
                "Dropping queued triggers"
            );
            return;
        };
        self.spawn(id, view, trigger, script, queued);
    }

    fn suspended_session(&self, player: PlayerId) -> Option<&ActiveSession> {
        self.sessions
            .values()
            .find(|active| active.player == player && active.is_suspended())
    }

    fn respond(&mut self, player: PlayerId, reply: Reply) -> Result<()> {
        let Some(active) = self
            .sessions
            .values_mut()
            .find(|active| active.player == player && active.is_suspended())
        else {
            let any = self.sessions.values().any(|active| active.player == player);
            return Err(if any {
                RuntimeError::NotAwaitingInput(player)
            } else {
                RuntimeError::NoActiveSession(player)
            });
        };

        match std::mem::replace(&mut active.phase, Phase::Running) {
            Phase::Running => Err(RuntimeError::NotAwaitingInput(player)),
            Phase::Suspended { prompt, resume } if !prompt.accepts(&reply) => {
                let name = prompt.name();
                active.phase = Phase::Suspended { prompt, resume };
                Err(RuntimeError::ReplyMismatch {
                    player,
                    prompt: name,
                    reply,
                })
            }
            Phase::Suspended { resume, .. } => {
                debug!(
                    target: "script_runtime::sessions",
                    session = %active.id,
                    player = %player,
                    reply = ?reply,
                    "Resuming session"
                );
                if resume.send(reply).is_err() {
                    // The task already ended; its finished notice cleans up.
                    trace!(
                        target: "script_runtime::sessions",
                        session = %active.id,
                        "Resume target already gone"
                    );
                }
                Ok(())
            }
        }
    }

    fn disconnect(&mut self, player: PlayerId) -> bool {
        let ids: Vec<SessionId> = self
            .sessions
            .values()
            .filter(|active| active.player == player)
            .map(|active| active.id)
            .collect();
        ids.into_iter()
            .filter(|id| self.cancel(*id, CancelReason::Disconnected))
            .count()
            > 0
    }

    fn player_moved(&mut self, player: PlayerId, map: MapId) -> bool {
        let left = self
            .suspended_session(player)
            .filter(|active| active.trigger.map != map)
            .map(|active| active.id);
        left.is_some_and(|id| self.cancel(id, CancelReason::MapChanged))
    }

    fn suspend(&mut self, session: SessionId, prompt: Prompt, resume: oneshot::Sender<Reply>) {
        let Some(player) = self.sessions.get(&session).map(|active| active.player) else {
            trace!(
                target: "script_runtime::sessions",
                session = %session,
                "Dropping prompt from stale session"
            );
            return;
        };

        if let Some(open) = self.suspended_session(player).map(|active| active.id) {
            debug!(
                target: "script_runtime::sessions",
                session = %session,
                open = %open,
                player = %player,
                "Player already has a dialogue open"
            );
            self.cancel(session, CancelReason::ConversationOpen);
            return;
        }

        let Some(active) = self.sessions.get_mut(&session) else {
            return;
        };
        debug!(
            target: "script_runtime::sessions",
            session = %session,
            player = %player,
            prompt = prompt.name(),
            "Session suspended"
        );
        let trigger = active.trigger;
        active.phase = Phase::Suspended {
            prompt: prompt.clone(),
            resume,
        };
        self.event_bus.publish(Event::Dialogue(DialogueEvent::Prompted {
            session,
            player,
            trigger,
            prompt,
        }));
    }

    fn finish(&mut self, session: SessionId, result: ScriptResult<()>) {
        let Some(active) = self.remove(session) else {
            trace!(
                target: "script_runtime::sessions",
                session = %session,
                "Ignoring completion of stale session"
            );
            return;
        };

        let outcome = match result {
            Ok(()) => SessionOutcome::Completed,
            Err(ScriptError::Cancelled(reason)) => SessionOutcome::Cancelled(reason),
            Err(error) => {
                warn!(
                    target: "script_runtime::sessions",
                    session = %session,
                    player = %active.player,
                    trigger = %active.trigger,
                    error = %error,
                    "Script failed"
                );
                SessionOutcome::Failed(error.to_string())
            }
        };
        self.end(session, active.player, active.trigger, outcome);
        self.start_queued(active.player, active.queued);
    }

    fn remove(&mut self, session: SessionId) -> Option<ActiveSession> {
        let active = self.sessions.remove(&session)?;
        let key = (active.player, active.trigger.key);
        if self.by_trigger.get(&key) == Some(&session) {
            self.by_trigger.remove(&key);
        }
        Some(active)
    }

    /// Aborts the session and drops anything queued behind it.
    fn cancel(&mut self, session: SessionId, reason: CancelReason) -> bool {
        let Some(active) = self.remove(session) else {
            return false;
        };
        active.task.abort();
        self.end(
            active.id,
            active.player,
            active.trigger,
            SessionOutcome::Cancelled(reason),
        );
        true
    }

    fn cancel_all(&mut self, reason: CancelReason) -> usize {
        let ids: Vec<SessionId> = self.sessions.keys().copied().collect();
        ids.into_iter()
            .filter(|id| self.cancel(*id, reason))
            .count()
    }

    fn end(&self, session: SessionId, player: PlayerId, trigger: Trigger, outcome: SessionOutcome) {
        info!(
            target: "script_runtime::sessions",
            session = %session,
            player = %player,
            trigger = %trigger,
            outcome = ?outcome,
            "Session ended"
        );
        self.event_bus.publish(Event::Session(SessionEvent::Ended {
            session,
            player,
            trigger,
            outcome,
        }));
    }
}
