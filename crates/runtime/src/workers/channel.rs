//! Conversation endpoint handed to each script task.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use script_core::{CancelReason, Conversation, Effect, Prompt, Reply, ScriptError, ScriptResult};

use super::session::Notice;
use crate::api::{EffectOrigin, HostWorld, SessionId};
use crate::events::{EffectEvent, Event, EventBus};

/// Bridges a script task to the session worker.
///
/// Prompts park the task on a oneshot until the worker forwards a reply.
/// Effects are applied to the host world directly from the task.
pub(crate) struct SessionChannel {
    session: SessionId,
    origin: EffectOrigin,
    notice_tx: mpsc::Sender<Notice>,
    world: Arc<dyn HostWorld>,
    event_bus: EventBus,
}

impl SessionChannel {
    pub(crate) fn new(
        session: SessionId,
        origin: EffectOrigin,
        notice_tx: mpsc::Sender<Notice>,
        world: Arc<dyn HostWorld>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            session,
            origin,
            notice_tx,
            world,
            event_bus,
        }
    }
}

#[async_trait]
impl Conversation for SessionChannel {
    async fn prompt(&mut self, prompt: Prompt) -> ScriptResult<Reply> {
        let (resume_tx, resume_rx) = oneshot::channel();
        self.notice_tx
            .send(Notice::Suspended {
                session: self.session,
                prompt,
                resume: resume_tx,
            })
            .await
            .map_err(|_| ScriptError::Cancelled(CancelReason::Shutdown))?;

        // The worker drops the sender when it discards the session.
        resume_rx
            .await
            .map_err(|_| ScriptError::Cancelled(CancelReason::Shutdown))
    }

    fn emit(&mut self, effect: Effect) {
        debug!(
            target: "script_runtime::sessions",
            session = %self.session,
            player = %self.origin.player,
            effect = ?effect,
            "Applying effect"
        );
        self.world.apply(&self.origin, &effect);
        self.event_bus.publish(Event::Effect(EffectEvent {
            session: self.session,
            player: self.origin.player,
            trigger: self.origin.trigger,
            effect,
        }));
    }
}
