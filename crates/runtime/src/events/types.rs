//! Event payloads published by the session worker and script tasks.

use serde::{Deserialize, Serialize};

use script_core::{CancelReason, Effect, PlayerId, Prompt, Trigger};

use crate::api::SessionId;

/// Dialogue shown to a player; the session is now suspended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogueEvent {
    Prompted {
        session: SessionId,
        player: PlayerId,
        trigger: Trigger,
        prompt: Prompt,
    },
}

impl DialogueEvent {
    pub fn player(&self) -> PlayerId {
        match self {
            DialogueEvent::Prompted { player, .. } => *player,
        }
    }
}

/// An effect a script requested, after the host applied it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectEvent {
    pub session: SessionId,
    pub player: PlayerId,
    pub trigger: Trigger,
    pub effect: Effect,
}

/// How a session ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionOutcome {
    /// The script ran off the end of its branch.
    Completed,
    /// The host abandoned the session.
    Cancelled(CancelReason),
    /// The script returned an error; the player sees nothing further.
    Failed(String),
}

/// Session lifecycle notifications.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    Started {
        session: SessionId,
        player: PlayerId,
        trigger: Trigger,
    },
    Ended {
        session: SessionId,
        player: PlayerId,
        trigger: Trigger,
        outcome: SessionOutcome,
    },
}

impl SessionEvent {
    pub fn player(&self) -> PlayerId {
        match self {
            SessionEvent::Started { player, .. } | SessionEvent::Ended { player, .. } => *player,
        }
    }

    pub fn session(&self) -> SessionId {
        match self {
            SessionEvent::Started { session, .. } | SessionEvent::Ended { session, .. } => {
                *session
            }
        }
    }
}
