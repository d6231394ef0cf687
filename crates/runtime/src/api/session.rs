//! Session identity and status as seen by runtime clients.
use std::fmt;

use serde::{Deserialize, Serialize};

use script_core::{PlayerId, Prompt, Trigger};

/// Identifier of one script invocation, unique for the runtime's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session {}", self.0)
    }
}

/// Result of dispatching a trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// A script was bound and is now running.
    Started(SessionId),
    /// The same trigger is still running for this player; the script starts
    /// under this id once that session ends.
    Queued(SessionId),
    /// Nothing is bound to the trigger; the event was ignored.
    Unbound,
}

impl TriggerOutcome {
    pub fn session(&self) -> Option<SessionId> {
        match self {
            TriggerOutcome::Started(id) | TriggerOutcome::Queued(id) => Some(*id),
            TriggerOutcome::Unbound => None,
        }
    }
}

/// The two states a script task can be in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Running,
    /// Parked until the player answers `prompt`.
    Suspended(Prompt),
}

/// Snapshot of an active session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: SessionId,
    pub player: PlayerId,
    pub trigger: Trigger,
    pub state: SessionState,
}
