//! Errors a script invocation can end with.
//!
//! Failed preconditions (no party, wrong leader, wrong size) are not errors;
//! scripts answer them with dialogue. These variants describe the conversation
//! itself breaking down, which the host resolves by ending the session quietly.

use crate::dialogue::Reply;

pub type ScriptResult<T> = Result<T, ScriptError>;

/// Why the host abandoned a suspended script.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CancelReason {
    /// The player's connection went away.
    Disconnected,
    /// The player left the trigger's map while the script waited.
    MapChanged,
    /// Another of the player's scripts was already waiting on a dialogue.
    ConversationOpen,
    /// The host is shutting down.
    Shutdown,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("conversation cancelled: {0}")]
    Cancelled(CancelReason),

    #[error("{prompt} prompt cannot be answered with {reply:?}")]
    UnexpectedReply { prompt: &'static str, reply: Reply },

    #[error("menu selection {selection} is not one of the offered options")]
    SelectionOutOfRange { selection: u32 },

    #[error("drop arguments must be (min, max, chance) followed by item/quantity pairs, got {len} values")]
    MalformedDropArgs { len: usize },
}

impl ScriptError {
    /// True when the host ended the conversation rather than the script failing.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ScriptError::Cancelled(_))
    }
}
