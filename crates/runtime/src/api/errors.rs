//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, binding resolution and session
//! bookkeeping so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use script_core::{PlayerId, Reply, Trigger, TriggerKey};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("session worker command channel closed")]
    CommandChannelClosed,

    #[error("session worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("session worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires a host world to be configured before building")]
    MissingWorld,

    #[error("trigger {key} is bound to unknown script '{script}'")]
    UnknownScript { key: TriggerKey, script: String },

    #[error("{0} is not known to the host world")]
    UnknownPlayer(PlayerId),

    #[error("{player} is already in a conversation started by {active}")]
    SessionBusy { player: PlayerId, active: Trigger },

    #[error("{0} has no active conversation")]
    NoActiveSession(PlayerId),

    #[error("{0} is not waiting for input")]
    NotAwaitingInput(PlayerId),

    #[error("{reply:?} does not answer the pending {prompt} prompt of {player}")]
    ReplyMismatch {
        player: PlayerId,
        prompt: &'static str,
        reply: Reply,
    },
}
