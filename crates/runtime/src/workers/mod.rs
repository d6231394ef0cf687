//! Worker tasks that back the runtime orchestration.
//!
//! The session worker owns the session table, while each accepted trigger runs
//! its script on a task of its own that talks back through a session channel.

mod channel;
mod session;

pub(crate) use session::{Command, SessionWorker};
