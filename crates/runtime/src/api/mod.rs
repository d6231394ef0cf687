//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration, workers, or infrastructure.

pub mod errors;
pub mod handle;
pub mod registry;
pub mod session;
pub mod world;

pub use errors::{Result, RuntimeError};
pub use handle::RuntimeHandle;
pub use registry::TriggerRegistry;
pub use session::{SessionId, SessionInfo, SessionState, TriggerOutcome};
pub use world::{EffectOrigin, HostWorld};
