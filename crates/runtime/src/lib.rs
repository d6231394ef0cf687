//! Host runtime for event reaction scripts.
//!
//! This crate wires the trigger registry, host world access and the session
//! worker into a cohesive runtime API. Consumers embed [`Runtime`] to dispatch
//! NPC and reactor triggers, feed player replies back into suspended scripts
//! and subscribe to what the scripts say and do through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for dialogue, effects and sessions
//! - [`oracle`] provides an in-memory [`HostWorld`] for tools and tests
//! - `workers` keeps the session worker and script tasks internal to the crate
pub mod api;
pub mod events;
pub mod oracle;
pub mod runtime;

mod workers;

pub use api::{
    EffectOrigin, HostWorld, Result, RuntimeError, RuntimeHandle, SessionId, SessionInfo,
    SessionState, TriggerOutcome, TriggerRegistry,
};
pub use events::{DialogueEvent, EffectEvent, Event, EventBus, SessionEvent, SessionOutcome, Topic};
pub use oracle::InMemoryWorld;
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
