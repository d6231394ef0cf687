//! Authoring surface for event reaction scripts.
//!
//! `script-core` defines everything a reaction script can see or do during one
//! invocation: the [`Trigger`] that started it, read-only snapshots of the
//! player, map and party, the suspending dialogue calls and the fire-and-forget
//! [`Effect`]s. Hosts implement [`Conversation`] to supply suspension and effect
//! delivery; scripts implement [`Script`] and never touch host state directly.
pub mod dialogue;
pub mod effect;
pub mod error;
pub mod gate;
pub mod ids;
pub mod script;
pub mod trigger;
pub mod world;

pub use dialogue::{MenuOption, Prompt, Reply, YesNo, markup};
pub use effect::{DropPlacement, DropRequest, DroppedKind, Effect, ItemDrop, MesoDrop};
pub use error::{CancelReason, ScriptError, ScriptResult};
pub use gate::{GateRejection, PartyRequirement};
pub use ids::{ItemId, MapId, NpcId, PlayerId, PortalId, Position, ReactorId};
pub use script::{Conversation, Script, ScriptContext, ScriptTable};
pub use trigger::{ParseTriggerKeyError, Trigger, TriggerKey, TriggerKind};
pub use world::{LevelRange, MapView, PartyMember, PartyView, PlayerView};
