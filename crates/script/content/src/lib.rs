//! Data-driven content: reaction scripts and their trigger bindings.
//!
//! This crate houses the game's reaction scripts and the loaders that bind them
//! to NPC and reactor ids:
//! - [`scripts`] holds one module per script
//! - [`catalog`] maps script names to instances
//! - `loaders` reads `bindings.ron` files (behind the `loaders` feature)
//!
//! Content is consumed by the runtime's trigger registry and never holds
//! host state.

pub mod catalog;
pub mod scripts;

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(test)]
mod testing;

pub use catalog::ScriptCatalog;
pub use scripts::{AmherstScrapBox, MoonRabbit};

#[cfg(feature = "loaders")]
pub use loaders::{BindingLoader, ContentFactory, TriggerBinding, builtin_bindings};
