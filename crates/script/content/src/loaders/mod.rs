//! Content loaders for reading trigger bindings from files.
//!
//! Bindings are external configuration: a RON file lists which script answers
//! which NPC or reactor id. Scripts themselves are compiled in and looked up by
//! name through [`crate::ScriptCatalog`].

pub mod bindings;
pub mod factory;

pub use bindings::{BindingLoader, TriggerBinding, builtin_bindings};
pub use factory::ContentFactory;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
