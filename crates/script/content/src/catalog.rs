//! Name → script lookup used when resolving binding files.

use std::collections::BTreeMap;
use std::sync::Arc;

use script_core::Script;

use crate::scripts::{AmherstScrapBox, MoonRabbit};

/// Scripts addressable by their [`Script::name`].
#[derive(Clone, Default)]
pub struct ScriptCatalog {
    scripts: BTreeMap<&'static str, Arc<dyn Script>>,
}

impl ScriptCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog of every script shipped with this crate.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.register(MoonRabbit::new());
        catalog.register(AmherstScrapBox);
        catalog
    }

    /// Adds a script under its own name, replacing any script of the same name.
    pub fn register(&mut self, script: impl Script + 'static) {
        let script: Arc<dyn Script> = Arc::new(script);
        self.scripts.insert(script.name(), script);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Script>> {
        self.scripts.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.scripts.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_lists_shipped_scripts() {
        let catalog = ScriptCatalog::builtin();
        assert_eq!(
            catalog.names().collect::<Vec<_>>(),
            vec!["amherst_scrap_box", "moonrabbit"]
        );
        assert!(catalog.get("moonrabbit").is_some());
        assert!(catalog.get("missing").is_none());
    }
}
