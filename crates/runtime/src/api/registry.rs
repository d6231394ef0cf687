//! Trigger registry mapping NPC and reactor ids to scripts.
//!
//! The [`TriggerRegistry`] holds at most one script per [`TriggerKey`].
//! Registering a key twice keeps the last script and logs the replacement.
//! A trigger with no registered script is a no-op for the runtime.

use std::collections::HashMap;
use std::sync::Arc;

use script_content::{ScriptCatalog, TriggerBinding, builtin_bindings};
use script_core::{Script, TriggerKey};
use tracing::{debug, warn};

use super::{Result, RuntimeError};

#[derive(Clone, Default)]
pub struct TriggerRegistry {
    scripts: HashMap<TriggerKey, Arc<dyn Script>>,
}

impl TriggerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves `bindings` against `catalog`.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::UnknownScript` for the first binding that names a
    /// script the catalog does not have.
    pub fn from_bindings(bindings: &[TriggerBinding], catalog: &ScriptCatalog) -> Result<Self> {
        let mut registry = Self::new();
        for binding in bindings {
            let key = binding.key();
            let script = catalog
                .get(&binding.script)
                .ok_or_else(|| RuntimeError::UnknownScript {
                    key,
                    script: binding.script.clone(),
                })?;
            registry.register_shared(key, script);
        }
        Ok(registry)
    }

    /// Registry for the scripts and bindings shipped with `script-content`.
    pub fn builtin() -> Result<Self> {
        Self::from_bindings(&builtin_bindings(), &ScriptCatalog::builtin())
    }

    /// Binds `script` to `key`. Returns the script it replaced, if any.
    pub fn register(
        &mut self,
        key: TriggerKey,
        script: impl Script + 'static,
    ) -> Option<Arc<dyn Script>> {
        self.register_shared(key, Arc::new(script))
    }

    /// Binds an already shared script to `key`. Returns the script it replaced, if any.
    pub fn register_shared(
        &mut self,
        key: TriggerKey,
        script: Arc<dyn Script>,
    ) -> Option<Arc<dyn Script>> {
        debug!(
            target: "script_runtime::registry",
            trigger = %key,
            script = script.name(),
            "Registered script"
        );
        let previous = self.scripts.insert(key, script);
        if let Some(previous) = &previous {
            warn!(
                target: "script_runtime::registry",
                trigger = %key,
                replaced = previous.name(),
                "Trigger already bound, keeping the latest script"
            );
        }
        previous
    }

    /// Finds the script bound to `key`.
    pub fn get(&self, key: &TriggerKey) -> Option<&Arc<dyn Script>> {
        self.scripts.get(key)
    }

    pub fn contains(&self, key: &TriggerKey) -> bool {
        self.scripts.contains_key(key)
    }

    /// Returns the number of bound triggers.
    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    /// Returns true if no triggers are bound.
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    /// Returns an iterator over bound trigger keys and script names (for debugging).
    pub fn bindings(&self) -> impl Iterator<Item = (TriggerKey, &'static str)> + '_ {
        self.scripts.iter().map(|(key, script)| (*key, script.name()))
    }

    pub fn keys(&self) -> impl Iterator<Item = TriggerKey> + '_ {
        self.scripts.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use script_content::{AmherstScrapBox, MoonRabbit};
    use script_core::{NpcId, ReactorId, ScriptContext, ScriptResult, TriggerKind};

    use super::*;

    struct Silent(&'static str);

    #[async_trait]
    impl Script for Silent {
        fn name(&self) -> &'static str {
            self.0
        }

        async fn invoke(&self, _ctx: &mut ScriptContext) -> ScriptResult<()> {
            Ok(())
        }
    }

    #[test]
    fn builtin_binds_both_scripts() {
        let registry = TriggerRegistry::builtin().unwrap();
        assert_eq!(registry.len(), 2);

        let npc = registry.get(&TriggerKey::npc(MoonRabbit::NPC)).unwrap();
        assert_eq!(npc.name(), "moonrabbit");
        let reactor = registry
            .get(&TriggerKey::reactor(AmherstScrapBox::REACTOR))
            .unwrap();
        assert_eq!(reactor.name(), "amherst_scrap_box");
    }

    #[test]
    fn kind_is_part_of_the_key() {
        let registry = TriggerRegistry::builtin().unwrap();
        assert!(!registry.contains(&TriggerKey::reactor(ReactorId(MoonRabbit::NPC.0))));
        assert!(!registry.contains(&TriggerKey::npc(NpcId(AmherstScrapBox::REACTOR.0))));
    }

    #[test]
    fn last_registration_wins() {
        let key = TriggerKey::new(TriggerKind::Npc, 9);
        let mut registry = TriggerRegistry::new();

        assert!(registry.register(key, Silent("first")).is_none());
        let replaced = registry.register(key, Silent("second")).unwrap();

        assert_eq!(replaced.name(), "first");
        assert_eq!(registry.get(&key).unwrap().name(), "second");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unknown_script_name_is_rejected() {
        let bindings = vec![TriggerBinding::new(
            TriggerKey::new(TriggerKind::Reactor, 1),
            "nope",
        )];
        let err = TriggerRegistry::from_bindings(&bindings, &ScriptCatalog::builtin())
            .err()
            .unwrap();
        assert!(matches!(err, RuntimeError::UnknownScript { script, .. } if script == "nope"));
    }
}
