//! Trigger binding loader.

use std::collections::HashSet;
use std::path::Path;

use script_core::{TriggerKey, TriggerKind};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};
use crate::scripts::{AmherstScrapBox, MoonRabbit};

/// One `(kind, id) → script` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerBinding {
    pub kind: TriggerKind,
    pub id: u32,
    pub script: String,
}

impl TriggerBinding {
    pub fn new(key: TriggerKey, script: impl Into<String>) -> Self {
        Self {
            kind: key.kind,
            id: key.id,
            script: script.into(),
        }
    }

    pub fn key(&self) -> TriggerKey {
        TriggerKey::new(self.kind, self.id)
    }
}

/// Binding file structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingFile {
    pub bindings: Vec<TriggerBinding>,
}

/// Loader for trigger bindings from RON files.
pub struct BindingLoader;

impl BindingLoader {
    /// Load bindings from a RON file.
    ///
    /// A key bound twice in the same file is rejected; the registry would
    /// otherwise keep only the last entry without telling anyone.
    pub fn load(path: &Path) -> LoadResult<Vec<TriggerBinding>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load bindings {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<Vec<TriggerBinding>> {
        let file: BindingFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse bindings RON: {}", e))?;

        let mut seen = HashSet::new();
        for binding in &file.bindings {
            if !seen.insert(binding.key()) {
                anyhow::bail!("trigger {} is bound more than once", binding.key());
            }
        }

        Ok(file.bindings)
    }
}

/// Bindings for the scripts shipped with this crate.
pub fn builtin_bindings() -> Vec<TriggerBinding> {
    vec![
        TriggerBinding::new(TriggerKey::npc(MoonRabbit::NPC), "moonrabbit"),
        TriggerBinding::new(
            TriggerKey::reactor(AmherstScrapBox::REACTOR),
            "amherst_scrap_box",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn parses_bindings() {
        let bindings = BindingLoader::parse(
            r#"(bindings: [
                (kind: Npc, id: 1012112, script: "moonrabbit"),
                (kind: Reactor, id: 2000, script: "amherst_scrap_box"),
            ])"#,
        )
        .unwrap();

        assert_eq!(bindings, builtin_bindings());
    }

    #[test]
    fn rejects_duplicate_keys() {
        let err = BindingLoader::parse(
            r#"(bindings: [
                (kind: Npc, id: 1, script: "a"),
                (kind: Npc, id: 1, script: "b"),
            ])"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("npc:1"));
    }

    #[test]
    fn same_id_different_kind_is_fine() {
        let bindings = BindingLoader::parse(
            r#"(bindings: [
                (kind: Npc, id: 7, script: "a"),
                (kind: Reactor, id: 7, script: "b"),
            ])"#,
        )
        .unwrap();
        assert_eq!(bindings.len(), 2);
    }

    #[test]
    fn load_reports_path_on_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not ron").unwrap();

        let err = BindingLoader::load(file.path()).unwrap_err();
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }
}
