//! Content factory for loading bindings from a data directory.

use std::path::{Path, PathBuf};

use crate::loaders::{BindingLoader, LoadResult, TriggerBinding};

/// Content factory that loads script bindings from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// └── bindings.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const BINDINGS_FILE: &'static str = "bindings.ron";

    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory for the data directory shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// Load trigger bindings from `bindings.ron`.
    pub fn load_bindings(&self) -> LoadResult<Vec<TriggerBinding>> {
        BindingLoader::load(&self.data_dir.join(Self::BINDINGS_FILE))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::builtin_bindings;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn bundled_bindings_match_builtin() {
        let bindings = ContentFactory::bundled().load_bindings().unwrap();
        assert_eq!(bindings, builtin_bindings());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ContentFactory::new(dir.path()).load_bindings().is_err());
    }
}
