//! Host configuration structures and loaders.
use std::env;
use std::path::PathBuf;

use script_runtime::RuntimeConfig;

/// Configuration required to bootstrap the console host.
#[derive(Clone, Debug, Default)]
pub struct HostConfig {
    pub runtime: RuntimeConfig,
    /// Directory holding `bindings.ron`; the built-in bindings are used when unset.
    pub data_dir: Option<PathBuf>,
    /// Directory for the log file; logs only go to stderr when unset.
    pub log_dir: Option<PathBuf>,
    pub console: ConsoleConfig,
}

impl HostConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SCRIPT_DATA_DIR` - Directory containing `bindings.ron` (default: built-in bindings)
    /// - `SCRIPT_LOG_DIR` - Directory for `script-host.log` (default: stderr only)
    /// - `SCRIPT_COMMAND_BUFFER` - Runtime command queue size (default: 32)
    /// - `SCRIPT_EVENT_BUFFER` - Event bus capacity per topic (default: 100)
    /// - `SCRIPT_PLAYER_LEVEL` - Level of the console player and party (default: 30)
    /// - `SCRIPT_PARTY_SIZE` - Party formed at startup, leader included (default: none)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(capacity) = read_env::<usize>(&lookup, "SCRIPT_COMMAND_BUFFER") {
            config.runtime.command_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>(&lookup, "SCRIPT_EVENT_BUFFER") {
            config.runtime.event_buffer_size = capacity.max(1);
        }

        config.data_dir = lookup("SCRIPT_DATA_DIR").map(PathBuf::from);
        config.log_dir = lookup("SCRIPT_LOG_DIR").map(PathBuf::from);

        if let Some(level) = read_env::<u8>(&lookup, "SCRIPT_PLAYER_LEVEL") {
            config.console.player_level = level.max(1);
        }
        config.console.party_size = read_env::<usize>(&lookup, "SCRIPT_PARTY_SIZE");

        config
    }
}

#[derive(Clone, Debug)]
pub struct ConsoleConfig {
    pub player_level: u8,
    pub party_size: Option<usize>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            player_level: 30,
            party_size: None,
        }
    }
}

fn read_env<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> HostConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        HostConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config_from(&[]);
        assert_eq!(config.runtime.command_buffer_size, 32);
        assert_eq!(config.runtime.event_buffer_size, 100);
        assert_eq!(config.console.player_level, 30);
        assert!(config.data_dir.is_none());
        assert!(config.console.party_size.is_none());
    }

    #[test]
    fn reads_typed_values() {
        let config = config_from(&[
            ("SCRIPT_DATA_DIR", "/srv/scripts"),
            ("SCRIPT_COMMAND_BUFFER", "0"),
            ("SCRIPT_EVENT_BUFFER", " 16 "),
            ("SCRIPT_PLAYER_LEVEL", "12"),
            ("SCRIPT_PARTY_SIZE", "4"),
        ]);
        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/scripts")));
        assert_eq!(config.runtime.command_buffer_size, 1);
        assert_eq!(config.runtime.event_buffer_size, 16);
        assert_eq!(config.console.player_level, 12);
        assert_eq!(config.console.party_size, Some(4));
    }

    #[test]
    fn unparsable_values_fall_back() {
        let config = config_from(&[("SCRIPT_PLAYER_LEVEL", "max"), ("SCRIPT_PARTY_SIZE", "x")]);
        assert_eq!(config.console.player_level, 30);
        assert!(config.console.party_size.is_none());
    }
}
