//! Trigger identity: what caused a script to run and where.
use std::fmt;
use std::str::FromStr;

use crate::ids::{MapId, NpcId, ReactorId};

/// Kind of map entity that starts a reaction script.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TriggerKind {
    /// Player talked to an NPC.
    Npc,
    /// Player hit or clicked a reactor.
    Reactor,
}

/// Registry key for a script binding: kind plus numeric data id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggerKey {
    pub kind: TriggerKind,
    pub id: u32,
}

impl TriggerKey {
    pub const fn new(kind: TriggerKind, id: u32) -> Self {
        Self { kind, id }
    }

    pub const fn npc(id: NpcId) -> Self {
        Self::new(TriggerKind::Npc, id.0)
    }

    pub const fn reactor(id: ReactorId) -> Self {
        Self::new(TriggerKind::Reactor, id.0)
    }
}

impl fmt::Display for TriggerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseTriggerKeyError {
    #[error("trigger key '{0}' must look like 'npc:<id>' or 'reactor:<id>'")]
    Shape(String),

    #[error("unknown trigger kind '{0}'")]
    Kind(String),

    #[error("trigger id '{0}' is not a number")]
    Id(String),
}

impl FromStr for TriggerKey {
    type Err = ParseTriggerKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s
            .split_once(':')
            .ok_or_else(|| ParseTriggerKeyError::Shape(s.to_owned()))?;
        let kind = TriggerKind::from_str(kind.trim())
            .map_err(|_| ParseTriggerKeyError::Kind(kind.to_owned()))?;
        let id = id
            .trim()
            .parse()
            .map_err(|_| ParseTriggerKeyError::Id(id.to_owned()))?;
        Ok(Self::new(kind, id))
    }
}

/// A single trigger instance: the bound entity and the map it lives on.
///
/// Immutable for the duration of one invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trigger {
    pub key: TriggerKey,
    pub map: MapId,
}

impl Trigger {
    pub const fn new(key: TriggerKey, map: MapId) -> Self {
        Self { key, map }
    }

    pub const fn npc(id: NpcId, map: MapId) -> Self {
        Self::new(TriggerKey::npc(id), map)
    }

    pub const fn reactor(id: ReactorId, map: MapId) -> Self {
        Self::new(TriggerKey::reactor(id), map)
    }

    pub const fn kind(&self) -> TriggerKind {
        self.key.kind
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.key, self.map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_display_and_parse_agree() {
        let key = TriggerKey::npc(NpcId(1012112));
        assert_eq!(key.to_string(), "npc:1012112");
        assert_eq!("npc:1012112".parse::<TriggerKey>(), Ok(key));
        assert_eq!(
            " Reactor : 2000".parse::<TriggerKey>(),
            Ok(TriggerKey::reactor(ReactorId(2000)))
        );
    }

    #[test]
    fn key_parse_rejects_garbage() {
        assert!(matches!(
            "npc".parse::<TriggerKey>(),
            Err(ParseTriggerKeyError::Shape(_))
        ));
        assert!(matches!(
            "portal:3".parse::<TriggerKey>(),
            Err(ParseTriggerKeyError::Kind(_))
        ));
        assert!(matches!(
            "npc:abc".parse::<TriggerKey>(),
            Err(ParseTriggerKeyError::Id(_))
        ));
    }
}
