//! Read-only snapshots of host state handed to a script invocation.
//!
//! The host owns players, maps and parties. A script receives copies taken at
//! invocation time; later host-side changes (including ones the script itself
//! requested, such as a map change) are not reflected back into the snapshot.

use crate::ids::{MapId, PlayerId};

/// Inclusive character level bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelRange {
    pub min: u8,
    pub max: u8,
}

impl LevelRange {
    pub const ANY: Self = Self { min: 0, max: u8::MAX };

    pub const fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    #[inline]
    pub const fn contains(&self, level: u8) -> bool {
        level >= self.min && level <= self.max
    }
}

/// The player who triggered the script.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub level: u8,
    pub map: MapId,
}

impl PlayerView {
    pub fn new(id: PlayerId, name: impl Into<String>, level: u8, map: MapId) -> Self {
        Self {
            id,
            name: name.into(),
            level,
            map,
        }
    }
}

/// The map the trigger instance lives on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapView {
    pub id: MapId,
}

impl MapView {
    pub const fn new(id: MapId) -> Self {
        Self { id }
    }

    pub const fn id(&self) -> MapId {
        self.id
    }
}

/// One membership entry in a party.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartyMember {
    pub id: PlayerId,
    pub map: MapId,
    pub level: u8,
}

impl PartyMember {
    pub const fn new(id: PlayerId, map: MapId, level: u8) -> Self {
        Self { id, map, level }
    }
}

/// Snapshot of the triggering player's party.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartyView {
    leader: PlayerId,
    members: Vec<PartyMember>,
}

impl PartyView {
    /// Creates a party snapshot. The leader is expected to be one of `members`.
    pub fn new(leader: PlayerId, members: Vec<PartyMember>) -> Self {
        Self { leader, members }
    }

    pub fn leader(&self) -> PlayerId {
        self.leader
    }

    pub fn is_leader(&self, player: PlayerId) -> bool {
        self.leader == player
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.members.iter().any(|m| m.id == player)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Counts members standing on `map` whose level lies in `min_level..=max_level`.
    pub fn members_count(&self, map: MapId, min_level: u8, max_level: u8) -> usize {
        let levels = LevelRange::new(min_level, max_level);
        self.members
            .iter()
            .filter(|m| m.map == map && levels.contains(m.level))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HENESYS_PARK: MapId = MapId(100000200);

    #[test]
    fn members_count_filters_by_map_and_level() {
        let party = PartyView::new(
            PlayerId(1),
            vec![
                PartyMember::new(PlayerId(1), HENESYS_PARK, 30),
                PartyMember::new(PlayerId(2), HENESYS_PARK, 10),
                PartyMember::new(PlayerId(3), HENESYS_PARK, 9),
                PartyMember::new(PlayerId(4), MapId(910010100), 50),
            ],
        );

        assert_eq!(party.len(), 4);
        assert_eq!(party.members_count(HENESYS_PARK, 10, 255), 2);
        assert_eq!(party.members_count(HENESYS_PARK, 0, 255), 3);
        assert_eq!(party.members_count(MapId(910010100), 10, 255), 1);
    }

    #[test]
    fn leader_queries() {
        let party = PartyView::new(
            PlayerId(7),
            vec![
                PartyMember::new(PlayerId(7), HENESYS_PARK, 20),
                PartyMember::new(PlayerId(8), HENESYS_PARK, 20),
            ],
        );

        assert_eq!(party.leader(), PlayerId(7));
        assert!(party.is_leader(PlayerId(7)));
        assert!(!party.is_leader(PlayerId(8)));
        assert!(party.contains(PlayerId(8)));
        assert!(!party.contains(PlayerId(9)));
    }
}
