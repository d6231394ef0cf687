//! Party preconditions for group content.
//!
//! Gated NPCs check, in order, that the player is in a party, that the player
//! leads it, and that enough qualified members are present on the map. Every
//! failure maps to a [`GateRejection`] the script turns into a message; none of
//! them is an error.

use crate::ids::MapId;
use crate::world::{LevelRange, PartyView, PlayerView};

/// Why a party gate refused to start group content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GateRejection {
    #[error("player is not in a party")]
    NotInParty,
    #[error("player does not lead the party")]
    NotLeader,
    #[error("{count} qualified members present, expected {min} to {max}")]
    SizeOutOfRange { count: usize, min: usize, max: usize },
}

/// Party size and level requirements for group content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PartyRequirement {
    pub min_members: usize,
    pub max_members: usize,
    pub levels: LevelRange,
}

impl PartyRequirement {
    /// Largest party the server allows.
    pub const MAX_PARTY_SIZE: usize = 6;

    pub const fn new(min_members: usize, max_members: usize, levels: LevelRange) -> Self {
        Self {
            min_members,
            max_members,
            levels,
        }
    }

    /// Checks `player`'s party against this requirement on `map`.
    ///
    /// Only members standing on `map` within the level range count toward the
    /// size check. Both bounds are inclusive.
    pub fn check(
        &self,
        player: &PlayerView,
        map: MapId,
        party: Option<&PartyView>,
    ) -> Result<(), GateRejection> {
        let party = party.ok_or(GateRejection::NotInParty)?;
        if !party.is_leader(player.id) {
            return Err(GateRejection::NotLeader);
        }

        let count = party.members_count(map, self.levels.min, self.levels.max);
        if count < self.min_members || count > self.max_members {
            return Err(GateRejection::SizeOutOfRange {
                count,
                min: self.min_members,
                max: self.max_members,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::PlayerId;
    use crate::world::PartyMember;

    const MAP: MapId = MapId(100000200);
    const REQUIREMENT: PartyRequirement = PartyRequirement::new(3, 6, LevelRange::new(10, 255));

    fn leader() -> PlayerView {
        PlayerView::new(PlayerId(1), "leader", 30, MAP)
    }

    fn party_of(size: u32) -> PartyView {
        let members = (1..=size)
            .map(|id| PartyMember::new(PlayerId(id), MAP, 30))
            .collect();
        PartyView::new(PlayerId(1), members)
    }

    #[test]
    fn no_party_is_rejected_first() {
        assert_eq!(
            REQUIREMENT.check(&leader(), MAP, None),
            Err(GateRejection::NotInParty)
        );
    }

    #[test]
    fn non_leader_is_rejected_regardless_of_size() {
        let member = PlayerView::new(PlayerId(2), "member", 30, MAP);
        for size in 2..=8 {
            let party = party_of(size);
            assert_eq!(
                REQUIREMENT.check(&member, MAP, Some(&party)),
                Err(GateRejection::NotLeader)
            );
        }
    }

    #[test]
    fn size_gate_accepts_three_to_six() {
        for size in 1..=8u32 {
            let party = party_of(size);
            let result = REQUIREMENT.check(&leader(), MAP, Some(&party));
            if (3..=6).contains(&size) {
                assert_eq!(result, Ok(()));
            } else {
                assert_eq!(
                    result,
                    Err(GateRejection::SizeOutOfRange {
                        count: size as usize,
                        min: 3,
                        max: 6
                    })
                );
            }
        }
    }

    #[test]
    fn absent_and_underleveled_members_do_not_count() {
        let party = PartyView::new(
            PlayerId(1),
            vec![
                PartyMember::new(PlayerId(1), MAP, 30),
                PartyMember::new(PlayerId(2), MAP, 30),
                PartyMember::new(PlayerId(3), MAP, 9),
                PartyMember::new(PlayerId(4), MapId(1), 30),
            ],
        );

        let rejection = REQUIREMENT.check(&leader(), MAP, Some(&party)).unwrap_err();
        assert!(matches!(rejection, GateRejection::SizeOutOfRange { count: 2, .. }));
        assert_eq!(
            rejection.to_string(),
            "2 qualified members present, expected 3 to 6"
        );
    }
}
