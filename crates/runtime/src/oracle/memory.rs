//! In-memory host world.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use script_core::{
    DropPlacement, Effect, MapId, PartyMember, PartyView, PlayerId, PlayerView, Position,
    ReactorId, TriggerKind,
};
use tracing::{debug, trace};

use crate::api::{EffectOrigin, HostWorld};

#[derive(Debug, Clone)]
struct Party {
    leader: PlayerId,
    members: Vec<PlayerId>,
}

#[derive(Debug, Default)]
struct Tables {
    players: HashMap<PlayerId, PlayerView>,
    parties: HashMap<PlayerId, Party>,
    reactors: HashMap<(MapId, ReactorId), Position>,
    ground: HashMap<MapId, Vec<DropPlacement>>,
}

/// Thread-safe world kept entirely in memory.
///
/// Parties are keyed by leader. Party snapshots read member maps and levels
/// from the player table, so moving a player is reflected in later snapshots.
#[derive(Debug, Default)]
pub struct InMemoryWorld {
    tables: RwLock<Tables>,
}

impl InMemoryWorld {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds or replaces a player.
    pub fn upsert_player(&self, player: PlayerView) {
        self.write().players.insert(player.id, player);
    }

    /// Removes a player and their party membership.
    pub fn remove_player(&self, id: PlayerId) -> Option<PlayerView> {
        let mut tables = self.write();
        leave_party(&mut tables, id);
        tables.players.remove(&id)
    }

    /// Forms a party led by `leader`. Members leave any party they were in.
    ///
    /// The leader is always a member, even if missing from `members`.
    pub fn form_party(&self, leader: PlayerId, members: &[PlayerId]) {
        let mut tables = self.write();
        let mut roster = vec![leader];
        roster.extend(members.iter().copied().filter(|id| *id != leader));
        for id in &roster {
            leave_party(&mut tables, *id);
        }
        tables.parties.insert(
            leader,
            Party {
                leader,
                members: roster,
            },
        );
    }

    /// Removes `player` from their party. A leaving leader disbands it.
    pub fn leave_party(&self, player: PlayerId) {
        leave_party(&mut self.write(), player);
    }

    /// Places a reactor so its drops land around `position`.
    pub fn place_reactor(&self, map: MapId, reactor: ReactorId, position: Position) {
        self.write().reactors.insert((map, reactor), position);
    }

    pub fn player_map(&self, id: PlayerId) -> Option<MapId> {
        self.read().players.get(&id).map(|p| p.map)
    }

    /// Drops lying on `map`, in spawn order.
    pub fn ground_drops(&self, map: MapId) -> Vec<DropPlacement> {
        self.read().ground.get(&map).cloned().unwrap_or_default()
    }

    /// Picks up every drop lying on `map`, returning them in spawn order.
    pub fn clear_ground(&self, map: MapId) -> Vec<DropPlacement> {
        let picked = self.write().ground.remove(&map).unwrap_or_default();
        trace!(
            target: "script_runtime::world",
            map = %map,
            picked = picked.len(),
            "Ground cleared"
        );
        picked
    }
}

fn leave_party(tables: &mut Tables, player: PlayerId) {
    if tables.parties.remove(&player).is_some() {
        return;
    }
    for party in tables.parties.values_mut() {
        party.members.retain(|id| *id != player);
    }
}

impl HostWorld for InMemoryWorld {
    fn player(&self, id: PlayerId) -> Option<PlayerView> {
        self.read().players.get(&id).cloned()
    }

    fn party_of(&self, id: PlayerId) -> Option<PartyView> {
        let tables = self.read();
        let party = tables
            .parties
            .values()
            .find(|party| party.members.contains(&id))?;

        let members = party
            .members
            .iter()
            .filter_map(|member| tables.players.get(member))
            .map(|p| PartyMember::new(p.id, p.map, p.level))
            .collect();
        Some(PartyView::new(party.leader, members))
    }

    fn apply(&self, origin: &EffectOrigin, effect: &Effect) {
        match effect {
            Effect::Chat(text) => {
                trace!(
                    target: "script_runtime::world",
                    player = %origin.player,
                    text = %text,
                    "Chat line"
                );
            }
            Effect::ChangeMap { map, portal } => {
                let mut tables = self.write();
                match tables.players.get_mut(&origin.player) {
                    Some(player) => {
                        debug!(
                            target: "script_runtime::world",
                            player = %origin.player,
                            from = %player.map,
                            to = %map,
                            portal = ?portal,
                            "Player warped"
                        );
                        player.map = *map;
                    }
                    None => debug!(
                        target: "script_runtime::world",
                        player = %origin.player,
                        "Ignoring warp for departed player"
                    ),
                }
            }
            Effect::DropItems(request) => {
                let trigger = origin.trigger;
                let mut tables = self.write();
                let position = match trigger.kind() {
                    TriggerKind::Reactor => tables
                        .reactors
                        .get(&(trigger.map, ReactorId(trigger.key.id)))
                        .copied(),
                    TriggerKind::Npc => None,
                }
                .unwrap_or(Position::ORIGIN);

                let placements = request.layout(position);
                debug!(
                    target: "script_runtime::world",
                    map = %trigger.map,
                    origin = %position,
                    count = placements.len(),
                    "Spawned drops"
                );
                tables.ground.entry(trigger.map).or_default().extend(placements);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use script_core::{DropRequest, ItemId, NpcId, PortalId, Trigger};

    use super::*;

    const PARK: MapId = MapId(100000200);

    fn world_with(players: &[(u32, MapId, u8)]) -> InMemoryWorld {
        let world = InMemoryWorld::new();
        for &(id, map, level) in players {
            world.upsert_player(PlayerView::new(PlayerId(id), format!("p{id}"), level, map));
        }
        world
    }

    #[test]
    fn party_snapshot_reflects_current_members() {
        let world = world_with(&[(1, PARK, 30), (2, PARK, 30), (3, MapId(5), 8)]);
        world.form_party(PlayerId(1), &[PlayerId(2), PlayerId(3)]);

        let party = world.party_of(PlayerId(3)).unwrap();
        assert_eq!(party.leader(), PlayerId(1));
        assert_eq!(party.len(), 3);
        assert_eq!(party.members_count(PARK, 10, 255), 2);

        world.leave_party(PlayerId(2));
        assert!(world.party_of(PlayerId(2)).is_none());
        assert_eq!(world.party_of(PlayerId(1)).unwrap().len(), 2);
    }

    #[test]
    fn leader_leaving_disbands() {
        let world = world_with(&[(1, PARK, 30), (2, PARK, 30)]);
        world.form_party(PlayerId(1), &[PlayerId(2)]);
        world.leave_party(PlayerId(1));
        assert!(world.party_of(PlayerId(2)).is_none());
    }

    #[test]
    fn change_map_moves_player() {
        let world = world_with(&[(1, MapId(910010100), 30)]);
        let origin = EffectOrigin {
            player: PlayerId(1),
            trigger: Trigger::npc(NpcId(1012112), MapId(910010100)),
        };

        world.apply(
            &origin,
            &Effect::ChangeMap {
                map: PARK,
                portal: Some(PortalId(0)),
            },
        );
        assert_eq!(world.player_map(PlayerId(1)), Some(PARK));
    }

    #[test]
    fn drops_land_around_reactor() {
        let amherst = MapId(1010000);
        let world = world_with(&[(1, amherst, 1)]);
        world.place_reactor(amherst, ReactorId(2000), Position::new(300, 120));
        let origin = EffectOrigin {
            player: PlayerId(1),
            trigger: Trigger::reactor(ReactorId(2000), amherst),
        };

        let request = DropRequest::new(0, 0, 0)
            .with_item(ItemId(4031161), 1)
            .with_item(ItemId(4031162), 1);
        world.apply(&origin, &Effect::DropItems(request));

        let positions: Vec<Position> = world
            .ground_drops(amherst)
            .iter()
            .map(|d| d.position)
            .collect();
        assert_eq!(
            positions,
            vec![Position::new(300, 120), Position::new(337, 120)]
        );

        assert_eq!(world.clear_ground(amherst).len(), 2);
        assert!(world.ground_drops(amherst).is_empty());
        assert!(world.clear_ground(amherst).is_empty());
    }
}
