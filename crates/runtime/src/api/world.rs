//! Port through which the runtime reads and updates host-owned game state.
//!
//! The runtime never owns players, maps or parties. It takes snapshots through
//! [`HostWorld`] when a trigger fires and hands script effects back to the host
//! to apply.
use script_core::{Effect, MapId, MapView, PartyView, PlayerId, PlayerView, Trigger};

/// Who caused an effect and through which trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectOrigin {
    pub player: PlayerId,
    pub trigger: Trigger,
}

/// Host-owned world state.
///
/// Implementations must be cheap to query; the session worker calls the read
/// methods while handling a trigger.
pub trait HostWorld: Send + Sync {
    /// Current state of a connected player.
    fn player(&self, id: PlayerId) -> Option<PlayerView>;

    /// Map details for `id`. Hosts without map data can rely on the default.
    fn map(&self, id: MapId) -> Option<MapView> {
        Some(MapView::new(id))
    }

    /// The player's party, if any.
    fn party_of(&self, id: PlayerId) -> Option<PartyView>;

    /// Applies an effect requested by a running script.
    ///
    /// Invalid requests (unknown map, departed player) are the host's to
    /// ignore; they never fail the script.
    fn apply(&self, origin: &EffectOrigin, effect: &Effect);
}
