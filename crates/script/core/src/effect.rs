//! Fire-and-forget requests a script hands to the host.
//!
//! Effects never suspend the script. The host applies them against live state;
//! the script's own snapshots stay as they were when it started.

use crate::error::{ScriptError, ScriptResult};
use crate::ids::{ItemId, MapId, PortalId, Position};

/// Horizontal spacing between consecutive item drops.
const ITEM_SPREAD: i32 = 25;
/// Horizontal spacing used for meso drops.
const MESO_SPREAD: i32 = 40;

/// Side effect requested by a script.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Effect {
    /// NPC line shown in the chat log.
    Chat(String),
    /// Move the player, optionally to a specific portal.
    ChangeMap {
        map: MapId,
        portal: Option<PortalId>,
    },
    /// Spawn drops around the triggering reactor.
    DropItems(DropRequest),
}

/// Meso drop parameters: amount bounds and chance out of [`MesoDrop::CHANCE_SCALE`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MesoDrop {
    pub min: u32,
    pub max: u32,
    pub chance: u32,
}

impl MesoDrop {
    pub const CHANCE_SCALE: u32 = 1_000_000;

    pub const fn new(min: u32, max: u32, chance: u32) -> Self {
        Self { min, max, chance }
    }

    /// True if this entry can ever produce mesos.
    pub const fn is_enabled(&self) -> bool {
        self.chance > 0 && self.max > 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDrop {
    pub item: ItemId,
    pub quantity: u32,
}

/// A reactor drop request: optional mesos plus a variable-length item list.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropRequest {
    pub mesos: MesoDrop,
    pub items: Vec<ItemDrop>,
}

/// What a single drop slot holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DroppedKind {
    Item(ItemDrop),
    Mesos(MesoDrop),
}

/// A drop slot with its spawn position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropPlacement {
    pub kind: DroppedKind,
    pub position: Position,
}

impl DropRequest {
    pub fn new(mesos_min: u32, mesos_max: u32, mesos_chance: u32) -> Self {
        Self {
            mesos: MesoDrop::new(mesos_min, mesos_max, mesos_chance),
            items: Vec::new(),
        }
    }

    pub fn with_item(mut self, item: ItemId, quantity: u32) -> Self {
        self.items.push(ItemDrop { item, quantity });
        self
    }

    /// Parses the flat host call shape `(min, max, chance, item, qty, item, qty, ...)`.
    pub fn from_args(args: &[u32]) -> ScriptResult<Self> {
        let [min, max, chance, pairs @ ..] = args else {
            return Err(ScriptError::MalformedDropArgs { len: args.len() });
        };
        if pairs.len() % 2 != 0 {
            return Err(ScriptError::MalformedDropArgs { len: args.len() });
        }

        let request = pairs
            .chunks_exact(2)
            .fold(Self::new(*min, *max, *chance), |request, pair| {
                request.with_item(ItemId(pair[0]), pair[1])
            });
        Ok(request)
    }

    /// Spreads the drops horizontally around `origin`.
    ///
    /// The first slot lands on the origin, later slots alternate right and left
    /// of it. Items come first; an enabled meso entry takes the last slot.
    pub fn layout(&self, origin: Position) -> Vec<DropPlacement> {
        let mut placements: Vec<DropPlacement> = self
            .items
            .iter()
            .enumerate()
            .map(|(i, drop)| DropPlacement {
                kind: DroppedKind::Item(*drop),
                position: origin.offset_x(spread(i as i32 + 1, ITEM_SPREAD)),
            })
            .collect();

        if self.mesos.is_enabled() {
            let slot = placements.len() as i32 + 1;
            placements.push(DropPlacement {
                kind: DroppedKind::Mesos(self.mesos),
                position: origin.offset_x(spread(slot, MESO_SPREAD)),
            });
        }

        placements
    }
}

/// Horizontal offset of the `slot`-th drop (1-based).
fn spread(slot: i32, step: i32) -> i32 {
    if slot % 2 == 0 {
        step * (slot + 1) / 2
    } else {
        -(step * (slot / 2))
    }
}
