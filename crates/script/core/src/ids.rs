//! Numeric identifiers used by the game data and map coordinates.
use std::fmt;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident($inner:ty), $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub $inner);

        impl $name {
            #[inline]
            pub const fn get(self) -> $inner {
                self.0
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

numeric_id!(
    /// Data id of a non-player character template.
    NpcId(u32),
    "npc "
);
numeric_id!(
    /// Data id of a reactor (interactable map object).
    ReactorId(u32),
    "reactor "
);
numeric_id!(
    /// Data id of a map.
    MapId(u32),
    "map "
);
numeric_id!(
    /// Character id of a connected player.
    PlayerId(u32),
    "player #"
);
numeric_id!(
    /// Data id of an item.
    ItemId(u32),
    "item "
);
numeric_id!(
    /// Index of a portal inside a map.
    PortalId(u8),
    "portal "
);

/// Map coordinate in client pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this position shifted horizontally.
    pub const fn offset_x(self, dx: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
