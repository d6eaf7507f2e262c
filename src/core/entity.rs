//! Entity identification.
//!
//! Players, puzzles and rooms are loaded from an external data source and are
//! addressed by small numeric ids. Statuses and prefabs are addressed by the
//! string ids the game data uses ("heated", "KEY"), because rule behavior is
//! keyed on those exact names.
//!
//! ```
//! use rust_ifgame::core::{PlayerId, StatusId};
//!
//! let player = PlayerId::new(3);
//! assert_eq!(player.raw(), 3);
//!
//! let heated = StatusId::new("heated");
//! assert_eq!(heated.as_str(), "heated");
//! ```

use serde::{Deserialize, Serialize};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            /// Create a new id.
            #[must_use]
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            /// Get the raw id value.
            #[must_use]
            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($label, "({})"), self.0)
            }
        }
    };
}

macro_rules! named_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Create a new id.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the id as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

numeric_id!(
    /// Identifier of a player (living or dead).
    PlayerId,
    "Player"
);

numeric_id!(
    /// Identifier of a puzzle.
    PuzzleId,
    "Puzzle"
);

numeric_id!(
    /// Identifier of a room.
    RoomId,
    "Room"
);

named_id!(
    /// Identifier of a status definition, e.g. `"heated"` or `"hidden"`.
    StatusId
);

named_id!(
    /// Identifier of an item prefab, e.g. `"KEY"`.
    PrefabId
);

named_id!(
    /// Identifier of a delivery channel (room channel, spectate channel, whisper).
    ChannelId
);

impl ChannelId {
    /// The spectate channel that mirrors everything a player sees.
    #[must_use]
    pub fn spectate(player: PlayerId) -> Self {
        Self(format!("spectate-{}", player.raw()))
    }

    /// The public channel of a room.
    #[must_use]
    pub fn room(room: RoomId) -> Self {
        Self(format!("room-{}", room.raw()))
    }
}
