//! Core engine types: ids, players, world, state, actions, timers, RNG,
//! settings and errors.
//!
//! Everything the resolution layers (`status`, `puzzle`, `actions`) operate
//! on lives here.

pub mod entity;
pub mod player;
pub mod world;
pub mod rng;
pub mod config;
pub mod action;
pub mod timer;
pub mod dice;
pub mod error;
pub mod state;

pub use entity::{ChannelId, PlayerId, PrefabId, PuzzleId, RoomId, StatusId};
pub use player::{Player, Stat, Stats, UnknownStat, STAT_MAX, STAT_MIN};
pub use world::{Exit, HidingSpot, InventoryItem, ItemContainer, Prefab, Recipe, Room, RoomItem};
pub use rng::GameRng;
pub use config::{GameSettings, SettingsError};
pub use action::{Action, ActionId, ActionType};
pub use timer::{TimerHandle, TimerQueue};
pub use dice::DieRoll;
pub use error::ActionError;
pub use state::{GameState, TimerTask};
