//! # rust-ifgame
//!
//! Rules engine for a moderated, multiplayer, room-based interactive-fiction
//! game. Players issue verbs; the engine resolves them against the world
//! (rooms, puzzles, inventory, status effects) and reports what happened
//! through narrow collaborator traits.
//!
//! ## Design Principles
//!
//! 1. **One unit of work**: every state change runs inside an
//!    [`Action`](core::Action) whose write-once guard makes it idempotent.
//!
//! 2. **Fixed catalogues, data-driven parameters**: puzzle types and status
//!    behavior attributes are closed enums; game data supplies solutions,
//!    durations, chains and command lists.
//!
//! 3. **Collaborators behind traits**: narration, the moderator log and
//!    persistence are [`ports`]. The engine never renders text for
//!    observers or touches storage itself.
//!
//! ## Modules
//!
//! - `core`: ids, players, world data, state, actions, timers, RNG, settings, errors
//! - `status`: status definitions and their lifecycle (inflict, cure, countdown)
//! - `puzzle`: puzzle definitions, per-type handlers and the attempt resolver
//! - `commands`: puzzle side-effect commands and their dispatcher
//! - `actions`: one entry point per verb
//! - `comms`: narration mirroring cache
//! - `ports`: collaborator traits plus in-memory and recording implementations
//! - `game`: the facade that owns state, collaborators and the clock

pub mod core;
pub mod status;
pub mod puzzle;
pub mod commands;
pub mod actions;
pub mod comms;
pub mod ports;
pub mod game;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionError, ActionId, ActionType, GameRng, GameSettings, GameState, Player, PlayerId, PrefabId,
    PuzzleId, RoomId, StatusId,
};

pub use crate::status::{CureOptions, InflictOptions, Status, StatusLifecycle};

pub use crate::puzzle::{AttemptOutcome, AttemptRequest, Puzzle, PuzzleResolver, PuzzleType};

pub use crate::commands::{CommandDispatcher, GameCommand};

pub use crate::comms::CommunicationHandler;

pub use crate::ports::{Narration, Narrator, GameLog, Persistence, Services};

pub use crate::game::{Game, GameDataError};
