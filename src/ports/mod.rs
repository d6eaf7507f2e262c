//! Collaborator interfaces the engine calls out to.
//!
//! The engine decides *what* happened; these traits deliver it. Text
//! rendering, channel delivery and storage back-ends are the host's concern.
//! All calls are fire-and-forget: the engine never waits on or inspects a
//! result.
//!
//! - `Narrator`: narration events for observers and direct notifications.
//! - `GameLog`: the moderator-facing log.
//! - `Persistence`: write-back of puzzle and status state, plus a reload
//!   trigger after puzzle transitions.
//!
//! `Services` bundles all three so operations take a single `&mut dyn Services`.

mod memory;
mod transcript;

pub use memory::{MemoryStore, PuzzleRecord, StatusRecord};
pub use transcript::{NarrationEvent, Transcript};

use serde::{Deserialize, Serialize};

use crate::core::{Action, Player, PlayerId, PrefabId, PuzzleId, RoomId, StatusId};
use crate::puzzle::Puzzle;

/// Why an attempt produced no state change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptResult {
    AlreadySolved,
    Failed { item: Option<PrefabId> },
    NoMoreAttempts,
    RequirementsNotMet,
    WithoutItem,
}

/// Something observers should be told about.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Narration {
    StatusInflicted { player: PlayerId, status: StatusId },
    StatusCured { player: PlayerId, status: StatusId },
    /// Display identity swapped for a disguise.
    Concealed { player: PlayerId, display_name: String },
    /// Disguise removed.
    Revealed { player: PlayerId, item_name: String },
    EnteredHiding { player: PlayerId, spot: String },
    LeftHiding { player: PlayerId, spot: String },
    /// The player drops out of every whisper they were part of.
    RemovedFromWhispers { player: PlayerId, reason: String },
    PuzzleSolved {
        puzzle: PuzzleId,
        outcome: Option<String>,
        item: Option<PrefabId>,
    },
    PuzzleUnsolved { puzzle: PuzzleId },
    /// An attempt that neither solved nor unsolved the puzzle.
    PuzzleAttempted {
        puzzle: PuzzleId,
        result: AttemptResult,
        description: String,
    },
    Moved { player: PlayerId, from: RoomId, to: RoomId, exit: String },
    ItemUsed { item: PrefabId, target: PlayerId },
    ItemsCrafted { ingredients: [PrefabId; 2], products: Vec<PrefabId> },
    ItemTaken { item: PrefabId, from: String },
    ItemDropped { item: PrefabId, into: String },
    ExitLocked { room: RoomId, exit: String },
    ExitUnlocked { room: RoomId, exit: String },
    Died { player: PlayerId },
}

/// Kind of moderator log entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogKind {
    Inflict,
    Cure,
    Solve,
    Unsolve,
    AttemptFailed,
    AttemptAlreadySolved,
    AttemptNoMoreAttempts,
    AttemptInaccessible,
    Hide,
    Unhide,
    Move,
    Use,
    Craft,
    Take,
    Drop,
    Lock,
    Unlock,
    Die,
}

/// One moderator log line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub kind: LogKind,
    /// Player the entry is about.
    pub actor: PlayerId,
    /// What was acted on (status id, puzzle name, item, ...).
    pub subject: String,
    pub location: RoomId,
    /// Triggered by someone other than `actor`.
    pub forced: bool,
}

impl LogEntry {
    /// Entry for `action`, taking actor, location and forced from it.
    pub fn for_action(kind: LogKind, action: &Action, subject: impl Into<String>) -> Self {
        Self {
            kind,
            actor: action.player,
            subject: subject.into(),
            location: action.location,
            forced: action.forced,
        }
    }
}

/// Narration and notification delivery.
pub trait Narrator {
    /// Tell observers about `narration`, caused by `action`.
    fn narrate(&mut self, action: &Action, narration: Narration);

    /// Send `text` to one player only.
    fn notify(&mut self, player: PlayerId, text: &str);
}

/// Moderator log.
pub trait GameLog {
    fn log(&mut self, entry: LogEntry);
}

/// Write-back of mutated state.
pub trait Persistence {
    fn persist_puzzle_solved(&mut self, puzzle: &Puzzle, solved: bool);
    fn persist_puzzle_attempts(&mut self, puzzle: &Puzzle);
    fn persist_status_list(&mut self, player: &Player);
    /// Re-synchronize dependent object, item and puzzle data after a puzzle
    /// transition.
    fn reload(&mut self);
}

/// Every collaborator the engine needs.
pub trait Services: Narrator + GameLog + Persistence {}

impl<T: Narrator + GameLog + Persistence> Services for T {}
