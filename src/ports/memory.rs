//! In-process persistence back-end.
//!
//! Records are stored bincode-encoded, the same bytes a file or database
//! back-end would write, so round-tripping through the store exercises the
//! serialized form.

use std::time::Duration;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::Persistence;
use crate::core::{Player, PlayerId, PuzzleId, StatusId};
use crate::puzzle::Puzzle;

/// Persisted puzzle fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleRecord {
    pub solved: bool,
    pub outcome: Option<String>,
    pub remaining_attempts: Option<u32>,
}

/// One persisted status of a player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub id: StatusId,
    pub remaining: Option<Duration>,
}

/// Stores encoded records in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    puzzles: FxHashMap<PuzzleId, Vec<u8>>,
    status_lists: FxHashMap<PlayerId, Vec<u8>>,
    reloads: usize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the stored record of a puzzle.
    pub fn puzzle(&self, id: PuzzleId) -> Option<Result<PuzzleRecord, bincode::Error>> {
        self.puzzles.get(&id).map(|bytes| bincode::deserialize(bytes))
    }

    /// Decode the stored status list of a player.
    pub fn status_list(&self, id: PlayerId) -> Option<Result<Vec<StatusRecord>, bincode::Error>> {
        self.status_lists.get(&id).map(|bytes| bincode::deserialize(bytes))
    }

    /// How many reloads were requested.
    #[must_use]
    pub fn reloads(&self) -> usize {
        self.reloads
    }

    fn store_puzzle(&mut self, puzzle: &Puzzle, solved: bool) {
        let record = PuzzleRecord {
            solved,
            outcome: puzzle.outcome.clone(),
            remaining_attempts: puzzle.remaining_attempts,
        };
        match bincode::serialize(&record) {
            Ok(bytes) => {
                self.puzzles.insert(puzzle.id, bytes);
            }
            Err(err) => tracing::warn!(puzzle = %puzzle.id, %err, "failed to encode puzzle record"),
        }
    }
}

impl Persistence for MemoryStore {
    fn persist_puzzle_solved(&mut self, puzzle: &Puzzle, solved: bool) {
        self.store_puzzle(puzzle, solved);
    }

    fn persist_puzzle_attempts(&mut self, puzzle: &Puzzle) {
        self.store_puzzle(puzzle, puzzle.solved);
    }

    fn persist_status_list(&mut self, player: &Player) {
        let records: Vec<StatusRecord> = player
            .statuses
            .iter()
            .map(|s| StatusRecord {
                id: s.status.id.clone(),
                remaining: s.remaining,
            })
            .collect();
        match bincode::serialize(&records) {
            Ok(bytes) => {
                self.status_lists.insert(player.id, bytes);
            }
            Err(err) => tracing::warn!(player = %player.id, %err, "failed to encode status list"),
        }
    }

    fn reload(&mut self) {
        self.reloads += 1;
    }
}
