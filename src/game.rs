//! The game facade: state, collaborators and the clock.
//!
//! `Game` owns a [`GameState`] and the [`Services`] the engine reports to.
//! Hosts perform actions against `game.state` / `game.services` directly and
//! call [`Game::advance`] as wall time passes, which fires status countdowns
//! and deferred command lists in deadline order.
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//!
//! use rust_ifgame::actions;
//! use rust_ifgame::core::{ActionType, GameState, Player, PlayerId, RoomId, StatusId};
//! use rust_ifgame::ports::Transcript;
//! use rust_ifgame::status::{InflictOptions, Status};
//! use rust_ifgame::Game;
//!
//! let mut state = GameState::default();
//! state.add_player(Player::new(PlayerId::new(1), "Kyra", RoomId::new(0)));
//! state.add_status(Status::new("dazed").with_duration(Duration::from_secs(3)));
//!
//! let mut game = Game::new(state, Transcript::new());
//! let mut action = game.action(ActionType::Inflict, PlayerId::new(1), true).unwrap();
//! let dazed = StatusId::new("dazed");
//! actions::perform_inflict(
//!     &mut game.state,
//!     &mut game.services,
//!     &mut action,
//!     PlayerId::new(1),
//!     &dazed,
//!     InflictOptions::default(),
//! )
//! .unwrap();
//!
//! game.advance(Duration::from_secs(3));
//! assert!(!game.state.player(PlayerId::new(1)).unwrap().has_status(&dazed));
//! ```

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::commands::CommandDispatcher;
use crate::core::{Action, ActionError, ActionType, GameState, PlayerId, SettingsError, TimerTask};
use crate::ports::Services;
use crate::puzzle::PuzzleDataError;
use crate::status::{DanglingStatusRef, StatusLifecycle};

/// Loaded game data that can't be played.
#[derive(Debug, Error)]
pub enum GameDataError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Status(#[from] DanglingStatusRef),

    #[error(transparent)]
    Puzzle(#[from] PuzzleDataError),
}

/// A running game.
pub struct Game<S: Services> {
    pub state: GameState,
    pub services: S,
}

impl<S: Services> Game<S> {
    pub fn new(state: GameState, services: S) -> Self {
        Self { state, services }
    }

    /// Check settings, status cross-references and every puzzle.
    pub fn validate(&self) -> Result<(), GameDataError> {
        self.state.settings.validate()?;
        self.state.statuses.validate()?;
        let mut puzzles: Vec<_> = self.state.puzzles().collect();
        puzzles.sort_by_key(|p| p.id);
        for puzzle in puzzles {
            puzzle.validate()?;
        }
        Ok(())
    }

    /// A fresh action for `player` at their current location.
    pub fn action(&self, action_type: ActionType, player: PlayerId, forced: bool) -> Result<Action, ActionError> {
        let location = self.state.require_player(player)?.location;
        Ok(Action::new(action_type, player, location, forced))
    }

    /// Game clock.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.state.timers.now()
    }

    /// Move the clock forward by `elapsed`, running every task that falls
    /// due on the way. Returns how many tasks ran.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        let until = self.state.timers.now() + elapsed;
        let mut fired = 0;

        while let Some((handle, task)) = self.state.timers.pop_due(until) {
            fired += 1;
            match task {
                TimerTask::StatusTick { player, status } => {
                    if let Err(err) = StatusLifecycle::tick(&mut self.state, &mut self.services, player, &status) {
                        warn!(%handle, %player, %status, %err, "status tick failed");
                    }
                }
                TimerTask::DeferredCommands { commands, context } => {
                    debug!(%handle, count = commands.len(), "running deferred commands");
                    CommandDispatcher::run(&mut self.state, &mut self.services, &commands, &context);
                }
            }
        }
        fired
    }
}
