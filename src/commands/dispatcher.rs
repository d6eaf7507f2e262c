//! Command list execution.
//!
//! `CommandDispatcher` is the only interpreter of [`GameCommand`]s. Each
//! command becomes a forced action performed through the same entry points
//! a direct command uses, so a puzzle that inflicts a status goes through
//! exactly the checks a moderator's inflict does.
//!
//! ## Waits
//!
//! `wait N` stops the list; the remainder is scheduled on the game's timer
//! queue as a [`TimerTask::DeferredCommands`] and resumes with the same
//! context when the game clock passes it.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::command::{GameCommand, PuzzleOp, RoomOp, StatusOp, Target};
use crate::actions;
use crate::core::{Action, ActionError, ActionType, GameState, PlayerId, PuzzleId, RoomId, TimerTask};
use crate::puzzle::SolveOptions;
use crate::ports::Services;
use crate::status::{CureOptions, InflictOptions};

/// Who and where a command list runs for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandContext {
    /// Player `player` targets refer to.
    pub player: PlayerId,
    /// Room `room` targets refer to, and where puzzle names are looked up first.
    pub room: RoomId,
    /// Puzzle whose command list this is.
    pub puzzle: Option<PuzzleId>,
}

/// Runs command lists.
pub struct CommandDispatcher;

impl CommandDispatcher {
    /// Run `commands` in order.
    ///
    /// A failing command doesn't stop the list; its error is returned with
    /// the others.
    pub fn run(
        state: &mut GameState,
        services: &mut dyn Services,
        commands: &[GameCommand],
        context: &CommandContext,
    ) -> Vec<ActionError> {
        let mut errors = Vec::new();

        for (index, command) in commands.iter().enumerate() {
            if let GameCommand::Wait(delay) = command {
                let rest = &commands[index + 1..];
                if !rest.is_empty() {
                    let handle = state.timers.start_once(
                        *delay,
                        TimerTask::DeferredCommands {
                            commands: rest.to_vec(),
                            context: context.clone(),
                        },
                    );
                    debug!(%handle, remaining = rest.len(), ?delay, "commands deferred");
                }
                return errors;
            }

            if let Err(err) = Self::execute(state, services, command, context) {
                warn!(%command, %err, "command failed");
                errors.push(err);
            }
        }
        errors
    }

    /// Execute one command. `Wait` does nothing here.
    pub fn execute(
        state: &mut GameState,
        services: &mut dyn Services,
        command: &GameCommand,
        context: &CommandContext,
    ) -> Result<(), ActionError> {
        debug!(%command, player = %context.player, "executing command");

        match command {
            GameCommand::Status { op, target, status } => {
                let mut first_error = None;
                for player in Self::targets(state, target, context)? {
                    let mut action = Self::forced_action(state, status_action_type(*op), player)?;
                    let result = match op {
                        StatusOp::Inflict => {
                            actions::perform_inflict(state, services, &mut action, player, status, InflictOptions::default())
                                .map(|_| ())
                        }
                        StatusOp::Cure => {
                            actions::perform_cure(state, services, &mut action, player, status, CureOptions::default())
                                .map(|_| ())
                        }
                    };
                    if let Err(err) = result {
                        first_error.get_or_insert(err);
                    }
                }
                first_error.map_or(Ok(()), Err)
            }
            GameCommand::Puzzle { op, puzzle } => {
                let id = state
                    .puzzle_by_name(puzzle, Some(context.room))
                    .or_else(|| state.puzzle_by_name(puzzle, None))
                    .map(|p| p.id)
                    .ok_or_else(|| ActionError::UnknownEntity(puzzle.clone()))?;
                // A puzzle solved from another puzzle's list doesn't run its own.
                let run_commands = context.puzzle.is_none();
                match op {
                    PuzzleOp::Solve => {
                        let mut action = Self::forced_action(state, ActionType::Solve, context.player)?;
                        let options = SolveOptions {
                            run_commands,
                            ..SolveOptions::default()
                        };
                        actions::perform_solve(state, services, &mut action, id, options)
                    }
                    PuzzleOp::Unsolve => {
                        let mut action = Self::forced_action(state, ActionType::Unsolve, context.player)?;
                        actions::perform_unsolve(state, services, &mut action, id, run_commands)
                    }
                }
            }
            GameCommand::Room { op, room, exit } => {
                let room = state
                    .room_by_name(room)
                    .map(|r| r.id)
                    .ok_or_else(|| ActionError::UnknownEntity(room.clone()))?;
                let mut action = Self::forced_action(state, ActionType::Exit, context.player)?;
                actions::set_exit_lock(state, services, &mut action, room, exit, *op == RoomOp::Lock)
            }
            GameCommand::Move { target, room } => {
                let dest = state
                    .room_by_name(room)
                    .map(|r| r.id)
                    .ok_or_else(|| ActionError::UnknownEntity(room.clone()))?;
                for player in Self::targets(state, target, context)? {
                    let mut action = Self::forced_action(state, ActionType::Move, player)?;
                    actions::force_move(state, services, &mut action, dest)?;
                }
                Ok(())
            }
            GameCommand::Wait(_) => Ok(()),
        }
    }

    fn targets(state: &GameState, target: &Target, context: &CommandContext) -> Result<Vec<PlayerId>, ActionError> {
        let players = match target {
            Target::Player => vec![context.player],
            Target::Room => state.players_in_room(context.room),
            Target::All => state.living_players(),
            Target::Named(name) => {
                let player = state
                    .player_by_name(name)
                    .ok_or_else(|| ActionError::UnknownEntity(name.clone()))?;
                vec![player.id]
            }
        };
        Ok(players)
    }

    fn forced_action(state: &GameState, action_type: ActionType, player: PlayerId) -> Result<Action, ActionError> {
        let location = state.require_player(player)?.location;
        Ok(Action::new(action_type, player, location, true))
    }
}

fn status_action_type(op: StatusOp) -> ActionType {
    match op {
        StatusOp::Inflict => ActionType::Inflict,
        StatusOp::Cure => ActionType::Cure,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::commands::parse_commands;
    use crate::core::{GameRng, GameSettings, Player, Room, StatusId};
    use crate::ports::{LogKind, Transcript};
    use crate::puzzle::{Puzzle, PuzzleType};
    use crate::status::Status;

    const ROOM: RoomId = RoomId::new(0);
    const HALL: RoomId = RoomId::new(1);
    const KYRA: PlayerId = PlayerId::new(1);
    const ASH: PlayerId = PlayerId::new(2);

    fn state() -> GameState {
        let mut state = GameState::new(GameSettings::default(), GameRng::new(1));
        state.add_room(Room::new(ROOM, "lobby").with_exit("DOOR", HALL, false));
        state.add_room(Room::new(HALL, "hall").with_exit("DOOR", ROOM, true));
        state.add_player(Player::new(KYRA, "Kyra", ROOM));
        state.add_player(Player::new(ASH, "Ash", HALL));
        state.add_status(Status::new("cold"));
        state.add_puzzle(Puzzle::new(PuzzleId::new(5), "LEVER", ROOM, PuzzleType::Interact));
        state
    }

    fn context() -> CommandContext {
        CommandContext {
            player: KYRA,
            room: ROOM,
            puzzle: None,
        }
    }

    fn run(state: &mut GameState, t: &mut Transcript, lines: &[&str]) -> Vec<ActionError> {
        let commands = parse_commands(lines).unwrap();
        CommandDispatcher::run(state, t, &commands, &context())
    }

    fn has(state: &GameState, player: PlayerId, status: &str) -> bool {
        state.player(player).unwrap().has_status(&StatusId::new(status))
    }

    #[test]
    fn test_status_targets() {
        let mut state = state();
        let mut t = Transcript::new();

        assert!(run(&mut state, &mut t, &["inflict room cold"]).is_empty());
        assert!(has(&state, KYRA, "cold"));
        assert!(!has(&state, ASH, "cold"));

        // Kyra already has it; Ash still gets it.
        let errors = run(&mut state, &mut t, &["inflict all cold"]);
        assert_eq!(errors.len(), 1);
        assert!(has(&state, ASH, "cold"));

        assert!(run(&mut state, &mut t, &["cure ash cold"]).is_empty());
        assert!(!has(&state, ASH, "cold"));
    }

    #[test]
    fn test_puzzle_and_exit_commands() {
        let mut state = state();
        let mut t = Transcript::new();

        assert!(run(&mut state, &mut t, &["solve lever", "unlock lobby DOOR"]).is_empty());
        assert!(state.puzzle(PuzzleId::new(5)).unwrap().solved);
        assert!(state.room(ROOM).unwrap().exit("DOOR").unwrap().unlocked);
        assert_eq!(t.log_kinds(), vec![LogKind::Solve, LogKind::Unlock]);
    }

    #[test]
    fn test_unknown_names_reported() {
        let mut state = state();
        let mut t = Transcript::new();
        let errors = run(&mut state, &mut t, &["solve nothing", "move player attic", "cure nobody cold"]);
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().all(|e| matches!(e, ActionError::UnknownEntity(_))));
    }

    #[test]
    fn test_move_command() {
        let mut state = state();
        let mut t = Transcript::new();
        assert!(run(&mut state, &mut t, &["move player hall"]).is_empty());
        assert_eq!(state.player(KYRA).unwrap().location, HALL);
    }

    #[test]
    fn test_wait_defers_rest() {
        let mut state = state();
        let mut t = Transcript::new();

        assert!(run(&mut state, &mut t, &["inflict player cold", "wait 5", "cure player cold"]).is_empty());
        assert!(has(&state, KYRA, "cold"));
        assert_eq!(state.timers.len(), 1);

        let (_, task) = state.timers.pop_due(Duration::from_secs(5)).unwrap();
        let TimerTask::DeferredCommands { commands, context } = task else {
            panic!("expected deferred commands");
        };
        assert_eq!(commands.len(), 1);
        assert!(CommandDispatcher::run(&mut state, &mut t, &commands, &context).is_empty());
        assert!(!has(&state, KYRA, "cold"));
    }

    #[test]
    fn test_trailing_wait_schedules_nothing() {
        let mut state = state();
        let mut t = Transcript::new();
        run(&mut state, &mut t, &["inflict player cold", "wait 5"]);
        assert!(state.timers.is_empty());
    }
}
