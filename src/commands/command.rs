//! Puzzle side-effect commands.
//!
//! Puzzles carry lists of commands to run when solved or unsolved. Game data
//! writes them as text, in the same syntax moderators use:
//!
//! ```text
//! inflict player heated        status add room deaf       cure all cold
//! solve BUTTON                 puzzle unsolve keypad
//! lock lobby DOOR 1            exit unlock lobby DOOR 1
//! move player kitchen          wait 5
//! ```
//!
//! `player` is the player the command list runs for, `room` everyone in the
//! puzzle's room and `all` every living player; anything else names a player.
//!
//! # Example
//!
//! ```
//! use rust_ifgame::commands::{GameCommand, StatusOp, Target};
//!
//! let command: GameCommand = "inflict all deaf".parse().unwrap();
//! assert!(matches!(
//!     command,
//!     GameCommand::Status { op: StatusOp::Inflict, target: Target::All, .. }
//! ));
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::StatusId;

/// Malformed command text.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command \"{0}\"")]
    UnknownCommand(String),

    #[error("couldn't execute command \"{0}\". Insufficient arguments.")]
    MissingArguments(String),

    #[error("couldn't execute command \"{0}\". Invalid amount of seconds to wait.")]
    InvalidWait(String),
}

/// Players a command applies to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    /// The player the command list runs for.
    Player,
    /// Every living player in the command's room.
    Room,
    /// Every living player.
    All,
    /// A player by name.
    Named(String),
}

impl From<&str> for Target {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "player" => Target::Player,
            "room" => Target::Room,
            "all" => Target::All,
            _ => Target::Named(s.to_string()),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Player => f.write_str("player"),
            Target::Room => f.write_str("room"),
            Target::All => f.write_str("all"),
            Target::Named(name) => f.write_str(name),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusOp {
    Inflict,
    Cure,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PuzzleOp {
    Solve,
    Unsolve,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomOp {
    Lock,
    Unlock,
}

/// One side-effect command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameCommand {
    Status { op: StatusOp, target: Target, status: StatusId },
    /// Solve or unsolve a puzzle, looked up by name.
    Puzzle { op: PuzzleOp, puzzle: String },
    /// Lock or unlock an exit of a room.
    Room { op: RoomOp, room: String, exit: String },
    Move { target: Target, room: String },
    /// Run the rest of the list after a delay.
    Wait(Duration),
}

impl FromStr for GameCommand {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let mut words = text.split_whitespace();
        let head = words.next().ok_or(CommandParseError::Empty)?.to_ascii_lowercase();
        let args: Vec<&str> = words.collect();
        let missing = || CommandParseError::MissingArguments(text.to_string());

        // Subcommand forms: `status add ...`, `puzzle solve ...`, `exit lock ...`.
        let (verb, args) = match head.as_str() {
            "status" | "puzzle" | "exit" | "room" => {
                let (sub, rest) = args.split_first().ok_or_else(missing)?;
                let verb = match (head.as_str(), sub.to_ascii_lowercase().as_str()) {
                    ("status", "add") => "inflict",
                    ("status", "remove") => "cure",
                    ("puzzle", "solve") => "solve",
                    ("puzzle", "unsolve") => "unsolve",
                    ("exit" | "room", "lock") => "lock",
                    ("exit" | "room", "unlock") => "unlock",
                    _ => return Err(CommandParseError::UnknownCommand(text.to_string())),
                };
                (verb.to_string(), rest.to_vec())
            }
            _ => (head, args),
        };

        let command = match verb.as_str() {
            "inflict" | "cure" => {
                let (target, status) = args.split_first().ok_or_else(missing)?;
                if status.is_empty() {
                    return Err(missing());
                }
                GameCommand::Status {
                    op: if verb == "inflict" { StatusOp::Inflict } else { StatusOp::Cure },
                    target: Target::from(*target),
                    status: StatusId::new(status.join(" ")),
                }
            }
            "solve" | "unsolve" => {
                if args.is_empty() {
                    return Err(missing());
                }
                GameCommand::Puzzle {
                    op: if verb == "solve" { PuzzleOp::Solve } else { PuzzleOp::Unsolve },
                    puzzle: args.join(" "),
                }
            }
            "lock" | "unlock" => {
                let (room, exit) = args.split_first().ok_or_else(missing)?;
                if exit.is_empty() {
                    return Err(missing());
                }
                GameCommand::Room {
                    op: if verb == "lock" { RoomOp::Lock } else { RoomOp::Unlock },
                    room: room.to_string(),
                    exit: exit.join(" "),
                }
            }
            "move" => {
                let (target, room) = args.split_first().ok_or_else(missing)?;
                if room.is_empty() {
                    return Err(missing());
                }
                GameCommand::Move {
                    target: Target::from(*target),
                    room: room.join(" "),
                }
            }
            "wait" => {
                let seconds = args.first().ok_or_else(missing)?;
                let seconds: u64 = seconds
                    .parse()
                    .map_err(|_| CommandParseError::InvalidWait(text.to_string()))?;
                GameCommand::Wait(Duration::from_secs(seconds))
            }
            _ => return Err(CommandParseError::UnknownCommand(text.to_string())),
        };
        Ok(command)
    }
}

impl fmt::Display for GameCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameCommand::Status { op, target, status } => {
                let verb = match op {
                    StatusOp::Inflict => "inflict",
                    StatusOp::Cure => "cure",
                };
                write!(f, "{verb} {target} {status}")
            }
            GameCommand::Puzzle { op, puzzle } => {
                let verb = match op {
                    PuzzleOp::Solve => "solve",
                    PuzzleOp::Unsolve => "unsolve",
                };
                write!(f, "{verb} {puzzle}")
            }
            GameCommand::Room { op, room, exit } => {
                let verb = match op {
                    RoomOp::Lock => "lock",
                    RoomOp::Unlock => "unlock",
                };
                write!(f, "{verb} {room} {exit}")
            }
            GameCommand::Move { target, room } => write!(f, "move {target} {room}"),
            GameCommand::Wait(delay) => write!(f, "wait {}", delay.as_secs()),
        }
    }
}

/// Parse a list of command strings, stopping at the first bad one.
pub fn parse_commands(lines: &[&str]) -> Result<Vec<GameCommand>, CommandParseError> {
    lines.iter().map(|line| line.parse()).collect()
}
