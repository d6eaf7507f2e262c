//! Puzzle side-effect commands and their dispatcher.

mod command;
mod dispatcher;

pub use command::{parse_commands, CommandParseError, GameCommand, PuzzleOp, RoomOp, StatusOp, Target};
pub use dispatcher::{CommandContext, CommandDispatcher};
