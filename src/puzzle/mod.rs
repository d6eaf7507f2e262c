//! Puzzles: definitions, attempt rules and resolution.
//!
//! ## Layout
//!
//! - `definition`: `Puzzle`, `PuzzleType` and the data they carry.
//! - `solution`: the item-solution predicate shared by every item match.
//! - `handlers`: one `PuzzleHandler` per puzzle type, deciding attempts.
//! - `resolver`: `PuzzleResolver`, which runs the pre-checks and applies
//!   the handler's verdict.

mod definition;
mod handlers;
mod resolver;
pub mod solution;

pub use definition::{CommandSet, Puzzle, PuzzleDataError, PuzzleDescriptions, PuzzleType, Requirement};
pub use handlers::{AttemptContext, PuzzleHandler, Verdict};
pub use resolver::{AttemptOutcome, AttemptRequest, PuzzleResolver, SolveOptions};
