//! Concrete actions.
//!
//! Each `perform_*` function is the single entry point for one kind of
//! [`Action`]. They all start the same way: the action's write-once guard is
//! set, so a second call on the same instance fails with
//! `AlreadyPerformed` before anything is touched. Actions a player takes for
//! themselves (`forced == false`) are also rejected when the player is dead
//! or one of their statuses disables the verb.
//!
//! The actions then hand off to [`StatusLifecycle`](crate::status::StatusLifecycle)
//! and [`PuzzleResolver`](crate::puzzle::PuzzleResolver), which do the rule
//! work; what lives here is the bookkeeping specific to the verb (hiding
//! spot occupancy, exits, inventory moves).
//!
//! ## Verbs
//!
//! | Module      | Functions                                               |
//! |-------------|---------------------------------------------------------|
//! | `status`    | `perform_inflict`, `perform_cure`, `perform_die`        |
//! | `puzzle`    | `perform_attempt`, `perform_solve`, `perform_unsolve`   |
//! | `hiding`    | `perform_hide`, `perform_unhide`                        |
//! | `movement`  | `perform_move`, `force_move`, `set_exit_lock`           |
//! | `items`     | `perform_use`, `perform_craft`, `perform_take`, `perform_drop` |

mod hiding;
mod items;
mod movement;
mod puzzle;
mod status;

pub use hiding::{perform_hide, perform_unhide, HIDDEN};
pub use items::{perform_craft, perform_drop, perform_take, perform_use};
pub use movement::{force_move, perform_move, set_exit_lock, MoveOutcome};
pub use puzzle::{perform_attempt, perform_solve, perform_unsolve};
pub use status::{perform_cure, perform_die, perform_inflict};

use crate::core::{Action, ActionError, GameState};

/// Mark `action` performed and, unless it was forced, check its player may
/// `verb`.
fn begin(state: &GameState, action: &mut Action, verb: &str) -> Result<(), ActionError> {
    action.begin()?;
    if action.forced {
        return Ok(());
    }

    let player = state.require_player(action.player)?;
    if !player.alive {
        return Err(ActionError::NotAlive {
            name: player.name.clone(),
        });
    }
    player.check_allowed(verb)
}
