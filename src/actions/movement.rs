//! Room-to-room movement and exit locks.
//!
//! Walking through an exit is the only movement the engine resolves itself;
//! travel time and pathing are the host's. A locked exit can still be passed
//! when a `restricted exit` puzzle named after it lists the player's name
//! among its solutions. Passing solves that puzzle with the name as its
//! outcome.

use tracing::debug;

use crate::core::{Action, ActionError, GameState, PlayerId, PuzzleId, RoomId};
use crate::ports::{LogEntry, LogKind, Narration, Services};
use crate::puzzle::{PuzzleResolver, PuzzleType, SolveOptions};

/// Result of trying an exit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved(RoomId),
    /// The exit is locked to this player. Nothing changed.
    Locked,
}

/// Leave the player's room through `exit`.
pub fn perform_move(
    state: &mut GameState,
    services: &mut dyn Services,
    action: &mut Action,
    exit: &str,
) -> Result<MoveOutcome, ActionError> {
    super::begin(state, action, "move")?;
    let mover = action.player;
    let player = state.require_player(mover)?;
    let name = player.name.clone();
    let from = player.location;

    let room = state.room(from).ok_or(ActionError::UnknownRoom(from))?;
    let door = room
        .exit(exit)
        .ok_or_else(|| ActionError::UnknownEntity(exit.to_string()))?
        .clone();

    if let Some(puzzle) = restricted_exit(state, from, &door.name) {
        if PuzzleResolver::refresh_accessibility(state, mover, puzzle, None)? {
            let allowed = state
                .require_puzzle(puzzle)?
                .solutions
                .iter()
                .find(|s| s.eq_ignore_ascii_case(&name))
                .cloned();
            if let Some(solution) = allowed {
                PuzzleResolver::solve(state, services, action, puzzle, SolveOptions::with_outcome(solution))?;
                relocate(state, services, action, mover, door.dest, &door.name)?;
                return Ok(MoveOutcome::Moved(door.dest));
            }
        }
    }

    if !door.unlocked {
        services.notify(mover, &format!("{} is locked.", door.name));
        debug!(player = %mover, exit = %door.name, "exit locked");
        return Ok(MoveOutcome::Locked);
    }

    relocate(state, services, action, mover, door.dest, &door.name)?;
    Ok(MoveOutcome::Moved(door.dest))
}

/// Put the action's player in `dest`, ignoring exits and locks.
pub fn force_move(
    state: &mut GameState,
    services: &mut dyn Services,
    action: &mut Action,
    dest: RoomId,
) -> Result<(), ActionError> {
    action.begin()?;
    if state.room(dest).is_none() {
        return Err(ActionError::UnknownRoom(dest));
    }
    relocate(state, services, action, action.player, dest, "")
}

/// Lock or unlock `exit` of `room`.
pub fn set_exit_lock(
    state: &mut GameState,
    services: &mut dyn Services,
    action: &mut Action,
    room: RoomId,
    exit: &str,
    locked: bool,
) -> Result<(), ActionError> {
    action.begin()?;
    let door = state
        .room_mut(room)
        .ok_or(ActionError::UnknownRoom(room))?
        .exit_mut(exit)
        .ok_or_else(|| ActionError::UnknownEntity(exit.to_string()))?;
    door.unlocked = !locked;
    let exit = door.name.clone();

    let (narration, kind) = if locked {
        (Narration::ExitLocked { room, exit: exit.clone() }, LogKind::Lock)
    } else {
        (Narration::ExitUnlocked { room, exit: exit.clone() }, LogKind::Unlock)
    };
    services.narrate(action, narration);
    services.log(LogEntry::for_action(kind, action, &exit));
    debug!(%room, %exit, locked, "exit lock changed");
    Ok(())
}

fn restricted_exit(state: &GameState, room: RoomId, exit: &str) -> Option<PuzzleId> {
    state
        .puzzles()
        .filter(|p| p.puzzle_type == PuzzleType::RestrictedExit && p.location == room)
        .filter(|p| p.name.eq_ignore_ascii_case(exit))
        .map(|p| p.id)
        .min()
}

fn relocate(
    state: &mut GameState,
    services: &mut dyn Services,
    action: &Action,
    mover: PlayerId,
    dest: RoomId,
    exit: &str,
) -> Result<(), ActionError> {
    let player = state.require_player_mut(mover)?;
    let from = player.location;
    player.location = dest;
    player.stop_moving();

    services.narrate(
        action,
        Narration::Moved {
            player: mover,
            from,
            to: dest,
            exit: exit.to_string(),
        },
    );
    let subject = state.room(dest).map(|r| r.name.clone()).unwrap_or_default();
    services.log(LogEntry::for_action(LogKind::Move, action, subject));
    if let Some(description) = state.room(dest).map(|r| r.description.as_str()).filter(|d| !d.is_empty()) {
        services.notify(mover, description);
    }
    debug!(player = %mover, %from, to = %dest, "player moved");
    Ok(())
}
