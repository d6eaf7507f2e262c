use crate::core::{Action, ActionError, GameState, PuzzleId};
use crate::ports::Services;
use crate::puzzle::{AttemptOutcome, AttemptRequest, PuzzleResolver, SolveOptions};

/// Attempt a puzzle. The request's command alias is the verb statuses can
/// disable.
pub fn perform_attempt(
    state: &mut GameState,
    services: &mut dyn Services,
    action: &mut Action,
    request: &AttemptRequest,
) -> Result<AttemptOutcome, ActionError> {
    super::begin(state, action, &request.command)?;
    PuzzleResolver::attempt(state, services, action, request)
}

pub fn perform_solve(
    state: &mut GameState,
    services: &mut dyn Services,
    action: &mut Action,
    puzzle: PuzzleId,
    options: SolveOptions,
) -> Result<(), ActionError> {
    super::begin(state, action, "solve")?;
    PuzzleResolver::solve(state, services, action, puzzle, options)
}

/// Unsolve a puzzle. `run_commands` is false when another puzzle's command
/// list is the caller.
pub fn perform_unsolve(
    state: &mut GameState,
    services: &mut dyn Services,
    action: &mut Action,
    puzzle: PuzzleId,
    run_commands: bool,
) -> Result<(), ActionError> {
    super::begin(state, action, "unsolve")?;
    PuzzleResolver::unsolve(state, services, action, puzzle, run_commands)
}
