use crate::core::{Action, ActionError, GameState, PlayerId, StatusId};
use crate::ports::Services;
use crate::status::{CureOptions, CureOutcome, InflictOptions, InflictOutcome, StatusLifecycle};

/// Inflict `status` on `target`.
pub fn perform_inflict(
    state: &mut GameState,
    services: &mut dyn Services,
    action: &mut Action,
    target: PlayerId,
    status: &StatusId,
    options: InflictOptions,
) -> Result<InflictOutcome, ActionError> {
    super::begin(state, action, "inflict")?;
    StatusLifecycle::inflict(state, services, action, target, status, options)
}

/// Cure `status` from `target`.
pub fn perform_cure(
    state: &mut GameState,
    services: &mut dyn Services,
    action: &mut Action,
    target: PlayerId,
    status: &StatusId,
    options: CureOptions,
) -> Result<CureOutcome, ActionError> {
    super::begin(state, action, "cure")?;
    StatusLifecycle::cure(state, services, action, target, status, options)
}

/// Kill the action's player.
pub fn perform_die(state: &mut GameState, services: &mut dyn Services, action: &mut Action) -> Result<(), ActionError> {
    action.begin()?;
    StatusLifecycle::kill(state, services, action, action.player)
}
