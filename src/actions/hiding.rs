use tracing::debug;

use crate::core::{Action, ActionError, GameState, StatusId};
use crate::ports::{LogEntry, LogKind, Services};
use crate::status::{CureOptions, InflictOptions, StatusLifecycle};

/// Status carried by players in a hiding spot.
pub const HIDDEN: &str = "hidden";

/// Hide in `spot`, a hiding spot in the player's room.
pub fn perform_hide(
    state: &mut GameState,
    services: &mut dyn Services,
    action: &mut Action,
    spot: &str,
) -> Result<(), ActionError> {
    super::begin(state, action, "hide")?;
    let target = action.player;
    let hidden = StatusId::new(HIDDEN);

    let player = state.require_player(target)?;
    let room = player.location;
    if player.has_status(&hidden) {
        return Err(ActionError::AlreadyHasStatus {
            player: target,
            status: hidden,
        });
    }
    let hiding_spot = state
        .hiding_spot(room, spot)
        .ok_or_else(|| ActionError::UnknownEntity(spot.to_string()))?;
    if hiding_spot.is_full() {
        return Err(ActionError::HidingSpotFull(hiding_spot.name.clone()));
    }
    let name = hiding_spot.name.clone();

    state.require_player_mut(target)?.hiding_spot = Some(name.clone());
    if let Some(hiding_spot) = state.hiding_spot_mut(room, &name) {
        hiding_spot.occupants.push(target);
    }

    let options = InflictOptions {
        do_cures: false,
        ..InflictOptions::default()
    };
    if let Err(err) = StatusLifecycle::inflict(state, services, action, target, &hidden, options) {
        state.require_player_mut(target)?.hiding_spot = None;
        if let Some(hiding_spot) = state.hiding_spot_mut(room, &name) {
            hiding_spot.occupants.retain(|p| *p != target);
        }
        return Err(err);
    }

    services.log(LogEntry::for_action(LogKind::Hide, action, &name));
    debug!(player = %target, spot = %name, "player hid");
    Ok(())
}

/// Leave the hiding spot the player is in.
pub fn perform_unhide(
    state: &mut GameState,
    services: &mut dyn Services,
    action: &mut Action,
) -> Result<(), ActionError> {
    super::begin(state, action, "unhide")?;
    let target = action.player;
    let spot = state.require_player(target)?.hiding_spot.clone().unwrap_or_default();

    let options = CureOptions {
        do_cured_condition: false,
        ..CureOptions::default()
    };
    StatusLifecycle::cure(state, services, action, target, &StatusId::new(HIDDEN), options)?;

    services.log(LogEntry::for_action(LogKind::Unhide, action, spot));
    Ok(())
}
