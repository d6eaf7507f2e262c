//! Status lifecycle: inflicting, curing, countdown and death.
//!
//! `StatusLifecycle` is the single entry point every status change goes
//! through, whether it comes from a moderator command, an item, a puzzle's
//! command list or an expiring countdown.
//!
//! ## Invariants
//!
//! - A player carries at most one instance of each status.
//! - A status whose overrider is present is never inflicted.
//! - Every removal path (cure, next-stage transition, death) cancels the
//!   instance's countdown timer.
//! - Checks run before mutation: a rejected call changes nothing.

use std::time::Duration;

use tracing::{debug, warn};

use super::attributes::BehaviorAttribute;
use super::definition::{Status, StatusInstance};
use crate::core::{
    Action, ActionError, ActionType, GameState, PlayerId, PrefabId, RoomId, StatusId, TimerTask,
};
use crate::ports::{LogEntry, LogKind, Narration, Services};

/// Status id whose presence on any player slows every countdown.
pub const HEATED: &str = "heated";

/// Display phrase used for concealment without a named item.
const DEFAULT_DISGUISE_PHRASE: &str = "a MASK";
const DEFAULT_DISGUISE_NAME: &str = "MASK";

/// Flags for [`StatusLifecycle::inflict`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InflictOptions {
    /// Send the inflicted description to the player.
    pub notify: bool,
    /// Cure the statuses this one lists in `cures` first.
    pub do_cures: bool,
    /// Narrate to observers.
    pub narrate: bool,
    /// Item that caused the status (its phrase names a disguise).
    pub item: Option<PrefabId>,
    /// Countdown override for timed statuses.
    pub duration: Option<Duration>,
}

impl Default for InflictOptions {
    fn default() -> Self {
        Self {
            notify: true,
            do_cures: true,
            narrate: true,
            item: None,
            duration: None,
        }
    }
}

impl InflictOptions {
    #[must_use]
    pub fn with_item(mut self, item: PrefabId) -> Self {
        self.item = Some(item);
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Follow-up inflicts (duplicates, next stages) tell the player but
    /// don't cascade cures.
    fn chained() -> Self {
        Self {
            do_cures: false,
            ..Self::default()
        }
    }
}

/// Flags for [`StatusLifecycle::cure`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CureOptions {
    /// Send the cured description to the player.
    pub notify: bool,
    /// Develop into the status's cured condition, if it declares one.
    pub do_cured_condition: bool,
    pub narrate: bool,
    /// Item that caused the cure (its name is used when a disguise comes off).
    pub item: Option<PrefabId>,
}

impl Default for CureOptions {
    fn default() -> Self {
        Self {
            notify: true,
            do_cured_condition: true,
            narrate: true,
            item: None,
        }
    }
}

impl CureOptions {
    /// No notification, narration or cured condition.
    #[must_use]
    pub fn silent() -> Self {
        Self {
            notify: false,
            do_cured_condition: false,
            narrate: false,
            item: None,
        }
    }

    #[must_use]
    pub fn with_item(mut self, item: PrefabId) -> Self {
        self.item = Some(item);
        self
    }
}

/// Successful inflict.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InflictOutcome {
    /// The requested status was added.
    Inflicted,
    /// The player already had it; its duplicate was inflicted instead.
    Redirected(StatusId),
}

impl InflictOutcome {
    /// Whether the caller should send its own follow-up message.
    #[must_use]
    pub fn send_followup(&self) -> bool {
        matches!(self, InflictOutcome::Inflicted)
    }
}

/// Successful cure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CureOutcome {
    /// The status was removed.
    Cured,
    /// The status was removed and its cured condition inflicted.
    Transitioned(StatusId),
}

impl CureOutcome {
    #[must_use]
    pub fn send_followup(&self) -> bool {
        matches!(self, CureOutcome::Cured)
    }
}

/// Status lifecycle operations.
pub struct StatusLifecycle;

impl StatusLifecycle {
    /// Inflict `status` on `target`.
    pub fn inflict(
        state: &mut GameState,
        services: &mut dyn Services,
        action: &Action,
        target: PlayerId,
        status: &StatusId,
        options: InflictOptions,
    ) -> Result<InflictOutcome, ActionError> {
        let definition = Self::definition(state, status)?;
        let player = state.require_player(target)?;

        if let Some(overrider) = definition.overriders.iter().find(|id| player.has_status(id)) {
            return Err(ActionError::StatusBlocked {
                status: status.clone(),
                player_name: player.name.clone(),
                overrider: overrider.clone(),
            });
        }

        if player.has_status(status) {
            let Some(duplicate) = definition.duplicated_status.clone() else {
                return Err(ActionError::AlreadyHasStatus {
                    player: target,
                    status: status.clone(),
                });
            };
            Self::check_replacement(state, target, status, &duplicate)?;
            Self::cure(state, services, action, target, status, CureOptions::silent())?;
            Self::inflict(state, services, action, target, &duplicate, InflictOptions::chained())?;
            debug!(player = %target, %status, %duplicate, "duplicate status redirected");
            return Ok(InflictOutcome::Redirected(duplicate));
        }

        if options.do_cures {
            for cure in &definition.cures {
                if state.require_player(target)?.has_status(cure) {
                    Self::cure(state, services, action, target, cure, CureOptions::silent())?;
                }
            }
        }

        let disguise = options
            .item
            .as_ref()
            .and_then(|id| state.prefab(id))
            .map(|prefab| prefab.single_containing_phrase.clone())
            .unwrap_or_else(|| DEFAULT_DISGUISE_PHRASE.to_string());

        let mut narrations = Vec::new();
        let player = state.require_player_mut(target)?;
        for attribute in &definition.attributes {
            match attribute {
                BehaviorAttribute::NoChannel => {
                    player.in_room_channel = false;
                    narrations.push(Narration::RemovedFromWhispers {
                        player: target,
                        reason: format!("{} can no longer whisper because they are {}.", player.name, status),
                    });
                }
                BehaviorAttribute::NoHearing => {
                    player.in_room_channel = false;
                    narrations.push(Narration::RemovedFromWhispers {
                        player: target,
                        reason: format!("{} can no longer hear.", player.display_name),
                    });
                }
                BehaviorAttribute::Hidden => {
                    if let (true, Some(spot)) = (options.narrate, &player.hiding_spot) {
                        narrations.push(Narration::EnteredHiding {
                            player: target,
                            spot: spot.clone(),
                        });
                    }
                }
                BehaviorAttribute::Concealed => {
                    player.display_name = format!("An individual wearing {disguise}");
                    if options.narrate {
                        narrations.push(Narration::Concealed {
                            player: target,
                            display_name: player.display_name.clone(),
                        });
                    }
                }
                other if other.stops_movement() => {
                    if player.stop_moving() {
                        debug!(player = %target, %status, "movement stopped");
                    }
                }
                _ => {}
            }
        }
        let location = player.location;

        let mut instance = StatusInstance::new(definition.clone());
        if definition.is_timed() {
            if let Some(duration) = options.duration {
                instance.remaining = Some(duration);
            }
            let tick = state.settings.status_tick();
            instance.timer = Some(state.timers.start_recurring(
                tick,
                TimerTask::StatusTick {
                    player: target,
                    status: status.clone(),
                },
            ));
        }

        let player = state.require_player_mut(target)?;
        player.statuses.push(instance);
        player.recalculate_stats();

        if options.notify && !definition.inflicted_description.is_empty() {
            services.notify(target, &definition.inflicted_description);
        }
        for narration in narrations {
            services.narrate(action, narration);
        }
        if options.narrate {
            services.narrate(
                action,
                Narration::StatusInflicted {
                    player: target,
                    status: status.clone(),
                },
            );
        }
        services.log(Self::entry(LogKind::Inflict, action, target, status, location));
        services.persist_status_list(state.require_player(target)?);

        if status.as_str() == HEATED {
            debug!(player = %target, "player is heated; countdowns slowed");
        }
        debug!(player = %target, %status, "status inflicted");
        Ok(InflictOutcome::Inflicted)
    }

    /// Cure `status` from `target`.
    pub fn cure(
        state: &mut GameState,
        services: &mut dyn Services,
        action: &Action,
        target: PlayerId,
        status: &StatusId,
        options: CureOptions,
    ) -> Result<CureOutcome, ActionError> {
        let player = state.require_player(target)?;
        let definition = match player.status(status) {
            Some(instance) => instance.status.clone(),
            None => {
                return Err(ActionError::MissingStatus {
                    player: target,
                    status: status.clone(),
                })
            }
        };

        let condition = if options.do_cured_condition {
            definition.cured_condition.clone()
        } else {
            None
        };
        if let Some(condition) = &condition {
            Self::check_replacement(state, target, status, condition)?;
        }

        let item_name = options
            .item
            .as_ref()
            .and_then(|id| state.prefab(id))
            .map(|prefab| prefab.name.clone())
            .unwrap_or_else(|| DEFAULT_DISGUISE_NAME.to_string());

        let mut narrations = Vec::new();
        let mut left_spot = None;
        let player = state.require_player_mut(target)?;

        if definition.attributes.iter().any(BehaviorAttribute::leaves_channel) {
            let still_cut_off = player
                .statuses
                .iter()
                .filter(|s| &s.status.id != status)
                .any(|s| s.status.attributes.iter().any(BehaviorAttribute::leaves_channel));
            if !still_cut_off {
                player.in_room_channel = true;
            }
        }
        if definition.has_attribute(&BehaviorAttribute::Hidden) {
            if let Some(spot) = player.hiding_spot.take() {
                let text = format!("{} comes out of the {}.", player.display_name, spot);
                if options.narrate {
                    narrations.push(Narration::LeftHiding {
                        player: target,
                        spot: spot.clone(),
                    });
                }
                narrations.push(Narration::RemovedFromWhispers {
                    player: target,
                    reason: text,
                });
                left_spot = Some(spot);
            }
        }
        if definition.has_attribute(&BehaviorAttribute::Concealed) {
            player.display_name = player.name.clone();
            if options.narrate {
                narrations.push(Narration::Revealed {
                    player: target,
                    item_name,
                });
            }
        }

        let location = player.location;
        let removed = player.remove_status(status);
        player.recalculate_stats();
        if let Some(timer) = removed.and_then(|instance| instance.timer) {
            state.timers.cancel(timer);
        }
        if let Some(spot) = left_spot {
            Self::leave_hiding_spot(state, target, location, &spot);
        }

        for narration in narrations {
            services.narrate(action, narration);
        }
        if options.narrate {
            services.narrate(
                action,
                Narration::StatusCured {
                    player: target,
                    status: status.clone(),
                },
            );
        }
        services.log(Self::entry(LogKind::Cure, action, target, status, location));

        if status.as_str() == HEATED && !state.any_player_has_status(status) {
            debug!("no players remain heated; countdowns back to normal speed");
        }

        if let Some(condition) = condition {
            let options = InflictOptions {
                notify: false,
                do_cures: false,
                ..InflictOptions::default()
            };
            Self::inflict(state, services, action, target, &condition, options)?;
            debug!(player = %target, %status, %condition, "status developed into cured condition");
            return Ok(CureOutcome::Transitioned(condition));
        }

        if options.notify {
            services.notify(target, &definition.cured_description);
            if definition.has_attribute(&BehaviorAttribute::Unconscious) {
                if let Some(room) = state.room(location) {
                    services.notify(target, &room.description);
                }
            }
        }
        services.persist_status_list(state.require_player(target)?);

        debug!(player = %target, %status, "status cured");
        Ok(CureOutcome::Cured)
    }

    /// One countdown tick of `status` on `target`.
    ///
    /// Subtracts one tick (slowed while anyone is heated) and expires the
    /// status when nothing remains. A tick for a status the player no longer
    /// carries does nothing.
    pub fn tick(
        state: &mut GameState,
        services: &mut dyn Services,
        target: PlayerId,
        status: &StatusId,
    ) -> Result<(), ActionError> {
        let tick = state.settings.status_tick();
        let elapsed = if state.any_player_has_status(&StatusId::new(HEATED)) {
            tick.mul_f64(state.settings.heated_slowdown_rate)
        } else {
            tick
        };

        let Some(player) = state.player_mut(target) else {
            return Ok(());
        };
        let location = player.location;
        let Some(instance) = player.status_mut(status) else {
            return Ok(());
        };
        let Some(remaining) = instance.remaining else {
            return Ok(());
        };

        let remaining = remaining.saturating_sub(elapsed);
        instance.remaining = Some(remaining);
        if !remaining.is_zero() {
            return Ok(());
        }

        let definition = instance.status.clone();
        let action = Action::new(ActionType::Cure, target, location, true);
        Self::expire(state, services, &action, target, &definition)
    }

    fn expire(
        state: &mut GameState,
        services: &mut dyn Services,
        action: &Action,
        target: PlayerId,
        definition: &Status,
    ) -> Result<(), ActionError> {
        debug!(player = %target, status = %definition.id, "status expired");

        if let Some(next) = &definition.next_stage {
            let options = CureOptions {
                notify: false,
                do_cured_condition: false,
                narrate: true,
                item: None,
            };
            Self::cure(state, services, action, target, &definition.id, options)?;
            if let Err(err) = Self::inflict(state, services, action, target, next, InflictOptions::chained()) {
                debug!(player = %target, next = %next, %err, "next stage not inflicted");
                services.notify(target, &definition.cured_description);
            }
            Ok(())
        } else if definition.fatal {
            Self::kill(state, services, action, target)
        } else {
            Self::cure(state, services, action, target, &definition.id, CureOptions::default()).map(|_| ())
        }
    }

    /// Kill `target`: every status is removed and every countdown cancelled.
    pub fn kill(
        state: &mut GameState,
        services: &mut dyn Services,
        action: &Action,
        target: PlayerId,
    ) -> Result<(), ActionError> {
        let player = state.require_player_mut(target)?;
        if !player.alive {
            return Err(ActionError::NotAlive {
                name: player.name.clone(),
            });
        }

        player.alive = false;
        player.stop_moving();
        player.display_name = player.name.clone();
        let spot = player.hiding_spot.take();
        let location = player.location;
        let removed = std::mem::take(&mut player.statuses);
        player.recalculate_stats();

        for timer in removed.iter().filter_map(|instance| instance.timer) {
            state.timers.cancel(timer);
        }
        if let Some(spot) = spot {
            Self::leave_hiding_spot(state, target, location, &spot);
        }

        services.narrate(action, Narration::Died { player: target });
        services.log(LogEntry {
            kind: LogKind::Die,
            actor: target,
            subject: String::new(),
            location,
            forced: action.forced,
        });
        services.persist_status_list(state.require_player(target)?);

        debug!(player = %target, cleared = removed.len(), "player died");
        Ok(())
    }

    fn definition(state: &GameState, status: &StatusId) -> Result<Status, ActionError> {
        state
            .statuses
            .get(status)
            .cloned()
            .ok_or_else(|| ActionError::UnknownStatus(status.clone()))
    }

    /// Check `replacement` can be inflicted once `current` is cured, following
    /// its duplicate chain to the end.
    fn check_replacement(
        state: &GameState,
        target: PlayerId,
        current: &StatusId,
        replacement: &StatusId,
    ) -> Result<(), ActionError> {
        let player = state.require_player(target)?;
        let mut removed = vec![current.clone()];
        let mut next = replacement.clone();

        loop {
            let definition = Self::definition(state, &next)?;
            let remains = |id: &StatusId| !removed.contains(id) && player.has_status(id);

            if let Some(overrider) = definition.overriders.iter().find(|id| remains(*id)) {
                return Err(ActionError::StatusBlocked {
                    status: next.clone(),
                    player_name: player.name.clone(),
                    overrider: overrider.clone(),
                });
            }
            if !remains(&next) {
                return Ok(());
            }
            let Some(duplicate) = definition.duplicated_status.clone() else {
                return Err(ActionError::AlreadyHasStatus {
                    player: target,
                    status: next,
                });
            };
            removed.push(next);
            next = duplicate;
        }
    }

    fn leave_hiding_spot(state: &mut GameState, target: PlayerId, room: RoomId, spot: &str) {
        match state.hiding_spot_mut(room, spot) {
            Some(spot) => spot.occupants.retain(|p| *p != target),
            None => warn!(player = %target, spot, "hiding spot not found"),
        }
    }

    fn entry(kind: LogKind, action: &Action, target: PlayerId, status: &StatusId, location: RoomId) -> LogEntry {
        LogEntry {
            kind,
            actor: target,
            subject: status.to_string(),
            location,
            forced: action.forced || action.player != target,
        }
    }
}
