//! Status definitions and the per-player instances created from them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::attributes::BehaviorAttribute;
use crate::core::{Stat, StatusId, TimerHandle};

/// A change a status makes to a stat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatModifier {
    /// True to modify the carrier's stat; false to modify the stat of
    /// whoever rolls against the carrier.
    pub modifies_self: bool,
    pub stat: Stat,
    /// True to set the stat to `value`, false to add `value` to it.
    pub assign_value: bool,
    pub value: i32,
}

/// An affliction definition.
///
/// ## Example
///
/// ```
/// use std::time::Duration;
/// use rust_ifgame::status::Status;
///
/// let asleep = Status::new("asleep")
///     .with_duration(Duration::from_secs(3600))
///     .with_overrider("awake")
///     .with_cured_condition("groggy")
///     .with_attribute("unconscious")
///     .with_attribute("disable all");
///
/// assert!(asleep.is_timed());
/// assert_eq!(asleep.attributes.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub id: StatusId,

    /// Countdown length. `None` means permanent.
    pub duration: Option<Duration>,

    /// Whether the carrier dies when the countdown ends.
    pub fatal: bool,

    /// Whether the status shows up in the carrier's status list.
    pub visible: bool,

    /// Statuses whose presence blocks this one from being inflicted.
    pub overriders: Vec<StatusId>,

    /// Statuses removed when this one is inflicted.
    pub cures: Vec<StatusId>,

    /// Status this one develops into when its countdown ends.
    pub next_stage: Option<StatusId>,

    /// Status inflicted instead when this one is inflicted on a carrier.
    pub duplicated_status: Option<StatusId>,

    /// Status this one develops into when cured.
    pub cured_condition: Option<StatusId>,

    pub stat_modifiers: Vec<StatModifier>,
    pub attributes: Vec<BehaviorAttribute>,

    /// Sent to the carrier on inflict.
    pub inflicted_description: String,

    /// Sent to the carrier on cure.
    pub cured_description: String,
}

impl Status {
    /// Create a permanent, visible status with no rules attached.
    pub fn new(id: impl Into<StatusId>) -> Self {
        Self {
            id: id.into(),
            duration: None,
            fatal: false,
            visible: true,
            overriders: Vec::new(),
            cures: Vec::new(),
            next_stage: None,
            duplicated_status: None,
            cured_condition: None,
            stat_modifiers: Vec::new(),
            attributes: Vec::new(),
            inflicted_description: String::new(),
            cured_description: String::new(),
        }
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    #[must_use]
    pub fn fatal(mut self) -> Self {
        self.fatal = true;
        self
    }

    #[must_use]
    pub fn invisible(mut self) -> Self {
        self.visible = false;
        self
    }

    #[must_use]
    pub fn with_overrider(mut self, status: impl Into<StatusId>) -> Self {
        self.overriders.push(status.into());
        self
    }

    #[must_use]
    pub fn with_cure(mut self, status: impl Into<StatusId>) -> Self {
        self.cures.push(status.into());
        self
    }

    #[must_use]
    pub fn with_next_stage(mut self, status: impl Into<StatusId>) -> Self {
        self.next_stage = Some(status.into());
        self
    }

    #[must_use]
    pub fn with_duplicated_status(mut self, status: impl Into<StatusId>) -> Self {
        self.duplicated_status = Some(status.into());
        self
    }

    #[must_use]
    pub fn with_cured_condition(mut self, status: impl Into<StatusId>) -> Self {
        self.cured_condition = Some(status.into());
        self
    }

    #[must_use]
    pub fn with_stat_modifier(mut self, modifier: StatModifier) -> Self {
        self.stat_modifiers.push(modifier);
        self
    }

    /// Add a behavior attribute by its game-data string.
    #[must_use]
    pub fn with_attribute(mut self, attribute: &str) -> Self {
        self.attributes.push(BehaviorAttribute::from(attribute));
        self
    }

    #[must_use]
    pub fn with_descriptions(mut self, inflicted: impl Into<String>, cured: impl Into<String>) -> Self {
        self.inflicted_description = inflicted.into();
        self.cured_description = cured.into();
        self
    }

    #[must_use]
    pub fn is_timed(&self) -> bool {
        self.duration.is_some()
    }

    #[must_use]
    pub fn has_attribute(&self, attribute: &BehaviorAttribute) -> bool {
        self.attributes.contains(attribute)
    }

    /// Every status id this definition refers to.
    pub fn referenced_statuses(&self) -> impl Iterator<Item = &StatusId> {
        self.overriders
            .iter()
            .chain(self.cures.iter())
            .chain(self.next_stage.iter())
            .chain(self.duplicated_status.iter())
            .chain(self.cured_condition.iter())
    }
}

/// A status carried by a player.
///
/// Owns a copy of the definition, the time left on its countdown, and the
/// handle of the countdown timer so every removal path can cancel it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusInstance {
    pub status: Status,
    /// Time left before expiry. `None` for permanent statuses.
    pub remaining: Option<Duration>,
    #[serde(skip)]
    pub timer: Option<TimerHandle>,
}

impl StatusInstance {
    /// Instance with the definition's full duration and no timer.
    #[must_use]
    pub fn new(status: Status) -> Self {
        Self {
            remaining: status.duration,
            status,
            timer: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> &StatusId {
        &self.status.id
    }
}
