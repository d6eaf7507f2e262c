//! Game settings.
//!
//! Settings are supplied once at startup, either built in code with the
//! `with_*` builder methods or loaded from the JSON settings file a game
//! ships with. Every field has a default, so a settings file only needs to
//! name the values it changes.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings document is not valid JSON for `GameSettings`.
    #[error("invalid settings: {0}")]
    Json(#[from] serde_json::Error),
    /// A value parsed but is out of range.
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Tunable rule constants.
///
/// ## Example
///
/// ```
/// use rust_ifgame::core::GameSettings;
///
/// let settings = GameSettings::from_json(r#"{ "dice_max": 20 }"#).unwrap();
/// assert_eq!(settings.dice_min, 1);
/// assert_eq!(settings.dice_max, 20);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Lowest possible result of a standard die roll.
    pub dice_min: i32,

    /// Highest possible result of a standard die roll.
    pub dice_max: i32,

    /// How often a timed status counts down, in milliseconds.
    pub status_tick_ms: u64,

    /// Multiplier applied to elapsed status time while any player is heated.
    pub heated_slowdown_rate: f64,

    /// Number of recent actions remembered for narration mirroring.
    pub action_cache_size: usize,

    /// Prefix players type before commands (used in reply text).
    pub command_prefix: String,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            dice_min: 1,
            dice_max: 6,
            status_tick_ms: 1000,
            heated_slowdown_rate: 0.25,
            action_cache_size: 20,
            command_prefix: ".".to_string(),
        }
    }
}

impl GameSettings {
    /// Create settings with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from a JSON document and validate them.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.dice_max < self.dice_min {
            return Err(SettingsError::Invalid(format!(
                "dice_max ({}) is lower than dice_min ({})",
                self.dice_max, self.dice_min
            )));
        }
        if self.status_tick_ms == 0 {
            return Err(SettingsError::Invalid("status_tick_ms must be positive".to_string()));
        }
        if !(self.heated_slowdown_rate > 0.0) {
            return Err(SettingsError::Invalid(
                "heated_slowdown_rate must be positive".to_string(),
            ));
        }
        if self.action_cache_size == 0 {
            return Err(SettingsError::Invalid("action_cache_size must be positive".to_string()));
        }
        Ok(())
    }

    /// Set the die range.
    #[must_use]
    pub fn with_dice(mut self, min: i32, max: i32) -> Self {
        self.dice_min = min;
        self.dice_max = max;
        self
    }

    /// Set the heated slowdown multiplier.
    #[must_use]
    pub fn with_heated_slowdown_rate(mut self, rate: f64) -> Self {
        self.heated_slowdown_rate = rate;
        self
    }

    /// Set the status countdown interval.
    #[must_use]
    pub fn with_status_tick(mut self, tick: Duration) -> Self {
        self.status_tick_ms = tick.as_millis().max(1) as u64;
        self
    }

    /// The status countdown interval.
    #[must_use]
    pub fn status_tick(&self) -> Duration {
        Duration::from_millis(self.status_tick_ms.max(1))
    }
}
