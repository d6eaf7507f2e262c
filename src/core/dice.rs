//! Dice rolls keyed by player stats.
//!
//! A roll is a base roll in `dice_min..=dice_max` plus a modifier derived
//! from the roller's stat. Rolling against another player folds in the
//! defender's stat modifiers that target their opponent, and a strength roll
//! is opposed by the defender's dexterity.

use super::config::GameSettings;
use super::player::{Player, Stat, STAT_MAX};
use super::rng::GameRng;
use crate::status::{BehaviorAttribute, StatModifier};

/// The outcome of one roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DieRoll {
    pub min: i32,
    pub max: i32,
    pub base: i32,
    pub modifier: i32,
    pub result: i32,
}

impl DieRoll {
    /// Where the result falls between min and max, as a fraction.
    ///
    /// Can leave `0.0..=1.0` when modifiers push the result outside the range.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        if self.max == self.min {
            return 0.0;
        }
        f64::from(self.result - self.min) / f64::from(self.max - self.min)
    }
}

/// Modifier a stat value contributes to a roll.
#[must_use]
pub fn stat_modifier(settings: &GameSettings, stat: i32) -> i32 {
    let min = f64::from(settings.dice_min);
    let max = f64::from(settings.dice_max);
    let stat_max = f64::from(STAT_MAX);
    let inner = ((f64::from(stat) - stat_max / 3.0) / 2.0).floor();
    let range_bonus = if max == 0.0 { 0.0 } else { (max - min) / max };
    (inner + range_bonus).floor() as i32
}

/// Roll a die for `attacker`, optionally keyed on a stat and opposed by `defender`.
pub fn roll(
    settings: &GameSettings,
    rng: &mut GameRng,
    stat: Option<Stat>,
    attacker: &Player,
    defender: Option<&Player>,
) -> DieRoll {
    let (min, max) = (settings.dice_min, settings.dice_max);

    let base = if attacker.has_behavior_attribute(&BehaviorAttribute::AllOrNothing) {
        if rng.roll(0, 1) == 1 { max } else { min }
    } else {
        rng.roll(min, max)
    };

    let mut modifier = 0;
    let mut stats = attacker.stats;

    if let Some(defender) = defender {
        if stat == Some(Stat::Strength) {
            modifier -= stat_modifier(settings, defender.stats.dexterity);
        }

        // The defender's outward modifiers apply to the attacker for this roll.
        let outward: Vec<StatModifier> = defender
            .statuses
            .iter()
            .flat_map(|s| s.status.stat_modifiers.iter())
            .filter(|m| !m.modifies_self)
            .map(|m| StatModifier {
                modifies_self: true,
                ..m.clone()
            })
            .collect();
        if !outward.is_empty() {
            let own = attacker
                .statuses
                .iter()
                .flat_map(|s| s.status.stat_modifiers.iter())
                .filter(|m| m.modifies_self);
            let all: Vec<&StatModifier> = own.chain(outward.iter()).collect();
            stats = attacker.base_stats.modified_by(all.iter().copied());
        }
    }

    if let Some(stat) = stat {
        modifier += stat_modifier(settings, stats.get(stat));
    }

    DieRoll {
        min,
        max,
        base,
        modifier,
        result: base + modifier,
    }
}
