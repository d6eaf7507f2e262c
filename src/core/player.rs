//! Players and their stats.
//!
//! ## Player
//!
//! The engine mutates players (statuses, stats, display name, location) but
//! never creates or destroys them; they are loaded into `GameState` by the
//! host.
//!
//! ## Stats
//!
//! Six stats on a 1-10 scale. Each player has base stats from game data and
//! effective stats recalculated from the stat modifiers of the statuses they
//! carry.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entity::{PlayerId, PrefabId, RoomId, StatusId};
use super::error::ActionError;
use super::world::InventoryItem;
use crate::status::{BehaviorAttribute, StatModifier, StatusInstance};

/// Lowest and highest effective stat value.
pub const STAT_MIN: i32 = 1;
pub const STAT_MAX: i32 = 10;

/// A player stat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    Strength,
    Perception,
    Intelligence,
    Dexterity,
    Speed,
    Stamina,
}

impl Stat {
    pub const ALL: [Stat; 6] = [
        Stat::Strength,
        Stat::Perception,
        Stat::Intelligence,
        Stat::Dexterity,
        Stat::Speed,
        Stat::Stamina,
    ];

    /// Three-letter abbreviation used in game data.
    #[must_use]
    pub fn abbreviation(self) -> &'static str {
        match self {
            Stat::Strength => "str",
            Stat::Perception => "per",
            Stat::Intelligence => "int",
            Stat::Dexterity => "dex",
            Stat::Speed => "spd",
            Stat::Stamina => "sta",
        }
    }
}

impl std::fmt::Display for Stat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.abbreviation())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown stat \"{0}\"")]
pub struct UnknownStat(pub String);

impl FromStr for Stat {
    type Err = UnknownStat;

    /// Accepts the abbreviation or the full name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "str" | "strength" => Ok(Stat::Strength),
            "per" | "perception" => Ok(Stat::Perception),
            "int" | "intelligence" => Ok(Stat::Intelligence),
            "dex" | "dexterity" => Ok(Stat::Dexterity),
            "spd" | "speed" => Ok(Stat::Speed),
            "sta" | "stamina" => Ok(Stat::Stamina),
            _ => Err(UnknownStat(s.to_string())),
        }
    }
}

/// A full set of stat values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub strength: i32,
    pub perception: i32,
    pub intelligence: i32,
    pub dexterity: i32,
    pub speed: i32,
    pub stamina: i32,
}

impl Default for Stats {
    fn default() -> Self {
        Self::uniform(5)
    }
}

impl Stats {
    /// All stats set to `value`.
    #[must_use]
    pub const fn uniform(value: i32) -> Self {
        Self {
            strength: value,
            perception: value,
            intelligence: value,
            dexterity: value,
            speed: value,
            stamina: value,
        }
    }

    #[must_use]
    pub fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Strength => self.strength,
            Stat::Perception => self.perception,
            Stat::Intelligence => self.intelligence,
            Stat::Dexterity => self.dexterity,
            Stat::Speed => self.speed,
            Stat::Stamina => self.stamina,
        }
    }

    pub fn set(&mut self, stat: Stat, value: i32) {
        match stat {
            Stat::Strength => self.strength = value,
            Stat::Perception => self.perception = value,
            Stat::Intelligence => self.intelligence = value,
            Stat::Dexterity => self.dexterity = value,
            Stat::Speed => self.speed = value,
            Stat::Stamina => self.stamina = value,
        }
    }

    /// Apply `modifiers` on top of `self`.
    ///
    /// For each stat, an assigning modifier wins outright (the lowest assigned
    /// value if there are several). Otherwise the modifier values are summed
    /// onto the base and the result is clamped to the stat range.
    #[must_use]
    pub fn modified_by<'a, I>(&self, modifiers: I) -> Stats
    where
        I: Iterator<Item = &'a StatModifier> + Clone,
    {
        let mut result = *self;
        for stat in Stat::ALL {
            let applicable = modifiers.clone().filter(|m| m.stat == stat);

            let assigned = applicable.clone().filter(|m| m.assign_value).map(|m| m.value).min();
            let value = match assigned {
                Some(value) => value,
                None => {
                    let sum: i32 = applicable.map(|m| m.value).sum();
                    (self.get(stat) + sum).clamp(STAT_MIN, STAT_MAX)
                }
            };
            result.set(stat, value);
        }
        result
    }
}

/// A player character.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Canonical name.
    pub name: String,
    /// Name other players see. Differs from `name` while concealed.
    pub display_name: String,
    pub alive: bool,
    pub location: RoomId,
    /// Name of the hiding spot the player occupies, if any.
    pub hiding_spot: Option<String>,
    /// Whether the player currently receives their room's channel.
    pub in_room_channel: bool,
    pub is_moving: bool,
    pub base_stats: Stats,
    /// Base stats with status modifiers applied.
    pub stats: Stats,
    pub statuses: Vec<StatusInstance>,
    pub inventory: Vec<InventoryItem>,
}

impl Player {
    /// Create a living player with default stats.
    pub fn new(id: PlayerId, name: impl Into<String>, location: RoomId) -> Self {
        let name = name.into();
        Self {
            id,
            display_name: name.clone(),
            name,
            alive: true,
            location,
            hiding_spot: None,
            in_room_channel: true,
            is_moving: false,
            base_stats: Stats::default(),
            stats: Stats::default(),
            statuses: Vec::new(),
            inventory: Vec::new(),
        }
    }

    /// Set base stats (effective stats follow).
    #[must_use]
    pub fn with_stats(mut self, stats: Stats) -> Self {
        self.base_stats = stats;
        self.stats = stats;
        self
    }

    /// Add an item to the inventory.
    #[must_use]
    pub fn with_item(mut self, item: InventoryItem) -> Self {
        self.inventory.push(item);
        self
    }

    #[must_use]
    pub fn has_status(&self, status: &StatusId) -> bool {
        self.statuses.iter().any(|s| &s.status.id == status)
    }

    #[must_use]
    pub fn status(&self, status: &StatusId) -> Option<&StatusInstance> {
        self.statuses.iter().find(|s| &s.status.id == status)
    }

    pub fn status_mut(&mut self, status: &StatusId) -> Option<&mut StatusInstance> {
        self.statuses.iter_mut().find(|s| &s.status.id == status)
    }

    /// Remove a status instance, returning it.
    pub fn remove_status(&mut self, status: &StatusId) -> Option<StatusInstance> {
        let index = self.statuses.iter().position(|s| &s.status.id == status)?;
        Some(self.statuses.remove(index))
    }

    #[must_use]
    pub fn has_behavior_attribute(&self, attribute: &BehaviorAttribute) -> bool {
        self.statuses.iter().any(|s| s.status.has_attribute(attribute))
    }

    /// Statuses granting `attribute`.
    pub fn statuses_with_attribute<'a>(
        &'a self,
        attribute: &'a BehaviorAttribute,
    ) -> impl Iterator<Item = &'a StatusInstance> + 'a {
        self.statuses.iter().filter(move |s| s.status.has_attribute(attribute))
    }

    /// First inventory item made from `prefab`.
    #[must_use]
    pub fn find_item(&self, prefab: &PrefabId) -> Option<&InventoryItem> {
        self.inventory.iter().find(|item| &item.prefab == prefab)
    }

    /// Add an item, stacking it onto an identical one.
    pub fn give_item(&mut self, item: InventoryItem) {
        let stack = self.inventory.iter_mut().find(|held| {
            held.prefab == item.prefab && held.uses == item.uses && held.contents == item.contents
        });
        match stack {
            Some(held) => held.quantity += item.quantity,
            None => self.inventory.push(item),
        }
    }

    /// Remove one unit of `prefab` from the inventory.
    pub fn take_item(&mut self, prefab: &PrefabId) -> Option<InventoryItem> {
        let index = self.inventory.iter().position(|held| &held.prefab == prefab)?;
        let held = &mut self.inventory[index];
        if held.quantity > 1 {
            held.quantity -= 1;
            let mut unit = held.clone();
            unit.quantity = 1;
            Some(unit)
        } else {
            Some(self.inventory.remove(index))
        }
    }

    /// Units of `prefab` carried.
    #[must_use]
    pub fn count_item(&self, prefab: &PrefabId) -> u32 {
        self.inventory
            .iter()
            .filter(|held| &held.prefab == prefab)
            .map(|held| held.quantity)
            .sum()
    }

    /// Check the player's statuses allow `verb`.
    ///
    /// `disable all` blocks every verb that no carried status re-enables;
    /// `disable <verb>` blocks that verb outright.
    pub fn check_allowed(&self, verb: &str) -> Result<(), ActionError> {
        let enabled = self
            .statuses
            .iter()
            .flat_map(|s| s.status.attributes.iter())
            .any(|a| matches!(a, BehaviorAttribute::Enable(v) if v == verb));

        for instance in &self.statuses {
            for attribute in &instance.status.attributes {
                let blocks = match attribute {
                    BehaviorAttribute::DisableAll => !enabled,
                    BehaviorAttribute::Disable(v) => v == verb,
                    _ => false,
                };
                if blocks {
                    return Err(ActionError::Disabled {
                        status: instance.status.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Recompute effective stats from the self-modifiers of carried statuses.
    pub fn recalculate_stats(&mut self) {
        let modifiers: Vec<&StatModifier> = self
            .statuses
            .iter()
            .flat_map(|s| s.status.stat_modifiers.iter())
            .filter(|m| m.modifies_self)
            .collect();
        self.stats = self.base_stats.modified_by(modifiers.iter().copied());
    }

    /// Halt any movement in progress. Returns true if the player was moving.
    pub fn stop_moving(&mut self) -> bool {
        std::mem::replace(&mut self.is_moving, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;

    fn player() -> Player {
        Player::new(PlayerId::new(1), "Kyra", RoomId::new(0))
    }

    fn modifier(stat: Stat, assign: bool, value: i32) -> StatModifier {
        StatModifier {
            modifies_self: true,
            stat,
            assign_value: assign,
            value,
        }
    }

    #[test]
    fn test_stat_parsing() {
        assert_eq!("str".parse::<Stat>(), Ok(Stat::Strength));
        assert_eq!("Perception".parse::<Stat>(), Ok(Stat::Perception));
        assert_eq!("spd".parse::<Stat>(), Ok(Stat::Speed));
        assert!("luck".parse::<Stat>().is_err());
    }

    #[test]
    fn test_additive_modifiers_clamp() {
        let base = Stats::uniform(5);
        let mods = [modifier(Stat::Strength, false, 3), modifier(Stat::Strength, false, 4)];
        let stats = base.modified_by(mods.iter());
        assert_eq!(stats.strength, 10);
        assert_eq!(stats.speed, 5);

        let mods = [modifier(Stat::Speed, false, -9)];
        assert_eq!(base.modified_by(mods.iter()).speed, 1);
    }

    #[test]
    fn test_assign_takes_lowest() {
        let base = Stats::uniform(5);
        let mods = [
            modifier(Stat::Dexterity, true, 8),
            modifier(Stat::Dexterity, true, 2),
            modifier(Stat::Dexterity, false, 3),
        ];
        assert_eq!(base.modified_by(mods.iter()).dexterity, 2);
    }

    #[test]
    fn test_recalculate_ignores_other_modifiers() {
        let mut player = player();
        let mut status = Status::new("weak").with_stat_modifier(modifier(Stat::Strength, false, -2));
        status.stat_modifiers.push(StatModifier {
            modifies_self: false,
            stat: Stat::Strength,
            assign_value: false,
            value: -4,
        });
        player.statuses.push(StatusInstance::new(status));
        player.recalculate_stats();
        assert_eq!(player.stats.strength, 3);
        assert_eq!(player.base_stats.strength, 5);
    }

    #[test]
    fn test_check_allowed() {
        let mut player = player();
        assert!(player.check_allowed("move").is_ok());

        player
            .statuses
            .push(StatusInstance::new(Status::new("asleep").with_attribute("disable all")));
        assert!(matches!(player.check_allowed("say"), Err(ActionError::Disabled { .. })));

        player
            .statuses
            .push(StatusInstance::new(Status::new("sleepwalking").with_attribute("enable move")));
        assert!(player.check_allowed("move").is_ok());
        assert!(player.check_allowed("say").is_err());
    }

    #[test]
    fn test_disable_single_verb() {
        let mut player = player();
        player
            .statuses
            .push(StatusInstance::new(Status::new("mute").with_attribute("disable say")));
        assert!(player.check_allowed("say").is_err());
        assert!(player.check_allowed("take").is_ok());
    }

    #[test]
    fn test_stop_moving() {
        let mut player = player();
        player.is_moving = true;
        assert!(player.stop_moving());
        assert!(!player.stop_moving());
    }

    #[test]
    fn test_inventory_stacks() {
        let mut player = player();
        let coin = PrefabId::new("COIN");
        player.give_item(InventoryItem::new("COIN"));
        player.give_item(InventoryItem::new("COIN"));
        player.give_item(InventoryItem::new("COIN").with_uses(1));
        assert_eq!(player.inventory.len(), 2);
        assert_eq!(player.count_item(&coin), 3);

        let unit = player.take_item(&coin).unwrap();
        assert_eq!(unit.quantity, 1);
        assert_eq!(player.count_item(&coin), 2);
        player.take_item(&coin).unwrap();
        player.take_item(&coin).unwrap();
        assert!(player.take_item(&coin).is_none());
        assert!(player.inventory.is_empty());
    }
}
