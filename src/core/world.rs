//! World data: rooms, hiding spots, item prefabs, recipes and item placement.
//!
//! This is the part of the world the rules engine reads and edits. Room
//! graph traversal and movement timing belong to the host.

use serde::{Deserialize, Serialize};

use super::entity::{PlayerId, PrefabId, PuzzleId, RoomId, StatusId};

/// A way out of a room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exit {
    pub name: String,
    pub dest: RoomId,
    pub unlocked: bool,
}

/// A room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    /// Sent to players who come to in this room.
    pub description: String,
    pub exits: Vec<Exit>,
}

impl Room {
    pub fn new(id: RoomId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            exits: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_exit(mut self, name: impl Into<String>, dest: RoomId, unlocked: bool) -> Self {
        self.exits.push(Exit {
            name: name.into(),
            dest,
            unlocked,
        });
        self
    }

    /// Exit by case-insensitive name.
    #[must_use]
    pub fn exit(&self, name: &str) -> Option<&Exit> {
        self.exits.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    pub fn exit_mut(&mut self, name: &str) -> Option<&mut Exit> {
        self.exits.iter_mut().find(|e| e.name.eq_ignore_ascii_case(name))
    }
}

/// A place in a room players can hide in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HidingSpot {
    pub name: String,
    pub room: RoomId,
    pub capacity: usize,
    pub occupants: Vec<PlayerId>,
}

impl HidingSpot {
    pub fn new(name: impl Into<String>, room: RoomId, capacity: usize) -> Self {
        Self {
            name: name.into(),
            room,
            capacity,
            occupants: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.occupants.len() >= self.capacity
    }
}

/// Template every item instance is made from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefab {
    pub id: PrefabId,
    pub name: String,
    /// Phrase naming one instance, e.g. "a MASK". Used as the concealed
    /// display name.
    pub single_containing_phrase: String,
    pub usable: bool,
    /// Statuses inflicted on the target when used.
    pub effects: Vec<StatusId>,
    /// Statuses cured on the target when used.
    pub cures: Vec<StatusId>,
    pub weight: u32,
    /// Uses a fresh instance has. `None` is unlimited.
    pub uses: Option<u32>,
}

impl Prefab {
    pub fn new(id: impl Into<PrefabId>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            single_containing_phrase: format!("a {name}"),
            name,
            usable: false,
            effects: Vec::new(),
            cures: Vec::new(),
            weight: 0,
            uses: None,
        }
    }

    #[must_use]
    pub fn with_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.single_containing_phrase = phrase.into();
        self
    }

    #[must_use]
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    /// Make the prefab usable with the given effects and cures.
    #[must_use]
    pub fn usable(mut self, effects: &[&str], cures: &[&str]) -> Self {
        self.usable = true;
        self.effects = effects.iter().map(|s| StatusId::new(*s)).collect();
        self.cures = cures.iter().map(|s| StatusId::new(*s)).collect();
        self
    }

    #[must_use]
    pub fn with_uses(mut self, uses: u32) -> Self {
        self.uses = Some(uses);
        self
    }
}

/// Combining two ingredients produces the products.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Sorted so lookups are order-independent.
    pub ingredients: [PrefabId; 2],
    pub products: Vec<PrefabId>,
}

impl Recipe {
    pub fn new(a: impl Into<PrefabId>, b: impl Into<PrefabId>, products: &[&str]) -> Self {
        let mut ingredients = [a.into(), b.into()];
        ingredients.sort();
        Self {
            ingredients,
            products: products.iter().map(|p| PrefabId::new(*p)).collect(),
        }
    }

    /// Whether the recipe combines exactly `a` and `b`, in any order.
    #[must_use]
    pub fn combines(&self, a: &PrefabId, b: &PrefabId) -> bool {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        &self.ingredients[0] == lo && &self.ingredients[1] == hi
    }
}

/// Where a room item sits.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemContainer {
    Floor,
    /// Inside or on a fixture, by name.
    Fixture(String),
    /// Inside a weight or container puzzle.
    Puzzle(PuzzleId),
}

/// Items lying in a room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomItem {
    pub prefab: PrefabId,
    pub room: RoomId,
    pub container: ItemContainer,
    pub quantity: u32,
}

/// An item a player carries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub prefab: PrefabId,
    pub quantity: u32,
    /// Remaining uses. `None` is unlimited.
    pub uses: Option<u32>,
    /// Prefabs held inside this item (a tape inside a cassette case, ...).
    pub contents: Vec<PrefabId>,
}

impl InventoryItem {
    pub fn new(prefab: impl Into<PrefabId>) -> Self {
        Self {
            prefab: prefab.into(),
            quantity: 1,
            uses: None,
            contents: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_uses(mut self, uses: u32) -> Self {
        self.uses = Some(uses);
        self
    }

    #[must_use]
    pub fn with_contents(mut self, contents: &[&str]) -> Self {
        self.contents = contents.iter().map(|p| PrefabId::new(*p)).collect();
        self
    }

    /// The item's own prefab followed by its contents.
    pub fn identifiers(&self) -> impl Iterator<Item = &PrefabId> {
        std::iter::once(&self.prefab).chain(self.contents.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_exits() {
        let room = Room::new(RoomId::new(1), "lobby").with_exit("DOOR 1", RoomId::new(2), false);
        assert!(room.exit("door 1").is_some());
        assert!(!room.exit("DOOR 1").unwrap().unlocked);
        assert!(room.exit("DOOR 2").is_none());
    }

    #[test]
    fn test_hiding_spot_capacity() {
        let mut spot = HidingSpot::new("LOCKER", RoomId::new(0), 1);
        assert!(!spot.is_full());
        spot.occupants.push(PlayerId::new(1));
        assert!(spot.is_full());
    }

    #[test]
    fn test_recipe_order_independent() {
        let recipe = Recipe::new("WATER", "FLOUR", &["DOUGH"]);
        assert!(recipe.combines(&PrefabId::new("FLOUR"), &PrefabId::new("WATER")));
        assert!(recipe.combines(&PrefabId::new("WATER"), &PrefabId::new("FLOUR")));
        assert!(!recipe.combines(&PrefabId::new("WATER"), &PrefabId::new("WATER")));
    }

    #[test]
    fn test_item_identifiers() {
        let item = InventoryItem::new("CASSETTE").with_contents(&["SONG"]);
        let ids: Vec<_> = item.identifiers().map(PrefabId::as_str).collect();
        assert_eq!(ids, vec!["CASSETTE", "SONG"]);
    }
}
