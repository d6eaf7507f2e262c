//! Game state: the in-memory world the rules engine resolves against.
//!
//! ## GameState
//!
//! Owns every entity the engine touches (players, puzzles, rooms, items,
//! hiding spots), the status definitions, the scheduled-task queue and the
//! RNG. Lookups that the caller is expected to have validated come in two
//! forms: `player()` returns an `Option`, `require_player()` turns absence
//! into an `ActionError`.
//!
//! Cross-player facts are computed on demand rather than cached; see
//! [`GameState::any_player_has_status`].

use rustc_hash::FxHashMap;

use super::config::GameSettings;
use super::entity::{PlayerId, PrefabId, PuzzleId, RoomId, StatusId};
use super::error::ActionError;
use super::player::Player;
use super::rng::GameRng;
use super::timer::TimerQueue;
use super::world::{HidingSpot, ItemContainer, Prefab, Recipe, Room, RoomItem};
use crate::commands::{CommandContext, GameCommand};
use crate::puzzle::Puzzle;
use crate::status::{Status, StatusRegistry};

/// Work scheduled on the game's timer queue.
#[derive(Clone, Debug, PartialEq)]
pub enum TimerTask {
    /// One countdown tick of a timed status.
    StatusTick { player: PlayerId, status: StatusId },
    /// The remainder of a puzzle command list, after a `wait`.
    DeferredCommands {
        commands: Vec<GameCommand>,
        context: CommandContext,
    },
}

/// Complete game state.
#[derive(Clone, Debug)]
pub struct GameState {
    pub settings: GameSettings,
    pub rng: GameRng,
    pub timers: TimerQueue<TimerTask>,
    pub statuses: StatusRegistry,
    players: FxHashMap<PlayerId, Player>,
    puzzles: FxHashMap<PuzzleId, Puzzle>,
    rooms: FxHashMap<RoomId, Room>,
    prefabs: FxHashMap<PrefabId, Prefab>,
    recipes: Vec<Recipe>,
    hiding_spots: Vec<HidingSpot>,
    room_items: Vec<RoomItem>,
}

impl GameState {
    /// Create an empty world.
    #[must_use]
    pub fn new(settings: GameSettings, rng: GameRng) -> Self {
        Self {
            settings,
            rng,
            timers: TimerQueue::new(),
            statuses: StatusRegistry::new(),
            players: FxHashMap::default(),
            puzzles: FxHashMap::default(),
            rooms: FxHashMap::default(),
            prefabs: FxHashMap::default(),
            recipes: Vec::new(),
            hiding_spots: Vec::new(),
            room_items: Vec::new(),
        }
    }

    // === Loading ===

    pub fn add_player(&mut self, player: Player) {
        self.players.insert(player.id, player);
    }

    pub fn add_puzzle(&mut self, puzzle: Puzzle) {
        self.puzzles.insert(puzzle.id, puzzle);
    }

    pub fn add_room(&mut self, room: Room) {
        self.rooms.insert(room.id, room);
    }

    pub fn add_prefab(&mut self, prefab: Prefab) {
        self.prefabs.insert(prefab.id.clone(), prefab);
    }

    pub fn add_status(&mut self, status: Status) {
        self.statuses.register(status);
    }

    pub fn add_recipe(&mut self, recipe: Recipe) {
        self.recipes.push(recipe);
    }

    pub fn add_hiding_spot(&mut self, spot: HidingSpot) {
        self.hiding_spots.push(spot);
    }

    pub fn add_room_item(&mut self, item: RoomItem) {
        self.room_items.push(item);
    }

    // === Players ===

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(&id)
    }

    pub fn require_player(&self, id: PlayerId) -> Result<&Player, ActionError> {
        self.players.get(&id).ok_or(ActionError::UnknownPlayer(id))
    }

    pub fn require_player_mut(&mut self, id: PlayerId) -> Result<&mut Player, ActionError> {
        self.players.get_mut(&id).ok_or(ActionError::UnknownPlayer(id))
    }

    /// Player by canonical name, case-insensitively.
    #[must_use]
    pub fn player_by_name(&self, name: &str) -> Option<&Player> {
        self.players.values().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Ids of living players, in id order.
    #[must_use]
    pub fn living_players(&self) -> Vec<PlayerId> {
        let mut ids: Vec<_> = self.players.values().filter(|p| p.alive).map(|p| p.id).collect();
        ids.sort();
        ids
    }

    /// Living players in `room`, in id order.
    #[must_use]
    pub fn players_in_room(&self, room: RoomId) -> Vec<PlayerId> {
        let mut ids: Vec<_> = self
            .players
            .values()
            .filter(|p| p.alive && p.location == room)
            .map(|p| p.id)
            .collect();
        ids.sort();
        ids
    }

    /// Whether any living player carries `status`.
    #[must_use]
    pub fn any_player_has_status(&self, status: &StatusId) -> bool {
        self.players.values().any(|p| p.alive && p.has_status(status))
    }

    // === Puzzles ===

    #[must_use]
    pub fn puzzle(&self, id: PuzzleId) -> Option<&Puzzle> {
        self.puzzles.get(&id)
    }

    pub fn puzzle_mut(&mut self, id: PuzzleId) -> Option<&mut Puzzle> {
        self.puzzles.get_mut(&id)
    }

    pub fn require_puzzle(&self, id: PuzzleId) -> Result<&Puzzle, ActionError> {
        self.puzzles.get(&id).ok_or(ActionError::UnknownPuzzle(id))
    }

    pub fn require_puzzle_mut(&mut self, id: PuzzleId) -> Result<&mut Puzzle, ActionError> {
        self.puzzles.get_mut(&id).ok_or(ActionError::UnknownPuzzle(id))
    }

    /// Puzzle by name, case-insensitively. With `room`, only puzzles there.
    #[must_use]
    pub fn puzzle_by_name(&self, name: &str, room: Option<RoomId>) -> Option<&Puzzle> {
        let mut matches: Vec<_> = self
            .puzzles
            .values()
            .filter(|p| p.name.eq_ignore_ascii_case(name))
            .filter(|p| room.map_or(true, |r| p.location == r))
            .collect();
        matches.sort_by_key(|p| p.id);
        matches.into_iter().next()
    }

    pub fn puzzles(&self) -> impl Iterator<Item = &Puzzle> {
        self.puzzles.values()
    }

    // === Rooms ===

    #[must_use]
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    pub fn room_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(&id)
    }

    /// Room by name, case-insensitively.
    #[must_use]
    pub fn room_by_name(&self, name: &str) -> Option<&Room> {
        self.rooms.values().find(|r| r.name.eq_ignore_ascii_case(name))
    }

    // === Items ===

    #[must_use]
    pub fn prefab(&self, id: &PrefabId) -> Option<&Prefab> {
        self.prefabs.get(id)
    }

    /// Recipe combining `a` and `b`.
    #[must_use]
    pub fn recipe_for(&self, a: &PrefabId, b: &PrefabId) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.combines(a, b))
    }

    #[must_use]
    pub fn room_items(&self) -> &[RoomItem] {
        &self.room_items
    }

    pub fn room_items_mut(&mut self) -> &mut Vec<RoomItem> {
        &mut self.room_items
    }

    /// Items currently inside a puzzle.
    pub fn items_in_puzzle(&self, puzzle: PuzzleId) -> impl Iterator<Item = &RoomItem> {
        self.room_items
            .iter()
            .filter(move |i| i.container == ItemContainer::Puzzle(puzzle) && i.quantity > 0)
    }

    /// Total weight of the items inside a puzzle.
    #[must_use]
    pub fn weight_in_puzzle(&self, puzzle: PuzzleId) -> u32 {
        self.items_in_puzzle(puzzle)
            .map(|i| self.prefab(&i.prefab).map_or(0, |p| p.weight).saturating_mul(i.quantity))
            .fold(0, u32::saturating_add)
    }

    /// Sorted prefab ids of the items inside a puzzle, one entry per unit.
    #[must_use]
    pub fn prefabs_in_puzzle(&self, puzzle: PuzzleId) -> Vec<PrefabId> {
        let mut ids: Vec<_> = self
            .items_in_puzzle(puzzle)
            .flat_map(|i| std::iter::repeat(i.prefab.clone()).take(i.quantity as usize))
            .collect();
        ids.sort();
        ids
    }

    // === Hiding spots ===

    pub fn hiding_spot_mut(&mut self, room: RoomId, name: &str) -> Option<&mut HidingSpot> {
        self.hiding_spots
            .iter_mut()
            .find(|s| s.room == room && s.name.eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub fn hiding_spot(&self, room: RoomId, name: &str) -> Option<&HidingSpot> {
        self.hiding_spots
            .iter()
            .find(|s| s.room == room && s.name.eq_ignore_ascii_case(name))
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameSettings::default(), GameRng::default())
    }
}
