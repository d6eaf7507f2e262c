//! Action idempotency across every verb.
//!
//! Each verb is performed once, then the same action instance is performed
//! again. The second call must fail with `AlreadyPerformed` and leave the
//! world and every collaborator exactly as the first call left them.

use std::time::Duration;

use proptest::prelude::*;

use rust_ifgame::actions;
use rust_ifgame::core::{
    Action, ActionType, GameRng, GameSettings, GameState, HidingSpot, InventoryItem, ItemContainer, Player,
    PlayerId, Prefab, PuzzleId, Recipe, Room, RoomId, StatusId,
};
use rust_ifgame::ports::Transcript;
use rust_ifgame::puzzle::{AttemptRequest, Puzzle, PuzzleType, SolveOptions};
use rust_ifgame::status::{CureOptions, InflictOptions, Status};
use rust_ifgame::{ActionError, Game};

const LOBBY: RoomId = RoomId::new(0);
const HALL: RoomId = RoomId::new(1);
const KYRA: PlayerId = PlayerId::new(1);
const SAFE: PuzzleId = PuzzleId::new(1);

#[derive(Clone, Copy, Debug)]
enum Verb {
    Inflict,
    Cure,
    Attempt,
    Solve,
    Unsolve,
    Hide,
    Unhide,
    Move,
    ForceMove,
    Lock,
    Use,
    Craft,
    Take,
    Drop,
    Die,
}

const VERBS: [Verb; 15] = [
    Verb::Inflict,
    Verb::Cure,
    Verb::Attempt,
    Verb::Solve,
    Verb::Unsolve,
    Verb::Hide,
    Verb::Unhide,
    Verb::Move,
    Verb::ForceMove,
    Verb::Lock,
    Verb::Use,
    Verb::Craft,
    Verb::Take,
    Verb::Drop,
    Verb::Die,
];

fn game(seed: u64) -> Game<Transcript> {
    let mut state = GameState::new(GameSettings::default(), GameRng::new(seed));
    state.add_room(Room::new(LOBBY, "lobby").with_exit("DOOR", HALL, true));
    state.add_room(Room::new(HALL, "hall"));
    state.add_player(
        Player::new(KYRA, "Kyra", LOBBY)
            .with_item(InventoryItem::new("TONIC").with_uses(2))
            .with_item(InventoryItem::new("STICK"))
            .with_item(InventoryItem::new("ROCK")),
    );
    state.add_status(Status::new("chilled").with_duration(Duration::from_secs(10)));
    state.add_status(Status::new("hidden").with_attribute("hidden"));
    state.add_prefab(Prefab::new("TONIC", "TONIC").usable(&[], &["chilled"]).with_uses(2));
    state.add_prefab(Prefab::new("STICK", "STICK"));
    state.add_prefab(Prefab::new("ROCK", "ROCK"));
    state.add_prefab(Prefab::new("TORCH", "TORCH"));
    state.add_recipe(Recipe::new("STICK", "ROCK", &["TORCH"]));
    state.add_hiding_spot(HidingSpot::new("CLOSET", LOBBY, 2));
    state.add_puzzle(Puzzle::new(SAFE, "SAFE", LOBBY, PuzzleType::Password).with_solutions(&["OPEN"]));
    Game::new(state, Transcript::new())
}

/// Bring the world into a state where `verb` can succeed.
fn prepare(game: &mut Game<Transcript>, verb: Verb) {
    let chilled = StatusId::new("chilled");
    let mut setup = game.action(ActionType::Inflict, KYRA, true).unwrap();
    match verb {
        Verb::Cure | Verb::Use => {
            actions::perform_inflict(
                &mut game.state,
                &mut game.services,
                &mut setup,
                KYRA,
                &chilled,
                InflictOptions::default(),
            )
            .unwrap();
        }
        Verb::Unsolve => game.state.puzzle_mut(SAFE).unwrap().solved = true,
        Verb::Unhide => actions::perform_hide(&mut game.state, &mut game.services, &mut setup, "CLOSET").unwrap(),
        Verb::Take => {
            let mut drop = game.action(ActionType::Drop, KYRA, true).unwrap();
            let rock = "ROCK".into();
            actions::perform_drop(&mut game.state, &mut game.services, &mut drop, &rock, &ItemContainer::Floor).unwrap();
        }
        _ => {}
    }
    game.services.clear();
}

fn perform(game: &mut Game<Transcript>, verb: Verb, action: &mut Action) -> Result<(), ActionError> {
    let state = &mut game.state;
    let services = &mut game.services;
    let chilled = StatusId::new("chilled");
    match verb {
        Verb::Inflict => actions::perform_inflict(state, services, action, KYRA, &chilled, InflictOptions::default()).map(|_| ()),
        Verb::Cure => actions::perform_cure(state, services, action, KYRA, &chilled, CureOptions::default()).map(|_| ()),
        Verb::Attempt => {
            let request = AttemptRequest::new(SAFE, "use").with_password("OPEN");
            actions::perform_attempt(state, services, action, &request).map(|_| ())
        }
        Verb::Solve => actions::perform_solve(state, services, action, SAFE, SolveOptions::default()),
        Verb::Unsolve => actions::perform_unsolve(state, services, action, SAFE, true),
        Verb::Hide => actions::perform_hide(state, services, action, "CLOSET"),
        Verb::Unhide => actions::perform_unhide(state, services, action),
        Verb::Move => actions::perform_move(state, services, action, "DOOR").map(|_| ()),
        Verb::ForceMove => actions::force_move(state, services, action, HALL),
        Verb::Lock => actions::set_exit_lock(state, services, action, LOBBY, "DOOR", true),
        Verb::Use => actions::perform_use(state, services, action, &"TONIC".into(), None),
        Verb::Craft => actions::perform_craft(state, services, action, &"STICK".into(), &"ROCK".into()).map(|_| ()),
        Verb::Take => actions::perform_take(state, services, action, &"ROCK".into(), &ItemContainer::Floor).map(|_| ()),
        Verb::Drop => actions::perform_drop(state, services, action, &"STICK".into(), &ItemContainer::Floor).map(|_| ()),
        Verb::Die => actions::perform_die(state, services, action),
    }
}

/// Everything observable about the world and the collaborators.
fn snapshot(game: &Game<Transcript>) -> String {
    let player = game.state.player(KYRA).unwrap();
    let puzzle = game.state.puzzle(SAFE).unwrap();
    format!(
        "{:?}|{}|{:?}|{:?}|{:?}|{:?}|{:?}|{}|{}|{}|{}",
        player.statuses.iter().map(|s| s.id().to_string()).collect::<Vec<_>>(),
        player.alive,
        player.location,
        player.hiding_spot,
        player.inventory,
        game.state.room_items(),
        game.state.room(LOBBY).unwrap().exits,
        puzzle.solved,
        game.state.timers.len(),
        game.services.events().len(),
        game.services.log_entries().len(),
    )
}

proptest! {
    #[test]
    fn test_second_perform_is_noop(verb in proptest::sample::select(VERBS.to_vec()), seed in any::<u64>()) {
        let mut game = game(seed);
        prepare(&mut game, verb);

        let mut action = game.action(ActionType::Attempt, KYRA, false).unwrap();
        let first = perform(&mut game, verb, &mut action);
        prop_assert!(first.is_ok(), "{:?} failed: {:?}", verb, first);
        let after_first = snapshot(&game);

        let second = perform(&mut game, verb, &mut action);
        prop_assert_eq!(second, Err(ActionError::AlreadyPerformed));
        prop_assert_eq!(snapshot(&game), after_first);
    }
}
