//! Puzzle attempt integration tests.
//!
//! These run the attempt scenarios end to end through the action entry
//! points, including take/drop re-evaluation and puzzle command lists.

use proptest::prelude::*;

use rust_ifgame::actions;
use rust_ifgame::commands::parse_commands;
use rust_ifgame::core::{
    ActionType, GameRng, GameSettings, GameState, InventoryItem, ItemContainer, Player, PlayerId, PrefabId,
    PuzzleId, Room, RoomId, RoomItem, StatusId,
};
use rust_ifgame::ports::{AttemptResult, LogKind, Narration, Transcript};
use rust_ifgame::puzzle::{
    AttemptOutcome, AttemptRequest, CommandSet, Puzzle, PuzzleDescriptions, PuzzleType, Requirement,
};
use rust_ifgame::status::Status;
use rust_ifgame::{ActionError, Game};

const ROOM: RoomId = RoomId::new(0);
const HALL: RoomId = RoomId::new(1);
const KYRA: PlayerId = PlayerId::new(1);
const PUZZLE: PuzzleId = PuzzleId::new(7);

fn game_with(puzzle: Puzzle) -> Game<Transcript> {
    let mut state = GameState::new(GameSettings::default(), GameRng::new(42));
    state.add_room(Room::new(ROOM, "study").with_exit("DOOR", HALL, false));
    state.add_room(Room::new(HALL, "hall"));
    state.add_player(Player::new(KYRA, "Kyra", ROOM));
    state.add_puzzle(puzzle);
    Game::new(state, Transcript::new())
}

fn attempt(game: &mut Game<Transcript>, request: AttemptRequest) -> Result<AttemptOutcome, ActionError> {
    let mut action = game.action(ActionType::Attempt, KYRA, false).unwrap();
    actions::perform_attempt(&mut game.state, &mut game.services, &mut action, &request)
}

fn puzzle(game: &Game<Transcript>) -> &Puzzle {
    game.state.puzzle(PUZZLE).unwrap()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_password_puzzle() {
    let mut game = game_with(
        Puzzle::new(PUZZLE, "SAFE", ROOM, PuzzleType::Password)
            .with_solutions(&["OPEN"])
            .with_attempts(5),
    );

    assert_eq!(
        attempt(&mut game, AttemptRequest::new(PUZZLE, "use")),
        Ok(AttemptOutcome::Reply("You need to enter a password.".into()))
    );
    assert_eq!(puzzle(&game).remaining_attempts, Some(5));

    assert_eq!(
        attempt(&mut game, AttemptRequest::new(PUZZLE, "use").with_password("wrong")),
        Ok(AttemptOutcome::Failed)
    );
    assert_eq!(puzzle(&game).remaining_attempts, Some(4));

    assert_eq!(
        attempt(&mut game, AttemptRequest::new(PUZZLE, "use").with_password("OPEN")),
        Ok(AttemptOutcome::Solved("OPEN".into()))
    );
    assert!(puzzle(&game).solved);
    assert_eq!(puzzle(&game).outcome.as_deref(), Some("OPEN"));
    assert_eq!(game.services.log_kinds(), vec![LogKind::AttemptFailed, LogKind::Solve]);
}

#[test]
fn test_combination_lock_relocks() {
    let mut game = game_with(
        Puzzle::new(PUZZLE, "PADLOCK", ROOM, PuzzleType::CombinationLock)
            .with_solutions(&["1-2-3"])
            .solved(Some("1-2-3")),
    );

    assert_eq!(
        attempt(&mut game, AttemptRequest::new(PUZZLE, "use")),
        Ok(AttemptOutcome::AlreadySolved)
    );
    assert!(puzzle(&game).solved);

    assert_eq!(
        attempt(&mut game, AttemptRequest::new(PUZZLE, "use").with_password("9-9-9")),
        Ok(AttemptOutcome::Unsolved)
    );
    assert!(!puzzle(&game).solved);
}

#[test]
fn test_container_take_and_drop() {
    let mut game = game_with(
        Puzzle::new(PUZZLE, "BOX", ROOM, PuzzleType::Container).with_solutions(&["Item:KEY+Item:NOTE"]),
    );
    game.state.add_room_item(RoomItem {
        prefab: PrefabId::new("KEY"),
        room: ROOM,
        container: ItemContainer::Puzzle(PUZZLE),
        quantity: 1,
    });
    game.state
        .player_mut(KYRA)
        .unwrap()
        .give_item(InventoryItem::new("NOTE"));
    let into_box = ItemContainer::Puzzle(PUZZLE);
    let note = PrefabId::new("NOTE");

    let mut drop = game.action(ActionType::Drop, KYRA, false).unwrap();
    let outcome = actions::perform_drop(&mut game.state, &mut game.services, &mut drop, &note, &into_box).unwrap();
    assert_eq!(outcome, Some(AttemptOutcome::Solved("Item:KEY+Item:NOTE".into())));
    assert!(puzzle(&game).solved);

    game.services.clear();
    let mut take = game.action(ActionType::Take, KYRA, false).unwrap();
    let outcome = actions::perform_take(&mut game.state, &mut game.services, &mut take, &note, &into_box).unwrap();
    assert_eq!(outcome, Some(AttemptOutcome::Failed));
    assert!(!puzzle(&game).solved);
    assert_eq!(
        game.services.log_kinds(),
        vec![LogKind::Take, LogKind::Unsolve, LogKind::AttemptFailed]
    );
}

#[test]
fn test_probability_single_outcome() {
    for seed in 0..10 {
        let mut game = game_with(Puzzle::new(PUZZLE, "COIN", ROOM, PuzzleType::Probability).with_solutions(&["X"]));
        game.state.rng = GameRng::new(seed);
        assert_eq!(
            attempt(&mut game, AttemptRequest::new(PUZZLE, "use")),
            Ok(AttemptOutcome::Solved("X".into()))
        );
        assert_eq!(puzzle(&game).outcome.as_deref(), Some("X"));
    }
}

#[test]
fn test_key_lock_without_key() {
    let mut game = game_with(
        Puzzle::new(PUZZLE, "CABINET", ROOM, PuzzleType::KeyLock)
            .with_solutions(&["Item: KEY"])
            .solved(None)
            .with_requirements_not_met("You don't have the key."),
    );

    assert_eq!(
        attempt(&mut game, AttemptRequest::new(PUZZLE, "lock")),
        Ok(AttemptOutcome::WithoutItem)
    );
    assert!(puzzle(&game).solved);
    assert!(game.services.narrations().any(|n| matches!(
        n,
        Narration::PuzzleAttempted {
            result: AttemptResult::WithoutItem,
            ..
        }
    )));
}

// =============================================================================
// Command lists
// =============================================================================

#[test]
fn test_solved_commands_run() {
    let commands = parse_commands(&["unlock study DOOR", "inflict player relieved"]).unwrap();
    let mut game = game_with(
        Puzzle::new(PUZZLE, "LEVER", ROOM, PuzzleType::Toggle)
            .with_command_set(CommandSet::new(&[]).on_solved(commands)),
    );
    game.state.add_status(Status::new("relieved"));

    assert!(matches!(
        attempt(&mut game, AttemptRequest::new(PUZZLE, "use")),
        Ok(AttemptOutcome::Solved(_))
    ));
    assert!(game.state.room(ROOM).unwrap().exit("DOOR").unwrap().unlocked);
    assert!(game
        .state
        .player(KYRA)
        .unwrap()
        .has_status(&StatusId::new("relieved")));

    let mut walk = game.action(ActionType::Move, KYRA, false).unwrap();
    assert_eq!(
        actions::perform_move(&mut game.state, &mut game.services, &mut walk, "DOOR"),
        Ok(actions::MoveOutcome::Moved(HALL))
    );
}

#[test]
fn test_chained_solve_skips_own_commands() {
    let button = PuzzleId::new(8);
    let lever_commands = CommandSet::new(&[]).on_solved(parse_commands(&["solve BUTTON"]).unwrap());
    let button_commands = CommandSet::new(&[]).on_solved(parse_commands(&["inflict player relieved"]).unwrap());
    let mut game = game_with(
        Puzzle::new(PUZZLE, "LEVER", ROOM, PuzzleType::Toggle).with_command_set(lever_commands),
    );
    game.state
        .add_puzzle(Puzzle::new(button, "BUTTON", ROOM, PuzzleType::Toggle).with_command_set(button_commands));
    game.state.add_status(Status::new("relieved"));

    attempt(&mut game, AttemptRequest::new(PUZZLE, "use")).unwrap();
    assert!(game.state.puzzle(button).unwrap().solved);
    assert!(!game
        .state
        .player(KYRA)
        .unwrap()
        .has_status(&StatusId::new("relieved")));
}

#[test]
fn test_puzzles_solving_each_other() {
    let button = PuzzleId::new(8);
    let lever_commands = CommandSet::new(&[])
        .on_solved(parse_commands(&["solve BUTTON"]).unwrap())
        .on_unsolved(parse_commands(&["unsolve BUTTON"]).unwrap());
    let button_commands = CommandSet::new(&[])
        .on_solved(parse_commands(&["solve LEVER"]).unwrap())
        .on_unsolved(parse_commands(&["unsolve LEVER"]).unwrap());
    let mut game = game_with(
        Puzzle::new(PUZZLE, "LEVER", ROOM, PuzzleType::Toggle).with_command_set(lever_commands),
    );
    game.state
        .add_puzzle(Puzzle::new(button, "BUTTON", ROOM, PuzzleType::Toggle).with_command_set(button_commands));

    attempt(&mut game, AttemptRequest::new(PUZZLE, "use")).unwrap();
    assert!(puzzle(&game).solved);
    assert!(game.state.puzzle(button).unwrap().solved);
    assert_eq!(game.services.log_kinds(), vec![LogKind::Solve, LogKind::Solve]);

    attempt(&mut game, AttemptRequest::new(PUZZLE, "use")).unwrap();
    assert!(!puzzle(&game).solved);
    assert!(!game.state.puzzle(button).unwrap().solved);
}

#[test]
fn test_descriptions_sent() {
    let descriptions = PuzzleDescriptions {
        correct: "The safe swings open.".into(),
        incorrect: "Nothing happens.".into(),
        ..PuzzleDescriptions::default()
    };
    let mut game = game_with(
        Puzzle::new(PUZZLE, "SAFE", ROOM, PuzzleType::Password)
            .with_solutions(&["OPEN"])
            .with_descriptions(descriptions),
    );
    attempt(&mut game, AttemptRequest::new(PUZZLE, "use").with_password("no")).unwrap();
    attempt(&mut game, AttemptRequest::new(PUZZLE, "use").with_password("OPEN")).unwrap();
    assert_eq!(
        game.services.notifications_for(KYRA),
        vec!["Nothing happens.", "The safe swings open."]
    );
}

// =============================================================================
// Requirements
// =============================================================================

proptest! {
    /// Accessibility follows whether the required item is carried at the
    /// time of each attempt.
    #[test]
    fn test_requirement_recomputed(carrying in proptest::collection::vec(any::<bool>(), 1..12)) {
        let mut game = game_with(
            Puzzle::new(PUZZLE, "TERMINAL", ROOM, PuzzleType::Password)
                .with_solutions(&["4321"])
                .with_requirement(Requirement::Prefab(PrefabId::new("BADGE")))
                .with_requirements_not_met("The terminal wants a badge."),
        );
        let badge = PrefabId::new("BADGE");

        for carry in carrying {
            let player = game.state.player_mut(KYRA).unwrap();
            if carry && player.count_item(&badge) == 0 {
                player.give_item(InventoryItem::new("BADGE"));
            } else if !carry {
                player.take_item(&badge);
            }

            let outcome = attempt(&mut game, AttemptRequest::new(PUZZLE, "use").with_password("0000")).unwrap();
            prop_assert_eq!(puzzle(&game).accessible, carry);
            if carry {
                prop_assert_eq!(outcome, AttemptOutcome::Failed);
            } else {
                prop_assert_eq!(outcome, AttemptOutcome::RequirementsNotMet);
            }
            prop_assert!(!puzzle(&game).solved);
        }
    }
}
