//! Per-type attempt rules.
//!
//! Every puzzle type has one handler. A handler looks at an attempt that
//! passed the shared pre-checks (accessibility, moderator gate, attempt
//! budget, required item) and returns a [`Verdict`]; it never mutates
//! anything. The resolver carries the verdict out.
//!
//! Randomness stays with the resolver too: probability handlers return
//! `SolveAtRandom` / `SolveByRoll` rather than rolling themselves.

use super::definition::{Puzzle, PuzzleType};
use super::solution;
use crate::core::{InventoryItem, PrefabId, Stat};

/// What an attempt looks like to a handler.
#[derive(Clone, Debug)]
pub struct AttemptContext<'a> {
    pub puzzle: &'a Puzzle,
    /// Entered password, or the matched item solution.
    pub password: &'a str,
    /// Command alias used (`use`, `lock`, `unlock`, `take`, `drop`, ...).
    pub command: &'a str,
    /// An item solution was found on the player or supplied.
    pub has_required_item: bool,
    /// Item supplied with the attempt.
    pub item: Option<&'a InventoryItem>,
    /// Containing phrase of the supplied item's prefab.
    pub item_phrase: Option<&'a str>,
    /// Acting player's name.
    pub player_name: &'a str,
    /// Display name of the targeted player, for room player puzzles.
    pub target_name: Option<&'a str>,
    /// Prefabs currently inside the puzzle, one entry per unit.
    pub contained: &'a [PrefabId],
    pub command_prefix: &'a str,
}

impl AttemptContext<'_> {
    fn is_solution(&self, candidate: &str) -> bool {
        self.puzzle.has_solution(candidate)
    }
}

/// Decision on an attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Solve with this outcome.
    Solve(String),
    /// Solve with a uniformly chosen solution.
    SolveAtRandom,
    /// Solve with the solution a stat roll lands on.
    SolveByRoll(Stat),
    Unsolve,
    /// Unsolve if solved, then solve with the outcome or fail without one.
    Reevaluate(Option<String>),
    /// Wrong answer; costs an attempt.
    Fail,
    /// Wrong item; costs an attempt and names the item.
    FailWithItem,
    AlreadySolved,
    /// The player lacks the item the attempt needs.
    WithoutItem,
    /// Answer the player directly; nothing changes.
    Reply(String),
}

/// Attempt rules for one puzzle type.
pub trait PuzzleHandler: Sync {
    fn decide(&self, ctx: &AttemptContext<'_>) -> Verdict;
}

impl PuzzleType {
    /// Handler implementing this type's attempt rules.
    #[must_use]
    pub fn handler(self) -> &'static dyn PuzzleHandler {
        match self {
            PuzzleType::Password => &PasswordHandler,
            PuzzleType::Interact | PuzzleType::Matrix => &InteractHandler,
            PuzzleType::Toggle => &ToggleHandler,
            PuzzleType::CombinationLock => &CombinationLockHandler,
            PuzzleType::KeyLock => &KeyLockHandler,
            PuzzleType::Probability => &ProbabilityHandler,
            PuzzleType::StatProbability(_) => &StatProbabilityHandler,
            PuzzleType::Channels => &ChannelsHandler,
            PuzzleType::Weight => &WeightHandler,
            PuzzleType::Container => &ContainerHandler,
            PuzzleType::Switch => &SwitchHandler,
            PuzzleType::Option => &OptionHandler,
            PuzzleType::Media => &MediaHandler,
            PuzzleType::Player | PuzzleType::RestrictedExit => &PlayerHandler,
            PuzzleType::RoomPlayer => &RoomPlayerHandler,
            PuzzleType::HiddenObject => &HiddenObjectHandler,
        }
    }
}

struct PasswordHandler;

impl PuzzleHandler for PasswordHandler {
    fn decide(&self, ctx: &AttemptContext<'_>) -> Verdict {
        if ctx.puzzle.solved {
            Verdict::AlreadySolved
        } else if ctx.password.is_empty() {
            Verdict::Reply("You need to enter a password.".to_string())
        } else if ctx.is_solution(ctx.password) {
            Verdict::Solve(ctx.password.to_string())
        } else {
            Verdict::Fail
        }
    }
}

/// Interact and matrix.
struct InteractHandler;

impl PuzzleHandler for InteractHandler {
    fn decide(&self, ctx: &AttemptContext<'_>) -> Verdict {
        if ctx.puzzle.solved {
            Verdict::AlreadySolved
        } else {
            Verdict::Solve(ctx.password.to_string())
        }
    }
}

struct ToggleHandler;

impl PuzzleHandler for ToggleHandler {
    fn decide(&self, ctx: &AttemptContext<'_>) -> Verdict {
        match (ctx.puzzle.solved, ctx.has_required_item) {
            (true, true) => Verdict::Unsolve,
            (true, false) => Verdict::WithoutItem,
            (false, _) => Verdict::Solve(ctx.password.to_string()),
        }
    }
}

struct CombinationLockHandler;

impl PuzzleHandler for CombinationLockHandler {
    fn decide(&self, ctx: &AttemptContext<'_>) -> Verdict {
        let name = ctx.puzzle.display_name();
        if ctx.puzzle.solved {
            if ctx.command == "unlock" {
                Verdict::Reply(format!("{name} is already unlocked."))
            } else if ctx.command != "lock" && (ctx.password.is_empty() || ctx.is_solution(ctx.password)) {
                Verdict::AlreadySolved
            } else {
                Verdict::Unsolve
            }
        } else if ctx.command == "lock" {
            Verdict::Reply(format!("{name} is already locked."))
        } else if ctx.password.is_empty() {
            Verdict::Reply("You need to enter a combination.".to_string())
        } else if ctx.is_solution(ctx.password) {
            Verdict::Solve(ctx.password.to_string())
        } else {
            Verdict::Fail
        }
    }
}

struct KeyLockHandler;

impl PuzzleHandler for KeyLockHandler {
    fn decide(&self, ctx: &AttemptContext<'_>) -> Verdict {
        let name = ctx.puzzle.display_name();
        if ctx.puzzle.solved {
            match ctx.command {
                "unlock" => Verdict::Reply(format!("{name} is already unlocked.")),
                "lock" if ctx.has_required_item => Verdict::Unsolve,
                "lock" => Verdict::WithoutItem,
                _ => Verdict::AlreadySolved,
            }
        } else if ctx.command == "lock" {
            Verdict::Reply(format!("{name} is already locked."))
        } else {
            Verdict::Solve(ctx.password.to_string())
        }
    }
}

struct ProbabilityHandler;

impl PuzzleHandler for ProbabilityHandler {
    fn decide(&self, ctx: &AttemptContext<'_>) -> Verdict {
        if ctx.puzzle.solved {
            Verdict::AlreadySolved
        } else {
            Verdict::SolveAtRandom
        }
    }
}

struct StatProbabilityHandler;

impl PuzzleHandler for StatProbabilityHandler {
    fn decide(&self, ctx: &AttemptContext<'_>) -> Verdict {
        match ctx.puzzle.puzzle_type {
            _ if ctx.puzzle.solved => Verdict::AlreadySolved,
            PuzzleType::StatProbability(stat) => Verdict::SolveByRoll(stat),
            _ => Verdict::SolveAtRandom,
        }
    }
}

struct ChannelsHandler;

impl PuzzleHandler for ChannelsHandler {
    fn decide(&self, ctx: &AttemptContext<'_>) -> Verdict {
        if ctx.puzzle.solved {
            if ctx.password.is_empty() {
                Verdict::Unsolve
            } else if ctx.is_solution(ctx.password) {
                Verdict::Solve(ctx.password.to_string())
            } else {
                Verdict::Fail
            }
        } else if ctx.is_solution(ctx.password) {
            Verdict::Solve(ctx.password.to_string())
        } else {
            // Tune back to the last channel.
            Verdict::Solve(ctx.puzzle.outcome.clone().unwrap_or_default())
        }
    }
}

struct WeightHandler;

impl PuzzleHandler for WeightHandler {
    fn decide(&self, ctx: &AttemptContext<'_>) -> Verdict {
        if ctx.is_solution(ctx.password) {
            Verdict::Solve(ctx.password.to_string())
        } else if ctx.puzzle.solved {
            Verdict::Unsolve
        } else {
            Verdict::Fail
        }
    }
}

struct ContainerHandler;

impl PuzzleHandler for ContainerHandler {
    fn decide(&self, ctx: &AttemptContext<'_>) -> Verdict {
        let satisfied = solution::first_satisfied(&ctx.puzzle.solutions, ctx.contained);
        Verdict::Reevaluate(satisfied.map(str::to_string))
    }
}

struct SwitchHandler;

impl PuzzleHandler for SwitchHandler {
    fn decide(&self, ctx: &AttemptContext<'_>) -> Verdict {
        if ctx.puzzle.outcome_is(ctx.password) {
            Verdict::AlreadySolved
        } else if ctx.is_solution(ctx.password) {
            Verdict::Solve(ctx.password.to_string())
        } else {
            Verdict::Fail
        }
    }
}

struct OptionHandler;

impl PuzzleHandler for OptionHandler {
    fn decide(&self, ctx: &AttemptContext<'_>) -> Verdict {
        if ctx.puzzle.solved && ctx.password.is_empty() {
            Verdict::Unsolve
        } else if ctx.puzzle.outcome_is(ctx.password) {
            Verdict::AlreadySolved
        } else if ctx.is_solution(ctx.password) {
            Verdict::Solve(ctx.password.to_string())
        } else {
            Verdict::Fail
        }
    }
}

struct MediaHandler;

impl PuzzleHandler for MediaHandler {
    fn decide(&self, ctx: &AttemptContext<'_>) -> Verdict {
        match (ctx.puzzle.solved, ctx.item) {
            (true, None) => Verdict::Unsolve,
            (true, Some(item)) => {
                let phrase = ctx.item_phrase.unwrap_or(item.prefab.as_str());
                let name = ctx.puzzle.display_name();
                Verdict::Reply(format!(
                    "You cannot insert {phrase} into the {name} as something is already inside it. \
                     Eject it first by sending `{}use {name}`.",
                    ctx.command_prefix
                ))
            }
            (false, Some(item)) => {
                let identifiers: Vec<PrefabId> = item.identifiers().cloned().collect();
                match solution::first_satisfied(&ctx.puzzle.solutions, &identifiers) {
                    Some(found) => Verdict::Solve(found.to_string()),
                    None => Verdict::FailWithItem,
                }
            }
            (false, None) => Verdict::WithoutItem,
        }
    }
}

/// Player and restricted exit: only listed players get through.
struct PlayerHandler;

impl PuzzleHandler for PlayerHandler {
    fn decide(&self, ctx: &AttemptContext<'_>) -> Verdict {
        if ctx.puzzle.solved {
            Verdict::AlreadySolved
        } else if ctx.is_solution(ctx.player_name) {
            Verdict::Solve(ctx.player_name.to_string())
        } else {
            Verdict::Fail
        }
    }
}

struct RoomPlayerHandler;

impl PuzzleHandler for RoomPlayerHandler {
    fn decide(&self, ctx: &AttemptContext<'_>) -> Verdict {
        let matched = ctx.target_name.and_then(|target| {
            let target = target.to_lowercase();
            ctx.puzzle.solutions.iter().find(|s| s.to_lowercase() == target)
        });

        if ctx.puzzle.solved {
            Verdict::AlreadySolved
        } else if let Some(outcome) = matched {
            Verdict::Solve(outcome.clone())
        } else {
            Verdict::Fail
        }
    }
}

struct HiddenObjectHandler;

impl PuzzleHandler for HiddenObjectHandler {
    fn decide(&self, ctx: &AttemptContext<'_>) -> Verdict {
        if ctx.puzzle.solved {
            Verdict::AlreadySolved
        } else {
            Verdict::WithoutItem
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PuzzleId, RoomId};

    fn puzzle(ty: &str, solutions: &[&str]) -> Puzzle {
        Puzzle::new(PuzzleId::new(1), "LOCK", RoomId::new(0), ty.parse().unwrap()).with_solutions(solutions)
    }

    fn ctx<'a>(puzzle: &'a Puzzle, password: &'a str, command: &'a str) -> AttemptContext<'a> {
        AttemptContext {
            puzzle,
            password,
            command,
            has_required_item: false,
            item: None,
            item_phrase: None,
            player_name: "Kyra",
            target_name: None,
            contained: &[],
            command_prefix: ".",
        }
    }

    fn decide(puzzle: &Puzzle, password: &str, command: &str) -> Verdict {
        puzzle.puzzle_type.handler().decide(&ctx(puzzle, password, command))
    }

    #[test]
    fn test_password() {
        let p = puzzle("password", &["OPEN"]);
        assert_eq!(decide(&p, "", "use"), Verdict::Reply("You need to enter a password.".into()));
        assert_eq!(decide(&p, "wrong", "use"), Verdict::Fail);
        assert_eq!(decide(&p, "OPEN", "use"), Verdict::Solve("OPEN".into()));
        assert_eq!(decide(&p.solved(None), "OPEN", "use"), Verdict::AlreadySolved);
    }

    #[test]
    fn test_combination_lock_solved() {
        let p = puzzle("combination lock", &["1-2-3"]).solved(None);
        assert_eq!(decide(&p, "9-9-9", "use"), Verdict::Unsolve);
        assert_eq!(decide(&p, "", "use"), Verdict::AlreadySolved);
        assert_eq!(decide(&p, "1-2-3", "use"), Verdict::AlreadySolved);
        assert_eq!(decide(&p, "", "lock"), Verdict::Unsolve);
        assert_eq!(decide(&p, "", "unlock"), Verdict::Reply("LOCK is already unlocked.".into()));
    }

    #[test]
    fn test_combination_lock_unsolved() {
        let p = puzzle("combination lock", &["1-2-3"]);
        assert_eq!(decide(&p, "", "lock"), Verdict::Reply("LOCK is already locked.".into()));
        assert_eq!(decide(&p, "", "use"), Verdict::Reply("You need to enter a combination.".into()));
        assert_eq!(decide(&p, "1-2-3", "unlock"), Verdict::Solve("1-2-3".into()));
        assert_eq!(decide(&p, "3-2-1", "unlock"), Verdict::Fail);
    }

    #[test]
    fn test_key_lock() {
        let p = puzzle("key lock", &["Item: KEY"]).solved(None);
        assert_eq!(decide(&p, "", "lock"), Verdict::WithoutItem);
        let mut with_key = ctx(&p, "Item: KEY", "lock");
        with_key.has_required_item = true;
        assert_eq!(p.puzzle_type.handler().decide(&with_key), Verdict::Unsolve);
        assert_eq!(decide(&p, "", "use"), Verdict::AlreadySolved);
    }

    #[test]
    fn test_toggle() {
        let p = puzzle("toggle", &["Item: LIGHTER"]);
        assert_eq!(decide(&p, "Item: LIGHTER", "use"), Verdict::Solve("Item: LIGHTER".into()));
        assert_eq!(decide(&p.solved(None), "", "use"), Verdict::WithoutItem);
    }

    #[test]
    fn test_channels_falls_back_to_last_outcome() {
        let mut p = puzzle("channels", &["1", "2"]);
        p.outcome = Some("2".into());
        assert_eq!(decide(&p, "7", "use"), Verdict::Solve("2".into()));

        let p = p.solved(Some("2"));
        assert_eq!(decide(&p, "", "use"), Verdict::Unsolve);
        assert_eq!(decide(&p, "1", "use"), Verdict::Solve("1".into()));
        assert_eq!(decide(&p, "7", "use"), Verdict::Fail);
    }

    #[test]
    fn test_weight() {
        let p = puzzle("weight", &["10"]);
        assert_eq!(decide(&p, "10", "drop"), Verdict::Solve("10".into()));
        assert_eq!(decide(&p, "4", "drop"), Verdict::Fail);
        assert_eq!(decide(&p.solved(Some("10")), "4", "take"), Verdict::Unsolve);
    }

    #[test]
    fn test_container() {
        let p = puzzle("container", &["Item:KEY+Item:NOTE"]);
        let both = [PrefabId::new("KEY"), PrefabId::new("NOTE")];
        let mut c = ctx(&p, "", "drop");
        c.contained = &both;
        assert_eq!(
            p.puzzle_type.handler().decide(&c),
            Verdict::Reevaluate(Some("Item:KEY+Item:NOTE".into()))
        );
        c.contained = &both[..1];
        assert_eq!(p.puzzle_type.handler().decide(&c), Verdict::Reevaluate(None));
    }

    #[test]
    fn test_switch_and_option() {
        let s = puzzle("switch", &["UP", "DOWN"]).solved(Some("UP"));
        assert_eq!(decide(&s, "UP", "use"), Verdict::AlreadySolved);
        assert_eq!(decide(&s, "DOWN", "use"), Verdict::Solve("DOWN".into()));
        assert_eq!(decide(&s, "LEFT", "use"), Verdict::Fail);

        let o = puzzle("option", &["A", "B"]).solved(Some("A"));
        assert_eq!(decide(&o, "", "use"), Verdict::Unsolve);
        assert_eq!(decide(&o, "A", "use"), Verdict::AlreadySolved);
        assert_eq!(decide(&o, "B", "use"), Verdict::Solve("B".into()));
    }

    #[test]
    fn test_media() {
        let p = puzzle("media", &["Item: DVD"]);
        let dvd = InventoryItem::new("CASE").with_contents(&["DVD"]);
        let tape = InventoryItem::new("TAPE");

        let mut c = ctx(&p, "", "use");
        assert_eq!(p.puzzle_type.handler().decide(&c), Verdict::WithoutItem);
        c.item = Some(&dvd);
        assert_eq!(p.puzzle_type.handler().decide(&c), Verdict::Solve("Item: DVD".into()));
        c.item = Some(&tape);
        assert_eq!(p.puzzle_type.handler().decide(&c), Verdict::FailWithItem);

        let solved = p.clone().solved(Some("Item: DVD"));
        let mut c = ctx(&solved, "", "use");
        assert_eq!(solved.puzzle_type.handler().decide(&c), Verdict::Unsolve);
        c.item = Some(&tape);
        c.item_phrase = Some("a TAPE");
        assert_eq!(
            solved.puzzle_type.handler().decide(&c),
            Verdict::Reply(
                "You cannot insert a TAPE into the LOCK as something is already inside it. \
                 Eject it first by sending `.use LOCK`."
                    .into()
            )
        );
    }

    #[test]
    fn test_player_and_room_player() {
        let p = puzzle("player", &["Kyra"]);
        assert_eq!(decide(&p, "", "use"), Verdict::Solve("Kyra".into()));
        assert_eq!(decide(&puzzle("restricted exit", &["Ash"]), "", "use"), Verdict::Fail);

        let rp = puzzle("room player", &["Ash"]);
        let mut c = ctx(&rp, "", "use");
        c.target_name = Some("ASH");
        assert_eq!(rp.puzzle_type.handler().decide(&c), Verdict::Solve("Ash".into()));
        c.target_name = None;
        assert_eq!(rp.puzzle_type.handler().decide(&c), Verdict::Fail);
    }

    #[test]
    fn test_probability_and_hidden_object() {
        assert_eq!(decide(&puzzle("probability", &["X"]), "", "use"), Verdict::SolveAtRandom);
        assert_eq!(
            decide(&puzzle("dex probability", &["X"]), "", "use"),
            Verdict::SolveByRoll(Stat::Dexterity)
        );
        assert_eq!(decide(&puzzle("hidden object", &[]), "", "use"), Verdict::WithoutItem);
    }
}
