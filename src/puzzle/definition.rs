//! Puzzle definitions.
//!
//! A puzzle is a switchable piece of world state: a lock, a lever, a
//! keypad, a shelf that notices what's placed on it. Its `puzzle_type`
//! selects how an attempt is judged (see [`super::handlers`]); its
//! `solutions`, `requirements` and `command_sets` are data.
//!
//! ## Type strings
//!
//! Game data names types with fixed strings (`"combination lock"`,
//! `"str probability"`, ...). [`PuzzleType`] parses and prints them; the
//! stat of a stat probability puzzle may be written abbreviated or in full
//! and is printed abbreviated.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::solution;
use crate::commands::GameCommand;
use crate::core::{PrefabId, PuzzleId, RoomId, Stat};

/// Invalid puzzle data.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PuzzleDataError {
    #[error("unknown puzzle type \"{0}\"")]
    UnknownType(String),

    #[error("puzzle {puzzle} needs at least one solution")]
    NoSolutions { puzzle: String },

    #[error("puzzle {puzzle} has non-integer weight solution \"{solution}\"")]
    NonNumericWeight { puzzle: String, solution: String },

    #[error("puzzle {puzzle} has solution \"{solution}\" without an Item: or Prefab: prefix")]
    MissingItemPrefix { puzzle: String, solution: String },

    #[error("switch puzzle {puzzle} must be solved with one of its solutions as its outcome")]
    SwitchOutcome { puzzle: String },

    #[error("puzzle {puzzle} has a command set for \"{outcome}\", which is not a solution")]
    CommandSetOutcome { puzzle: String, outcome: String },
}

/// How an attempt on a puzzle is judged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PuzzleType {
    Password,
    Interact,
    Matrix,
    Toggle,
    CombinationLock,
    KeyLock,
    Probability,
    StatProbability(Stat),
    Channels,
    Weight,
    Container,
    Switch,
    Option,
    Media,
    Player,
    RoomPlayer,
    HiddenObject,
    RestrictedExit,
}

impl PuzzleType {
    /// Attempted with take/drop regardless of accessibility.
    #[must_use]
    pub fn is_weighed(self) -> bool {
        matches!(self, PuzzleType::Weight | PuzzleType::Container)
    }

    /// Solutions name items rather than passwords.
    #[must_use]
    pub fn takes_item_solutions(self) -> bool {
        matches!(self, PuzzleType::Media | PuzzleType::Container)
    }
}

impl FromStr for PuzzleType {
    type Err = PuzzleDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ty = match s {
            "password" => PuzzleType::Password,
            "interact" => PuzzleType::Interact,
            "matrix" => PuzzleType::Matrix,
            "toggle" => PuzzleType::Toggle,
            "combination lock" => PuzzleType::CombinationLock,
            "key lock" => PuzzleType::KeyLock,
            "probability" => PuzzleType::Probability,
            "channels" => PuzzleType::Channels,
            "weight" => PuzzleType::Weight,
            "container" => PuzzleType::Container,
            "switch" => PuzzleType::Switch,
            "option" => PuzzleType::Option,
            "media" => PuzzleType::Media,
            "player" => PuzzleType::Player,
            "room player" => PuzzleType::RoomPlayer,
            "hidden object" => PuzzleType::HiddenObject,
            "restricted exit" => PuzzleType::RestrictedExit,
            other => {
                let stat = other
                    .strip_suffix(" probability")
                    .and_then(|stat| stat.parse::<Stat>().ok())
                    .ok_or_else(|| PuzzleDataError::UnknownType(other.to_string()))?;
                PuzzleType::StatProbability(stat)
            }
        };
        Ok(ty)
    }
}

impl fmt::Display for PuzzleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PuzzleType::Password => "password",
            PuzzleType::Interact => "interact",
            PuzzleType::Matrix => "matrix",
            PuzzleType::Toggle => "toggle",
            PuzzleType::CombinationLock => "combination lock",
            PuzzleType::KeyLock => "key lock",
            PuzzleType::Probability => "probability",
            PuzzleType::StatProbability(stat) => return write!(f, "{} probability", stat.abbreviation()),
            PuzzleType::Channels => "channels",
            PuzzleType::Weight => "weight",
            PuzzleType::Container => "container",
            PuzzleType::Switch => "switch",
            PuzzleType::Option => "option",
            PuzzleType::Media => "media",
            PuzzleType::Player => "player",
            PuzzleType::RoomPlayer => "room player",
            PuzzleType::HiddenObject => "hidden object",
            PuzzleType::RestrictedExit => "restricted exit",
        };
        f.write_str(s)
    }
}

impl TryFrom<String> for PuzzleType {
    type Error = PuzzleDataError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PuzzleType> for String {
    fn from(ty: PuzzleType) -> Self {
        ty.to_string()
    }
}

/// Something that must hold before a puzzle is accessible.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Requirement {
    /// Another puzzle must be solved.
    Puzzle(PuzzleId),
    /// The player must carry (or be using) an item of this prefab.
    Prefab(PrefabId),
}

/// Commands run when a puzzle is solved or unsolved with one of `outcomes`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandSet {
    pub outcomes: Vec<String>,
    pub solved_commands: Vec<GameCommand>,
    pub unsolved_commands: Vec<GameCommand>,
}

impl CommandSet {
    #[must_use]
    pub fn new(outcomes: &[&str]) -> Self {
        Self {
            outcomes: outcomes.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn on_solved(mut self, commands: Vec<GameCommand>) -> Self {
        self.solved_commands = commands;
        self
    }

    #[must_use]
    pub fn on_unsolved(mut self, commands: Vec<GameCommand>) -> Self {
        self.unsolved_commands = commands;
        self
    }
}

/// Texts sent to the attempting player.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleDescriptions {
    pub correct: String,
    pub already_solved: String,
    pub incorrect: String,
    pub no_more_attempts: String,
    /// Empty means the puzzle is invisible while inaccessible.
    pub requirements_not_met: String,
}

/// A puzzle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Puzzle {
    pub id: PuzzleId,
    pub name: String,
    pub location: RoomId,
    /// Fixture the puzzle is part of; its name is what players see.
    pub parent_fixture: Option<String>,
    pub puzzle_type: PuzzleType,
    pub solved: bool,
    pub accessible: bool,
    pub requires_mod: bool,
    pub requirements: Vec<Requirement>,
    pub solutions: Vec<String>,
    /// `None` means unlimited.
    pub remaining_attempts: Option<u32>,
    /// Solution the puzzle was last solved with.
    pub outcome: Option<String>,
    pub command_sets: Vec<CommandSet>,
    pub descriptions: PuzzleDescriptions,
}

impl Puzzle {
    /// Create an unsolved, accessible puzzle with no solutions.
    pub fn new(id: PuzzleId, name: impl Into<String>, location: RoomId, puzzle_type: PuzzleType) -> Self {
        Self {
            id,
            name: name.into(),
            location,
            parent_fixture: None,
            puzzle_type,
            solved: false,
            accessible: true,
            requires_mod: false,
            requirements: Vec::new(),
            solutions: Vec::new(),
            remaining_attempts: None,
            outcome: None,
            command_sets: Vec::new(),
            descriptions: PuzzleDescriptions::default(),
        }
    }

    // === Builders ===

    #[must_use]
    pub fn with_solutions(mut self, solutions: &[&str]) -> Self {
        self.solutions = solutions.iter().map(|s| s.to_string()).collect();
        self
    }

    #[must_use]
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.remaining_attempts = Some(attempts);
        self
    }

    #[must_use]
    pub fn with_requirement(mut self, requirement: Requirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    #[must_use]
    pub fn with_command_set(mut self, set: CommandSet) -> Self {
        self.command_sets.push(set);
        self
    }

    #[must_use]
    pub fn with_descriptions(mut self, descriptions: PuzzleDescriptions) -> Self {
        self.descriptions = descriptions;
        self
    }

    #[must_use]
    pub fn with_requirements_not_met(mut self, description: impl Into<String>) -> Self {
        self.descriptions.requirements_not_met = description.into();
        self
    }

    #[must_use]
    pub fn with_parent_fixture(mut self, fixture: impl Into<String>) -> Self {
        self.parent_fixture = Some(fixture.into());
        self
    }

    #[must_use]
    pub fn requires_mod(mut self) -> Self {
        self.requires_mod = true;
        self
    }

    #[must_use]
    pub fn solved(mut self, outcome: Option<&str>) -> Self {
        self.solved = true;
        self.outcome = outcome.map(str::to_string);
        self
    }

    #[must_use]
    pub fn inaccessible(mut self) -> Self {
        self.accessible = false;
        self
    }

    // === Queries ===

    /// Name shown to players.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.parent_fixture.as_deref().unwrap_or(&self.name)
    }

    #[must_use]
    pub fn has_solution(&self, candidate: &str) -> bool {
        self.solutions.iter().any(|s| s == candidate)
    }

    /// Whether the puzzle keeps track of which solution it was solved with.
    #[must_use]
    pub fn tracks_outcome(&self) -> bool {
        self.solutions.len() > 1
    }

    #[must_use]
    pub fn outcome_is(&self, candidate: &str) -> bool {
        self.outcome.as_deref() == Some(candidate)
    }

    /// Command set for the current outcome.
    ///
    /// With a single solution the first set applies unconditionally.
    #[must_use]
    pub fn active_command_set(&self) -> Option<&CommandSet> {
        if self.tracks_outcome() {
            let outcome = self.outcome.as_deref()?;
            self.command_sets
                .iter()
                .find(|set| set.outcomes.iter().any(|o| o == outcome))
        } else {
            self.command_sets.first()
        }
    }

    /// Check the data is consistent with the puzzle's type.
    pub fn validate(&self) -> Result<(), PuzzleDataError> {
        let name = || self.name.clone();

        match self.puzzle_type {
            PuzzleType::Probability | PuzzleType::StatProbability(_) if self.solutions.is_empty() => {
                return Err(PuzzleDataError::NoSolutions { puzzle: name() });
            }
            PuzzleType::Weight => {
                if let Some(bad) = self.solutions.iter().find(|s| s.trim().parse::<u32>().is_err()) {
                    return Err(PuzzleDataError::NonNumericWeight {
                        puzzle: name(),
                        solution: bad.clone(),
                    });
                }
            }
            ty if ty.takes_item_solutions() => {
                if let Some(bad) = self.solutions.iter().find(|s| solution::parts(s).is_none()) {
                    return Err(PuzzleDataError::MissingItemPrefix {
                        puzzle: name(),
                        solution: bad.clone(),
                    });
                }
            }
            PuzzleType::Switch => {
                let ok = self.solved
                    && self
                        .outcome
                        .as_deref()
                        .is_some_and(|outcome| self.has_solution(outcome));
                if !ok {
                    return Err(PuzzleDataError::SwitchOutcome { puzzle: name() });
                }
            }
            _ => {}
        }

        for set in &self.command_sets {
            if let Some(outcome) = set.outcomes.iter().find(|o| !self.has_solution(o)) {
                return Err(PuzzleDataError::CommandSetOutcome {
                    puzzle: name(),
                    outcome: outcome.clone(),
                });
            }
        }
        Ok(())
    }
}
