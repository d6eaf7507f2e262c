//! Puzzle resolution.
//!
//! `PuzzleResolver::attempt` runs the shared pre-checks in a fixed order,
//! asks the puzzle type's handler for a [`Verdict`], and carries it out.
//! `solve`, `unsolve` and `fail` are also entry points of their own: puzzle
//! command lists and moderator commands call them directly.
//!
//! ## Pre-checks
//!
//! 1. Recompute accessibility from the requirements.
//! 2. Inaccessible (weight/container under take/drop excepted): requirements
//!    not met, or not found if the puzzle has no description for it.
//! 3. Moderator-only and unsolved: rejected.
//! 4. No attempts left: narrated, nothing else.
//! 5. Item solution missing on a puzzle that needs one: "without item".
//!
//! ## Outcome bookkeeping
//!
//! Solving records the outcome (the first solution when none is given).
//! Unsolving clears it, except on channels puzzles, which tune back to the
//! last channel.

use tracing::{debug, warn};

use super::definition::{Puzzle, PuzzleType, Requirement};
use super::handlers::{AttemptContext, Verdict};
use super::solution;
use crate::commands::{CommandContext, CommandDispatcher, GameCommand};
use crate::core::{dice, Action, ActionError, GameState, InventoryItem, PlayerId, PrefabId, PuzzleId};
use crate::ports::{AttemptResult, LogEntry, LogKind, Narration, Services};

/// An attempt on a puzzle.
#[derive(Clone, Debug, PartialEq)]
pub struct AttemptRequest {
    pub puzzle: PuzzleId,
    /// Item offered as the solution.
    pub item: Option<InventoryItem>,
    pub password: String,
    /// Command alias used.
    pub command: String,
    /// Raw argument text, echoed in "not found" replies.
    pub input: String,
    /// Player targeted by a room player puzzle.
    pub target: Option<PlayerId>,
}

impl AttemptRequest {
    pub fn new(puzzle: PuzzleId, command: impl Into<String>) -> Self {
        Self {
            puzzle,
            item: None,
            password: String::new(),
            command: command.into(),
            input: String::new(),
            target: None,
        }
    }

    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    #[must_use]
    pub fn with_item(mut self, item: InventoryItem) -> Self {
        self.item = Some(item);
        self
    }

    #[must_use]
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = input.into();
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: PlayerId) -> Self {
        self.target = Some(target);
        self
    }

    fn under_take_or_drop(&self) -> bool {
        matches!(self.command.as_str(), "take" | "drop")
    }
}

/// What an attempt did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Solved with this outcome.
    Solved(String),
    Unsolved,
    Failed,
    AlreadySolved,
    NoMoreAttempts,
    WithoutItem,
    RequirementsNotMet,
    /// Answered directly; nothing changed.
    Reply(String),
    /// A re-attempt after take/drop was turned away. The move itself stands.
    Rejected(ActionError),
}

/// Options for [`PuzzleResolver::solve`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolveOptions {
    /// Solution to record; the first solution when `None` or empty.
    pub outcome: Option<String>,
    /// Item the puzzle was solved with.
    pub item: Option<PrefabId>,
    /// Player the solved commands act on, instead of the solver.
    pub target: Option<PlayerId>,
    pub run_commands: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            outcome: None,
            item: None,
            target: None,
            run_commands: true,
        }
    }
}

impl SolveOptions {
    #[must_use]
    pub fn with_outcome(outcome: impl Into<String>) -> Self {
        Self {
            outcome: Some(outcome.into()),
            ..Self::default()
        }
    }
}

enum ItemSolution {
    /// The puzzle lists no item solutions.
    NotNeeded,
    Missing,
    Found(String),
}

/// Puzzle attempt resolution.
pub struct PuzzleResolver;

impl PuzzleResolver {
    /// Attempt a puzzle as `action.player`.
    pub fn attempt(
        state: &mut GameState,
        services: &mut dyn Services,
        action: &Action,
        request: &AttemptRequest,
    ) -> Result<AttemptOutcome, ActionError> {
        let accessible = Self::refresh_accessibility(state, action.player, request.puzzle, request.item.as_ref())?;
        let puzzle = state.require_puzzle(request.puzzle)?.clone();
        let weighed = puzzle.puzzle_type.is_weighed() && request.under_take_or_drop();

        if !accessible && !weighed {
            return Self::inaccessible(services, action, &puzzle, request, AttemptResult::RequirementsNotMet);
        }
        if puzzle.requires_mod && !puzzle.solved {
            return Err(ActionError::ModeratorRequired);
        }
        if puzzle.remaining_attempts == Some(0) {
            let description = puzzle.descriptions.no_more_attempts.clone();
            services.notify(action.player, &description);
            services.narrate(
                action,
                Narration::PuzzleAttempted {
                    puzzle: puzzle.id,
                    result: AttemptResult::NoMoreAttempts,
                    description,
                },
            );
            services.log(LogEntry::for_action(LogKind::AttemptNoMoreAttempts, action, &puzzle.name));
            return Ok(AttemptOutcome::NoMoreAttempts);
        }

        let item_solution = Self::item_solution(state, action.player, &puzzle, request.item.as_ref())?;
        let has_required_item = !matches!(item_solution, ItemSolution::Missing);
        let password = match item_solution {
            ItemSolution::Found(solution) => solution,
            _ => request.password.clone(),
        };

        let solvable = puzzle.solved || has_required_item || puzzle.puzzle_type == PuzzleType::Media || weighed;
        if !solvable {
            return Self::inaccessible(services, action, &puzzle, request, AttemptResult::WithoutItem);
        }

        let verdict = {
            let player = state.require_player(action.player)?;
            let target_name = match request.target {
                Some(id) => Some(state.require_player(id)?.display_name.as_str()),
                None => None,
            };
            let item_phrase = request
                .item
                .as_ref()
                .and_then(|item| state.prefab(&item.prefab))
                .map(|prefab| prefab.single_containing_phrase.as_str());
            let contained = state.prefabs_in_puzzle(puzzle.id);
            let ctx = AttemptContext {
                puzzle: &puzzle,
                password: &password,
                command: &request.command,
                has_required_item,
                item: request.item.as_ref(),
                item_phrase,
                player_name: &player.name,
                target_name,
                contained: &contained,
                command_prefix: &state.settings.command_prefix,
            };
            puzzle.puzzle_type.handler().decide(&ctx)
        };
        debug!(puzzle = %puzzle.id, ty = %puzzle.puzzle_type, ?verdict, "attempt judged");

        let item = request.item.as_ref().map(|item| item.prefab.clone());
        let target = match puzzle.puzzle_type {
            PuzzleType::RoomPlayer => request.target,
            _ => None,
        };
        let solve_with = |outcome: String| SolveOptions {
            outcome: Some(outcome),
            item: item.clone(),
            target,
            run_commands: true,
        };

        match verdict {
            Verdict::Solve(outcome) => Self::finish_solve(state, services, action, puzzle.id, solve_with(outcome)),
            Verdict::SolveAtRandom => {
                let outcome = state.rng.choose(&puzzle.solutions).cloned().unwrap_or_default();
                Self::finish_solve(state, services, action, puzzle.id, solve_with(outcome))
            }
            Verdict::SolveByRoll(stat) => {
                let player = state.require_player(action.player)?.clone();
                let roll = dice::roll(&state.settings, &mut state.rng, Some(stat), &player, None);
                let ratio = roll.ratio().clamp(0.0, 0.999);
                let index = (ratio * puzzle.solutions.len() as f64).floor() as usize;
                let outcome = puzzle.solutions.get(index).cloned().unwrap_or_default();
                debug!(puzzle = %puzzle.id, %stat, result = roll.result, index, "stat roll");
                Self::finish_solve(state, services, action, puzzle.id, solve_with(outcome))
            }
            Verdict::Unsolve => {
                Self::unsolve(state, services, action, puzzle.id, true)?;
                Ok(AttemptOutcome::Unsolved)
            }
            Verdict::Reevaluate(found) => {
                if puzzle.solved {
                    Self::unsolve(state, services, action, puzzle.id, true)?;
                }
                match found {
                    Some(outcome) => Self::finish_solve(state, services, action, puzzle.id, solve_with(outcome)),
                    None => {
                        Self::fail(state, services, action, puzzle.id, None)?;
                        Ok(AttemptOutcome::Failed)
                    }
                }
            }
            Verdict::Fail => {
                Self::fail(state, services, action, puzzle.id, None)?;
                Ok(AttemptOutcome::Failed)
            }
            Verdict::FailWithItem => {
                Self::fail(state, services, action, puzzle.id, item.clone())?;
                Ok(AttemptOutcome::Failed)
            }
            Verdict::AlreadySolved => {
                let description = puzzle.descriptions.already_solved.clone();
                services.notify(action.player, &description);
                services.narrate(
                    action,
                    Narration::PuzzleAttempted {
                        puzzle: puzzle.id,
                        result: AttemptResult::AlreadySolved,
                        description,
                    },
                );
                services.log(LogEntry::for_action(LogKind::AttemptAlreadySolved, action, &puzzle.name));
                Ok(AttemptOutcome::AlreadySolved)
            }
            Verdict::WithoutItem => Self::inaccessible(services, action, &puzzle, request, AttemptResult::WithoutItem),
            Verdict::Reply(text) => Ok(AttemptOutcome::Reply(text)),
        }
    }

    /// Re-evaluate a puzzle's requirements for `player` and update its
    /// `accessible` flag. Returns the new flag.
    ///
    /// A puzzle without requirements keeps whatever accessibility it has.
    pub fn refresh_accessibility(
        state: &mut GameState,
        player: PlayerId,
        puzzle: PuzzleId,
        item: Option<&InventoryItem>,
    ) -> Result<bool, ActionError> {
        let target = state.require_puzzle(puzzle)?;
        let attempter = state.require_player(player)?;

        let met = target.requirements.iter().all(|requirement| match requirement {
            Requirement::Puzzle(id) => state.puzzle(*id).is_some_and(|p| p.solved),
            Requirement::Prefab(prefab) => {
                item.is_some_and(|i| i.identifiers().any(|id| id == prefab)) || attempter.find_item(prefab).is_some()
            }
        });
        let has_requirements = !target.requirements.is_empty();

        let target = state.require_puzzle_mut(puzzle)?;
        if met && !target.accessible && has_requirements {
            target.accessible = true;
            debug!(%puzzle, "puzzle became accessible");
        } else if !met && target.accessible {
            target.accessible = false;
            debug!(%puzzle, "puzzle became inaccessible");
        }
        Ok(target.accessible)
    }

    /// Mark a puzzle solved, narrate, persist and run its solved commands.
    pub fn solve(
        state: &mut GameState,
        services: &mut dyn Services,
        action: &Action,
        puzzle: PuzzleId,
        options: SolveOptions,
    ) -> Result<(), ActionError> {
        let target = state.require_puzzle_mut(puzzle)?;
        target.solved = true;
        target.outcome = options
            .outcome
            .filter(|o| !o.is_empty())
            .or_else(|| target.solutions.first().cloned());
        let commands = Self::commands(target, options.run_commands, |set| &set.solved_commands);
        let snapshot = target.clone();

        services.notify(action.player, &snapshot.descriptions.correct);
        services.narrate(
            action,
            Narration::PuzzleSolved {
                puzzle,
                outcome: snapshot.outcome.clone(),
                item: options.item,
            },
        );
        services.log(LogEntry::for_action(LogKind::Solve, action, &snapshot.name));
        services.persist_puzzle_solved(&snapshot, true);
        services.reload();
        debug!(%puzzle, outcome = ?snapshot.outcome, "puzzle solved");

        let context = CommandContext {
            player: options.target.unwrap_or(action.player),
            room: snapshot.location,
            puzzle: Some(puzzle),
        };
        Self::run_commands(state, services, &commands, &context);
        Ok(())
    }

    /// Mark a puzzle unsolved, narrate, persist and run its unsolved commands.
    pub fn unsolve(
        state: &mut GameState,
        services: &mut dyn Services,
        action: &Action,
        puzzle: PuzzleId,
        run_commands: bool,
    ) -> Result<(), ActionError> {
        let target = state.require_puzzle_mut(puzzle)?;
        let commands = Self::commands(target, run_commands, |set| &set.unsolved_commands);
        target.solved = false;
        if target.puzzle_type != PuzzleType::Channels {
            target.outcome = None;
        }
        let snapshot = target.clone();

        services.narrate(action, Narration::PuzzleUnsolved { puzzle });
        services.log(LogEntry::for_action(LogKind::Unsolve, action, &snapshot.name));
        services.persist_puzzle_solved(&snapshot, false);
        services.reload();
        debug!(%puzzle, "puzzle unsolved");

        let context = CommandContext {
            player: action.player,
            room: snapshot.location,
            puzzle: Some(puzzle),
        };
        Self::run_commands(state, services, &commands, &context);
        Ok(())
    }

    /// Record a wrong answer: one attempt is used up.
    pub fn fail(
        state: &mut GameState,
        services: &mut dyn Services,
        action: &Action,
        puzzle: PuzzleId,
        item: Option<PrefabId>,
    ) -> Result<(), ActionError> {
        let target = state.require_puzzle_mut(puzzle)?;
        if let Some(remaining) = target.remaining_attempts.as_mut() {
            *remaining = remaining.saturating_sub(1);
        }
        let snapshot = target.clone();

        services.persist_puzzle_attempts(&snapshot);
        services.notify(action.player, &snapshot.descriptions.incorrect);
        services.narrate(
            action,
            Narration::PuzzleAttempted {
                puzzle,
                result: AttemptResult::Failed { item },
                description: snapshot.descriptions.incorrect.clone(),
            },
        );
        services.log(LogEntry::for_action(LogKind::AttemptFailed, action, &snapshot.name));
        debug!(%puzzle, remaining = ?snapshot.remaining_attempts, "puzzle attempt failed");
        Ok(())
    }

    fn finish_solve(
        state: &mut GameState,
        services: &mut dyn Services,
        action: &Action,
        puzzle: PuzzleId,
        options: SolveOptions,
    ) -> Result<AttemptOutcome, ActionError> {
        Self::solve(state, services, action, puzzle, options)?;
        let outcome = state.require_puzzle(puzzle)?.outcome.clone().unwrap_or_default();
        Ok(AttemptOutcome::Solved(outcome))
    }

    /// Narrate an attempt on a puzzle the player can't use, or report it as
    /// not found when the puzzle has nothing to say about it.
    fn inaccessible(
        services: &mut dyn Services,
        action: &Action,
        puzzle: &Puzzle,
        request: &AttemptRequest,
        result: AttemptResult,
    ) -> Result<AttemptOutcome, ActionError> {
        let description = &puzzle.descriptions.requirements_not_met;
        if description.is_empty() {
            return Err(ActionError::NotFound {
                input: request.input.clone(),
                command: request.command.clone(),
            });
        }

        let outcome = match result {
            AttemptResult::WithoutItem => AttemptOutcome::WithoutItem,
            _ => AttemptOutcome::RequirementsNotMet,
        };
        services.notify(action.player, description);
        services.narrate(
            action,
            Narration::PuzzleAttempted {
                puzzle: puzzle.id,
                result,
                description: description.clone(),
            },
        );
        services.log(LogEntry::for_action(LogKind::AttemptInaccessible, action, &puzzle.name));
        Ok(outcome)
    }

    /// Find the item solution the attempt uses, if the puzzle has any.
    ///
    /// A supplied item must match on its own; otherwise the player's
    /// inventory is searched. Solutions are scanned in list order.
    fn item_solution(
        state: &GameState,
        player: PlayerId,
        puzzle: &Puzzle,
        item: Option<&InventoryItem>,
    ) -> Result<ItemSolution, ActionError> {
        if puzzle.puzzle_type == PuzzleType::Container {
            return Ok(ItemSolution::NotNeeded);
        }
        let mut item_solutions = puzzle.solutions.iter().filter(|s| solution::is_item_solution(s)).peekable();
        if item_solutions.peek().is_none() {
            return Ok(ItemSolution::NotNeeded);
        }

        let held: Vec<PrefabId> = match item {
            Some(item) => vec![item.prefab.clone()],
            None => state
                .require_player(player)?
                .inventory
                .iter()
                .map(|i| i.prefab.clone())
                .collect(),
        };
        Ok(item_solutions
            .find(|s| solution::satisfied_by(s, &held))
            .map_or(ItemSolution::Missing, |s| ItemSolution::Found(s.clone())))
    }

    fn commands(
        puzzle: &Puzzle,
        run: bool,
        pick: impl Fn(&super::definition::CommandSet) -> &Vec<GameCommand>,
    ) -> Vec<GameCommand> {
        if !run {
            return Vec::new();
        }
        puzzle.active_command_set().map(|set| pick(set).clone()).unwrap_or_default()
    }

    fn run_commands(
        state: &mut GameState,
        services: &mut dyn Services,
        commands: &[GameCommand],
        context: &CommandContext,
    ) {
        for err in CommandDispatcher::run(state, services, commands, context) {
            warn!(puzzle = ?context.puzzle, %err, "puzzle command failed");
        }
    }
}
