//! Action: one state-changing operation performed by or on behalf of a player.
//!
//! Every concrete operation (inflict, attempt, hide, ...) runs inside an
//! `Action`. The action carries a unique identity, a write-once `performed`
//! flag that makes the operation idempotent, and the set of channels its
//! narration has already been mirrored to.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use uuid::Uuid;

use super::entity::{ChannelId, PlayerId, RoomId};
use super::error::ActionError;

/// Kind of action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Activate,
    Announce,
    Attempt,
    Craft,
    Cure,
    Deactivate,
    Destroy,
    Die,
    Dress,
    Drop,
    Enter,
    Equip,
    Exit,
    Gesture,
    Give,
    Hide,
    Inflict,
    Inspect,
    Instantiate,
    Knock,
    Move,
    Narrate,
    QueueMove,
    Say,
    Solve,
    StartMove,
    Stash,
    Steal,
    Stop,
    Take,
    Text,
    Uncraft,
    Undress,
    Unequip,
    Unhide,
    Unsolve,
    Unstash,
    Use,
    Whisper,
}

impl ActionType {
    /// The lowercase name used in action ids and logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ActionType::Activate => "activate",
            ActionType::Announce => "announce",
            ActionType::Attempt => "attempt",
            ActionType::Craft => "craft",
            ActionType::Cure => "cure",
            ActionType::Deactivate => "deactivate",
            ActionType::Destroy => "destroy",
            ActionType::Die => "die",
            ActionType::Dress => "dress",
            ActionType::Drop => "drop",
            ActionType::Enter => "enter",
            ActionType::Equip => "equip",
            ActionType::Exit => "exit",
            ActionType::Gesture => "gesture",
            ActionType::Give => "give",
            ActionType::Hide => "hide",
            ActionType::Inflict => "inflict",
            ActionType::Inspect => "inspect",
            ActionType::Instantiate => "instantiate",
            ActionType::Knock => "knock",
            ActionType::Move => "move",
            ActionType::Narrate => "narrate",
            ActionType::QueueMove => "queuemove",
            ActionType::Say => "say",
            ActionType::Solve => "solve",
            ActionType::StartMove => "startmove",
            ActionType::Stash => "stash",
            ActionType::Steal => "steal",
            ActionType::Stop => "stop",
            ActionType::Take => "take",
            ActionType::Text => "text",
            ActionType::Uncraft => "uncraft",
            ActionType::Undress => "undress",
            ActionType::Unequip => "unequip",
            ActionType::Unhide => "unhide",
            ActionType::Unsolve => "unsolve",
            ActionType::Unstash => "unstash",
            ActionType::Use => "use",
            ActionType::Whisper => "whisper",
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Globally unique action identity.
///
/// Includes the acting player and the action type so ids stay readable in
/// logs; the random token makes them unique.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionId {
    pub action_type: ActionType,
    pub player: PlayerId,
    pub token: Uuid,
}

impl ActionId {
    /// Generate a fresh id.
    #[must_use]
    pub fn generate(action_type: ActionType, player: PlayerId) -> Self {
        Self {
            action_type,
            player,
            token: Uuid::new_v4(),
        }
    }
}

impl std::fmt::Display for ActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.player.raw(), self.action_type, self.token)
    }
}

/// A single unit of work.
///
/// ## Example
///
/// ```
/// use rust_ifgame::core::{Action, ActionType, PlayerId, RoomId};
///
/// let mut action = Action::new(ActionType::Hide, PlayerId::new(1), RoomId::new(0), false);
/// assert!(action.begin().is_ok());
/// assert!(action.begin().is_err());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Action {
    pub id: ActionId,
    pub action_type: ActionType,
    /// The player the action is about.
    pub player: PlayerId,
    /// Where the action happens.
    pub location: RoomId,
    /// True when someone other than `player` (a moderator, a puzzle, a timer)
    /// triggered the action.
    pub forced: bool,
    performed: bool,
    mirrors: SmallVec<[ChannelId; 4]>,
}

impl Action {
    /// Create an unperformed action.
    #[must_use]
    pub fn new(action_type: ActionType, player: PlayerId, location: RoomId, forced: bool) -> Self {
        Self {
            id: ActionId::generate(action_type, player),
            action_type,
            player,
            location,
            forced,
            performed: false,
            mirrors: SmallVec::new(),
        }
    }

    /// Mark the action performed.
    ///
    /// Fails with `AlreadyPerformed` if it already ran. Every operation calls
    /// this before touching any state.
    pub fn begin(&mut self) -> Result<(), ActionError> {
        if self.performed {
            return Err(ActionError::AlreadyPerformed);
        }
        self.performed = true;
        Ok(())
    }

    #[must_use]
    pub fn is_performed(&self) -> bool {
        self.performed
    }

    /// Whether narration for this action already reached `channel`.
    #[must_use]
    pub fn has_been_communicated_in(&self, channel: &ChannelId) -> bool {
        self.mirrors.contains(channel)
    }

    /// Record that narration reached `channel`. No-op if already recorded.
    pub fn add_to_mirrors(&mut self, channel: ChannelId) {
        if !self.has_been_communicated_in(&channel) {
            self.mirrors.push(channel);
        }
    }

    /// Channels already notified, in the order they were recorded.
    #[must_use]
    pub fn mirrors(&self) -> &[ChannelId] {
        &self.mirrors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action() -> Action {
        Action::new(ActionType::Inflict, PlayerId::new(3), RoomId::new(1), true)
    }

    #[test]
    fn test_begin_once() {
        let mut action = action();
        assert!(!action.is_performed());
        assert_eq!(action.begin(), Ok(()));
        assert!(action.is_performed());
        assert_eq!(action.begin(), Err(ActionError::AlreadyPerformed));
    }

    #[test]
    fn test_unique_ids() {
        let a = action();
        let b = action();
        assert_ne!(a.id, b.id);
        assert!(a.id.to_string().starts_with("3-inflict-"));
    }

    #[test]
    fn test_mirrors() {
        let mut action = action();
        let channel = ChannelId::spectate(PlayerId::new(3));

        assert!(!action.has_been_communicated_in(&channel));
        action.add_to_mirrors(channel.clone());
        action.add_to_mirrors(channel.clone());

        assert!(action.has_been_communicated_in(&channel));
        assert_eq!(action.mirrors().len(), 1);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(ActionType::QueueMove.to_string(), "queuemove");
        assert_eq!(ActionType::Unhide.as_str(), "unhide");
        let json = serde_json::to_string(&ActionType::StartMove).unwrap();
        assert_eq!(json, "\"startmove\"");
    }
}
