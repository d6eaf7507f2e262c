//! Action outcomes that stop an operation before it mutates anything.
//!
//! Every variant renders as the reply a player or moderator would see, so the
//! caller can forward `err.to_string()` unchanged or drop it.

use thiserror::Error;

use super::entity::{PlayerId, PuzzleId, RoomId, StatusId};

/// Why an action did not happen.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The action instance already ran.
    #[error("That action has already been performed.")]
    AlreadyPerformed,

    /// The target already carries the status and it has no duplicate redirect.
    #[error("Specified player already has that status effect.")]
    AlreadyHasStatus { player: PlayerId, status: StatusId },

    /// The target does not carry the status.
    #[error("Specified player doesn't have that status effect.")]
    MissingStatus { player: PlayerId, status: StatusId },

    /// A conflicting status blocks the inflict.
    #[error("Couldn't inflict status effect \"{status}\" because {player_name} is already {overrider}.")]
    StatusBlocked {
        status: StatusId,
        player_name: String,
        overrider: StatusId,
    },

    /// A status prevents the player from using this verb.
    #[error("You cannot do that because you are **{status}**.")]
    Disabled { status: StatusId },

    /// The puzzle needs a moderator to resolve.
    #[error("You need moderator assistance to do that.")]
    ModeratorRequired,

    /// The target is hidden from the player, as if it did not exist.
    #[error("Couldn't find \"{input}\" to {command}. Try using a different command?")]
    NotFound { input: String, command: String },

    /// The player is dead.
    #[error("{name} is not alive.")]
    NotAlive { name: String },

    /// The item has no uses remaining or cannot be used on its own.
    #[error("{0}")]
    ItemUnusable(String),

    /// Every place in the hiding spot is taken.
    #[error("There isn't enough room for you to hide in the {0}.")]
    HidingSpotFull(String),

    /// Lookup failures for ids that should have been validated by the caller.
    #[error("Couldn't find status effect \"{0}\".")]
    UnknownStatus(StatusId),
    #[error("Couldn't find {0}.")]
    UnknownPlayer(PlayerId),
    #[error("Couldn't find {0}.")]
    UnknownPuzzle(PuzzleId),
    #[error("Couldn't find {0}.")]
    UnknownRoom(RoomId),
    #[error("Couldn't find \"{0}\".")]
    UnknownEntity(String),
}

impl ActionError {
    /// The reply text for this outcome.
    #[must_use]
    pub fn reply(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_text() {
        let err = ActionError::StatusBlocked {
            status: StatusId::new("asleep"),
            player_name: "Kyra".to_string(),
            overrider: StatusId::new("awake"),
        };
        assert_eq!(
            err.reply(),
            "Couldn't inflict status effect \"asleep\" because Kyra is already awake."
        );

        let err = ActionError::NotFound {
            input: "SAFE".to_string(),
            command: "use".to_string(),
        };
        assert_eq!(err.reply(), "Couldn't find \"SAFE\" to use. Try using a different command?");
    }

    #[test]
    fn test_disabled_reply() {
        let err = ActionError::Disabled { status: StatusId::new("asleep") };
        assert_eq!(err.to_string(), "You cannot do that because you are **asleep**.");
    }
}
