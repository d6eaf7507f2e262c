//! Recording implementation of every port.
//!
//! `Transcript` keeps what the engine emitted in order, routes narration
//! mirroring through a [`CommunicationHandler`], and persists into a
//! [`MemoryStore`]. Hosts that render text later, replay tooling and tests
//! all consume it.

use super::{GameLog, LogEntry, LogKind, MemoryStore, Narration, Narrator, Persistence};
use crate::comms::CommunicationHandler;
use crate::core::{Action, ActionId, ActionType, ChannelId, Player, PlayerId};
use crate::puzzle::Puzzle;

/// One narration, tagged with the action that caused it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NarrationEvent {
    pub action: ActionId,
    pub action_type: ActionType,
    pub narration: Narration,
}

/// Records everything the engine emits.
#[derive(Clone, Debug, Default)]
pub struct Transcript {
    pub comms: CommunicationHandler,
    pub store: MemoryStore,
    events: Vec<NarrationEvent>,
    notifications: Vec<(PlayerId, String)>,
    log: Vec<LogEntry>,
    deliveries: Vec<(ChannelId, ActionId)>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a communication handler with a custom cache size.
    #[must_use]
    pub fn with_comms(mut self, comms: CommunicationHandler) -> Self {
        self.comms = comms;
        self
    }

    #[must_use]
    pub fn events(&self) -> &[NarrationEvent] {
        &self.events
    }

    pub fn narrations(&self) -> impl Iterator<Item = &Narration> {
        self.events.iter().map(|e| &e.narration)
    }

    #[must_use]
    pub fn notifications(&self) -> &[(PlayerId, String)] {
        &self.notifications
    }

    /// Notifications sent to one player, oldest first.
    #[must_use]
    pub fn notifications_for(&self, player: PlayerId) -> Vec<&str> {
        self.notifications
            .iter()
            .filter(|(p, _)| *p == player)
            .map(|(_, text)| text.as_str())
            .collect()
    }

    #[must_use]
    pub fn log_entries(&self) -> &[LogEntry] {
        &self.log
    }

    #[must_use]
    pub fn log_kinds(&self) -> Vec<LogKind> {
        self.log.iter().map(|e| e.kind).collect()
    }

    /// Channel mirrors made, one per (channel, action) pair.
    #[must_use]
    pub fn deliveries(&self) -> &[(ChannelId, ActionId)] {
        &self.deliveries
    }

    /// Forget recorded output. The communication cache and store are kept.
    pub fn clear(&mut self) {
        self.events.clear();
        self.notifications.clear();
        self.log.clear();
        self.deliveries.clear();
    }
}

impl Narrator for Transcript {
    fn narrate(&mut self, action: &Action, narration: Narration) {
        tracing::trace!(action = %action.id, ?narration, "narrate");
        self.events.push(NarrationEvent {
            action: action.id,
            action_type: action.action_type,
            narration,
        });

        for channel in [ChannelId::room(action.location), ChannelId::spectate(action.player)] {
            if self.comms.cache_channel_for(action, channel.clone()) {
                self.deliveries.push((channel, action.id));
            }
        }
    }

    fn notify(&mut self, player: PlayerId, text: &str) {
        if !text.is_empty() {
            self.notifications.push((player, text.to_string()));
        }
    }
}

impl GameLog for Transcript {
    fn log(&mut self, entry: LogEntry) {
        tracing::debug!(kind = ?entry.kind, actor = %entry.actor, subject = %entry.subject, forced = entry.forced, "game log");
        self.log.push(entry);
    }
}

impl Persistence for Transcript {
    fn persist_puzzle_solved(&mut self, puzzle: &Puzzle, solved: bool) {
        self.store.persist_puzzle_solved(puzzle, solved);
    }

    fn persist_puzzle_attempts(&mut self, puzzle: &Puzzle) {
        self.store.persist_puzzle_attempts(puzzle);
    }

    fn persist_status_list(&mut self, player: &Player) {
        self.store.persist_status_list(player);
    }

    fn reload(&mut self) {
        self.store.reload();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RoomId, StatusId};

    #[test]
    fn test_narration_mirrored_once_per_channel() {
        let mut transcript = Transcript::new();
        let action = Action::new(ActionType::Inflict, PlayerId::new(1), RoomId::new(3), false);
        let narration = Narration::StatusInflicted {
            player: PlayerId::new(1),
            status: StatusId::new("cold"),
        };

        transcript.narrate(&action, narration.clone());
        transcript.narrate(&action, narration);

        assert_eq!(transcript.events().len(), 2);
        let channels: Vec<_> = transcript.deliveries().iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(channels, vec!["room-3", "spectate-1"]);
    }

    #[test]
    fn test_notifications() {
        let mut transcript = Transcript::new();
        transcript.notify(PlayerId::new(1), "You feel cold.");
        transcript.notify(PlayerId::new(2), "Hello.");
        transcript.notify(PlayerId::new(1), "");

        assert_eq!(transcript.notifications_for(PlayerId::new(1)), vec!["You feel cold."]);
        transcript.clear();
        assert!(transcript.notifications().is_empty());
    }
}
