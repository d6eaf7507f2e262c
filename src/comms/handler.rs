//! Recent-action cache used to mirror narration at most once per channel.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use crate::core::{Action, ActionId, ChannelId};

/// Default number of actions remembered.
pub const DEFAULT_ACTION_CACHE_SIZE: usize = 20;

/// Remembers which channels each recent action was communicated in.
///
/// The cache is insertion-ordered and bounded; when full, the oldest action is
/// evicted to make room.
///
/// ## Example
///
/// ```
/// use rust_ifgame::comms::CommunicationHandler;
/// use rust_ifgame::core::{Action, ActionType, ChannelId, PlayerId, RoomId};
///
/// let mut comms = CommunicationHandler::new(20);
/// let action = Action::new(ActionType::Say, PlayerId::new(1), RoomId::new(0), false);
/// let channel = ChannelId::room(RoomId::new(0));
///
/// assert!(comms.cache_channel_for(&action, channel.clone()));
/// assert!(!comms.cache_channel_for(&action, channel));
/// ```
#[derive(Clone, Debug)]
pub struct CommunicationHandler {
    capacity: usize,
    cache: FxHashMap<ActionId, Action>,
    order: VecDeque<ActionId>,
}

impl Default for CommunicationHandler {
    fn default() -> Self {
        Self::new(DEFAULT_ACTION_CACHE_SIZE)
    }
}

impl CommunicationHandler {
    /// Create a handler remembering up to `capacity` actions (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            cache: FxHashMap::default(),
            order: VecDeque::with_capacity(capacity),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &ActionId) -> bool {
        self.cache.contains_key(id)
    }

    /// The cached copy of an action.
    #[must_use]
    pub fn get(&self, id: &ActionId) -> Option<&Action> {
        self.cache.get(id)
    }

    /// Whether `action` already reached `channel`, according to the cached
    /// copy if there is one.
    #[must_use]
    pub fn has_been_communicated_in(&self, action: &Action, channel: &ChannelId) -> bool {
        match self.cache.get(&action.id) {
            Some(cached) => cached.has_been_communicated_in(channel),
            None => action.has_been_communicated_in(channel),
        }
    }

    /// Record that `action` was communicated in `channel`.
    ///
    /// Returns true when the channel is newly recorded, false when the action
    /// had already reached it. An action seen for the first time is cached,
    /// evicting the oldest entry when the cache is full.
    pub fn cache_channel_for(&mut self, action: &Action, channel: ChannelId) -> bool {
        if self.has_been_communicated_in(action, &channel) {
            return false;
        }

        if let Some(cached) = self.cache.get_mut(&action.id) {
            cached.add_to_mirrors(channel);
            return true;
        }

        let mut copy = action.clone();
        copy.add_to_mirrors(channel);
        self.insert(copy);
        true
    }

    fn insert(&mut self, action: Action) {
        while self.cache.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.cache.remove(&oldest);
                }
                None => break,
            }
        }
        self.order.push_back(action.id);
        self.cache.insert(action.id, action);
    }
}
