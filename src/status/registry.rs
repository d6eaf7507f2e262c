//! Status registry for definition lookup.
//!
//! The `StatusRegistry` stores every status definition in the game, keyed by
//! id. Definitions refer to each other by id (cures, next stages, ...), so the
//! registry can check those references once after loading.

use rustc_hash::FxHashMap;
use thiserror::Error;

use super::definition::Status;
use crate::core::StatusId;

/// A definition refers to a status that was never registered.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("status \"{status}\" refers to unknown status \"{missing}\"")]
pub struct DanglingStatusRef {
    pub status: StatusId,
    pub missing: StatusId,
}

/// Registry of status definitions.
///
/// ## Example
///
/// ```
/// use rust_ifgame::status::{Status, StatusRegistry};
///
/// let mut registry = StatusRegistry::new();
/// registry.register(Status::new("awake"));
/// registry.register(Status::new("asleep").with_overrider("awake"));
///
/// assert!(registry.validate().is_ok());
/// assert!(registry.get(&"asleep".into()).is_some());
/// ```
#[derive(Clone, Debug, Default)]
pub struct StatusRegistry {
    statuses: FxHashMap<StatusId, Status>,
}

impl StatusRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a status definition, replacing any previous definition with
    /// the same id. Returns the replaced definition.
    pub fn register(&mut self, status: Status) -> Option<Status> {
        self.statuses.insert(status.id.clone(), status)
    }

    #[must_use]
    pub fn get(&self, id: &StatusId) -> Option<&Status> {
        self.statuses.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &StatusId) -> bool {
        self.statuses.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Status> {
        self.statuses.values()
    }

    /// Check every cross-reference resolves.
    pub fn validate(&self) -> Result<(), DanglingStatusRef> {
        for status in self.statuses.values() {
            if let Some(missing) = status.referenced_statuses().find(|id| !self.contains(id)) {
                return Err(DanglingStatusRef {
                    status: status.id.clone(),
                    missing: missing.clone(),
                });
            }
        }
        Ok(())
    }
}

impl FromIterator<Status> for StatusRegistry {
    fn from_iter<T: IntoIterator<Item = Status>>(iter: T) -> Self {
        let mut registry = Self::new();
        for status in iter {
            registry.register(status);
        }
        registry
    }
}
