//! Status effects: definitions, registry and lifecycle.
//!
//! ## Status vs StatusInstance
//!
//! - `Status`: immutable definition loaded from game data (duration,
//!   overriders, cures, stage chain, stat modifiers, behavior attributes).
//! - `StatusInstance`: a status carried by a player, with its own
//!   countdown and timer handle.
//!
//! Every change to a player's statuses goes through [`StatusLifecycle`].

mod attributes;
mod definition;
mod duration;
mod lifecycle;
mod registry;

pub use attributes::BehaviorAttribute;
pub use definition::{StatModifier, Status, StatusInstance};
pub use duration::{parse_duration, DurationParseError};
pub use lifecycle::{CureOptions, CureOutcome, InflictOptions, InflictOutcome, StatusLifecycle, HEATED};
pub use registry::{DanglingStatusRef, StatusRegistry};
