//! Narration mirroring bookkeeping.
//!
//! Delivery itself belongs to the host. This module only remembers which
//! channels each recent action's narration reached, so a narration mirrored
//! through several paths (room channel, spectate channel, whisper) is sent to
//! each channel once.

mod handler;

pub use handler::{CommunicationHandler, DEFAULT_ACTION_CACHE_SIZE};
