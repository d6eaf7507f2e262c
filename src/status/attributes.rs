//! Behavior attributes: semantic flags a status grants its carrier.
//!
//! The attribute strings are the schema game data is written against, so
//! parsing and display round-trip the exact text (`"no channel"`,
//! `"disable move"`, ...). Unknown attributes are kept verbatim in
//! [`BehaviorAttribute::Other`].

use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A behavior attribute.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BehaviorAttribute {
    /// Occupies a hiding spot; invisible to the room.
    Hidden,
    /// Identity is masked behind a generic display name.
    Concealed,
    /// Cut off from the room channel.
    NoChannel,
    NoHearing,
    NoSight,
    NoSpeech,
    Unconscious,
    /// `disable all`: every player-initiated verb is rejected unless enabled.
    DisableAll,
    /// `disable <verb>`.
    Disable(String),
    /// `enable <verb>`: exception to `disable all`.
    Enable(String),
    /// Dice rolls land on an extreme.
    AllOrNothing,
    Thief,
    AcuteHearing,
    HearRoom,
    SeeRoom,
    Sender,
    Receiver,
    Other(String),
}

impl BehaviorAttribute {
    /// Whether carrying this attribute halts a player in motion.
    #[must_use]
    pub fn stops_movement(&self) -> bool {
        match self {
            BehaviorAttribute::DisableAll => true,
            BehaviorAttribute::Disable(verb) => verb == "move" || verb == "run",
            _ => false,
        }
    }

    /// Whether this attribute removes the carrier from the room channel.
    #[must_use]
    pub fn leaves_channel(&self) -> bool {
        matches!(self, BehaviorAttribute::NoChannel | BehaviorAttribute::NoHearing)
    }
}

impl FromStr for BehaviorAttribute {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let attribute = match s {
            "hidden" => BehaviorAttribute::Hidden,
            "concealed" => BehaviorAttribute::Concealed,
            "no channel" => BehaviorAttribute::NoChannel,
            "no hearing" => BehaviorAttribute::NoHearing,
            "no sight" => BehaviorAttribute::NoSight,
            "no speech" => BehaviorAttribute::NoSpeech,
            "unconscious" => BehaviorAttribute::Unconscious,
            "disable all" => BehaviorAttribute::DisableAll,
            "all or nothing" => BehaviorAttribute::AllOrNothing,
            "thief" => BehaviorAttribute::Thief,
            "acute hearing" => BehaviorAttribute::AcuteHearing,
            "hear room" => BehaviorAttribute::HearRoom,
            "see room" => BehaviorAttribute::SeeRoom,
            "sender" => BehaviorAttribute::Sender,
            "receiver" => BehaviorAttribute::Receiver,
            _ => {
                if let Some(verb) = s.strip_prefix("disable ") {
                    BehaviorAttribute::Disable(verb.trim().to_string())
                } else if let Some(verb) = s.strip_prefix("enable ") {
                    BehaviorAttribute::Enable(verb.trim().to_string())
                } else {
                    BehaviorAttribute::Other(s.to_string())
                }
            }
        };
        Ok(attribute)
    }
}

impl std::fmt::Display for BehaviorAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BehaviorAttribute::Hidden => f.write_str("hidden"),
            BehaviorAttribute::Concealed => f.write_str("concealed"),
            BehaviorAttribute::NoChannel => f.write_str("no channel"),
            BehaviorAttribute::NoHearing => f.write_str("no hearing"),
            BehaviorAttribute::NoSight => f.write_str("no sight"),
            BehaviorAttribute::NoSpeech => f.write_str("no speech"),
            BehaviorAttribute::Unconscious => f.write_str("unconscious"),
            BehaviorAttribute::DisableAll => f.write_str("disable all"),
            BehaviorAttribute::Disable(verb) => write!(f, "disable {verb}"),
            BehaviorAttribute::Enable(verb) => write!(f, "enable {verb}"),
            BehaviorAttribute::AllOrNothing => f.write_str("all or nothing"),
            BehaviorAttribute::Thief => f.write_str("thief"),
            BehaviorAttribute::AcuteHearing => f.write_str("acute hearing"),
            BehaviorAttribute::HearRoom => f.write_str("hear room"),
            BehaviorAttribute::SeeRoom => f.write_str("see room"),
            BehaviorAttribute::Sender => f.write_str("sender"),
            BehaviorAttribute::Receiver => f.write_str("receiver"),
            BehaviorAttribute::Other(text) => f.write_str(text),
        }
    }
}

impl From<String> for BehaviorAttribute {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(attribute) => attribute,
            Err(never) => match never {},
        }
    }
}

impl From<&str> for BehaviorAttribute {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<BehaviorAttribute> for String {
    fn from(attribute: BehaviorAttribute) -> Self {
        attribute.to_string()
    }
}
