//! Voice command routing.
//!
//! Turns one recognized utterance into a [`Command`]. Routing is a pure
//! function of the text; acting on the command is left to the dispatcher
//! and the assistant.

mod command;
mod extract;
mod router;

pub use command::{
    Command, PersonalityTrait, RadioKind, Scripted, SettingsCategory, SystemNavAction,
    VolumeDirection,
};
pub use extract::{extract_app_name, extract_number, find_settings_category, LAUNCH_PREFIXES};
pub use router::{route, BRIGHTNESS_STEP};
