//! Pure command routing - no IO, no async, fully testable.
//!
//! Matchers run in a fixed order and the first one that accepts wins:
//! device control, then navigation, then scripted assistant commands, then
//! the AI fallback.

use crate::command::{
    Command, PersonalityTrait, RadioKind, Scripted, SettingsCategory, SystemNavAction,
    VolumeDirection,
};
use crate::extract::{
    contains_any, contains_word, extract_app_name, extract_number, find_settings_category,
};
use regex::Regex;
use std::sync::LazyLock;

/// Brightness step per voice command, on the 0-255 scale.
pub const BRIGHTNESS_STEP: i16 = 51;

static NAVIGATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:navigate to|directions to|take me to|how do i get to|show me the way to)\s+(.+)",
    )
    .expect("valid regex")
});

static CATEGORY_SETTINGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([a-z][a-z-]*) settings?\b").expect("valid regex"));

static GENERIC_SETTINGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:open|go to)(?: the)? settings?\b|\bsettings? for\b|^settings$")
        .expect("valid regex")
});

static SET_TRAIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bset\s+(humor|honesty|sarcasm)\s+to\s+\d+").expect("valid regex")
});

static THANKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^thank(?:s| you)\b.*\btars\b|^tars\b.*\bthank(?:s| you)\b").expect("valid regex")
});

struct RadioPatterns {
    radio: RadioKind,
    on: Regex,
    off: Regex,
}

fn radio_regex(name: &str, verbs: &str, state: &str) -> Regex {
    Regex::new(&format!(
        r"\b(?:{verbs})\s+(?:the\s+)?{name}\b|\b{name}\s+{state}\b"
    ))
    .expect("valid regex")
}

static RADIOS: LazyLock<Vec<RadioPatterns>> = LazyLock::new(|| {
    const ON: &str = "turn on|switch on|enable|activate|connect to";
    const OFF: &str = "turn off|switch off|disable|deactivate|disconnect from|disconnect";

    [
        (RadioKind::Wifi, "wi-?fi"),
        (RadioKind::Bluetooth, "bluetooth"),
        (RadioKind::Flashlight, "(?:flashlight|torch)"),
    ]
    .into_iter()
    .map(|(radio, name)| RadioPatterns {
        radio,
        on: radio_regex(name, ON, "on"),
        off: radio_regex(name, OFF, "off"),
    })
    .collect()
});

const DO_NOT_DISTURB: &[&str] = &["do not disturb", "silent mode", "mute notifications"];

/// Route one utterance to a command.
pub fn route(text: &str) -> Command {
    let raw = text.trim();
    let normalized = normalize(raw);

    let command = device_command(&normalized)
        .or_else(|| navigation(raw))
        .or_else(|| scripted(&normalized).map(|reply| Command::ScriptedReply { reply }))
        .unwrap_or_else(|| Command::AiQuery {
            text: raw.to_string(),
        });

    tracing::debug!(kind = command.kind(), "Routed utterance");
    command
}

/// Lower-case, collapse whitespace, drop trailing punctuation.
fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(['.', '!', '?', ','])
        .trim_end()
        .to_string()
}

fn device_command(text: &str) -> Option<Command> {
    if let Some(category) = settings_nav(text) {
        return Some(Command::SettingsNav { category });
    }
    if let Some(name) = app_launch(text) {
        return Some(Command::AppLaunch { name });
    }
    if let Some(direction) = volume(text) {
        return Some(Command::VolumeAdjust { direction });
    }
    if let Some(delta) = brightness(text) {
        return Some(Command::BrightnessAdjust { delta });
    }
    if let Some((radio, enable)) = radio_toggle(text) {
        return Some(Command::RadioToggle { radio, enable });
    }
    if let Some(action) = system_nav(text) {
        return Some(Command::SystemNav { action });
    }
    if is_photo_request(text) {
        return Some(Command::AppLaunch {
            name: "camera".to_string(),
        });
    }
    None
}

/// Checked before app launch so "open settings" is not an app.
fn settings_nav(text: &str) -> Option<SettingsCategory> {
    if text.contains("quick settings") {
        return None;
    }
    if let Some(category) = CATEGORY_SETTINGS
        .captures(text)
        .and_then(|caps| SettingsCategory::from_word(caps.get(1)?.as_str()))
    {
        return Some(category);
    }
    if GENERIC_SETTINGS.is_match(text) {
        return Some(find_settings_category(text).unwrap_or(SettingsCategory::General));
    }
    None
}

fn app_launch(text: &str) -> Option<String> {
    let name = extract_app_name(text)?;
    // "open notifications" is a system screen, not an app.
    if system_nav(&name).is_some() {
        return None;
    }
    Some(name)
}

fn volume(text: &str) -> Option<VolumeDirection> {
    if contains_any(text, DO_NOT_DISTURB) {
        return None;
    }

    if contains_any(
        text,
        &[
            "volume up",
            "increase volume",
            "turn up volume",
            "turn volume up",
            "raise volume",
        ],
    ) || contains_word(text, "louder")
    {
        Some(VolumeDirection::Up)
    } else if contains_any(
        text,
        &[
            "volume down",
            "decrease volume",
            "turn down volume",
            "turn volume down",
            "lower volume",
        ],
    ) || contains_word(text, "quieter")
    {
        Some(VolumeDirection::Down)
    } else if contains_any(
        text,
        &[
            "max volume",
            "volume max",
            "maximum volume",
            "full volume",
            "volume 100",
            "volume hundred",
        ],
    ) {
        Some(VolumeDirection::Max)
    } else if contains_any(
        text,
        &[
            "min volume",
            "volume min",
            "minimum volume",
            "mute volume",
            "volume 0",
            "volume zero",
        ],
    ) || matches!(text, "mute" | "silent")
    {
        Some(VolumeDirection::Min)
    } else {
        None
    }
}

fn brightness(text: &str) -> Option<i16> {
    if contains_any(
        text,
        &[
            "brightness up",
            "increase brightness",
            "turn up brightness",
            "make screen brighter",
        ],
    ) || text == "brighter"
    {
        Some(BRIGHTNESS_STEP)
    } else if contains_any(
        text,
        &[
            "brightness down",
            "decrease brightness",
            "turn down brightness",
            "make screen darker",
            "dim screen",
        ],
    ) || contains_word(text, "dimmer")
    {
        Some(-BRIGHTNESS_STEP)
    } else {
        None
    }
}

fn radio_toggle(text: &str) -> Option<(RadioKind, bool)> {
    for patterns in RADIOS.iter() {
        if patterns.off.is_match(text) {
            return Some((patterns.radio, false));
        }
        if patterns.on.is_match(text) {
            return Some((patterns.radio, true));
        }
    }

    if text.contains("turn off light") || text.contains("turn off the light") {
        return Some((RadioKind::Flashlight, false));
    }
    if contains_word(text, "flashlight")
        || contains_word(text, "torch")
        || text.contains("turn on light")
        || text.contains("turn on the light")
    {
        return Some((RadioKind::Flashlight, true));
    }
    None
}

fn system_nav(text: &str) -> Option<SystemNavAction> {
    let action = if contains_any(text, DO_NOT_DISTURB) {
        SystemNavAction::DoNotDisturb
    } else if contains_any(
        text,
        &["power saving", "power saver", "battery saver", "save battery"],
    ) {
        SystemNavAction::PowerSaving
    } else if contains_any(text, &["quick settings", "system settings", "quick panel"])
        || contains_word(text, "toggles")
    {
        SystemNavAction::QuickSettings
    } else if contains_word(text, "notifications") {
        SystemNavAction::Notifications
    } else if contains_any(text, &["recent apps", "show recent", "recent tasks"])
        || contains_word(text, "recents")
    {
        SystemNavAction::Recents
    } else if contains_any(
        text,
        &[
            "lock screen",
            "lock phone",
            "lock the phone",
            "lock device",
            "turn off screen",
            "turn off the screen",
            "sleep device",
        ],
    ) || text == "lock"
    {
        SystemNavAction::Lock
    } else if contains_any(text, &["go home", "home screen", "go to home", "go to the home"])
        || text == "home"
    {
        SystemNavAction::Home
    } else if text.contains("go back") || text == "back" {
        SystemNavAction::Back
    } else if contains_any(text, &["split screen", "multi window", "multi-window", "dual screen"]) {
        SystemNavAction::SplitScreen
    } else if contains_any(
        text,
        &["screenshot", "screen shot", "capture screen", "screen capture"],
    ) {
        SystemNavAction::Screenshot
    } else {
        return None;
    };
    Some(action)
}

fn is_photo_request(text: &str) -> bool {
    text == "camera"
        || contains_any(
            text,
            &["take a photo", "take photo", "take a picture", "take picture"],
        )
}

fn navigation(text: &str) -> Option<Command> {
    let caps = NAVIGATION.captures(text)?;
    let destination = caps
        .get(1)?
        .as_str()
        .trim()
        .trim_end_matches(['.', '!', '?'])
        .trim();
    if destination.is_empty() {
        return None;
    }
    Some(Command::Navigation {
        destination: destination.to_string(),
    })
}

fn scripted(text: &str) -> Option<Scripted> {
    let reply = match text {
        "help" | "show help" | "show commands" | "what commands" | "what can you do" => {
            Scripted::Help
        }
        "show settings" | "show parameters" | "what are your settings" => Scripted::ShowSettings,
        "reset settings" | "reset all settings" => Scripted::Reset,
        "hello tars" | "hi tars" | "hey tars" => Scripted::Greeting,
        "who are you" | "who are you tars" => Scripted::Identity,
        "goodbye tars" | "bye tars" => Scripted::Goodbye,
        "tell me a joke" | "tell a joke" | "crack me a joke" | "tars tell me a joke" | "joke" => {
            Scripted::Joke
        }
        _ => return set_trait(text).or_else(|| THANKS.is_match(text).then_some(Scripted::Thanks)),
    };
    Some(reply)
}

/// `set <trait> to <n>`; the number is taken as spoken, never clamped.
fn set_trait(text: &str) -> Option<Scripted> {
    let caps = SET_TRAIT.captures(text)?;
    let personality_trait = PersonalityTrait::from_word(caps.get(1)?.as_str())?;

    let raw = extract_number(text);
    let reply = match raw.and_then(|n| u8::try_from(n).ok()).filter(|n| *n <= 100) {
        Some(value) => Scripted::SetTrait {
            personality_trait,
            value,
        },
        None => Scripted::RejectedTraitValue {
            personality_trait,
            raw,
        },
    };
    Some(reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scripted_reply(text: &str) -> Scripted {
        match route(text) {
            Command::ScriptedReply { reply } => reply,
            other => panic!("expected scripted reply for {text:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Volume   UP! "), "volume up");
        assert_eq!(normalize("Open WhatsApp."), "open whatsapp");
    }

    #[test]
    fn test_settings_nav_before_app_launch() {
        assert_eq!(
            route("open settings"),
            Command::SettingsNav {
                category: SettingsCategory::General
            }
        );
        assert_eq!(
            route("Open Bluetooth settings"),
            Command::SettingsNav {
                category: SettingsCategory::Bluetooth
            }
        );
        assert_eq!(
            route("settings for location"),
            Command::SettingsNav {
                category: SettingsCategory::Location
            }
        );
    }

    #[test]
    fn test_app_launch_strips_leading_article() {
        assert_eq!(
            route("open the whats app"),
            Command::AppLaunch {
                name: "whats app".to_string()
            }
        );
        assert_eq!(
            route("launch spotify app"),
            Command::AppLaunch {
                name: "spotify app".to_string()
            }
        );
    }

    #[test]
    fn test_open_system_screen_is_not_an_app() {
        assert_eq!(
            route("open notifications"),
            Command::SystemNav {
                action: SystemNavAction::Notifications
            }
        );
        assert_eq!(
            route("open quick settings"),
            Command::SystemNav {
                action: SystemNavAction::QuickSettings
            }
        );
    }

    #[test]
    fn test_volume_words_respect_boundaries() {
        assert_eq!(
            route("mute"),
            Command::VolumeAdjust {
                direction: VolumeDirection::Min
            }
        );
        assert!(matches!(route("how long is my commute"), Command::AiQuery { .. }));
        assert!(matches!(
            route("directions to mute swan park"),
            Command::Navigation { .. }
        ));
        assert_eq!(
            route("mute notifications"),
            Command::SystemNav {
                action: SystemNavAction::DoNotDisturb
            }
        );
    }

    #[test]
    fn test_radio_off_wins_over_on() {
        assert_eq!(
            route("turn off wi-fi"),
            Command::RadioToggle {
                radio: RadioKind::Wifi,
                enable: false
            }
        );
        assert_eq!(
            route("bluetooth on"),
            Command::RadioToggle {
                radio: RadioKind::Bluetooth,
                enable: true
            }
        );
        assert_eq!(
            route("torch"),
            Command::RadioToggle {
                radio: RadioKind::Flashlight,
                enable: true
            }
        );
    }

    #[test]
    fn test_set_trait_validation() {
        assert_eq!(
            scripted_reply("set sarcasm to 50"),
            Scripted::SetTrait {
                personality_trait: PersonalityTrait::Sarcasm,
                value: 50
            }
        );
        assert_eq!(
            scripted_reply("set humor to 150"),
            Scripted::RejectedTraitValue {
                personality_trait: PersonalityTrait::Humor,
                raw: Some(150)
            }
        );
        assert_eq!(
            scripted_reply("set honesty to lots"),
            Scripted::RejectedTraitValue {
                personality_trait: PersonalityTrait::Honesty,
                raw: None
            }
        );
    }

    #[test]
    fn test_reset_is_not_set() {
        assert_eq!(scripted_reply("reset settings"), Scripted::Reset);
    }

    #[test]
    fn test_thanks_patterns() {
        assert_eq!(scripted_reply("thank you tars"), Scripted::Thanks);
        assert_eq!(scripted_reply("thanks a lot tars"), Scripted::Thanks);
        assert_eq!(scripted_reply("tars, thanks"), Scripted::Thanks);
        assert!(matches!(route("thanksgiving recipes"), Command::AiQuery { .. }));
    }

    #[test]
    fn test_navigation_keeps_original_case() {
        assert_eq!(
            route("Navigate to Central Park."),
            Command::Navigation {
                destination: "Central Park".to_string()
            }
        );
    }

    #[test]
    fn test_fallback_keeps_raw_text() {
        assert_eq!(
            route("  What's the capital of France?  "),
            Command::AiQuery {
                text: "What's the capital of France?".to_string()
            }
        );
    }
}
