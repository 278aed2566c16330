//! Scenario tests for command routing.
//!
//! Each table lists utterances as a user would speak them and the command
//! they must produce.

use murmur_router::{
    route, Command, PersonalityTrait, RadioKind, Scripted, SettingsCategory, SystemNavAction,
    VolumeDirection,
};

fn volume(direction: VolumeDirection) -> Command {
    Command::VolumeAdjust { direction }
}

fn nav(action: SystemNavAction) -> Command {
    Command::SystemNav { action }
}

fn app(name: &str) -> Command {
    Command::AppLaunch {
        name: name.to_string(),
    }
}

fn scripted(reply: Scripted) -> Command {
    Command::ScriptedReply { reply }
}

fn assert_routes(cases: &[(&str, Command)]) {
    for (text, expected) in cases {
        assert_eq!(&route(text), expected, "routing {text:?}");
    }
}

// ============================================================================
// Device control
// ============================================================================

mod device {
    use super::*;

    #[test]
    fn test_volume_phrases() {
        assert_routes(&[
            ("volume up", volume(VolumeDirection::Up)),
            ("please make it louder", volume(VolumeDirection::Up)),
            ("raise volume", volume(VolumeDirection::Up)),
            ("turn down volume", volume(VolumeDirection::Down)),
            ("quieter", volume(VolumeDirection::Down)),
            ("full volume", volume(VolumeDirection::Max)),
            ("maximum volume", volume(VolumeDirection::Max)),
            ("mute", volume(VolumeDirection::Min)),
            ("silent", volume(VolumeDirection::Min)),
            ("minimum volume", volume(VolumeDirection::Min)),
        ]);
    }

    #[test]
    fn test_brightness_phrases() {
        assert_routes(&[
            ("brightness up", Command::BrightnessAdjust { delta: 51 }),
            ("brighter", Command::BrightnessAdjust { delta: 51 }),
            ("dim screen", Command::BrightnessAdjust { delta: -51 }),
            ("decrease brightness", Command::BrightnessAdjust { delta: -51 }),
        ]);
    }

    #[test]
    fn test_radio_phrases() {
        let toggle = |radio, enable| Command::RadioToggle { radio, enable };
        assert_routes(&[
            ("turn on wifi", toggle(RadioKind::Wifi, true)),
            ("enable wi-fi", toggle(RadioKind::Wifi, true)),
            ("wifi off", toggle(RadioKind::Wifi, false)),
            ("disable bluetooth", toggle(RadioKind::Bluetooth, false)),
            ("turn on the bluetooth", toggle(RadioKind::Bluetooth, true)),
            ("flashlight off", toggle(RadioKind::Flashlight, false)),
            ("turn on flashlight", toggle(RadioKind::Flashlight, true)),
            ("torch", toggle(RadioKind::Flashlight, true)),
        ]);
    }

    #[test]
    fn test_system_navigation_phrases() {
        assert_routes(&[
            ("go home", nav(SystemNavAction::Home)),
            ("home", nav(SystemNavAction::Home)),
            ("go back", nav(SystemNavAction::Back)),
            ("show recent apps", nav(SystemNavAction::Recents)),
            ("lock screen", nav(SystemNavAction::Lock)),
            ("show notifications", nav(SystemNavAction::Notifications)),
            ("show quick settings", nav(SystemNavAction::QuickSettings)),
            ("split screen", nav(SystemNavAction::SplitScreen)),
            ("take screenshot", nav(SystemNavAction::Screenshot)),
            ("do not disturb", nav(SystemNavAction::DoNotDisturb)),
            ("silent mode", nav(SystemNavAction::DoNotDisturb)),
            ("battery saver", nav(SystemNavAction::PowerSaving)),
        ]);
    }

    #[test]
    fn test_settings_navigation() {
        let settings = |category| Command::SettingsNav { category };
        assert_routes(&[
            ("open settings", settings(SettingsCategory::General)),
            ("go to settings", settings(SettingsCategory::General)),
            ("wifi settings", settings(SettingsCategory::Wifi)),
            ("open display settings", settings(SettingsCategory::Display)),
            ("settings for battery", settings(SettingsCategory::Battery)),
            ("open the sound settings", settings(SettingsCategory::Sound)),
        ]);
    }

    #[test]
    fn test_app_launch() {
        assert_routes(&[
            ("open whats app", app("whats app")),
            ("Launch YouTube", app("youtube")),
            ("start the calculator", app("calculator")),
            ("run maps application", app("maps application")),
            ("take a photo", app("camera")),
            ("take picture", app("camera")),
        ]);
    }
}

// ============================================================================
// Navigation, scripted, fallback
// ============================================================================

mod conversational {
    use super::*;

    #[test]
    fn test_navigation_patterns() {
        let to = |d: &str| Command::Navigation {
            destination: d.to_string(),
        };
        assert_routes(&[
            ("navigate to the airport", to("the airport")),
            ("Directions to Union Station", to("Union Station")),
            ("take me to Blue Bottle Coffee", to("Blue Bottle Coffee")),
            ("how do I get to Pier 39?", to("Pier 39")),
            ("show me the way to the museum", to("the museum")),
        ]);
    }

    #[test]
    fn test_scripted_commands() {
        assert_routes(&[
            ("help", scripted(Scripted::Help)),
            ("what can you do", scripted(Scripted::Help)),
            ("show settings", scripted(Scripted::ShowSettings)),
            ("reset all settings", scripted(Scripted::Reset)),
            ("Hello TARS", scripted(Scripted::Greeting)),
            ("who are you", scripted(Scripted::Identity)),
            ("thank you tars", scripted(Scripted::Thanks)),
            ("bye tars", scripted(Scripted::Goodbye)),
            ("tell me a joke", scripted(Scripted::Joke)),
            ("joke", scripted(Scripted::Joke)),
            (
                "set humor to 75",
                scripted(Scripted::SetTrait {
                    personality_trait: PersonalityTrait::Humor,
                    value: 75,
                }),
            ),
            (
                "set humor to 150",
                scripted(Scripted::RejectedTraitValue {
                    personality_trait: PersonalityTrait::Humor,
                    raw: Some(150),
                }),
            ),
        ]);
    }

    #[test]
    fn test_trait_value_must_be_a_number() {
        assert_eq!(
            route("set humor to fifty"),
            Command::AiQuery {
                text: "set humor to fifty".to_string()
            }
        );
    }

    #[test]
    fn test_fallback_is_ai_query() {
        assert_eq!(
            route("Why is the sky blue?"),
            Command::AiQuery {
                text: "Why is the sky blue?".to_string()
            }
        );
    }
}

// ============================================================================
// Precedence
// ============================================================================

mod precedence {
    use super::*;

    #[test]
    fn test_device_control_beats_scripted() {
        // "display settings" could read as "show your settings"; the settings
        // screen wins.
        assert_eq!(
            route("display settings"),
            Command::SettingsNav {
                category: SettingsCategory::Display
            }
        );
        // A launch verb wins over the joke phrase.
        assert_eq!(route("open joke"), app("joke"));
    }

    #[test]
    fn test_device_control_beats_navigation() {
        assert_eq!(route("open maps"), app("maps"));
    }

    #[test]
    fn test_destinations_with_device_words_stay_navigation() {
        let to = |d: &str| Command::Navigation {
            destination: d.to_string(),
        };
        assert_routes(&[
            ("navigate to Silent Lake", to("Silent Lake")),
            ("directions to Mute Swan Park", to("Mute Swan Park")),
            ("take me to Brighter Smiles Dental", to("Brighter Smiles Dental")),
            ("navigate to Home Depot", to("Home Depot")),
            ("take me to Lock Haven", to("Lock Haven")),
        ]);
    }

    #[test]
    fn test_command_serializes_with_type_tag() {
        let json = serde_json::to_value(route("volume up")).unwrap();
        assert_eq!(json["type"], "volume_adjust");
        assert_eq!(json["direction"], "up");

        let json = serde_json::to_value(route("set sarcasm to 10")).unwrap();
        assert_eq!(json["type"], "scripted_reply");
        assert_eq!(json["reply"]["key"], "set_trait");
        assert_eq!(json["reply"]["trait"], "sarcasm");
    }
}

// ============================================================================
// Stress
// ============================================================================

#[test]
fn stress_routing_is_total_and_deterministic() {
    let fragments = [
        "open", "the", "volume", "up", "wifi", "settings", "set", "humor", "to", "150",
        "navigate", "tars", "thank", "you", "lock", "screen", "mute", "", "?", "wi-fi",
    ];

    for a in fragments {
        for b in fragments {
            for c in fragments {
                let text = format!("{a} {b} {c}");
                let first = route(&text);
                assert_eq!(first, route(&text), "non-deterministic for {text:?}");
                if let Command::AppLaunch { name } = &first {
                    assert!(!name.is_empty(), "empty app name for {text:?}");
                }
            }
        }
    }
}
