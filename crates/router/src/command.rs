//! Routed command types.

use serde::Serialize;

/// Volume change requested by voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeDirection {
    Up,
    Down,
    Max,
    Min,
}

/// Toggleable radio or light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RadioKind {
    Wifi,
    Bluetooth,
    Flashlight,
}

impl RadioKind {
    pub fn label(&self) -> &'static str {
        match self {
            RadioKind::Wifi => "WiFi",
            RadioKind::Bluetooth => "Bluetooth",
            RadioKind::Flashlight => "flashlight",
        }
    }
}

/// Settings screens reachable by voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsCategory {
    General,
    Wifi,
    Bluetooth,
    Display,
    Sound,
    Battery,
    Storage,
    Apps,
    Location,
    Network,
    DateTime,
    Language,
    Accessibility,
    Security,
    Privacy,
    Developer,
}

impl SettingsCategory {
    /// Category for a spoken word, if it names one.
    pub fn from_word(word: &str) -> Option<Self> {
        let category = match word {
            "general" => SettingsCategory::General,
            "wifi" | "wi-fi" => SettingsCategory::Wifi,
            "bluetooth" => SettingsCategory::Bluetooth,
            "display" | "screen" => SettingsCategory::Display,
            "sound" | "audio" => SettingsCategory::Sound,
            "battery" => SettingsCategory::Battery,
            "storage" => SettingsCategory::Storage,
            "app" | "apps" | "application" | "applications" => SettingsCategory::Apps,
            "location" => SettingsCategory::Location,
            "network" => SettingsCategory::Network,
            "date" | "time" => SettingsCategory::DateTime,
            "language" => SettingsCategory::Language,
            "accessibility" => SettingsCategory::Accessibility,
            "security" => SettingsCategory::Security,
            "privacy" => SettingsCategory::Privacy,
            "developer" => SettingsCategory::Developer,
            _ => return None,
        };
        Some(category)
    }

    /// Name used in spoken outcomes ("Opening {label} settings").
    pub fn label(&self) -> &'static str {
        match self {
            SettingsCategory::General => "general",
            SettingsCategory::Wifi => "WiFi",
            SettingsCategory::Bluetooth => "Bluetooth",
            SettingsCategory::Display => "display",
            SettingsCategory::Sound => "sound",
            SettingsCategory::Battery => "battery",
            SettingsCategory::Storage => "storage",
            SettingsCategory::Apps => "apps",
            SettingsCategory::Location => "location",
            SettingsCategory::Network => "network",
            SettingsCategory::DateTime => "date and time",
            SettingsCategory::Language => "language",
            SettingsCategory::Accessibility => "accessibility",
            SettingsCategory::Security => "security",
            SettingsCategory::Privacy => "privacy",
            SettingsCategory::Developer => "developer",
        }
    }
}

impl std::fmt::Display for SettingsCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Global navigation and system-screen actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemNavAction {
    Home,
    Back,
    Recents,
    Lock,
    Notifications,
    QuickSettings,
    SplitScreen,
    Screenshot,
    DoNotDisturb,
    PowerSaving,
}

/// Assistant personality dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalityTrait {
    Humor,
    Honesty,
    Sarcasm,
}

impl PersonalityTrait {
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "humor" => Some(PersonalityTrait::Humor),
            "honesty" => Some(PersonalityTrait::Honesty),
            "sarcasm" => Some(PersonalityTrait::Sarcasm),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PersonalityTrait::Humor => "humor",
            PersonalityTrait::Honesty => "honesty",
            PersonalityTrait::Sarcasm => "sarcasm",
        }
    }

    /// Capitalized name for replies.
    pub fn title(&self) -> &'static str {
        match self {
            PersonalityTrait::Humor => "Humor",
            PersonalityTrait::Honesty => "Honesty",
            PersonalityTrait::Sarcasm => "Sarcasm",
        }
    }
}

impl std::fmt::Display for PersonalityTrait {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Locally answered assistant commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "key", rename_all = "snake_case")]
pub enum Scripted {
    Help,
    ShowSettings,
    SetTrait {
        #[serde(rename = "trait")]
        personality_trait: PersonalityTrait,
        value: u8,
    },
    /// `set <trait> to <n>` with a missing or out-of-range number.
    RejectedTraitValue {
        #[serde(rename = "trait")]
        personality_trait: PersonalityTrait,
        raw: Option<u64>,
    },
    Reset,
    Greeting,
    Identity,
    Thanks,
    Goodbye,
    Joke,
}

/// Result of routing one utterance.
///
/// Built once per utterance and handed to exactly one consumer.
#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    VolumeAdjust { direction: VolumeDirection },
    BrightnessAdjust { delta: i16 },
    RadioToggle { radio: RadioKind, enable: bool },
    AppLaunch { name: String },
    SettingsNav { category: SettingsCategory },
    SystemNav { action: SystemNavAction },
    ScriptedReply { reply: Scripted },
    Navigation { destination: String },
    AiQuery { text: String },
}

impl Command {
    /// Short kind name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Command::VolumeAdjust { .. } => "volume_adjust",
            Command::BrightnessAdjust { .. } => "brightness_adjust",
            Command::RadioToggle { .. } => "radio_toggle",
            Command::AppLaunch { .. } => "app_launch",
            Command::SettingsNav { .. } => "settings_nav",
            Command::SystemNav { .. } => "system_nav",
            Command::ScriptedReply { .. } => "scripted_reply",
            Command::Navigation { .. } => "navigation",
            Command::AiQuery { .. } => "ai_query",
        }
    }

    /// Whether the device dispatcher handles this command.
    pub fn is_device_action(&self) -> bool {
        !matches!(self, Command::ScriptedReply { .. } | Command::AiQuery { .. })
    }
}
