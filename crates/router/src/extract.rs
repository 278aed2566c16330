//! Small extractors shared by the matchers.

use crate::command::SettingsCategory;
use regex::Regex;
use std::sync::LazyLock;

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Verbs that introduce an app launch.
pub const LAUNCH_PREFIXES: &[&str] = &["open ", "launch ", "start ", "run "];

/// First run of ASCII digits in `text`.
///
/// Values that do not fit in a `u64` yield `None`.
pub fn extract_number(text: &str) -> Option<u64> {
    DIGITS.find(text).and_then(|m| m.as_str().parse().ok())
}

/// App name after a launch verb, with a leading "the " removed.
///
/// Expects lower-cased input. A trailing "app"/"application" is kept; the
/// resolver strips it when building name variants.
pub fn extract_app_name(text: &str) -> Option<String> {
    let rest = LAUNCH_PREFIXES
        .iter()
        .find_map(|prefix| text.strip_prefix(prefix))?;

    let mut words: Vec<&str> = rest.split_whitespace().collect();
    if words.first() == Some(&"the") {
        words.remove(0);
    }
    let name = words.join(" ");
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// First word in `text` naming a settings category.
pub fn find_settings_category(text: &str) -> Option<SettingsCategory> {
    words(text).find_map(SettingsCategory::from_word)
}

/// Words of `text`, split on anything but letters, digits and hyphens.
pub(crate) fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric() && c != '-')
        .filter(|w| !w.is_empty())
}

pub(crate) fn contains_word(text: &str, word: &str) -> bool {
    words(text).any(|w| w == word)
}

pub(crate) fn contains_any(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| text.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_number() {
        assert_eq!(extract_number("set humor to 150"), Some(150));
        assert_eq!(extract_number("set humor to 07 or 9"), Some(7));
        assert_eq!(extract_number("no digits here"), None);
        assert_eq!(extract_number("99999999999999999999999"), None);
    }

    #[test]
    fn test_extract_app_name() {
        assert_eq!(extract_app_name("open whats app").as_deref(), Some("whats app"));
        assert_eq!(extract_app_name("launch the  camera").as_deref(), Some("camera"));
        assert_eq!(extract_app_name("run spotify app").as_deref(), Some("spotify app"));
        assert_eq!(extract_app_name("open the "), None);
        assert_eq!(extract_app_name("opening hours"), None);
    }

    #[test]
    fn test_find_settings_category() {
        assert_eq!(
            find_settings_category("settings for wi-fi"),
            Some(SettingsCategory::Wifi)
        );
        assert_eq!(
            find_settings_category("open settings for date and time"),
            Some(SettingsCategory::DateTime)
        );
        assert_eq!(find_settings_category("open settings"), None);
    }

    #[test]
    fn test_contains_word_respects_boundaries() {
        assert!(contains_word("please mute", "mute"));
        assert!(!contains_word("my commute", "mute"));
        assert!(contains_word("turn on the wi-fi", "wi-fi"));
    }
}
