//! Locally answered commands.

use crate::personality::Personality;
use murmur_router::Scripted;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Name the assistant answers to.
pub const ASSISTANT_NAME: &str = "TARS";

pub const GREETING: &str = "Hello! I am TARS, your personal assistant. How can I help you today?";
pub const IDENTITY: &str = "I am TARS, a highly advanced AI assistant. I can help you with \
various tasks and adjust my personality to suit you.";
pub const THANKS: &str = "You're welcome. Is there anything else I can help you with?";
pub const GOODBYE: &str = "Goodbye! Feel free to return if you need any assistance.";
pub const RESET: &str = "All settings have been reset to default values.";
pub const NO_JOKES: &str =
    "Sorry, my humor setting is currently set to 0%. I'm not allowed to tell jokes.";

pub const HELP: &str = "\
Available commands:

Volume: \"volume up\", \"volume down\", \"max volume\", \"mute\"
Brightness: \"brightness up\", \"brightness down\"
Radios: \"turn on WiFi\", \"turn off Bluetooth\", \"flashlight on\"
Apps: \"open [app name]\", \"launch [app name]\", \"take a photo\"
Settings: \"open settings\", \"open [category] settings\"
System: \"go home\", \"go back\", \"recent apps\", \"lock screen\", \
\"show notifications\", \"quick settings\", \"split screen\", \"take screenshot\", \
\"do not disturb\", \"battery saver\"
Navigation: \"navigate to [place]\", \"directions to [place]\"
Personality: \"set humor to [0-100]\", \"set honesty to [0-100]\", \
\"set sarcasm to [0-100]\", \"show settings\", \"reset settings\"
Fun: \"tell me a joke\"

Anything else is answered by the AI.";

pub const JOKES: &[&str] = &[
    "Why don't scientists trust atoms? Because they make up everything!",
    "What did the AI say to the coffee machine? 'You're brewing my mind!'",
    "Why did the scarecrow win an award? Because he was outstanding in his field!",
    "What do you call a bear with no teeth? A gummy bear!",
    "Why don't programmers like nature? It has too many bugs!",
    "What did one wall say to the other wall? I'll meet you at the corner!",
    "Why did the math book look sad? Because it had too many problems!",
    "What do you call a fake noodle? An impasta!",
    "Why did the cookie go to the doctor? Because it was feeling crumbly!",
    "What did the ocean say to the shore? Nothing, it just waved!",
];

/// Produces scripted replies; jokes rotate in order.
#[derive(Debug, Default)]
pub struct ScriptedReplies {
    next_joke: AtomicUsize,
}

impl ScriptedReplies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `reply`, updating `personality` for trait commands.
    pub fn reply(&self, reply: &Scripted, personality: &mut Personality) -> String {
        match reply {
            Scripted::Help => HELP.to_string(),
            Scripted::ShowSettings => format!(
                "Current settings:\nHumor: {}%\nHonesty: {}%\nSarcasm: {}%",
                personality.humor, personality.honesty, personality.sarcasm
            ),
            Scripted::SetTrait {
                personality_trait,
                value,
            } => {
                personality.set(*personality_trait, *value);
                tracing::info!(personality_trait = %personality_trait, value, "Personality adjusted");
                format!("{} setting adjusted to {value}%", personality_trait.title())
            }
            Scripted::RejectedTraitValue {
                personality_trait, ..
            } => format!(
                "Invalid {personality_trait} value. Please specify a number between 0 and 100."
            ),
            Scripted::Reset => {
                personality.reset();
                RESET.to_string()
            }
            Scripted::Greeting => GREETING.to_string(),
            Scripted::Identity => IDENTITY.to_string(),
            Scripted::Thanks => THANKS.to_string(),
            Scripted::Goodbye => GOODBYE.to_string(),
            Scripted::Joke => {
                if personality.humor == 0 {
                    NO_JOKES.to_string()
                } else {
                    self.joke().to_string()
                }
            }
        }
    }

    fn joke(&self) -> &'static str {
        let index = self.next_joke.fetch_add(1, Ordering::Relaxed) % JOKES.len();
        JOKES[index]
    }
}
