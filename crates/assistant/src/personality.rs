//! Adjustable personality traits.

use murmur_router::PersonalityTrait;
use serde::{Deserialize, Serialize};

/// Trait levels, each 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personality {
    pub humor: u8,
    pub honesty: u8,
    pub sarcasm: u8,
}

impl Default for Personality {
    fn default() -> Self {
        Self {
            humor: 100,
            honesty: 100,
            sarcasm: 0,
        }
    }
}

impl Personality {
    pub fn get(&self, personality_trait: PersonalityTrait) -> u8 {
        match personality_trait {
            PersonalityTrait::Humor => self.humor,
            PersonalityTrait::Honesty => self.honesty,
            PersonalityTrait::Sarcasm => self.sarcasm,
        }
    }

    /// Values above 100 are clamped.
    pub fn set(&mut self, personality_trait: PersonalityTrait, value: u8) {
        let value = value.min(100);
        match personality_trait {
            PersonalityTrait::Humor => self.humor = value,
            PersonalityTrait::Honesty => self.honesty = value,
            PersonalityTrait::Sarcasm => self.sarcasm = value,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn humor_style(&self) -> &'static str {
        match self.humor {
            0 => "Be completely serious and professional.",
            1..=25 => "Use minimal, subtle humor occasionally.",
            26..=50 => "Be moderately humorous, using clever remarks.",
            51..=75 => "Be quite humorous with witty responses.",
            _ => "Be highly humorous with clever wordplay and wit.",
        }
    }

    pub fn honesty_style(&self) -> &'static str {
        match self.honesty {
            0..=30 => "Be diplomatic and indirect.",
            31..=70 => "Be balanced in honesty.",
            _ => "Be completely direct and honest.",
        }
    }

    /// Sarcasm only applies on top of strong humor.
    pub fn sarcasm_style(&self) -> Option<&'static str> {
        if self.humor <= 60 {
            return None;
        }
        match self.sarcasm {
            0 => None,
            1..=30 => Some("Use occasional light sarcasm."),
            31..=70 => Some("Include moderate sarcasm."),
            _ => Some("Be notably sarcastic."),
        }
    }
}
