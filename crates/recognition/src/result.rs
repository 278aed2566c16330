use serde::{Deserialize, Serialize};

/// Transcript candidates for one recognition turn, best first.
///
/// Confidence is implicit in the position: index 0 is the engine's top
/// hypothesis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub candidates: Vec<String>,
}

impl RecognitionResult {
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }

    pub fn single(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![text.into()],
        }
    }

    /// Top candidate, if any.
    pub fn best(&self) -> Option<&str> {
        self.candidates.first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.iter().all(|c| c.trim().is_empty())
    }

    /// Whether the top candidate contains `phrase`, ignoring case.
    pub fn best_contains(&self, phrase: &str) -> bool {
        let needle = phrase.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }
        self.best()
            .map(|best| best.to_lowercase().contains(&needle))
            .unwrap_or(false)
    }
}
