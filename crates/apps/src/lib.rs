//! App name resolution.
//!
//! Maps a spoken app name ("whats app", "google maps application") onto an
//! installed package using a fixed alias table first and fuzzy label
//! scoring second.

mod alias;
mod catalog;
mod resolver;
mod score;

pub use alias::alias_for;
pub use catalog::{AppCatalog, InstalledApp, StaticCatalog};
pub use resolver::{
    rank_candidates, resolve_in, AppCandidate, AppDecision, AppResolver, AMBIGUITY_MARGIN,
    MAX_SUGGESTIONS,
};
pub use score::{match_score, name_variants, MIN_SCORE};
