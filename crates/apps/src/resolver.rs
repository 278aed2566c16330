//! Turns a spoken app name into a launch decision.

use crate::alias::alias_for;
use crate::catalog::{AppCatalog, InstalledApp};
use crate::score::{match_score, name_variants, MIN_SCORE, SCORE_EXACT};
use serde::Serialize;
use std::cmp::Ordering;
use std::sync::Arc;

/// The top candidate launches only when it leads the runner-up by more
/// than this many points.
pub const AMBIGUITY_MARGIN: u8 = 30;

/// Suggestions listed when the match is ambiguous.
pub const MAX_SUGGESTIONS: usize = 3;

/// A scored installed app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppCandidate {
    pub id: String,
    pub name: String,
    #[serde(rename = "score_pct")]
    points: u8,
}

impl AppCandidate {
    fn new(app: &InstalledApp, points: u8) -> Self {
        Self {
            id: app.id.clone(),
            name: app.name.clone(),
            points,
        }
    }

    /// Match quality in `[0, 1]`.
    pub fn score(&self) -> f32 {
        f32::from(self.points) / 100.0
    }

    /// Match quality in whole points, `0..=100`.
    pub fn points(&self) -> u8 {
        self.points
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppDecision {
    Launch(AppCandidate),
    /// Best matches first, at most [`MAX_SUGGESTIONS`].
    Ambiguous(Vec<AppCandidate>),
    NotFound {
        query: String,
    },
}

impl AppDecision {
    /// Text spoken back to the user.
    pub fn message(&self) -> String {
        match self {
            AppDecision::Launch(app) => format!("Opening {}", app.name),
            AppDecision::Ambiguous(candidates) => {
                let names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
                format!(
                    "Found multiple matching apps: {}. Please be more specific.",
                    names.join(", ")
                )
            }
            AppDecision::NotFound { query } => {
                format!("Sorry, I couldn't find an app matching '{query}'")
            }
        }
    }
}

/// Resolves names against a live catalog.
pub struct AppResolver {
    catalog: Arc<dyn AppCatalog>,
}

impl AppResolver {
    pub fn new(catalog: Arc<dyn AppCatalog>) -> Self {
        Self { catalog }
    }

    pub fn resolve(&self, spoken: &str) -> AppDecision {
        let apps = self.catalog.launchable_apps();
        let decision = resolve_in(spoken, &apps);
        match &decision {
            AppDecision::Launch(app) => {
                tracing::debug!(query = spoken, id = %app.id, points = app.points, "Resolved app");
            }
            AppDecision::Ambiguous(candidates) => {
                tracing::debug!(query = spoken, count = candidates.len(), "Ambiguous app name");
            }
            AppDecision::NotFound { .. } => {
                tracing::debug!(query = spoken, apps = apps.len(), "No app matched");
            }
        }
        decision
    }
}

/// Resolve `spoken` against a fixed app list.
///
/// Known aliases win outright when their package is installed; otherwise
/// every app is scored against every name variant.
pub fn resolve_in(spoken: &str, apps: &[InstalledApp]) -> AppDecision {
    let variants = name_variants(spoken);

    if let Some(app) = variants.iter().find_map(|variant| {
        let id = alias_for(variant)?;
        apps.iter().find(|app| app.id == id)
    }) {
        return AppDecision::Launch(AppCandidate::new(app, SCORE_EXACT));
    }

    let mut ranked = rank_candidates(&variants, apps);
    match ranked.len() {
        0 => AppDecision::NotFound {
            query: spoken.trim().to_string(),
        },
        1 => AppDecision::Launch(ranked.remove(0)),
        _ if ranked[0].points - ranked[1].points > AMBIGUITY_MARGIN => {
            AppDecision::Launch(ranked.remove(0))
        }
        _ => {
            ranked.truncate(MAX_SUGGESTIONS);
            AppDecision::Ambiguous(ranked)
        }
    }
}

/// Apps scoring above the floor, best first.
///
/// Equal scores prefer the longer label, then the label alphabetically,
/// then the package id, so the order never depends on catalog order.
pub fn rank_candidates(variants: &[String], apps: &[InstalledApp]) -> Vec<AppCandidate> {
    let mut ranked: Vec<AppCandidate> = apps
        .iter()
        .filter_map(|app| {
            let points = variants
                .iter()
                .map(|variant| match_score(variant, &app.name, &app.id))
                .max()
                .unwrap_or(0);
            (points > MIN_SCORE).then(|| AppCandidate::new(app, points))
        })
        .collect();
    ranked.sort_by(compare_candidates);
    ranked
}

fn compare_candidates(a: &AppCandidate, b: &AppCandidate) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.name.chars().count().cmp(&a.name.chars().count()))
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.id.cmp(&b.id))
}
