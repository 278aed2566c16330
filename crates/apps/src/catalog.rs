//! Installed application inventory.

use serde::{Deserialize, Serialize};

/// A launchable application on the device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstalledApp {
    /// Package identifier (e.g., "com.whatsapp").
    pub id: String,
    /// User-visible label (e.g., "WhatsApp").
    pub name: String,
}

impl InstalledApp {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Source of launchable apps, implemented by the platform adapter.
pub trait AppCatalog: Send + Sync {
    /// Apps that have a launch entry point.
    fn launchable_apps(&self) -> Vec<InstalledApp>;

    /// Look up a launchable app by package id.
    fn find(&self, id: &str) -> Option<InstalledApp> {
        self.launchable_apps().into_iter().find(|app| app.id == id)
    }
}

/// Fixed in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    apps: Vec<InstalledApp>,
}

impl StaticCatalog {
    pub fn new(apps: Vec<InstalledApp>) -> Self {
        Self { apps }
    }

    /// Build from `(id, name)` pairs.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|(id, name)| InstalledApp::new(*id, *name))
                .collect(),
        )
    }
}

impl AppCatalog for StaticCatalog {
    fn launchable_apps(&self) -> Vec<InstalledApp> {
        self.apps.clone()
    }
}
