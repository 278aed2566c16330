//! Device capability contracts.
//!
//! Abstracts platform APIs behind traits so the dispatcher can be tested
//! without a device. Each platform adapter implements the traits it can
//! and reports the rest as [`CapabilityError::Unsupported`](crate::CapabilityError::Unsupported).

use crate::error::CapabilityResult;
use murmur_router::{RadioKind, SettingsCategory, SystemNavAction};
use serde::Serialize;

/// Runtime permissions the dispatcher checks before acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Modify system settings (brightness).
    WriteSettings,
    BluetoothConnect,
}

/// Media volume stream.
pub trait VolumeControl: Send + Sync {
    /// Move one notch; positive raises, negative lowers.
    fn adjust(&self, step: i32) -> CapabilityResult<()>;
    fn current(&self) -> CapabilityResult<u32>;
    fn max(&self) -> CapabilityResult<u32>;
    fn set(&self, level: u32) -> CapabilityResult<()>;
}

/// Screen brightness on the 0-255 scale.
pub trait BrightnessControl: Send + Sync {
    fn current(&self) -> CapabilityResult<u8>;
    fn set(&self, level: u8) -> CapabilityResult<()>;
}

pub trait RadioControl: Send + Sync {
    /// Whether the hardware exists at all.
    fn is_supported(&self, _kind: RadioKind) -> bool {
        true
    }

    /// Public API toggle.
    fn try_direct(&self, kind: RadioKind, enable: bool) -> CapabilityResult<()>;

    /// Toggle through a privileged or hidden path.
    fn try_privileged(&self, kind: RadioKind, enable: bool) -> CapabilityResult<()>;
}

pub trait SettingsNavigator: Send + Sync {
    fn open_settings(&self, category: SettingsCategory) -> CapabilityResult<()>;

    /// Inline quick panel for a radio, where the platform has one.
    fn open_panel(&self, kind: RadioKind) -> CapabilityResult<()>;
}

pub trait SystemNavigator: Send + Sync {
    fn perform(&self, action: SystemNavAction) -> CapabilityResult<()>;
}

pub trait AppLauncher: Send + Sync {
    fn launch(&self, package_id: &str) -> CapabilityResult<()>;
}

pub trait PermissionGate: Send + Sync {
    fn is_granted(&self, permission: Permission) -> bool;

    /// Ask the user; the grant arrives later, if at all.
    fn request(&self, permission: Permission) -> CapabilityResult<()>;
}

pub trait MapsLauncher: Send + Sync {
    /// Turn-by-turn navigation in a maps app.
    fn navigate(&self, destination: &str) -> CapabilityResult<()>;

    /// Map search in the browser.
    fn open_web_map(&self, destination: &str) -> CapabilityResult<()>;
}

/// Everything the dispatcher needs from the platform.
pub trait DeviceCapabilities: Send + Sync {
    fn volume(&self) -> &dyn VolumeControl;
    fn brightness(&self) -> &dyn BrightnessControl;
    fn radios(&self) -> &dyn RadioControl;
    fn settings(&self) -> &dyn SettingsNavigator;
    fn navigator(&self) -> &dyn SystemNavigator;
    fn launcher(&self) -> &dyn AppLauncher;
    fn permissions(&self) -> &dyn PermissionGate;
    fn maps(&self) -> &dyn MapsLauncher;
}
