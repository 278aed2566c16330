//! System action dispatch.
//!
//! Executes routed device-control and navigation commands against the
//! platform through capability traits, falling back to settings screens
//! when a direct call is not possible.

mod capability;
mod dispatcher;
mod error;
pub mod mock;
mod outcome;

pub use capability::{
    AppLauncher, BrightnessControl, DeviceCapabilities, MapsLauncher, Permission, PermissionGate,
    RadioControl, SettingsNavigator, SystemNavigator, VolumeControl,
};
pub use dispatcher::{brightness_percent, SystemActionDispatcher, MAX_BRIGHTNESS, MIN_BRIGHTNESS};
pub use error::{CapabilityError, CapabilityResult};
pub use outcome::{DispatchOutcome, OutcomeKind};
