//! In-memory device for tests and the console.
//!
//! Records every platform call and lets a test make any of them fail.

use crate::capability::{
    AppLauncher, BrightnessControl, DeviceCapabilities, MapsLauncher, Permission, PermissionGate,
    RadioControl, SettingsNavigator, SystemNavigator, VolumeControl,
};
use crate::error::{CapabilityError, CapabilityResult};
use murmur_router::{RadioKind, SettingsCategory, SystemNavAction};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

/// Platform calls that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOp {
    VolumeRead,
    VolumeWrite,
    BrightnessRead,
    BrightnessWrite,
    RadioDirect,
    RadioPrivileged,
    Panel,
    Settings,
    SystemAction,
    Launch,
    Navigate,
    WebMap,
}

/// A platform call as recorded by [`MockDevice`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCall {
    VolumeSet(u32),
    BrightnessSet(u8),
    Radio { kind: RadioKind, enable: bool },
    Panel(RadioKind),
    Settings(SettingsCategory),
    System(SystemNavAction),
    Launch(String),
    Navigate(String),
    WebMap(String),
    PermissionRequested(Permission),
}

#[derive(Debug)]
struct MockState {
    volume: u32,
    max_volume: u32,
    brightness: u8,
    radios: HashMap<RadioKind, bool>,
    unsupported: HashSet<RadioKind>,
    granted: HashSet<Permission>,
    failing: HashSet<MockOp>,
    calls: Vec<DeviceCall>,
}

pub struct MockDevice {
    state: Mutex<MockState>,
}

impl MockDevice {
    /// Mid volume, mid brightness, every permission granted.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                volume: 7,
                max_volume: 15,
                brightness: 128,
                radios: HashMap::new(),
                unsupported: HashSet::new(),
                granted: [Permission::WriteSettings, Permission::BluetoothConnect]
                    .into_iter()
                    .collect(),
                failing: HashSet::new(),
                calls: Vec::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn fail(&self, op: MockOp) {
        self.state().failing.insert(op);
    }

    pub fn revoke(&self, permission: Permission) {
        self.state().granted.remove(&permission);
    }

    pub fn remove_radio(&self, kind: RadioKind) {
        self.state().unsupported.insert(kind);
    }

    pub fn set_volume_level(&self, level: u32) {
        self.state().volume = level;
    }

    pub fn set_brightness_level(&self, level: u8) {
        self.state().brightness = level;
    }

    pub fn volume_level(&self) -> u32 {
        self.state().volume
    }

    pub fn brightness_level(&self) -> u8 {
        self.state().brightness
    }

    pub fn radio_enabled(&self, kind: RadioKind) -> bool {
        self.state().radios.get(&kind).copied().unwrap_or(false)
    }

    pub fn calls(&self) -> Vec<DeviceCall> {
        self.state().calls.clone()
    }

    /// Fail `op` if requested, otherwise record `call`.
    fn record(&self, op: MockOp, call: DeviceCall) -> CapabilityResult<()> {
        let mut state = self.state();
        if state.failing.contains(&op) {
            return Err(CapabilityError::Failed(format!("{op:?}")));
        }
        state.calls.push(call);
        Ok(())
    }

    fn check(&self, op: MockOp) -> CapabilityResult<()> {
        if self.state().failing.contains(&op) {
            return Err(CapabilityError::Failed(format!("{op:?}")));
        }
        Ok(())
    }
}

impl Default for MockDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl VolumeControl for MockDevice {
    fn adjust(&self, step: i32) -> CapabilityResult<()> {
        self.check(MockOp::VolumeWrite)?;
        let mut state = self.state();
        let level = (i64::from(state.volume) + i64::from(step)).clamp(0, i64::from(state.max_volume));
        state.volume = level as u32;
        let volume = state.volume;
        state.calls.push(DeviceCall::VolumeSet(volume));
        Ok(())
    }

    fn current(&self) -> CapabilityResult<u32> {
        self.check(MockOp::VolumeRead)?;
        Ok(self.state().volume)
    }

    fn max(&self) -> CapabilityResult<u32> {
        self.check(MockOp::VolumeRead)?;
        Ok(self.state().max_volume)
    }

    fn set(&self, level: u32) -> CapabilityResult<()> {
        self.record(MockOp::VolumeWrite, DeviceCall::VolumeSet(level))?;
        self.state().volume = level;
        Ok(())
    }
}

impl BrightnessControl for MockDevice {
    fn current(&self) -> CapabilityResult<u8> {
        self.check(MockOp::BrightnessRead)?;
        Ok(self.state().brightness)
    }

    fn set(&self, level: u8) -> CapabilityResult<()> {
        self.record(MockOp::BrightnessWrite, DeviceCall::BrightnessSet(level))?;
        self.state().brightness = level;
        Ok(())
    }
}

impl RadioControl for MockDevice {
    fn is_supported(&self, kind: RadioKind) -> bool {
        !self.state().unsupported.contains(&kind)
    }

    fn try_direct(&self, kind: RadioKind, enable: bool) -> CapabilityResult<()> {
        self.record(MockOp::RadioDirect, DeviceCall::Radio { kind, enable })?;
        self.state().radios.insert(kind, enable);
        Ok(())
    }

    fn try_privileged(&self, kind: RadioKind, enable: bool) -> CapabilityResult<()> {
        self.record(MockOp::RadioPrivileged, DeviceCall::Radio { kind, enable })?;
        self.state().radios.insert(kind, enable);
        Ok(())
    }
}

impl SettingsNavigator for MockDevice {
    fn open_settings(&self, category: SettingsCategory) -> CapabilityResult<()> {
        self.record(MockOp::Settings, DeviceCall::Settings(category))
    }

    fn open_panel(&self, kind: RadioKind) -> CapabilityResult<()> {
        self.record(MockOp::Panel, DeviceCall::Panel(kind))
    }
}

impl SystemNavigator for MockDevice {
    fn perform(&self, action: SystemNavAction) -> CapabilityResult<()> {
        self.record(MockOp::SystemAction, DeviceCall::System(action))
    }
}

impl AppLauncher for MockDevice {
    fn launch(&self, package_id: &str) -> CapabilityResult<()> {
        self.record(MockOp::Launch, DeviceCall::Launch(package_id.to_string()))
    }
}

impl PermissionGate for MockDevice {
    fn is_granted(&self, permission: Permission) -> bool {
        self.state().granted.contains(&permission)
    }

    fn request(&self, permission: Permission) -> CapabilityResult<()> {
        self.state()
            .calls
            .push(DeviceCall::PermissionRequested(permission));
        Ok(())
    }
}

impl MapsLauncher for MockDevice {
    fn navigate(&self, destination: &str) -> CapabilityResult<()> {
        self.record(MockOp::Navigate, DeviceCall::Navigate(destination.to_string()))
    }

    fn open_web_map(&self, destination: &str) -> CapabilityResult<()> {
        self.record(MockOp::WebMap, DeviceCall::WebMap(destination.to_string()))
    }
}

impl DeviceCapabilities for MockDevice {
    fn volume(&self) -> &dyn VolumeControl {
        self
    }

    fn brightness(&self) -> &dyn BrightnessControl {
        self
    }

    fn radios(&self) -> &dyn RadioControl {
        self
    }

    fn settings(&self) -> &dyn SettingsNavigator {
        self
    }

    fn navigator(&self) -> &dyn SystemNavigator {
        self
    }

    fn launcher(&self) -> &dyn AppLauncher {
        self
    }

    fn permissions(&self) -> &dyn PermissionGate {
        self
    }

    fn maps(&self) -> &dyn MapsLauncher {
        self
    }
}
