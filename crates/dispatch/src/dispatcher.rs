//! Executes device-control commands with layered fallback.
//!
//! Each action tries the direct platform call first, then a privileged
//! path where one exists, then a settings screen the user can finish by
//! hand. Capability errors are logged and turned into outcomes; none
//! escape [`SystemActionDispatcher::dispatch`].

use crate::capability::{DeviceCapabilities, Permission, VolumeControl};
use crate::error::CapabilityResult;
use crate::outcome::{DispatchOutcome, OutcomeKind};
use murmur_apps::{AppDecision, AppResolver};
use murmur_router::{Command, RadioKind, SettingsCategory, SystemNavAction, VolumeDirection};
use std::sync::Arc;

/// Darkest level a voice command may set, on the 0-255 scale.
pub const MIN_BRIGHTNESS: u8 = 30;
pub const MAX_BRIGHTNESS: u8 = 255;

/// What to do when a system navigation call fails.
enum NavFallback {
    Explain(&'static str),
    Settings(SettingsCategory, &'static str),
}

pub struct SystemActionDispatcher {
    device: Arc<dyn DeviceCapabilities>,
    apps: AppResolver,
}

impl SystemActionDispatcher {
    pub fn new(device: Arc<dyn DeviceCapabilities>, apps: AppResolver) -> Self {
        Self { device, apps }
    }

    /// Run a device or navigation command.
    ///
    /// Returns `None` for commands answered elsewhere (scripted replies and
    /// AI queries).
    pub fn dispatch(&self, command: &Command) -> Option<DispatchOutcome> {
        let outcome = match command {
            Command::VolumeAdjust { direction } => self.volume(*direction),
            Command::BrightnessAdjust { delta } => self.brightness(*delta),
            Command::RadioToggle { radio, enable } => self.radio(*radio, *enable),
            Command::AppLaunch { name } => self.launch_app(name),
            Command::SettingsNav { category } => self.open_settings(*category),
            Command::SystemNav { action } => self.system_nav(*action),
            Command::Navigation { destination } => self.navigate(destination),
            Command::ScriptedReply { .. } | Command::AiQuery { .. } => return None,
        };

        tracing::info!(
            command = command.kind(),
            kind = ?outcome.kind,
            message = %outcome.message,
            "Dispatched device action"
        );
        Some(outcome)
    }

    // ========================================================================
    // Volume
    // ========================================================================

    fn volume(&self, direction: VolumeDirection) -> DispatchOutcome {
        let volume = self.device.volume();
        let result = match direction {
            VolumeDirection::Up => step_volume(volume, true),
            VolumeDirection::Down => step_volume(volume, false),
            VolumeDirection::Max => set_volume_extreme(volume, true),
            VolumeDirection::Min => set_volume_extreme(volume, false),
        };

        result.unwrap_or_else(|e| {
            tracing::warn!(error = %e, ?direction, "Volume change failed");
            self.settings_fallback(
                SettingsCategory::Sound,
                "Opening sound settings for manual adjustment",
            )
        })
    }

    // ========================================================================
    // Brightness
    // ========================================================================

    fn brightness(&self, delta: i16) -> DispatchOutcome {
        if let Some(outcome) = self.require(
            Permission::WriteSettings,
            "Please grant permission to modify system settings for brightness control",
        ) {
            return outcome;
        }

        let brightness = self.device.brightness();
        let result = brightness.current().and_then(|current| {
            let level = (i16::from(current) + delta)
                .clamp(i16::from(MIN_BRIGHTNESS), i16::from(MAX_BRIGHTNESS));
            // Clamped into u8 range above.
            let level = level as u8;
            brightness.set(level)?;
            Ok(level)
        });

        match result {
            Ok(level) => DispatchOutcome::done(format!(
                "Brightness set to {}%",
                brightness_percent(level)
            )),
            Err(e) => {
                tracing::warn!(error = %e, delta, "Brightness change failed");
                self.settings_fallback(
                    SettingsCategory::Display,
                    "Opening brightness settings for manual adjustment",
                )
            }
        }
    }

    // ========================================================================
    // Radios
    // ========================================================================

    fn radio(&self, kind: RadioKind, enable: bool) -> DispatchOutcome {
        let radios = self.device.radios();
        if !radios.is_supported(kind) {
            return match kind {
                RadioKind::Flashlight => self.radio_fallback(kind, enable),
                _ => DispatchOutcome::unsupported(format!(
                    "{} is not supported on this device",
                    kind.label()
                )),
            };
        }

        if kind == RadioKind::Bluetooth {
            if let Some(outcome) = self.require(
                Permission::BluetoothConnect,
                "Please grant Bluetooth permission to control Bluetooth",
            ) {
                return outcome;
            }
        }

        let result = radios.try_direct(kind, enable).or_else(|e| {
            tracing::debug!(error = %e, ?kind, "Direct toggle failed, trying privileged path");
            radios.try_privileged(kind, enable)
        });

        match result {
            Ok(()) => DispatchOutcome::done(toggled_message(kind, enable)),
            Err(e) => {
                tracing::warn!(error = %e, ?kind, enable, "Radio toggle failed");
                self.radio_fallback(kind, enable)
            }
        }
    }

    fn radio_fallback(&self, kind: RadioKind, enable: bool) -> DispatchOutcome {
        let verb = if enable { "enable" } else { "disable" };
        let settings = self.device.settings();
        match kind {
            RadioKind::Wifi => {
                let message = format!("Opening WiFi settings panel. Please {verb} WiFi manually.");
                match settings.open_panel(kind) {
                    Ok(()) => DispatchOutcome::manual(message),
                    Err(e) => {
                        tracing::debug!(error = %e, "WiFi panel unavailable");
                        self.settings_fallback(SettingsCategory::Wifi, message)
                    }
                }
            }
            RadioKind::Bluetooth => self.settings_fallback(
                SettingsCategory::Bluetooth,
                format!("Opening Bluetooth settings. Please {verb} Bluetooth manually."),
            ),
            RadioKind::Flashlight => self.settings_fallback(
                SettingsCategory::Display,
                "Sorry, I can't control the flashlight directly. Opening display settings instead.",
            ),
        }
    }

    // ========================================================================
    // Apps and settings
    // ========================================================================

    fn launch_app(&self, name: &str) -> DispatchOutcome {
        let decision = self.apps.resolve(name);
        match &decision {
            AppDecision::Launch(app) => match self.device.launcher().launch(&app.id) {
                Ok(()) => DispatchOutcome::done(decision.message()),
                Err(e) => {
                    tracing::warn!(error = %e, id = %app.id, "App launch failed");
                    DispatchOutcome::unsupported(format!("Failed to open {}", app.name))
                }
            },
            AppDecision::Ambiguous(_) => {
                DispatchOutcome::new(OutcomeKind::Ambiguous, decision.message())
            }
            AppDecision::NotFound { .. } => {
                DispatchOutcome::new(OutcomeKind::NotFound, decision.message())
            }
        }
    }

    fn open_settings(&self, category: SettingsCategory) -> DispatchOutcome {
        match self.device.settings().open_settings(category) {
            Ok(()) => DispatchOutcome::done(format!("Opening {category} settings")),
            Err(e) => {
                tracing::warn!(error = %e, ?category, "Settings screen failed");
                couldnt_open(category)
            }
        }
    }

    /// Open a settings screen for a manual step, or apologize if even that
    /// fails.
    fn settings_fallback(
        &self,
        category: SettingsCategory,
        message: impl Into<String>,
    ) -> DispatchOutcome {
        match self.device.settings().open_settings(category) {
            Ok(()) => DispatchOutcome::manual(message),
            Err(e) => {
                tracing::warn!(error = %e, ?category, "Settings fallback failed");
                couldnt_open(category)
            }
        }
    }

    /// `Some` when the permission is missing; the request has been made.
    fn require(&self, permission: Permission, message: &str) -> Option<DispatchOutcome> {
        let gate = self.device.permissions();
        if gate.is_granted(permission) {
            return None;
        }
        if let Err(e) = gate.request(permission) {
            tracing::warn!(error = %e, ?permission, "Permission request failed");
        }
        Some(DispatchOutcome::new(OutcomeKind::PermissionRequested, message))
    }

    // ========================================================================
    // System navigation
    // ========================================================================

    fn system_nav(&self, action: SystemNavAction) -> DispatchOutcome {
        let (success, fallback) = match action {
            SystemNavAction::Home => (
                "Going to home screen",
                NavFallback::Explain("Sorry, I can't go to the home screen right now"),
            ),
            SystemNavAction::Recents => (
                "Showing recent apps",
                NavFallback::Explain("Sorry, I can't access recent apps on this device"),
            ),
            SystemNavAction::Notifications => (
                "Showing notifications",
                NavFallback::Settings(
                    SettingsCategory::General,
                    "Opening settings where you can find notifications",
                ),
            ),
            SystemNavAction::QuickSettings => (
                "Showing quick settings",
                NavFallback::Settings(SettingsCategory::General, "Opening system settings"),
            ),
            SystemNavAction::SplitScreen => (
                "Split screen mode",
                NavFallback::Explain(
                    "Sorry, I can't activate split screen without special permissions",
                ),
            ),
            SystemNavAction::Screenshot => (
                "Taking screenshot",
                NavFallback::Explain("Sorry, I can't take screenshots without special permissions"),
            ),
            // No direct path for these; they go straight to their screen.
            SystemNavAction::Back => {
                return DispatchOutcome::new(
                    OutcomeKind::ManualStepRequired,
                    "Sorry, I can't go back without special permissions",
                )
            }
            SystemNavAction::Lock => {
                return self.settings_fallback(
                    SettingsCategory::Security,
                    "Opening security settings to lock screen",
                )
            }
            SystemNavAction::DoNotDisturb => {
                return self.settings_fallback(
                    SettingsCategory::Sound,
                    "Opening sound settings for Do Not Disturb",
                )
            }
            SystemNavAction::PowerSaving => {
                return self.settings_fallback(
                    SettingsCategory::Battery,
                    "Opening battery settings for power saving",
                )
            }
        };

        match self.device.navigator().perform(action) {
            Ok(()) => DispatchOutcome::done(success),
            Err(e) => {
                tracing::debug!(error = %e, ?action, "System action failed");
                match fallback {
                    NavFallback::Explain(message) => DispatchOutcome::manual(message),
                    NavFallback::Settings(category, message) => {
                        self.settings_fallback(category, message)
                    }
                }
            }
        }
    }

    // ========================================================================
    // Maps
    // ========================================================================

    fn navigate(&self, destination: &str) -> DispatchOutcome {
        let maps = self.device.maps();
        if let Err(e) = maps.navigate(destination) {
            tracing::debug!(error = %e, destination, "Maps app unavailable, trying web map");
            return match maps.open_web_map(destination) {
                Ok(()) => {
                    DispatchOutcome::done(format!("Opening map to {destination} in browser"))
                }
                Err(e) => {
                    tracing::warn!(error = %e, destination, "Web map failed");
                    DispatchOutcome::new(
                        OutcomeKind::NotFound,
                        format!("Sorry, I couldn't find directions to {destination}"),
                    )
                }
            };
        }
        DispatchOutcome::done(format!("Starting navigation to {destination}"))
    }
}

fn step_volume(volume: &dyn VolumeControl, up: bool) -> CapabilityResult<DispatchOutcome> {
    let current = volume.current()?;
    if up && current >= volume.max()? {
        return Ok(DispatchOutcome::done("Volume is already at maximum"));
    }
    if !up && current == 0 {
        return Ok(DispatchOutcome::done("Volume is already at minimum"));
    }
    volume.adjust(if up { 1 } else { -1 })?;
    Ok(DispatchOutcome::done(if up {
        "Volume increased"
    } else {
        "Volume decreased"
    }))
}

fn set_volume_extreme(volume: &dyn VolumeControl, max: bool) -> CapabilityResult<DispatchOutcome> {
    let current = volume.current()?;
    if max {
        let top = volume.max()?;
        if current >= top {
            return Ok(DispatchOutcome::done("Volume is already at maximum"));
        }
        volume.set(top)?;
        Ok(DispatchOutcome::done("Volume set to maximum"))
    } else {
        if current == 0 {
            return Ok(DispatchOutcome::done("Volume is already at minimum"));
        }
        volume.set(0)?;
        Ok(DispatchOutcome::done("Volume set to minimum"))
    }
}

/// Whole percent of full brightness, rounded down.
pub fn brightness_percent(level: u8) -> u32 {
    u32::from(level) * 100 / u32::from(MAX_BRIGHTNESS)
}

fn toggled_message(kind: RadioKind, enable: bool) -> String {
    match (kind, enable) {
        (RadioKind::Flashlight, true) => "Flashlight turned on".to_string(),
        (RadioKind::Flashlight, false) => "Flashlight turned off".to_string(),
        (kind, true) => format!("{} enabled", kind.label()),
        (kind, false) => format!("{} disabled", kind.label()),
    }
}

fn couldnt_open(category: SettingsCategory) -> DispatchOutcome {
    DispatchOutcome::unsupported(format!("Sorry, I couldn't open {category} settings"))
}
