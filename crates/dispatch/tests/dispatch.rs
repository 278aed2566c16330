//! Dispatcher behavior against the in-memory device.

use murmur_apps::{AppResolver, StaticCatalog};
use murmur_dispatch::mock::{DeviceCall, MockDevice, MockOp};
use murmur_dispatch::{DispatchOutcome, OutcomeKind, Permission, SystemActionDispatcher};
use murmur_router::{route, Command, RadioKind, SettingsCategory, SystemNavAction};
use std::sync::Arc;

fn setup() -> (Arc<MockDevice>, SystemActionDispatcher) {
    let device = Arc::new(MockDevice::new());
    let catalog = StaticCatalog::from_pairs(&[
        ("com.whatsapp", "WhatsApp"),
        ("com.android.camera2", "Camera"),
        ("com.google.android.apps.maps", "Maps"),
        ("org.a.news", "Google News"),
        ("org.b.drive", "Google Drive"),
    ]);
    let dispatcher =
        SystemActionDispatcher::new(device.clone(), AppResolver::new(Arc::new(catalog)));
    (device, dispatcher)
}

fn run(dispatcher: &SystemActionDispatcher, text: &str) -> DispatchOutcome {
    dispatcher
        .dispatch(&route(text))
        .unwrap_or_else(|| panic!("{text:?} was not a device command"))
}

// ============================================================================
// Volume and brightness
// ============================================================================

mod levels {
    use super::*;

    #[test]
    fn test_volume_steps_and_limits() {
        let (device, dispatcher) = setup();
        assert_eq!(run(&dispatcher, "volume up").message, "Volume increased");
        assert_eq!(device.volume_level(), 8);
        assert_eq!(run(&dispatcher, "volume down").message, "Volume decreased");

        device.set_volume_level(15);
        assert_eq!(run(&dispatcher, "louder").message, "Volume is already at maximum");
        device.set_volume_level(0);
        assert_eq!(run(&dispatcher, "quieter").message, "Volume is already at minimum");
    }

    #[test]
    fn test_volume_extremes() {
        let (device, dispatcher) = setup();
        assert_eq!(run(&dispatcher, "max volume").message, "Volume set to maximum");
        assert_eq!(device.volume_level(), 15);
        assert_eq!(run(&dispatcher, "max volume").message, "Volume is already at maximum");
        assert_eq!(run(&dispatcher, "mute").message, "Volume set to minimum");
        assert_eq!(device.volume_level(), 0);
    }

    #[test]
    fn test_volume_failure_opens_sound_settings() {
        let (device, dispatcher) = setup();
        device.fail(MockOp::VolumeWrite);
        let outcome = run(&dispatcher, "volume up");
        assert_eq!(outcome.kind, OutcomeKind::ManualStepRequired);
        assert_eq!(outcome.message, "Opening sound settings for manual adjustment");
        assert!(device
            .calls()
            .contains(&DeviceCall::Settings(SettingsCategory::Sound)));
    }

    #[test]
    fn test_brightness_is_clamped() {
        let (device, dispatcher) = setup();
        device.set_brightness_level(230);
        assert_eq!(run(&dispatcher, "brighter").message, "Brightness set to 100%");
        assert_eq!(device.brightness_level(), 255);

        device.set_brightness_level(40);
        assert_eq!(run(&dispatcher, "dimmer").message, "Brightness set to 11%");
        assert_eq!(device.brightness_level(), 30);
    }

    #[test]
    fn test_brightness_requires_write_settings() {
        let (device, dispatcher) = setup();
        device.revoke(Permission::WriteSettings);
        let outcome = run(&dispatcher, "brightness up");
        assert_eq!(outcome.kind, OutcomeKind::PermissionRequested);
        assert_eq!(
            outcome.message,
            "Please grant permission to modify system settings for brightness control"
        );
        assert_eq!(
            device.calls(),
            vec![DeviceCall::PermissionRequested(Permission::WriteSettings)]
        );
    }

    #[test]
    fn test_brightness_failure_opens_display_settings() {
        let (device, dispatcher) = setup();
        device.fail(MockOp::BrightnessRead);
        assert_eq!(
            run(&dispatcher, "brightness down").message,
            "Opening brightness settings for manual adjustment"
        );
    }
}

// ============================================================================
// Radios
// ============================================================================

mod radios {
    use super::*;

    #[test]
    fn test_direct_toggle() {
        let (device, dispatcher) = setup();
        assert_eq!(run(&dispatcher, "turn on wifi").message, "WiFi enabled");
        assert!(device.radio_enabled(RadioKind::Wifi));
        assert_eq!(run(&dispatcher, "bluetooth off").message, "Bluetooth disabled");
    }

    #[test]
    fn test_privileged_path_after_direct_failure() {
        let (device, dispatcher) = setup();
        device.fail(MockOp::RadioDirect);
        let outcome = run(&dispatcher, "enable wifi");
        assert!(outcome.is_done());
        assert!(device.radio_enabled(RadioKind::Wifi));
    }

    #[test]
    fn test_wifi_falls_back_to_panel() {
        let (device, dispatcher) = setup();
        device.fail(MockOp::RadioDirect);
        device.fail(MockOp::RadioPrivileged);
        let outcome = run(&dispatcher, "turn on wifi");
        assert_eq!(outcome.kind, OutcomeKind::ManualStepRequired);
        assert_eq!(
            outcome.message,
            "Opening WiFi settings panel. Please enable WiFi manually."
        );
        assert_eq!(device.calls(), vec![DeviceCall::Panel(RadioKind::Wifi)]);
    }

    #[test]
    fn test_bluetooth_permission_and_support() {
        let (device, dispatcher) = setup();
        device.revoke(Permission::BluetoothConnect);
        assert_eq!(
            run(&dispatcher, "turn on bluetooth").message,
            "Please grant Bluetooth permission to control Bluetooth"
        );

        device.remove_radio(RadioKind::Bluetooth);
        let outcome = run(&dispatcher, "turn on bluetooth");
        assert_eq!(outcome.kind, OutcomeKind::Unsupported);
        assert_eq!(outcome.message, "Bluetooth is not supported on this device");
    }

    #[test]
    fn test_bluetooth_falls_back_to_settings() {
        let (device, dispatcher) = setup();
        device.fail(MockOp::RadioDirect);
        device.fail(MockOp::RadioPrivileged);
        assert_eq!(
            run(&dispatcher, "turn on bluetooth").message,
            "Opening Bluetooth settings. Please enable Bluetooth manually."
        );
    }

    #[test]
    fn test_flashlight_falls_back_to_display_settings() {
        let (device, dispatcher) = setup();
        device.fail(MockOp::RadioDirect);
        device.fail(MockOp::RadioPrivileged);
        assert_eq!(
            run(&dispatcher, "turn on flashlight").message,
            "Sorry, I can't control the flashlight directly. Opening display settings instead."
        );
        assert!(device
            .calls()
            .contains(&DeviceCall::Settings(SettingsCategory::Display)));
    }
}

// ============================================================================
// Apps, settings, navigation
// ============================================================================

mod screens {
    use super::*;

    #[test]
    fn test_open_whats_app() {
        let (device, dispatcher) = setup();
        let outcome = run(&dispatcher, "open whats app");
        assert_eq!(outcome, DispatchOutcome::done("Opening WhatsApp"));
        assert_eq!(
            device.calls(),
            vec![DeviceCall::Launch("com.whatsapp".to_string())]
        );
    }

    #[test]
    fn test_take_a_photo_opens_camera() {
        let (_, dispatcher) = setup();
        assert_eq!(run(&dispatcher, "take a photo").message, "Opening Camera");
    }

    #[test]
    fn test_app_outcomes_are_validation_results() {
        let (device, dispatcher) = setup();
        assert_eq!(run(&dispatcher, "open google").kind, OutcomeKind::Ambiguous);
        assert_eq!(run(&dispatcher, "open zzz").kind, OutcomeKind::NotFound);

        device.fail(MockOp::Launch);
        assert_eq!(run(&dispatcher, "open whatsapp").message, "Failed to open WhatsApp");
    }

    #[test]
    fn test_settings_navigation() {
        let (device, dispatcher) = setup();
        assert_eq!(
            run(&dispatcher, "open display settings").message,
            "Opening display settings"
        );
        device.fail(MockOp::Settings);
        assert_eq!(
            run(&dispatcher, "wifi settings").message,
            "Sorry, I couldn't open WiFi settings"
        );
    }

    #[test]
    fn test_system_navigation_table() {
        let (_, dispatcher) = setup();
        let cases = [
            (SystemNavAction::Home, "Going to home screen"),
            (SystemNavAction::Back, "Sorry, I can't go back without special permissions"),
            (SystemNavAction::Recents, "Showing recent apps"),
            (SystemNavAction::Lock, "Opening security settings to lock screen"),
            (SystemNavAction::Notifications, "Showing notifications"),
            (SystemNavAction::QuickSettings, "Showing quick settings"),
            (SystemNavAction::SplitScreen, "Split screen mode"),
            (SystemNavAction::Screenshot, "Taking screenshot"),
            (SystemNavAction::DoNotDisturb, "Opening sound settings for Do Not Disturb"),
            (SystemNavAction::PowerSaving, "Opening battery settings for power saving"),
        ];
        for (action, expected) in cases {
            let outcome = dispatcher
                .dispatch(&Command::SystemNav { action })
                .expect("system nav is dispatched");
            assert_eq!(outcome.message, expected, "{action:?}");
        }
    }

    #[test]
    fn test_system_navigation_fallbacks() {
        let (device, dispatcher) = setup();
        device.fail(MockOp::SystemAction);
        assert_eq!(
            run(&dispatcher, "show notifications").message,
            "Opening settings where you can find notifications"
        );
        assert_eq!(
            run(&dispatcher, "take screenshot").kind,
            OutcomeKind::ManualStepRequired
        );
    }

    #[test]
    fn test_navigation_layers() {
        let (device, dispatcher) = setup();
        assert_eq!(
            run(&dispatcher, "navigate to the airport").message,
            "Starting navigation to the airport"
        );

        device.fail(MockOp::Navigate);
        assert_eq!(
            run(&dispatcher, "navigate to the airport").message,
            "Opening map to the airport in browser"
        );

        device.fail(MockOp::WebMap);
        let outcome = run(&dispatcher, "navigate to the airport");
        assert_eq!(outcome.kind, OutcomeKind::NotFound);
        assert_eq!(outcome.message, "Sorry, I couldn't find directions to the airport");
    }

    #[test]
    fn test_non_device_commands_are_declined() {
        let (device, dispatcher) = setup();
        assert!(dispatcher.dispatch(&route("tell me a joke")).is_none());
        assert!(dispatcher.dispatch(&route("why is the sky blue")).is_none());
        assert!(device.calls().is_empty());
    }
}

#[test]
fn test_every_device_outcome_has_a_message() {
    let (device, dispatcher) = setup();
    device.fail(MockOp::Settings);
    device.fail(MockOp::SystemAction);
    device.fail(MockOp::VolumeRead);
    let phrases = [
        "volume up", "mute", "brighter", "turn off wifi", "flashlight on", "open maps",
        "open settings", "go home", "lock screen", "do not disturb", "navigate to home",
    ];
    for phrase in phrases {
        let outcome = run(&dispatcher, phrase);
        assert!(!outcome.message.is_empty(), "{phrase:?}");
    }
}
