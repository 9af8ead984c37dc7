use crosshair_overlay::error::CrosshairError;
use crosshair_overlay::hotkey::{HotkeyBinding, HotkeyCallback, HotkeyRegistrar, DEFAULT_HOTKEY};
use std::sync::Arc;

#[path = "mock_platform.rs"]
mod mock_platform;
use mock_platform::MockHotkeys;

fn registrar() -> (HotkeyRegistrar<MockHotkeys>, MockHotkeys) {
    let backend = MockHotkeys::default();
    let callback: HotkeyCallback = Arc::new(|| {});
    (HotkeyRegistrar::new(backend.clone(), callback), backend)
}

fn bind(s: &str) -> HotkeyBinding {
    HotkeyBinding::parse(s).unwrap()
}

#[test]
fn parse_normalises_labels() {
    assert_eq!(bind("alt+s").label(), "Alt+S");
    assert_eq!(bind("shift + ctrl + f5").label(), "Ctrl+Shift+F5");
    assert_eq!(bind("Control+Esc").label(), "Ctrl+Esc");
    assert_eq!(bind("win+numpad7").label(), "Win+Numpad7");
    assert_eq!(bind("Ctrl+PgDn").label(), "Ctrl+PageDown");
    assert_eq!(bind("space").label(), "Space");
}

#[test]
fn parse_keeps_modifier_flags() {
    let b = bind("Ctrl+Alt+Delete");
    let m = b.modifiers();
    assert!(m.ctrl && m.alt && !m.shift && !m.win);
    assert_eq!(b.key(), "DELETE");
    assert_eq!(b.virtual_key(), 0x2E);
}

#[test]
fn parse_rejects_bad_combos() {
    for s in ["", "+", "Ctrl+Alt", "Ctrl+A+B", "Alt+Nope", "Shift+"] {
        assert!(
            matches!(HotkeyBinding::parse(s), Err(CrosshairError::InvalidBinding(_))),
            "{s:?} should be rejected"
        );
    }
}

#[test]
fn default_binding_is_alt_s() {
    assert_eq!(HotkeyBinding::default(), bind(DEFAULT_HOTKEY));
    assert_eq!(DEFAULT_HOTKEY.parse::<HotkeyBinding>().unwrap().to_string(), "Alt+S");
}

#[test]
fn rebinding_same_combo_is_noop() {
    let (mut reg, backend) = registrar();
    reg.rebind(bind("Alt+S")).unwrap();
    backend.0.lock().unwrap().fail_unregister = true;
    reg.rebind(bind("alt+s")).unwrap();
    assert_eq!(backend.live_labels(), vec!["Alt+S".to_string()]);
}

#[test]
fn failed_unregister_keeps_current_binding() {
    let (mut reg, backend) = registrar();
    reg.rebind(bind("Alt+S")).unwrap();
    backend.0.lock().unwrap().fail_unregister = true;

    assert!(reg.rebind(bind("Ctrl+Q")).is_err());
    assert_eq!(reg.active().map(HotkeyBinding::label), Some("Alt+S"));
    assert_eq!(backend.live_labels(), vec!["Alt+S".to_string()]);
}

#[test]
fn first_registration_conflict_leaves_nothing_bound() {
    let (mut reg, backend) = registrar();
    backend.0.lock().unwrap().taken.push("Alt+S".into());
    let err = reg.rebind(bind("Alt+S")).unwrap_err();
    assert_eq!(
        err,
        CrosshairError::HotkeyConflict {
            binding: "Alt+S".into()
        }
    );
    assert!(reg.active().is_none());
}

#[test]
fn release_is_idempotent() {
    let (mut reg, backend) = registrar();
    reg.rebind(bind("F9")).unwrap();
    reg.release();
    reg.release();
    assert!(reg.active().is_none());
    assert!(backend.live_labels().is_empty());
}
