//! Windows global hotkeys.
//!
//! `RegisterHotKey` claims the combination system wide, which is also how a
//! combination already owned by another process is detected. Key presses are
//! observed by an `rdev` listener thread that invokes the registered callback;
//! the callback itself only posts a request to the UI thread.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use rdev::{listen, EventType, Key};
use windows::Win32::Foundation::{ERROR_HOTKEY_ALREADY_REGISTERED, HWND};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    RegisterHotKey, UnregisterHotKey, HOT_KEY_MODIFIERS, MOD_ALT, MOD_CONTROL, MOD_NOREPEAT,
    MOD_SHIFT, MOD_WIN,
};

use crate::error::{CrosshairError, Result};
use crate::hotkey::{HotkeyBackend, HotkeyBinding, HotkeyCallback, Modifiers, RegistrationHandle};

struct ListenerEntry {
    id: u32,
    key: Key,
    modifiers: Modifiers,
    callback: HotkeyCallback,
}

#[derive(Default)]
pub struct GlobalHotkeys {
    next_id: u32,
    entries: Arc<Mutex<Vec<ListenerEntry>>>,
    listener_started: bool,
}

impl GlobalHotkeys {
    fn start_listener(&mut self) {
        if self.listener_started {
            return;
        }
        self.listener_started = true;
        let entries = self.entries.clone();
        tracing::debug!("starting hotkey listener");
        thread::spawn(move || loop {
            let entries = entries.clone();
            let mut held = Modifiers::default();
            let mut fired: HashSet<u32> = HashSet::new();

            let result = listen(move |event| {
                let (key, down) = match event.event_type {
                    EventType::KeyPress(k) => (k, true),
                    EventType::KeyRelease(k) => (k, false),
                    _ => return,
                };
                match key {
                    Key::ControlLeft | Key::ControlRight => held.ctrl = down,
                    Key::ShiftLeft | Key::ShiftRight => held.shift = down,
                    Key::Alt | Key::AltGr => held.alt = down,
                    Key::MetaLeft | Key::MetaRight => held.win = down,
                    _ => {}
                }

                let Ok(entries) = entries.lock() else {
                    return;
                };
                for entry in entries.iter() {
                    if entry.key != key {
                        continue;
                    }
                    if down && entry.modifiers == held {
                        if fired.insert(entry.id) {
                            tracing::debug!(id = entry.id, "hotkey match");
                            (entry.callback)();
                        }
                    } else if !down {
                        fired.remove(&entry.id);
                    }
                }
            });

            match result {
                Ok(()) => tracing::warn!("Hotkey listener exited unexpectedly. Restarting shortly"),
                Err(e) => tracing::warn!("Hotkey listener failed: {:?}. Retrying shortly", e),
            }
            thread::sleep(Duration::from_millis(500));
        });
    }
}

fn hotkey_modifiers(m: Modifiers) -> HOT_KEY_MODIFIERS {
    let mut bits = MOD_NOREPEAT.0;
    if m.ctrl {
        bits |= MOD_CONTROL.0;
    }
    if m.alt {
        bits |= MOD_ALT.0;
    }
    if m.shift {
        bits |= MOD_SHIFT.0;
    }
    if m.win {
        bits |= MOD_WIN.0;
    }
    HOT_KEY_MODIFIERS(bits)
}

impl HotkeyBackend for GlobalHotkeys {
    fn register(
        &mut self,
        binding: &HotkeyBinding,
        callback: HotkeyCallback,
    ) -> Result<RegistrationHandle> {
        let vk = binding.virtual_key();
        if vk == 0 {
            return Err(CrosshairError::InvalidBinding(binding.label().to_string()));
        }
        self.next_id += 1;
        let id = self.next_id;

        unsafe { RegisterHotKey(HWND::default(), id as i32, hotkey_modifiers(binding.modifiers()), vk) }
            .map_err(|e| {
                tracing::error!("Failed to register hotkey '{}': {e}", binding);
                if e.code() == ERROR_HOTKEY_ALREADY_REGISTERED.to_hresult() {
                    CrosshairError::HotkeyConflict {
                        binding: binding.label().to_string(),
                    }
                } else {
                    CrosshairError::HotkeyRegistration {
                        binding: binding.label().to_string(),
                        code: e.code().0,
                    }
                }
            })?;

        let key = rdev_key(binding.key()).unwrap_or(Key::Unknown(vk));
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(ListenerEntry {
                id,
                key,
                modifiers: binding.modifiers(),
                callback,
            });
        }
        self.start_listener();
        tracing::info!("Registered hotkey '{}' with ID {}.", binding, id);
        Ok(RegistrationHandle::new(id))
    }

    fn unregister(&mut self, handle: RegistrationHandle) -> Result<()> {
        let Ok(mut entries) = self.entries.lock() else {
            return Ok(());
        };
        let Some(pos) = entries.iter().position(|e| e.id == handle.id()) else {
            return Ok(());
        };
        unsafe { UnregisterHotKey(HWND::default(), handle.id() as i32) }.map_err(|e| {
            tracing::warn!("Failed to unregister hotkey {}: {e}", handle.id());
            CrosshairError::HotkeyRegistration {
                binding: handle.id().to_string(),
                code: e.code().0,
            }
        })?;
        entries.remove(pos);
        tracing::info!("Unregistered hotkey {}.", handle.id());
        Ok(())
    }
}

fn rdev_key(token: &str) -> Option<Key> {
    let key = match token {
        "SPACE" => Key::Space,
        "TAB" => Key::Tab,
        "ENTER" => Key::Return,
        "ESCAPE" => Key::Escape,
        "DELETE" => Key::Delete,
        "INSERT" => Key::Insert,
        "BACKSPACE" => Key::Backspace,
        "CAPSLOCK" => Key::CapsLock,
        "HOME" => Key::Home,
        "END" => Key::End,
        "PAGEUP" => Key::PageUp,
        "PAGEDOWN" => Key::PageDown,
        "LEFT" => Key::LeftArrow,
        "RIGHT" => Key::RightArrow,
        "UP" => Key::UpArrow,
        "DOWN" => Key::DownArrow,
        "PAUSE" => Key::Pause,
        "PRINTSCREEN" => Key::PrintScreen,
        "SCROLLLOCK" => Key::ScrollLock,
        "NUMLOCK" => Key::NumLock,
        "NUMPAD0" => Key::Kp0,
        "NUMPAD1" => Key::Kp1,
        "NUMPAD2" => Key::Kp2,
        "NUMPAD3" => Key::Kp3,
        "NUMPAD4" => Key::Kp4,
        "NUMPAD5" => Key::Kp5,
        "NUMPAD6" => Key::Kp6,
        "NUMPAD7" => Key::Kp7,
        "NUMPAD8" => Key::Kp8,
        "NUMPAD9" => Key::Kp9,
        "NUMPADMULTIPLY" => Key::KpMultiply,
        "NUMPADADD" => Key::KpPlus,
        "NUMPADSUBTRACT" => Key::KpMinus,
        "NUMPADDIVIDE" => Key::KpDivide,
        "NUMPADDOT" => Key::KpDelete,
        "F1" => Key::F1,
        "F2" => Key::F2,
        "F3" => Key::F3,
        "F4" => Key::F4,
        "F5" => Key::F5,
        "F6" => Key::F6,
        "F7" => Key::F7,
        "F8" => Key::F8,
        "F9" => Key::F9,
        "F10" => Key::F10,
        "F11" => Key::F11,
        "F12" => Key::F12,
        "0" => Key::Num0,
        "1" => Key::Num1,
        "2" => Key::Num2,
        "3" => Key::Num3,
        "4" => Key::Num4,
        "5" => Key::Num5,
        "6" => Key::Num6,
        "7" => Key::Num7,
        "8" => Key::Num8,
        "9" => Key::Num9,
        "A" => Key::KeyA,
        "B" => Key::KeyB,
        "C" => Key::KeyC,
        "D" => Key::KeyD,
        "E" => Key::KeyE,
        "F" => Key::KeyF,
        "G" => Key::KeyG,
        "H" => Key::KeyH,
        "I" => Key::KeyI,
        "J" => Key::KeyJ,
        "K" => Key::KeyK,
        "L" => Key::KeyL,
        "M" => Key::KeyM,
        "N" => Key::KeyN,
        "O" => Key::KeyO,
        "P" => Key::KeyP,
        "Q" => Key::KeyQ,
        "R" => Key::KeyR,
        "S" => Key::KeyS,
        "T" => Key::KeyT,
        "U" => Key::KeyU,
        "V" => Key::KeyV,
        "W" => Key::KeyW,
        "X" => Key::KeyX,
        "Y" => Key::KeyY,
        "Z" => Key::KeyZ,
        _ => return None,
    };
    Some(key)
}
