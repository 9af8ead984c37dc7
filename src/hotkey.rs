use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{CrosshairError, Result};
use crate::window_manager::virtual_key_from_string;

pub const DEFAULT_HOTKEY: &str = "Alt+S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub win: bool,
}

/// A global key combination: any set of modifiers plus exactly one
/// non-modifier key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HotkeyBinding {
    modifiers: Modifiers,
    key: String,
    label: String,
}

impl HotkeyBinding {
    /// Parse a combination like "Ctrl+Shift+Space". Empty strings, unknown
    /// keys, modifier-only combos and combos with two main keys are rejected.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || CrosshairError::InvalidBinding(s.to_string());
        let mut modifiers = Modifiers::default();
        let mut key: Option<&'static str> = None;

        for part in s.split('+') {
            let upper = part.trim().to_ascii_uppercase();
            match upper.as_str() {
                "" => {}
                "CTRL" | "CONTROL" => modifiers.ctrl = true,
                "ALT" => modifiers.alt = true,
                "SHIFT" => modifiers.shift = true,
                "WIN" | "META" | "SUPER" => modifiers.win = true,
                other => {
                    if key.is_some() {
                        return Err(invalid());
                    }
                    key = Some(canonical_key(other).ok_or_else(invalid)?);
                }
            }
        }

        let key = key.ok_or_else(invalid)?;
        Ok(Self::from_parts(modifiers, key))
    }

    fn from_parts(modifiers: Modifiers, key: &str) -> Self {
        let mut parts: Vec<String> = Vec::with_capacity(5);
        if modifiers.ctrl {
            parts.push("Ctrl".into());
        }
        if modifiers.alt {
            parts.push("Alt".into());
        }
        if modifiers.shift {
            parts.push("Shift".into());
        }
        if modifiers.win {
            parts.push("Win".into());
        }
        parts.push(display_key(key));
        Self {
            modifiers,
            key: key.to_string(),
            label: parts.join("+"),
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Canonical upper-case key token, e.g. `"S"`, `"F5"` or `"SPACE"`.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Human-readable label such as `"Alt+S"`.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Win32 virtual key code for the main key.
    pub fn virtual_key(&self) -> u32 {
        virtual_key_from_string(&self.key).unwrap_or_default()
    }
}

impl Default for HotkeyBinding {
    fn default() -> Self {
        Self::from_parts(
            Modifiers {
                alt: true,
                ..Modifiers::default()
            },
            "S",
        )
    }
}

impl fmt::Display for HotkeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl FromStr for HotkeyBinding {
    type Err = CrosshairError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn canonical_key(upper: &str) -> Option<&'static str> {
    let alias = match upper {
        "ESC" => "ESCAPE",
        "RETURN" => "ENTER",
        "DEL" => "DELETE",
        "INS" => "INSERT",
        "PGUP" => "PAGEUP",
        "PGDN" | "PGDOWN" => "PAGEDOWN",
        "ARROWUP" | "UPARROW" => "UP",
        "ARROWDOWN" | "DOWNARROW" => "DOWN",
        "ARROWLEFT" | "LEFTARROW" => "LEFT",
        "ARROWRIGHT" | "RIGHTARROW" => "RIGHT",
        "PRINT" => "PRINTSCREEN",
        other => other,
    };
    virtual_key_from_string(alias)?;
    KEY_TOKENS.iter().copied().find(|t| *t == alias)
}

fn display_key(key: &str) -> String {
    match key {
        "ESCAPE" => "Esc".into(),
        "PAGEUP" => "PageUp".into(),
        "PAGEDOWN" => "PageDown".into(),
        "CAPSLOCK" => "CapsLock".into(),
        "PRINTSCREEN" => "PrintScreen".into(),
        "SCROLLLOCK" => "ScrollLock".into(),
        "NUMLOCK" => "NumLock".into(),
        k if k.len() == 1 || (k.starts_with('F') && k[1..].parse::<u8>().is_ok()) => k.into(),
        k if k.starts_with("NUMPAD") => format!("Numpad{}", title_case(&k[6..])),
        k => title_case(k),
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

/// Every key token accepted as the main key of a binding.
const KEY_TOKENS: &[&str] = &[
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R",
    "S", "T", "U", "V", "W", "X", "Y", "Z", "0", "1", "2", "3", "4", "5", "6", "7", "8", "9",
    "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12", "F13", "F14",
    "F15", "F16", "F17", "F18", "F19", "F20", "F21", "F22", "F23", "F24", "NUMPAD0", "NUMPAD1",
    "NUMPAD2", "NUMPAD3", "NUMPAD4", "NUMPAD5", "NUMPAD6", "NUMPAD7", "NUMPAD8", "NUMPAD9",
    "NUMPADMULTIPLY", "NUMPADADD", "NUMPADSUBTRACT", "NUMPADDOT", "NUMPADDIVIDE", "UP", "DOWN",
    "LEFT", "RIGHT", "BACKSPACE", "TAB", "ENTER", "PAUSE", "CAPSLOCK", "ESCAPE", "SPACE",
    "PAGEUP", "PAGEDOWN", "END", "HOME", "INSERT", "DELETE", "PRINTSCREEN", "SCROLLLOCK",
    "NUMLOCK",
];

/// Invoked from the listener whenever the bound combination is pressed. It
/// runs off the UI thread, so implementations only post a request.
pub type HotkeyCallback = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistrationHandle(u32);

impl RegistrationHandle {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn id(self) -> u32 {
        self.0
    }
}

/// OS-level global hotkey installation.
pub trait HotkeyBackend {
    fn register(
        &mut self,
        binding: &HotkeyBinding,
        callback: HotkeyCallback,
    ) -> Result<RegistrationHandle>;

    /// Release `handle`. Releasing an unknown or already released handle is a
    /// no-op.
    fn unregister(&mut self, handle: RegistrationHandle) -> Result<()>;
}

struct ActiveBinding {
    binding: HotkeyBinding,
    handle: RegistrationHandle,
}

/// Owns the single live hotkey binding.
pub struct HotkeyRegistrar<B: HotkeyBackend> {
    backend: B,
    callback: HotkeyCallback,
    active: Option<ActiveBinding>,
}

impl<B: HotkeyBackend> HotkeyRegistrar<B> {
    pub fn new(backend: B, callback: HotkeyCallback) -> Self {
        Self {
            backend,
            callback,
            active: None,
        }
    }

    pub fn active(&self) -> Option<&HotkeyBinding> {
        self.active.as_ref().map(|a| &a.binding)
    }

    /// Make `binding` the live hotkey.
    ///
    /// The current registration is released first. If the new binding cannot
    /// be registered the previous one is installed again and the error is
    /// returned, so a failed rebind never leaves the application without its
    /// hotkey.
    pub fn rebind(&mut self, binding: HotkeyBinding) -> Result<()> {
        let Some(previous) = self.active.take() else {
            let handle = self.backend.register(&binding, self.callback.clone())?;
            tracing::info!(hotkey = %binding, "hotkey registered");
            self.active = Some(ActiveBinding { binding, handle });
            return Ok(());
        };

        if previous.binding == binding {
            self.active = Some(previous);
            return Ok(());
        }

        if let Err(e) = self.backend.unregister(previous.handle) {
            tracing::warn!(hotkey = %previous.binding, error = %e, "failed to release hotkey");
            self.active = Some(previous);
            return Err(e);
        }

        match self.backend.register(&binding, self.callback.clone()) {
            Ok(handle) => {
                tracing::info!(from = %previous.binding, to = %binding, "hotkey rebound");
                self.active = Some(ActiveBinding { binding, handle });
                Ok(())
            }
            Err(err) => {
                tracing::warn!(hotkey = %binding, error = %err, "rebind failed, restoring previous hotkey");
                match self.backend.register(&previous.binding, self.callback.clone()) {
                    Ok(handle) => {
                        self.active = Some(ActiveBinding {
                            binding: previous.binding,
                            handle,
                        });
                    }
                    Err(restore) => {
                        tracing::error!(hotkey = %previous.binding, error = %restore, "could not restore previous hotkey");
                    }
                }
                Err(err)
            }
        }
    }

    /// Release the live binding, if any.
    pub fn release(&mut self) {
        if let Some(active) = self.active.take() {
            match self.backend.unregister(active.handle) {
                Ok(()) => tracing::debug!(hotkey = %active.binding, "hotkey released"),
                Err(e) => tracing::warn!(hotkey = %active.binding, error = %e, "failed to release hotkey"),
            }
        }
    }
}

impl<B: HotkeyBackend> Drop for HotkeyRegistrar<B> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Backend for platforms without global hotkeys.
#[derive(Debug, Default)]
pub struct UnsupportedHotkeys;

impl HotkeyBackend for UnsupportedHotkeys {
    fn register(
        &mut self,
        _binding: &HotkeyBinding,
        _callback: HotkeyCallback,
    ) -> Result<RegistrationHandle> {
        Err(CrosshairError::Unsupported("global hotkeys"))
    }

    fn unregister(&mut self, _handle: RegistrationHandle) -> Result<()> {
        Ok(())
    }
}

#[cfg(target_os = "windows")]
pub type PlatformHotkeys = crate::global_hotkey::GlobalHotkeys;
#[cfg(not(target_os = "windows"))]
pub type PlatformHotkeys = UnsupportedHotkeys;
