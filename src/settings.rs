use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::hotkey::DEFAULT_HOTKEY;

/// Startup defaults. Read once when the application launches; changes made at
/// runtime (hotkey, click-through, chosen image) are never written back.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Hotkey toggling the crosshair, e.g. `"Alt+S"`.
    #[serde(default = "default_hotkey")]
    pub hotkey: String,
    /// Replaces the bundled crosshair as the default image.
    #[serde(default)]
    pub default_image: Option<String>,
    /// Side of the square box images are scaled into.
    #[serde(default = "default_crosshair_size")]
    pub crosshair_size: u32,
    /// Fixed size of the configuration window.
    #[serde(default = "default_window_size")]
    pub window_size: (f32, f32),
    #[serde(default = "default_true")]
    pub click_through: bool,
    /// Keep the configuration window above other windows.
    #[serde(default = "default_true")]
    pub pin_on_top: bool,
    /// Position used to park the window while hidden.
    #[serde(default)]
    pub offscreen_pos: Option<(i32, i32)>,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Optional file receiving a copy of the log output.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub enable_toasts: bool,
    /// Duration of toast notifications in seconds.
    #[serde(default = "default_toast_duration")]
    pub toast_duration: f32,
}

fn default_hotkey() -> String {
    DEFAULT_HOTKEY.into()
}

fn default_crosshair_size() -> u32 {
    100
}

fn default_window_size() -> (f32, f32) {
    (400.0, 280.0)
}

fn default_true() -> bool {
    true
}

fn default_toast_duration() -> f32 {
    3.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hotkey: default_hotkey(),
            default_image: None,
            crosshair_size: default_crosshair_size(),
            window_size: default_window_size(),
            click_through: true,
            pin_on_top: true,
            offscreen_pos: None,
            debug_logging: false,
            log_file: None,
            enable_toasts: true,
            toast_duration: default_toast_duration(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults when the file does
    /// not exist or is empty.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("invalid settings file {}: {e}", path.display()))?;
        Ok(settings)
    }

    pub fn offscreen(&self) -> (f32, f32) {
        self.offscreen_pos
            .map(|(x, y)| (x as f32, y as f32))
            .unwrap_or(crate::visibility::OFFSCREEN_POS)
    }
}
