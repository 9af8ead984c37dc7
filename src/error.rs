use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the window mode subsystem. None of these are fatal to the
/// process; callers log them and keep the last known-good state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CrosshairError {
    #[error("window style call failed (os error {code})")]
    PlatformStyle { code: i32 },

    #[error("hotkey '{binding}' is already claimed by another hook")]
    HotkeyConflict { binding: String },

    #[error("failed to register hotkey '{binding}' (os error {code})")]
    HotkeyRegistration { binding: String, code: i32 },

    #[error("invalid hotkey: '{0}'")]
    InvalidBinding(String),

    #[error("cannot load image {path}: {reason}")]
    ResourceLoad { path: PathBuf, reason: String },

    #[error("image not found: {0}")]
    ResourceNotFound(PathBuf),

    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),
}

pub type Result<T, E = CrosshairError> = std::result::Result<T, E>;
