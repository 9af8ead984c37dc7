pub mod common;
pub mod controller;
pub mod error;
pub mod geometry;
#[cfg(target_os = "windows")]
pub mod global_hotkey;
pub mod gui;
pub mod hotkey;
pub mod image_source;
pub mod logging;
pub mod settings;
pub mod tray_popup;
pub mod visibility;
pub mod window_manager;
pub mod window_style;
