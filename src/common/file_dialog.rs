use std::path::PathBuf;

#[cfg(target_os = "windows")]
pub use rfd::FileDialog;

#[cfg(not(target_os = "windows"))]
pub struct FileDialog;

#[cfg(not(target_os = "windows"))]
impl FileDialog {
    pub fn new() -> Self {
        FileDialog
    }
    pub fn set_title(self, _title: &str) -> Self {
        self
    }
    pub fn add_filter(self, _name: &str, _exts: &[&str]) -> Self {
        self
    }
    pub fn pick_file(self) -> Option<PathBuf> {
        None
    }
}

/// Ask the user for a PNG crosshair. `None` when the dialog is cancelled.
pub fn pick_crosshair_image() -> Option<PathBuf> {
    FileDialog::new()
        .set_title("Select Crosshair Image")
        .add_filter("PNG", &["png"])
        .pick_file()
}
