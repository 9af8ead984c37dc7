#![cfg_attr(feature = "windows_gui", windows_subsystem = "windows")]

use crosshair_overlay::gui::CrosshairApp;
use crosshair_overlay::logging;
use crosshair_overlay::settings::Settings;

use eframe::egui;

fn main() -> anyhow::Result<()> {
    let settings = Settings::load("settings.json")?;
    logging::init(settings.debug_logging, settings.log_file.as_deref());
    tracing::info!(hotkey = %settings.hotkey, "starting crosshair overlay");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Custom Crosshair")
            .with_inner_size(settings.window_size)
            .with_resizable(false)
            .with_transparent(true)
            .with_always_on_top(),
        ..Default::default()
    };

    eframe::run_native(
        "Custom Crosshair",
        native_options,
        Box::new(move |cc| Box::new(CrosshairApp::new(cc, &settings))),
    )
    .map_err(|e| anyhow::anyhow!("event loop failed: {e}"))
}
