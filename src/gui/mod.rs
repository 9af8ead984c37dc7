mod hotkey_dialog;
#[cfg(target_os = "windows")]
mod tray;

pub use hotkey_dialog::{combo_label, HotkeyDialog, HotkeyDialogResult};

use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

use eframe::egui;
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};

use crate::common::file_dialog::pick_crosshair_image;
use crate::controller::{
    ControllerOptions, ImageLoadOutcome, MenuOutcome, TrayResponse, WindowMode,
    WindowModeController,
};
use crate::error::CrosshairError;
use crate::geometry::Point;
use crate::hotkey::{HotkeyCallback, HotkeyRegistrar, PlatformHotkeys};
use crate::image_source::{FsImageSource, ImageRequest};
use crate::settings::Settings;
use crate::tray_popup::{TrayMenuAction, TrayTrigger, POPUP_SIZE};
use crate::window_manager::window_handle_of;
use crate::window_style::{PlatformWindowStyle, WindowHandle};

/// Requests raised off the UI thread and drained at the start of each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    ToggleVisibility,
    Tray(TrayTrigger),
}

type Controller = WindowModeController<PlatformWindowStyle, PlatformHotkeys, FsImageSource>;

enum UiAction {
    Reset,
    Select,
    Center,
    Pin(bool),
    ClickThrough(bool),
    ChangeHotkey,
}

const PANEL_FILL: egui::Color32 = egui::Color32::from_rgb(0x12, 0x12, 0x12);

pub struct CrosshairApp {
    controller: Controller,
    events: Receiver<AppEvent>,
    startup_hotkey: String,
    started: bool,
    texture: Option<(u64, egui::TextureHandle)>,
    toasts: Toasts,
    enable_toasts: bool,
    toast_duration: f32,
    hotkey_dialog: HotkeyDialog,
    popup: Option<Point>,
    #[cfg(target_os = "windows")]
    _tray: Option<tray::Tray>,
}

impl CrosshairApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: &Settings) -> Self {
        let (tx, rx) = channel();
        let callback = toggle_callback(tx.clone(), cc.egui_ctx.clone());
        let hotkeys = HotkeyRegistrar::new(PlatformHotkeys::default(), callback);
        let images = FsImageSource::new(settings.default_image.as_ref().map(PathBuf::from));
        let controller = WindowModeController::new(
            WindowHandle::default(),
            PlatformWindowStyle::default(),
            hotkeys,
            images,
            ControllerOptions::from(settings),
        );

        #[cfg(target_os = "windows")]
        let tray = match tray::create(tx, cc.egui_ctx.clone()) {
            Ok(t) => Some(t),
            Err(e) => {
                tracing::error!(error = %e, "tray icon unavailable");
                None
            }
        };
        #[cfg(not(target_os = "windows"))]
        drop(tx);

        Self {
            controller,
            events: rx,
            startup_hotkey: settings.hotkey.clone(),
            started: false,
            texture: None,
            toasts: Toasts::new().anchor(egui::Align2::RIGHT_TOP, [10.0, 10.0]),
            enable_toasts: settings.enable_toasts,
            toast_duration: settings.toast_duration,
            hotkey_dialog: HotkeyDialog::default(),
            popup: None,
            #[cfg(target_os = "windows")]
            _tray: tray,
        }
    }

    fn toast(&mut self, kind: ToastKind, msg: impl Into<String>) {
        if !self.enable_toasts {
            return;
        }
        self.toasts.add(Toast {
            text: msg.into().into(),
            kind,
            options: ToastOptions::default().duration_in_seconds(self.toast_duration as f64),
        });
    }

    fn report(&mut self, err: &CrosshairError) {
        tracing::error!(error = %err, "operation failed");
        self.toast(ToastKind::Error, err.to_string());
    }

    fn start(&mut self, ctx: &egui::Context, frame: &eframe::Frame) {
        self.started = true;
        self.controller.attach_window(window_handle_of(frame));
        let hotkey = self.startup_hotkey.clone();
        for problem in self.controller.start(ctx, &hotkey) {
            self.report(&problem);
        }
    }

    fn drain_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.events.try_recv() {
            let result = match event {
                AppEvent::ToggleVisibility => self.controller.toggle_visibility(ctx),
                AppEvent::Tray(trigger) => match self.controller.on_tray_trigger(ctx, trigger) {
                    Ok(TrayResponse::ShowPopup(at)) => {
                        self.popup = Some(at);
                        Ok(())
                    }
                    Ok(TrayResponse::Toggled) => Ok(()),
                    Err(e) => Err(e),
                },
            };
            if let Err(e) = result {
                self.report(&e);
            }
        }
    }

    fn sync_texture(&mut self, ctx: &egui::Context) {
        let generation = self.controller.image_generation();
        if self.texture.as_ref().map(|(g, _)| *g) == Some(generation) {
            return;
        }
        if let Some(image) = self.controller.image() {
            let bitmap = &image.bitmap;
            let color = egui::ColorImage::from_rgba_unmultiplied(
                [bitmap.width() as usize, bitmap.height() as usize],
                bitmap.as_raw(),
            );
            let tex = ctx.load_texture("crosshair", color, egui::TextureOptions::LINEAR);
            self.texture = Some((generation, tex));
        }
    }

    fn crosshair(&self, ui: &mut egui::Ui) {
        if let Some((_, tex)) = &self.texture {
            ui.add(egui::Image::new(tex).fit_to_exact_size(tex.size_vec2()));
        }
    }

    fn configuration_panel(&mut self, ctx: &egui::Context) -> Option<UiAction> {
        let mut action = None;
        let state = self.controller.state().clone();
        let hotkey = self
            .controller
            .hotkey_label()
            .unwrap_or("(none)")
            .to_string();
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(PANEL_FILL).inner_margin(10.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| self.crosshair(ui));
                    ui.add_space(12.0);
                    ui.vertical(|ui| {
                        if ui.button("Reset").clicked() {
                            action = Some(UiAction::Reset);
                        }
                        if ui.button("Select").clicked() {
                            action = Some(UiAction::Select);
                        }
                        if ui.button("Center").clicked() {
                            action = Some(UiAction::Center);
                        }
                        let mut pinned = state.pinned;
                        if ui.checkbox(&mut pinned, "Pin on Top").changed() {
                            action = Some(UiAction::Pin(pinned));
                        }
                        let mut click_through = state.click_through;
                        if ui.checkbox(&mut click_through, "Click-through").changed() {
                            action = Some(UiAction::ClickThrough(click_through));
                        }
                        ui.separator();
                        ui.label(format!("Hotkey: {hotkey}"));
                        if ui.button("Change Hotkey").clicked() {
                            action = Some(UiAction::ChangeHotkey);
                        }
                    });
                });
            });
        action
    }

    fn overlay_panel(&self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.crosshair(ui));
    }

    fn apply(&mut self, ctx: &egui::Context, action: UiAction) {
        let result = match action {
            UiAction::Reset => self.controller.reset(ctx),
            UiAction::Select => self.select_image(),
            UiAction::Center => self.controller.enter_overlay(ctx),
            UiAction::Pin(pinned) => {
                self.controller.set_pinned(ctx, pinned);
                Ok(())
            }
            UiAction::ClickThrough(enabled) => self.controller.set_click_through(ctx, enabled),
            UiAction::ChangeHotkey => {
                let current = self.controller.hotkey_label().unwrap_or("").to_string();
                self.hotkey_dialog.open(&current);
                Ok(())
            }
        };
        if let Err(e) = result {
            self.report(&e);
        }
    }

    fn select_image(&mut self) -> crate::error::Result<()> {
        let Some(path) = pick_crosshair_image() else {
            return Ok(());
        };
        if let ImageLoadOutcome::FellBack { requested, reason } =
            self.controller.load_image(ImageRequest::Path(path))?
        {
            self.toast(
                ToastKind::Warning,
                format!(
                    "Could not load {}: {reason}. Using the default crosshair.",
                    requested.display()
                ),
            );
        }
        Ok(())
    }

    fn show_hotkey_dialog(&mut self, ctx: &egui::Context) {
        match self.hotkey_dialog.ui(ctx) {
            Some(HotkeyDialogResult::Captured(label)) if !label.is_empty() => {
                match self.controller.rebind_hotkey(&label) {
                    Ok(()) => self.toast(ToastKind::Success, format!("Hotkey changed to {label}")),
                    Err(e) => self.report(&e),
                }
            }
            _ => {}
        }
    }

    fn tray_popup(&mut self, ctx: &egui::Context) {
        let Some(at) = self.popup else {
            return;
        };
        let mut chosen = None;
        let mut dismissed = false;
        ctx.show_viewport_immediate(
            egui::ViewportId::from_hash_of("tray_popup"),
            egui::ViewportBuilder::default()
                .with_title("Crosshair")
                .with_decorations(false)
                .with_always_on_top()
                .with_taskbar(false)
                .with_resizable(false)
                .with_position(at.to_pos2())
                .with_inner_size(POPUP_SIZE.to_vec2()),
            |ctx, _class| {
                egui::CentralPanel::default()
                    .frame(egui::Frame::none().fill(PANEL_FILL).inner_margin(8.0))
                    .show(ctx, |ui| {
                        ui.vertical_centered_justified(|ui| {
                            for action in TrayMenuAction::ALL {
                                if ui.button(action.label()).clicked() {
                                    chosen = Some(action);
                                }
                            }
                        });
                    });
                dismissed = ctx.input(|i| {
                    i.viewport().close_requested() || i.key_pressed(egui::Key::Escape)
                });
            },
        );

        if let Some(action) = chosen {
            self.popup = None;
            match self.controller.apply_menu_action(ctx, action) {
                Ok(MenuOutcome::Exit) => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
                Ok(MenuOutcome::Continue) => {}
                Err(e) => self.report(&e),
            }
        } else if dismissed {
            self.popup = None;
        }
    }
}

fn toggle_callback(tx: Sender<AppEvent>, ctx: egui::Context) -> HotkeyCallback {
    let tx = Mutex::new(tx);
    Arc::new(move || {
        if let Ok(tx) = tx.lock() {
            let _ = tx.send(AppEvent::ToggleVisibility);
        }
        ctx.request_repaint();
    })
}

impl eframe::App for CrosshairApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        if !self.started {
            self.start(ctx, frame);
        }
        self.drain_events(ctx);
        self.sync_texture(ctx);

        match self.controller.mode() {
            WindowMode::Configuration => {
                if let Some(action) = self.configuration_panel(ctx) {
                    self.apply(ctx, action);
                }
                if self.hotkey_dialog.is_open() {
                    self.show_hotkey_dialog(ctx);
                }
            }
            WindowMode::Overlay => {
                // The dialog belongs to the control panel; leaving it drops the capture.
                self.hotkey_dialog.close();
                self.overlay_panel(ctx);
            }
        }

        self.tray_popup(ctx);
        self.toasts.show(ctx);
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        match self.controller.mode() {
            WindowMode::Overlay => [0.0; 4],
            WindowMode::Configuration => egui::Rgba::from(PANEL_FILL).to_array(),
        }
    }
}

impl Drop for CrosshairApp {
    fn drop(&mut self) {
        self.controller.shutdown();
    }
}
