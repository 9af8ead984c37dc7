//! Window mode state machine.
//!
//! [`WindowModeController`] is the only owner of the window mode, the
//! click-through preference and the live hotkey. Every transition runs on the
//! UI thread and commits a complete [`ModeState`] before it returns; the GUI
//! reads that state to decide what to draw.

use std::path::PathBuf;

use eframe::egui::{ViewportCommand, WindowLevel};

use crate::error::{CrosshairError, Result};
use crate::geometry::{OverlayGeometry, Size};
use crate::hotkey::{HotkeyBackend, HotkeyBinding, HotkeyRegistrar, DEFAULT_HOTKEY};
use crate::image_source::{Bitmap, ImageRequest, ImageSource, BUNDLED_NAME};
use crate::settings::Settings;
use crate::tray_popup::{place, TrayMenuAction, TrayTrigger, POPUP_SIZE};
use crate::visibility::{apply_visibility, ViewportCtx, OFFSCREEN_POS};
use crate::window_style::{WindowHandle, WindowStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMode {
    Configuration,
    Overlay,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControllerOptions {
    /// Side of the box loaded images are scaled into; also the overlay size
    /// when no image is loaded.
    pub crosshair_size: u32,
    pub config_window_size: (f32, f32),
    pub click_through: bool,
    pub pin_on_top: bool,
    pub offscreen: (f32, f32),
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            crosshair_size: 100,
            config_window_size: (400.0, 280.0),
            click_through: true,
            pin_on_top: true,
            offscreen: OFFSCREEN_POS,
        }
    }
}

impl From<&Settings> for ControllerOptions {
    fn from(s: &Settings) -> Self {
        Self {
            crosshair_size: s.crosshair_size.max(1),
            config_window_size: s.window_size,
            click_through: s.click_through,
            pin_on_top: s.pin_on_top,
            offscreen: s.offscreen(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeState {
    pub mode: WindowMode,
    /// Mode to resume when a hidden window is shown again.
    pub last_active_mode: WindowMode,
    pub visible: bool,
    /// Click-through preference from the checkbox.
    pub click_through: bool,
    /// Whether the OS window currently carries the click-through style.
    pub click_through_applied: bool,
    pub pinned: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayedImage {
    pub bitmap: Bitmap,
    pub source: ImageRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImageLoadOutcome {
    Loaded,
    /// The requested image could not be shown and the default is displayed
    /// instead.
    FellBack {
        requested: PathBuf,
        reason: CrosshairError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayResponse {
    Toggled,
    ShowPopup(crate::geometry::Point),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    Continue,
    Exit,
}

pub struct WindowModeController<S: WindowStyle, H: HotkeyBackend, I: ImageSource> {
    window: WindowHandle,
    style: S,
    hotkeys: HotkeyRegistrar<H>,
    images: I,
    options: ControllerOptions,
    state: ModeState,
    image: Option<DisplayedImage>,
    image_generation: u64,
}

impl<S: WindowStyle, H: HotkeyBackend, I: ImageSource> WindowModeController<S, H, I> {
    pub fn new(
        window: WindowHandle,
        style: S,
        hotkeys: HotkeyRegistrar<H>,
        images: I,
        options: ControllerOptions,
    ) -> Self {
        let state = ModeState {
            mode: WindowMode::Configuration,
            last_active_mode: WindowMode::Configuration,
            visible: false,
            click_through: options.click_through,
            click_through_applied: false,
            pinned: options.pin_on_top,
        };
        Self {
            window,
            style,
            hotkeys,
            images,
            options,
            state,
            image: None,
            image_generation: 0,
        }
    }

    /// Install the startup hotkey, show the default image and open the
    /// configuration view. Problems are returned for display; none of them
    /// stop the application from starting.
    pub fn start(&mut self, ctx: &impl ViewportCtx, hotkey: &str) -> Vec<CrosshairError> {
        let mut problems = Vec::new();

        let binding = HotkeyBinding::parse(hotkey).unwrap_or_else(|e| {
            tracing::warn!(error = %e, fallback = DEFAULT_HOTKEY, "invalid startup hotkey");
            problems.push(e);
            HotkeyBinding::default()
        });
        if let Err(e) = self.hotkeys.rebind(binding) {
            tracing::warn!(error = %e, "startup hotkey unavailable");
            problems.push(e);
        }

        if let Err(e) = self.load_image(ImageRequest::Default) {
            problems.push(e);
        }
        if let Err(e) = self.enter_configuration(ctx) {
            problems.push(e);
        }
        problems
    }

    pub fn state(&self) -> &ModeState {
        &self.state
    }

    pub fn mode(&self) -> WindowMode {
        self.state.mode
    }

    pub fn is_visible(&self) -> bool {
        self.state.visible
    }

    /// Point the controller at the native window once it exists.
    pub fn attach_window(&mut self, window: WindowHandle) {
        self.window = window;
    }

    /// Label of the live hotkey, if one is registered.
    pub fn hotkey_label(&self) -> Option<&str> {
        self.hotkeys.active().map(HotkeyBinding::label)
    }

    pub fn image(&self) -> Option<&DisplayedImage> {
        self.image.as_ref()
    }

    /// Bumped every time the displayed image changes.
    pub fn image_generation(&self) -> u64 {
        self.image_generation
    }

    /// Size and position the overlay window would take right now.
    pub fn overlay_geometry(&self, ctx: &impl ViewportCtx) -> OverlayGeometry {
        let size = self.image.as_ref().map_or_else(
            || {
                let side = self.options.crosshair_size as i32;
                Size::new(side, side)
            },
            |img| img.bitmap.size(),
        );
        OverlayGeometry::centered(size, ctx.screen_bounds())
    }

    fn config_size(&self) -> Size {
        let (w, h) = self.options.config_window_size;
        Size::new(w as i32, h as i32)
    }

    /// Flip the click-through style and record the result. A failed call
    /// leaves `click_through_applied` untouched.
    fn set_style(&mut self, enabled: bool) -> Result<()> {
        let result = if enabled {
            self.style.apply_click_through(self.window)
        } else {
            self.style.remove_click_through(self.window)
        };
        match result {
            Ok(()) => {
                self.state.click_through_applied = enabled;
                Ok(())
            }
            // Nothing can be click-through where the style does not exist.
            Err(CrosshairError::Unsupported(_)) if !enabled => {
                self.state.click_through_applied = false;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, enabled, "window style change failed, keeping previous state");
                Err(e)
            }
        }
    }

    /// Show only the crosshair, centered, borderless and topmost. The window
    /// becomes click-through when the preference is set.
    ///
    /// A style failure is returned after the mode change is committed; the
    /// window then stays in overlay mode without click-through.
    pub fn enter_overlay(&mut self, ctx: &impl ViewportCtx) -> Result<()> {
        let geometry = self.overlay_geometry(ctx);
        ctx.send_viewport_cmd(ViewportCommand::Decorations(false));
        ctx.send_viewport_cmd(ViewportCommand::InnerSize(geometry.size.to_vec2()));
        ctx.send_viewport_cmd(ViewportCommand::WindowLevel(WindowLevel::AlwaysOnTop));
        apply_visibility(true, ctx, geometry.position, self.options.offscreen);

        let from = self.state.mode;
        self.state.mode = WindowMode::Overlay;
        self.state.last_active_mode = WindowMode::Overlay;
        self.state.visible = true;

        let result = if self.state.click_through {
            self.set_style(true)
        } else if self.state.click_through_applied {
            self.set_style(false)
        } else {
            Ok(())
        };
        ctx.send_viewport_cmd(ViewportCommand::MousePassthrough(
            self.state.click_through_applied,
        ));
        tracing::info!(
            from = ?from,
            x = geometry.position.x,
            y = geometry.position.y,
            width = geometry.size.width,
            height = geometry.size.height,
            click_through = self.state.click_through_applied,
            "entered overlay mode"
        );
        result
    }

    /// Show the control panel at its fixed size, centered, with normal window
    /// chrome. Click-through is always removed first; if that fails nothing
    /// else changes.
    pub fn enter_configuration(&mut self, ctx: &impl ViewportCtx) -> Result<()> {
        self.set_style(false)?;
        ctx.send_viewport_cmd(ViewportCommand::MousePassthrough(false));

        let size = self.config_size();
        ctx.send_viewport_cmd(ViewportCommand::Decorations(true));
        ctx.send_viewport_cmd(ViewportCommand::InnerSize(size.to_vec2()));
        ctx.send_viewport_cmd(ViewportCommand::WindowLevel(self.config_window_level()));
        let position = ctx.screen_bounds().center_of(size);
        apply_visibility(true, ctx, position, self.options.offscreen);

        let from = self.state.mode;
        self.state.mode = WindowMode::Configuration;
        self.state.last_active_mode = WindowMode::Configuration;
        self.state.visible = true;
        tracing::info!(from = ?from, "entered configuration mode");
        Ok(())
    }

    fn config_window_level(&self) -> WindowLevel {
        if self.state.pinned {
            WindowLevel::AlwaysOnTop
        } else {
            WindowLevel::Normal
        }
    }

    /// Hide the window, remembering the current mode for the next show.
    pub fn hide(&mut self, ctx: &impl ViewportCtx) {
        if !self.state.visible {
            return;
        }
        apply_visibility(false, ctx, Default::default(), self.options.offscreen);
        self.state.visible = false;
        self.state.last_active_mode = self.state.mode;
        tracing::debug!(mode = ?self.state.mode, "window hidden");
    }

    /// Hide a visible window, or show a hidden one in the mode it was last in.
    pub fn toggle_visibility(&mut self, ctx: &impl ViewportCtx) -> Result<()> {
        let old = self.state.visible;
        tracing::debug!(from = ?old, to = ?!old, "visibility toggle");
        if old {
            self.hide(ctx);
            return Ok(());
        }
        match self.state.last_active_mode {
            WindowMode::Configuration => self.enter_configuration(ctx),
            WindowMode::Overlay => self.enter_overlay(ctx),
        }
    }

    /// Change the click-through preference. In overlay mode the style is
    /// applied or removed immediately; in configuration mode it only takes
    /// effect on the next overlay. A failed style call restores the previous
    /// preference.
    pub fn set_click_through(&mut self, ctx: &impl ViewportCtx, enabled: bool) -> Result<()> {
        let previous = self.state.click_through;
        self.state.click_through = enabled;
        if self.state.mode != WindowMode::Overlay {
            tracing::debug!(enabled, "click-through preference stored");
            return Ok(());
        }
        if let Err(e) = self.set_style(enabled) {
            self.state.click_through = previous;
            return Err(e);
        }
        ctx.send_viewport_cmd(ViewportCommand::MousePassthrough(
            self.state.click_through_applied,
        ));
        Ok(())
    }

    /// Keep the configuration window above other windows. Overlay mode is
    /// always topmost.
    pub fn set_pinned(&mut self, ctx: &impl ViewportCtx, pinned: bool) {
        self.state.pinned = pinned;
        if self.state.mode == WindowMode::Configuration {
            ctx.send_viewport_cmd(ViewportCommand::WindowLevel(self.config_window_level()));
        }
    }

    /// Replace the live hotkey. On any error the previous binding stays
    /// registered.
    pub fn rebind_hotkey(&mut self, combo: &str) -> Result<()> {
        let binding = HotkeyBinding::parse(combo).map_err(|e| {
            tracing::warn!(error = %e, "rejected hotkey");
            e
        })?;
        self.hotkeys.rebind(binding)
    }

    /// Display the requested image, falling back to the default one when the
    /// request cannot be satisfied. If the default fails too the previous image
    /// stays on screen and a [`CrosshairError::ResourceLoad`] is returned.
    pub fn load_image(&mut self, request: ImageRequest) -> Result<ImageLoadOutcome> {
        let path = match request {
            ImageRequest::Default => {
                self.show_default()?;
                return Ok(ImageLoadOutcome::Loaded);
            }
            ImageRequest::Path(path) => path,
        };

        match self.images.load(&path) {
            Ok(bitmap) => {
                tracing::info!(path = %path.display(), "image loaded");
                self.show_bitmap(bitmap, ImageRequest::Path(path));
                Ok(ImageLoadOutcome::Loaded)
            }
            Err(reason) => {
                tracing::warn!(path = %path.display(), error = %reason, "falling back to default image");
                self.show_default()?;
                Ok(ImageLoadOutcome::FellBack {
                    requested: path,
                    reason,
                })
            }
        }
    }

    fn show_default(&mut self) -> Result<()> {
        let bitmap = self.images.load_default().map_err(|e| {
            tracing::error!(error = %e, "default image failed to load");
            match e {
                CrosshairError::ResourceLoad { .. } => e,
                CrosshairError::ResourceNotFound(path) => CrosshairError::ResourceLoad {
                    path,
                    reason: "file not found".into(),
                },
                other => CrosshairError::ResourceLoad {
                    path: PathBuf::from(BUNDLED_NAME),
                    reason: other.to_string(),
                },
            }
        })?;
        self.show_bitmap(bitmap, ImageRequest::Default);
        Ok(())
    }

    fn show_bitmap(&mut self, bitmap: Bitmap, source: ImageRequest) {
        let bitmap = self.images.scale(&bitmap, self.options.crosshair_size);
        self.image = Some(DisplayedImage { bitmap, source });
        self.image_generation += 1;
    }

    /// Restore the default image and return to the control panel.
    pub fn reset(&mut self, ctx: &impl ViewportCtx) -> Result<()> {
        self.load_image(ImageRequest::Default)?;
        self.enter_configuration(ctx)
    }

    pub fn on_tray_trigger(
        &mut self,
        ctx: &impl ViewportCtx,
        trigger: TrayTrigger,
    ) -> Result<TrayResponse> {
        match trigger {
            TrayTrigger::PrimaryActivation => {
                self.toggle_visibility(ctx)?;
                Ok(TrayResponse::Toggled)
            }
            TrayTrigger::SecondaryActivation(cursor) => {
                let at = place(cursor, POPUP_SIZE, ctx.work_area());
                tracing::debug!(x = at.x, y = at.y, "tray popup placed");
                Ok(TrayResponse::ShowPopup(at))
            }
        }
    }

    pub fn apply_menu_action(
        &mut self,
        ctx: &impl ViewportCtx,
        action: TrayMenuAction,
    ) -> Result<MenuOutcome> {
        match action {
            TrayMenuAction::Show => self.enter_overlay(ctx)?,
            TrayMenuAction::Hide => self.hide(ctx),
            TrayMenuAction::Settings => self.enter_configuration(ctx)?,
            TrayMenuAction::Exit => {
                self.shutdown();
                return Ok(MenuOutcome::Exit);
            }
        }
        Ok(MenuOutcome::Continue)
    }

    /// Release the global hotkey. Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.hotkeys.release();
    }
}
