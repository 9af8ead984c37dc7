use eframe::egui;

use crate::geometry::{Point, ScreenRect};
use crate::window_manager::{primary_screen_bounds, primary_work_area};

/// Position used to park the window while it is hidden.
pub const OFFSCREEN_POS: (f32, f32) = (-32000.0, -32000.0);

/// The parts of an egui context the window mode controller drives. Tests swap
/// in a recording implementation.
pub trait ViewportCtx {
    fn send_viewport_cmd(&self, cmd: egui::ViewportCommand);

    fn request_repaint(&self);

    /// Bounds of the primary screen in egui points.
    fn screen_bounds(&self) -> ScreenRect;

    /// Part of the primary screen not covered by the taskbar, in egui points.
    fn work_area(&self) -> ScreenRect {
        self.screen_bounds()
    }
}

impl ViewportCtx for egui::Context {
    fn send_viewport_cmd(&self, cmd: egui::ViewportCommand) {
        egui::Context::send_viewport_cmd(self, cmd);
    }

    fn request_repaint(&self) {
        egui::Context::request_repaint(self);
    }

    fn screen_bounds(&self) -> ScreenRect {
        match primary_screen_bounds() {
            Some(rect) => rect.scaled(self.pixels_per_point()),
            None => self
                .input(|i| i.viewport().monitor_size)
                .map(|size| ScreenRect::new(0, 0, size.x as i32, size.y as i32))
                .unwrap_or_default(),
        }
    }

    fn work_area(&self) -> ScreenRect {
        match primary_work_area() {
            Some(rect) => rect.scaled(self.pixels_per_point()),
            None => ViewportCtx::screen_bounds(self),
        }
    }
}

/// Show the window at `position` or park it off-screen.
///
/// Hiding keeps the viewport mapped so the event loop keeps running and the
/// hotkey and tray requests queued for the UI thread are still drained.
pub fn apply_visibility(visible: bool, ctx: &impl ViewportCtx, position: Point, offscreen: (f32, f32)) {
    let pos = if visible {
        position.to_pos2()
    } else {
        egui::pos2(offscreen.0, offscreen.1)
    };
    tracing::debug!(visible, x = pos.x, y = pos.y, "applying visibility");
    ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(pos));
    ctx.send_viewport_cmd(egui::ViewportCommand::Visible(true));
    if visible {
        ctx.send_viewport_cmd(egui::ViewportCommand::Minimized(false));
    }
    ctx.request_repaint();
}
