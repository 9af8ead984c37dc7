use std::sync::mpsc::Sender;
use std::sync::Mutex;

use anyhow::Context as _;
use eframe::egui;
use tray_icon::{Icon, MouseButton, MouseButtonState, TrayIcon, TrayIconBuilder, TrayIconEvent};

use super::AppEvent;
use crate::geometry::Point;
use crate::image_source::BUNDLED_CROSSHAIR;
use crate::tray_popup::TrayTrigger;

const ICON_SIDE: u32 = 32;

/// Notification area icon. Dropping it removes the icon.
pub struct Tray {
    _icon: TrayIcon,
}

/// Map a raw tray event to a trigger. Only button releases count; the cursor
/// position is converted from physical pixels to egui points.
fn trigger_for(event: &TrayIconEvent, pixels_per_point: f32) -> Option<TrayTrigger> {
    match event {
        TrayIconEvent::Click {
            button: MouseButton::Left,
            button_state: MouseButtonState::Up,
            ..
        } => Some(TrayTrigger::PrimaryActivation),
        TrayIconEvent::Click {
            button: MouseButton::Right,
            button_state: MouseButtonState::Up,
            position,
            ..
        } => {
            let ppp = pixels_per_point.max(f32::EPSILON) as f64;
            Some(TrayTrigger::SecondaryActivation(Point::new(
                (position.x / ppp).round() as i32,
                (position.y / ppp).round() as i32,
            )))
        }
        _ => None,
    }
}

pub fn create(events: Sender<AppEvent>, ctx: egui::Context) -> anyhow::Result<Tray> {
    let icon = image::load_from_memory(BUNDLED_CROSSHAIR)
        .context("decoding tray icon")?
        .resize(ICON_SIDE, ICON_SIDE, image::imageops::FilterType::Lanczos3)
        .to_rgba8();
    let (width, height) = icon.dimensions();
    let icon = Icon::from_rgba(icon.into_raw(), width, height).context("building tray icon")?;

    let events = Mutex::new(events);
    TrayIconEvent::set_event_handler(Some(move |event: TrayIconEvent| {
        let Some(trigger) = trigger_for(&event, ctx.pixels_per_point()) else {
            return;
        };
        tracing::debug!(?trigger, "tray activation");
        if let Ok(tx) = events.lock() {
            let _ = tx.send(AppEvent::Tray(trigger));
        }
        ctx.request_repaint();
    }));

    let tray = TrayIconBuilder::new()
        .with_tooltip("Crosshair Overlay")
        .with_icon(icon)
        .build()
        .context("creating tray icon")?;
    Ok(Tray { _icon: tray })
}
