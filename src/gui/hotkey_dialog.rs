use eframe::egui;

use crate::hotkey::HotkeyBinding;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HotkeyDialogResult {
    Cancelled,
    /// Label of the captured combination. Empty when nothing usable was pressed.
    Captured(String),
}

/// Small modal that records the next key combination pressed.
#[derive(Debug, Default)]
pub struct HotkeyDialog {
    open: bool,
    current: String,
    captured: Option<String>,
}

impl HotkeyDialog {
    pub fn open(&mut self, current: &str) {
        self.open = true;
        self.current = current.to_string();
        self.captured = None;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Dismiss without a result, dropping any partial capture.
    pub fn close(&mut self) {
        self.open = false;
        self.captured = None;
    }

    pub fn ui(&mut self, ctx: &egui::Context) -> Option<HotkeyDialogResult> {
        if !self.open {
            return None;
        }

        let pressed = ctx.input(|i| {
            i.events.iter().rev().find_map(|ev| match ev {
                egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } => combo_label(*key, *modifiers),
                _ => None,
            })
        });
        if let Some(label) = pressed {
            self.captured = Some(label);
        }

        let mut result = None;
        egui::Window::new("Change Hotkey")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(format!(
                    "Current Hotkey: {}\nPress new hotkey combination:",
                    self.current
                ));
                let shown = self.captured.as_deref().unwrap_or("Press keys here");
                ui.add_enabled(false, egui::Label::new(shown));
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        result = Some(HotkeyDialogResult::Captured(
                            self.captured.clone().unwrap_or_default(),
                        ));
                    }
                    if ui.button("Cancel").clicked() {
                        result = Some(HotkeyDialogResult::Cancelled);
                    }
                });
            });

        if result.is_some() {
            self.open = false;
        }
        result
    }
}

/// Label for a key press such as `"Ctrl+Alt+F5"`, or `None` when the key
/// cannot serve as a global hotkey.
pub fn combo_label(key: egui::Key, modifiers: egui::Modifiers) -> Option<String> {
    use egui::Key;
    let name = match key {
        Key::ArrowUp => "Up",
        Key::ArrowDown => "Down",
        Key::ArrowLeft => "Left",
        Key::ArrowRight => "Right",
        Key::Escape => "Escape",
        Key::Tab => "Tab",
        Key::Backspace => "Backspace",
        Key::Enter => "Enter",
        Key::Space => "Space",
        Key::Insert => "Insert",
        Key::Delete => "Delete",
        Key::Home => "Home",
        Key::End => "End",
        Key::PageUp => "PageUp",
        Key::PageDown => "PageDown",
        Key::Num0 => "0",
        Key::Num1 => "1",
        Key::Num2 => "2",
        Key::Num3 => "3",
        Key::Num4 => "4",
        Key::Num5 => "5",
        Key::Num6 => "6",
        Key::Num7 => "7",
        Key::Num8 => "8",
        Key::Num9 => "9",
        // Letters and function keys are named after themselves.
        other => other.name(),
    };

    let mut combo = String::new();
    if modifiers.ctrl {
        combo.push_str("Ctrl+");
    }
    if modifiers.alt {
        combo.push_str("Alt+");
    }
    if modifiers.shift {
        combo.push_str("Shift+");
    }
    combo.push_str(name);
    HotkeyBinding::parse(&combo)
        .ok()
        .map(|b| b.label().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_binding_format() {
        let mods = egui::Modifiers {
            ctrl: true,
            alt: true,
            ..Default::default()
        };
        assert_eq!(combo_label(egui::Key::F5, mods).as_deref(), Some("Ctrl+Alt+F5"));
        assert_eq!(
            combo_label(egui::Key::S, egui::Modifiers::ALT).as_deref(),
            Some("Alt+S")
        );
        assert_eq!(
            combo_label(egui::Key::Num3, egui::Modifiers::NONE).as_deref(),
            Some("3")
        );
    }

    #[test]
    fn closing_drops_pending_capture() {
        let mut dialog = HotkeyDialog::default();
        dialog.open("Alt+S");
        dialog.captured = Some("Ctrl+F2".into());

        dialog.close();
        assert!(!dialog.is_open());
        assert_eq!(dialog.ui(&egui::Context::default()), None);

        dialog.open("Alt+S");
        assert!(dialog.is_open());
        assert_eq!(dialog.captured, None);
    }

    #[test]
    fn punctuation_is_not_captured() {
        assert_eq!(combo_label(egui::Key::Comma, egui::Modifiers::CTRL), None);
    }
}
