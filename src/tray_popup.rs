use crate::geometry::{Point, ScreenRect, Size};

/// Size reserved for the tray popup when computing its placement.
pub const POPUP_SIZE: Size = Size::new(170, 232);

/// Trigger kinds delivered by the tray icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayTrigger {
    /// Left click on the icon.
    PrimaryActivation,
    /// Right click on the icon at the given cursor position.
    SecondaryActivation(Point),
}

/// Entries of the tray popup menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayMenuAction {
    Show,
    Hide,
    Settings,
    Exit,
}

impl TrayMenuAction {
    pub const ALL: [TrayMenuAction; 4] = [Self::Show, Self::Hide, Self::Settings, Self::Exit];

    pub fn label(self) -> &'static str {
        match self {
            Self::Show => "Show",
            Self::Hide => "Hide",
            Self::Settings => "Settings",
            Self::Exit => "Exit",
        }
    }
}

/// Compute the top-left corner for a popup opened at `cursor`.
///
/// The popup opens downward unless it would cross the bottom edge, in which
/// case it flips to open upward. Horizontally it is shifted left to fit the
/// right edge, but never past the left edge.
///
/// No top-edge clamp is applied after the flip, so a popup taller than the
/// space above the cursor can still end up partly off-screen.
pub fn place(cursor: Point, popup: Size, screen: ScreenRect) -> Point {
    let mut x = cursor.x;
    let mut y = cursor.y;

    if y + popup.height > screen.bottom {
        y -= popup.height;
    }

    if x + popup.width > screen.right {
        x = screen.right - popup.width;
    }
    if x < screen.left {
        x = screen.left;
    }

    Point { x, y }
}
