use eframe::egui;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn to_pos2(self) -> egui::Pos2 {
        egui::pos2(self.x as f32, self.y as f32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn to_vec2(self) -> egui::Vec2 {
        egui::vec2(self.width as f32, self.height as f32)
    }
}

/// Screen area in desktop coordinates. `right` and `bottom` are the far edges,
/// so a 1920 wide screen starting at 0 has `right == 1920`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ScreenRect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Top-left position that centers a window of `size` on this rect.
    pub fn center_of(&self, size: Size) -> Point {
        Point {
            x: self.left + (self.width() - size.width) / 2,
            y: self.top + (self.height() - size.height) / 2,
        }
    }

    /// Convert from physical pixels to egui points.
    pub fn scaled(&self, pixels_per_point: f32) -> Self {
        if pixels_per_point <= 0.0 || (pixels_per_point - 1.0).abs() < f32::EPSILON {
            return *self;
        }
        let s = |v: i32| (v as f32 / pixels_per_point).round() as i32;
        Self::new(s(self.left), s(self.top), s(self.right), s(self.bottom))
    }
}

impl Default for ScreenRect {
    fn default() -> Self {
        Self::new(0, 0, 1920, 1080)
    }
}

/// Window placement for overlay mode. Built fresh every time overlay mode is
/// entered so it always tracks the image currently on display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayGeometry {
    pub position: Point,
    pub size: Size,
}

impl OverlayGeometry {
    pub fn centered(image_size: Size, screen: ScreenRect) -> Self {
        Self {
            position: screen.center_of(image_size),
            size: image_size,
        }
    }
}
