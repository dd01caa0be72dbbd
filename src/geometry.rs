/// Shared geometric and color primitives used across scene, viewport and crop modules.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    pub fn is_degenerate(self, min_extent: f64) -> bool {
        self.width < min_extent || self.height < min_extent
    }
}

/// Authoritative design resolution of a document, independent of display zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalSize {
    pub width: u32,
    pub height: u32,
}

impl LogicalSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn area(self) -> f64 {
        f64::from(self.width) * f64::from(self.height)
    }

    pub fn aspect_ratio(self) -> f64 {
        f64::from(self.width) / f64::from(self.height.max(1))
    }

    pub fn as_size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

/// Axis-aligned rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_center(center: Point, size: Size) -> Self {
        Self::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    pub fn left(self) -> f64 {
        self.x
    }

    pub fn top(self) -> f64 {
        self.y
    }

    pub fn right(self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(self) -> f64 {
        self.y + self.height
    }

    pub fn center(self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Translates the rectangle so it lies fully inside `outer`, without resizing.
    /// A rectangle larger than `outer` is pinned to the outer origin on that axis.
    pub fn clamped_within(self, outer: Rect) -> Rect {
        let x = clamp_axis(self.x, self.width, outer.x, outer.width);
        let y = clamp_axis(self.y, self.height, outer.y, outer.height);
        Rect::new(x, y, self.width, self.height)
    }

    /// Shrinks and repositions the rectangle so it lies fully inside `outer`.
    pub fn fitted_within(self, outer: Rect) -> Rect {
        let width = self.width.min(outer.width);
        let height = self.height.min(outer.height);
        let x = self.x.clamp(outer.x, (outer.right() - width).max(outer.x));
        let y = self.y.clamp(outer.y, (outer.bottom() - height).max(outer.y));
        Rect::new(x, y, width, height)
    }

    pub fn inset_by_fraction(self, fraction: f64) -> Rect {
        let dx = self.width * fraction;
        let dy = self.height * fraction;
        Rect::new(
            self.x + dx,
            self.y + dy,
            (self.width - 2.0 * dx).max(0.0),
            (self.height - 2.0 * dy).max(0.0),
        )
    }
}

fn clamp_axis(position: f64, extent: f64, outer_position: f64, outer_extent: f64) -> f64 {
    let max = outer_position + (outer_extent - extent).max(0.0);
    position.clamp(outer_position, max)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn rgb(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_clamped_within_pins_overflowing_edges() {
        let outer = Rect::new(0.0, 0.0, 400.0, 300.0);
        let clamped = Rect::new(350.0, -20.0, 100.0, 50.0).clamped_within(outer);
        assert_eq!(clamped, Rect::new(300.0, 0.0, 100.0, 50.0));
    }

    #[test]
    fn rect_larger_than_outer_pins_to_outer_origin() {
        let outer = Rect::new(10.0, 10.0, 100.0, 100.0);
        let clamped = Rect::new(0.0, 0.0, 500.0, 40.0).clamped_within(outer);
        assert_eq!(clamped.x, 10.0);
        assert_eq!(clamped.y, 10.0);
        assert_eq!(clamped.width, 500.0);
    }

    #[test]
    fn rect_fitted_within_shrinks_to_outer() {
        let outer = Rect::new(0.0, 0.0, 400.0, 300.0);
        let fitted = Rect::new(350.0, 280.0, 100.0, 50.0).fitted_within(outer);
        assert!(fitted.right() <= outer.right() + 1e-9);
        assert!(fitted.bottom() <= outer.bottom() + 1e-9);
        assert_eq!(fitted.width, 100.0);
        assert_eq!(fitted.height, 50.0);
    }

    #[test]
    fn rect_inset_by_fraction_keeps_center() {
        let rect = Rect::new(0.0, 0.0, 100.0, 200.0);
        let inset = rect.inset_by_fraction(0.1);
        assert_eq!(inset, Rect::new(10.0, 20.0, 80.0, 160.0));
        assert_eq!(inset.center().x, rect.center().x);
        assert_eq!(inset.center().y, rect.center().y);
    }

    #[test]
    fn logical_size_center_and_area() {
        let size = LogicalSize::new(800, 600);
        assert_eq!(size.center(), Point::new(400.0, 300.0));
        assert_eq!(size.area(), 480_000.0);
    }
}
