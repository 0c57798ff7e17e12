use serde::{Deserialize, Serialize};

/// Integer point in logical window pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned integer rectangle. Used both for destinations in window space
/// and for source rectangles in atlas pixel space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// A rectangle in atlas pixel space.
pub type AtlasRect = Rectangle;

impl Rectangle {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn pos(&self) -> Position {
        Position {
            x: self.x,
            y: self.y,
        }
    }

    /// Exclusive right edge, saturating at the `i32` range.
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= self.x
            && position.x < self.right()
            && position.y >= self.y
            && position.y < self.bottom()
    }

    /// True when both rectangles share at least one pixel. Empty rectangles
    /// never overlap anything.
    pub fn overlaps(&self, other: &Rectangle) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Intersection of two rectangles, clamped to zero size when disjoint.
    pub fn intersect(&self, other: &Rectangle) -> Rectangle {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Rectangle::new(
            x,
            y,
            right.saturating_sub(x).max(0),
            bottom.saturating_sub(y).max(0),
        )
    }

    /// Rectangle of `width` x `height` centered inside `self`, using integer
    /// division like the toolkit does.
    pub fn centered(&self, width: i32, height: i32) -> Rectangle {
        let offset = |origin: i32, outer: i32, inner: i32| {
            let value = origin as i64 + (outer as i64 - inner as i64) / 2;
            value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
        };
        Rectangle::new(
            offset(self.x, self.width, width),
            offset(self.y, self.height, height),
            width,
            height,
        )
    }

    /// Outward-rounded rectangle covering `self` scaled by `factor`.
    pub fn scaled(&self, factor: f32) -> Rectangle {
        let x = (self.x as f32 * factor).floor() as i32;
        let y = (self.y as f32 * factor).floor() as i32;
        let right = (self.right() as f32 * factor).ceil() as i32;
        let bottom = (self.bottom() as f32 * factor).ceil() as i32;
        Rectangle::new(
            x,
            y,
            right.saturating_sub(x).max(0),
            bottom.saturating_sub(y).max(0),
        )
    }
}

/// Straight-alpha RGBA color, laid out exactly as the color vertex array expects.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable,
    Serialize, Deserialize,
)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn to_f64_array(self) -> [f64; 4] {
        [
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
            self.a as f64 / 255.0,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_saturate_instead_of_overflowing() {
        let rect = Rectangle::new(i32::MAX - 1, i32::MIN, 10, -10);
        assert_eq!(rect.right(), i32::MAX);
        assert_eq!(rect.bottom(), i32::MIN);
    }

    #[test]
    fn centering_extreme_rects_stays_in_range() {
        let dst = Rectangle::new(0, 0, i32::MIN, 0).centered(16, 16);
        assert_eq!(dst.x, -1_073_741_832);
        assert_eq!(dst.y, -8);

        let dst = Rectangle::new(i32::MAX, 0, i32::MAX, 16).centered(16, 16);
        assert_eq!(dst.x, i32::MAX);
        assert_eq!((dst.width, dst.height), (16, 16));
    }

    #[test]
    fn intersect_of_extreme_rects_is_well_formed() {
        let left = Rectangle::new(i32::MIN, 0, 0, 1);
        let right = Rectangle::new(i32::MAX, 0, 0, 1);
        let overlap = left.intersect(&right);
        assert_eq!(overlap, Rectangle::new(i32::MAX, 0, 0, 1));
        assert!(overlap.is_empty());
    }

    #[test]
    fn scaling_rounds_outward() {
        let rect = Rectangle::new(1, 1, 3, 3).scaled(1.5);
        assert_eq!(rect, Rectangle::new(1, 1, 5, 5));
    }
}
