// model = "claude-opus-4-5"
// created = "2026-10-19"
// modified = "2026-10-19"
// driver = "Isaac Clayton"

//! Axis-aligned rectangles in a 1024 x 1024 world.

use std::fmt;

/// Width and height of the world every stored rectangle must fit inside.
pub const WORLD_SIZE: i64 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rectangle {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Rectangle {
        return Rectangle {
            x,
            y,
            width,
            height,
        };
    }

    /// Positive area, and entirely inside the world.
    pub fn is_valid(&self) -> bool {
        let (x, y) = (self.x as i64, self.y as i64);
        let (w, h) = (self.width as i64, self.height as i64);
        return w > 0 && h > 0 && x >= 0 && y >= 0 && x + w <= WORLD_SIZE && y + h <= WORLD_SIZE;
    }

    /// Positive area. Regions only need this, not world bounds.
    pub fn has_area(&self) -> bool {
        return self.width > 0 && self.height > 0;
    }

    /// True if the interiors overlap. Shared edges or corners do not count.
    pub fn intersects(&self, other: &Rectangle) -> bool {
        let (ax, ay) = (self.x as i64, self.y as i64);
        let (bx, by) = (other.x as i64, other.y as i64);
        return bx < ax + self.width as i64
            && bx + other.width as i64 > ax
            && by < ay + self.height as i64
            && by + other.height as i64 > ay;
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}, {}", self.x, self.y, self.width, self.height)
    }
}
