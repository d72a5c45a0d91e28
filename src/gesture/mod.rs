//! Toolkit-independent pointer gesture state machines.
//!
//! Coordinates are in pointer pixels. The presentation layer does hit
//! testing and converts its native events into calls on these controllers;
//! the controllers answer with actions that the caller applies to the
//! planner store.

pub mod drag_session;
pub mod task_list;
pub mod timeline;

pub use crate::model::config::GestureConfig;

/// A pointer position
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    /// Displacement from `origin` to `self`
    pub fn delta_from(self, origin: Point) -> (f32, f32) {
        (self.x - origin.x, self.y - origin.y)
    }
}

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Half-open containment: the right and bottom edges are outside
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }
}

/// True once movement leaves the tap radius on either axis
pub(crate) fn exceeds_threshold(dx: f32, dy: f32, threshold: f32) -> bool {
    dx.abs() > threshold || dy.abs() > threshold
}
