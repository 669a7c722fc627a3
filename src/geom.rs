//! Geometry primitives shared by the workspace, the transformer and the layers.
//!
//! Two frames are in play. The *screen* frame has its origin at the top-left
//! of the workspace viewport with y growing downward. The *cartesian* frame has
//! its origin at the viewport center with y growing upward; the workspace pan
//! origin lives there.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A point in screen, cartesian or drawing space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.hypot(dy)
    }

    /// Convert a screen-frame point into the cartesian frame of `bounds`.
    #[must_use]
    pub fn to_cartesian(self, bounds: Rect) -> Point {
        let center_x = bounds.width / 2.0;
        let center_y = bounds.height / 2.0;
        Point { x: self.x - center_x, y: center_y - self.y }
    }

    /// Convert a cartesian-frame point into the screen frame of `bounds`.
    #[must_use]
    pub fn to_screen(self, bounds: Rect) -> Point {
        let center_x = bounds.width / 2.0;
        let center_y = bounds.height / 2.0;
        Point { x: self.x + center_x, y: center_y - self.y }
    }

    /// Multiply both coordinates by `factor`.
    #[must_use]
    pub fn scale(self, factor: f64) -> Point {
        Point { x: self.x * factor, y: self.y * factor }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

/// Width and height of a canvas or backing store.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Uniformly scaled copy.
    #[must_use]
    pub fn scale(self, factor: f64) -> Size {
        Size { width: self.width * factor, height: self.height * factor }
    }

    /// Half the size as a vector from the top-left corner to the center.
    #[must_use]
    pub fn half(self) -> Point {
        Point { x: self.width / 2.0, y: self.height / 2.0 }
    }
}

/// Axis-aligned bounds of the workspace viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn top(&self) -> f64 {
        self.y
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn left(&self) -> f64 {
        self.x
    }

    #[must_use]
    pub fn size(&self) -> Size {
        Size { width: self.width, height: self.height }
    }

    /// Center point in the rect's own coordinate space.
    #[must_use]
    pub fn center(&self) -> Point {
        Point { x: self.x + self.width / 2.0, y: self.y + self.height / 2.0 }
    }
}
