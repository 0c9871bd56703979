//! Minimal 2D geometry in the normalized 0..1 layout space.

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::blend::{lerp_f64, Lerp};

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component selected by orientation: `x` when `horizontal`, else `y`.
    #[inline]
    pub fn along(&self, horizontal: bool) -> f64 {
        if horizontal {
            self.x
        } else {
            self.y
        }
    }

    #[inline]
    pub fn along_mut(&mut self, horizontal: bool) -> &mut f64 {
        if horizontal {
            &mut self.x
        } else {
            &mut self.y
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Lerp for Point {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Point::new(lerp_f64(self.x, other.x, t), lerp_f64(self.y, other.y, t))
    }
}

/// Axis-aligned rectangle given by its lower corner and extent.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Point,
    pub size: Point,
}

impl Rect {
    #[inline]
    pub const fn new(pos: Point, size: Point) -> Self {
        Self { pos, size }
    }

    /// Rectangle spanning two arbitrary corners.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let pos = Point::new(a.x.min(b.x), a.y.min(b.y));
        let size = Point::new((a.x - b.x).abs(), (a.y - b.y).abs());
        Self { pos, size }
    }

    pub fn top_right(&self) -> Point {
        self.pos + self.size
    }

    pub fn center(&self) -> Point {
        self.pos + self.size * 0.5
    }

    pub fn contains(&self, p: Point) -> bool {
        let max = self.top_right();
        p.x >= self.pos.x && p.x <= max.x && p.y >= self.pos.y && p.y <= max.y
    }
}

impl Lerp for Rect {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Rect::new(self.pos.lerp(&other.pos, t), self.size.lerp(&other.size, t))
    }
}
