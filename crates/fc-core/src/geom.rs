use core::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::error::{Error, GeometryIssue};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2f {
    pub x: f32,
    pub y: f32,
}

impl Point2f {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Nearest pixel, rounding halves away from zero.
    pub fn to_pixel(self) -> Pixel2i {
        Pixel2i {
            x: self.x.round() as i32,
            y: self.y.round() as i32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2f {
    pub x: f32,
    pub y: f32,
}

impl Vec2f {
    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y
    }

    pub fn norm(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn normalize(self) -> Self {
        let n = self.norm();
        if n == 0.0 {
            Self::default()
        } else {
            self * (1.0 / n)
        }
    }

    /// `(y, -x)`: the direction rotated a quarter turn.
    pub fn perp(self) -> Self {
        Self {
            x: self.y,
            y: -self.x,
        }
    }
}

impl Add<Vec2f> for Point2f {
    type Output = Point2f;

    fn add(self, rhs: Vec2f) -> Self::Output {
        Point2f {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub<Point2f> for Point2f {
    type Output = Vec2f;

    fn sub(self, rhs: Point2f) -> Self::Output {
        Vec2f {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Mul<f32> for Vec2f {
    type Output = Vec2f;

    fn mul(self, rhs: f32) -> Self::Output {
        Vec2f {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl Mul<Vec2f> for f32 {
    type Output = Vec2f;

    fn mul(self, rhs: Vec2f) -> Self::Output {
        rhs * self
    }
}

/// Integer pixel index. May lie outside any raster; bounds are checked on
/// access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Pixel2i {
    pub x: i32,
    pub y: i32,
}

impl Pixel2i {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between pixel centers.
    pub fn distance(self, other: Pixel2i) -> f64 {
        let dx = f64::from(other.x) - f64::from(self.x);
        let dy = f64::from(other.y) - f64::from(self.y);
        dx.hypot(dy)
    }

    /// True when the two pixels touch, including diagonally, or coincide.
    pub fn is_8_adjacent(self, other: Pixel2i) -> bool {
        (self.x - other.x).abs() <= 1 && (self.y - other.y).abs() <= 1
    }
}

impl Add for Pixel2i {
    type Output = Pixel2i;

    fn add(self, rhs: Pixel2i) -> Self::Output {
        Pixel2i {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Pixel2i {
    type Output = Pixel2i;

    fn sub(self, rhs: Pixel2i) -> Self::Output {
        Pixel2i {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

/// Straight cut between two points, sampled over a band `width` pixels wide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point2f,
    pub end: Point2f,
    pub width: u32,
}

impl Segment {
    pub fn new(start: Point2f, end: Point2f, width: u32) -> Result<Self, Error> {
        if !start.is_finite() || !end.is_finite() {
            return Err(GeometryIssue::NonFiniteCoordinate.into());
        }
        if width == 0 {
            return Err(GeometryIssue::ZeroWidth.into());
        }
        Ok(Self { start, end, width })
    }

    pub fn direction(&self) -> Vec2f {
        self.end - self.start
    }

    pub fn length(&self) -> f32 {
        self.direction().norm()
    }

    /// Same segment shifted by `offset`; width is preserved.
    pub fn translated(&self, offset: Vec2f) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
            width: self.width,
        }
    }
}
