//! Points, centers, polar conversion and affected-area shapes.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, y grows downwards
//! - Pixel `(i, j)` covers `[i, i+1) × [j, j+1)`; its center is `(i + 0.5, j + 0.5)`
//! - Angles are in radians, measured from the positive x axis towards positive y
//!
//! Mappings measure distances from pixel centers, so a relative center of
//! `(0.5, 0.5)` sits exactly between the two middle pixels of an even-sized
//! image.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Smallest extent (radius, zoom, wavelength, tile size) a mapping will use.
///
/// Degenerate parameters are floored at this value rather than rejected, so a
/// zero radius never divides by zero.
pub const MIN_EXTENT: f64 = 1.0e-6;

/// Floor a positive extent at [`MIN_EXTENT`], keeping its sign.
#[inline]
pub fn guard_extent(v: f64) -> f64 {
    if v.abs() < MIN_EXTENT {
        if v < 0.0 {
            -MIN_EXTENT
        } else {
            MIN_EXTENT
        }
    } else {
        v
    }
}

/// A continuous coordinate in source-pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Point2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Linear interpolation: `t = 0` gives `self`, `t = 1` gives `other`.
    #[inline]
    pub fn lerp(self, other: Point2D, t: f64) -> Point2D {
        Point2D::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Where a centered effect is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Center {
    /// Proportion of the image size, `(0, 0)` top-left to `(1, 1)` bottom-right.
    Relative { x: f64, y: f64 },
    /// Absolute pixel coordinates.
    Absolute { x: f64, y: f64 },
}

impl Default for Center {
    fn default() -> Self {
        Center::Relative { x: 0.5, y: 0.5 }
    }
}

impl Center {
    /// Resolve to absolute pixel coordinates for a `width × height` raster.
    pub fn resolve(self, width: u32, height: u32) -> Point2D {
        match self {
            Center::Relative { x, y } => Point2D::new(x * width as f64, y * height as f64),
            Center::Absolute { x, y } => Point2D::new(x, y),
        }
    }

    /// Both coordinates, whichever variant.
    pub fn coords(self) -> (f64, f64) {
        match self {
            Center::Relative { x, y } | Center::Absolute { x, y } => (x, y),
        }
    }
}

/// Offset of a pixel's center from an absolute center.
#[inline]
pub fn center_offset(x: f64, y: f64, center: Point2D) -> (f64, f64) {
    (x + 0.5 - center.x, y + 0.5 - center.y)
}

/// Lattice coordinate of a point given as an offset from an absolute center.
#[inline]
pub fn from_center_offset(dx: f64, dy: f64, center: Point2D) -> Point2D {
    Point2D::new(center.x + dx - 0.5, center.y + dy - 0.5)
}

/// Convert an offset to polar `(r, θ)` with `θ ∈ (-π, π]`.
///
/// The angle is undefined at the pole; `(0.0, 0.0)` is returned there so
/// callers never see `NaN`.
#[inline]
pub fn to_polar(dx: f64, dy: f64) -> (f64, f64) {
    let r = dx.hypot(dy);
    if r == 0.0 {
        (0.0, 0.0)
    } else {
        (r, dy.atan2(dx))
    }
}

/// Convert polar `(r, θ)` to a Cartesian offset.
#[inline]
pub fn from_polar(r: f64, theta: f64) -> (f64, f64) {
    let (sin, cos) = theta.sin_cos();
    (r * cos, r * sin)
}

/// Normalise an angle into `[0, 2π)`.
#[inline]
pub fn normalize_angle(theta: f64) -> f64 {
    let t = theta.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if t >= TAU {
        0.0
    } else {
        t
    }
}

/// Half the diagonal of a `width × height` raster, floored at [`MIN_EXTENT`].
pub fn half_diagonal(width: u32, height: u32) -> f64 {
    guard_extent((width as f64).hypot(height as f64) / 2.0)
}

/// Half the shorter side of a `width × height` raster, floored at
/// [`MIN_EXTENT`]. Relative radii are fractions of this length.
pub fn half_short_side(width: u32, height: u32) -> f64 {
    guard_extent(width.min(height) as f64 / 2.0)
}

/// Integer pixel rectangle, inclusive of `min` and exclusive of `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl PixelRect {
    /// Rectangle covering a single pixel.
    pub fn pixel(x: u32, y: u32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + 1,
            max_y: y + 1,
        }
    }

    /// Smallest rectangle containing both.
    pub fn union(self, other: PixelRect) -> PixelRect {
        PixelRect {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn width(&self) -> u32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.min_x && x < self.max_x && y >= self.min_y && y < self.max_y
    }
}

/// Union of two optional rectangles.
pub fn union_bounds(a: Option<PixelRect>, b: Option<PixelRect>) -> Option<PixelRect> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.union(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// A geometric outline describing where a mapping has a visible effect.
///
/// Used only for overlay rendering; it is not part of the pixel result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum AreaShape {
    /// Axis-aligned ellipse.
    Ellipse {
        center: Point2D,
        radius_x: f64,
        radius_y: f64,
    },
    /// Axis-aligned rectangle.
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Infinite line through `point` in direction `angle`.
    Line { point: Point2D, angle: f64 },
}

impl AreaShape {
    /// Circle helper.
    pub fn circle(center: Point2D, radius: f64) -> Self {
        AreaShape::Ellipse {
            center,
            radius_x: radius,
            radius_y: radius,
        }
    }
}
