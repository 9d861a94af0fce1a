//! Glass Tiles: look at the image through a grid of curved glass blocks.
//!
//! The offset from the center is rotated into the grid frame. Inside each tile
//! the local position `l ∈ [-0.5, 0.5)` displaces the coordinate by
//! `curvature · size · tan(l · π/2)`. Since `|l · π/2| ≤ π/4` the tangent stays
//! within `[-1, 1]`, so displacements are bounded by `curvature · size`.

use super::{rotate, InverseMapping, Mapped};
use crate::geometry::{center_offset, from_center_offset, half_short_side, Center, Point2D};
use crate::params::{self, ParamError};
use crate::wave::fract;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlassTilesParams {
    pub center: Center,
    /// Relative tile width.
    pub size_x: f64,
    /// Relative tile height.
    pub size_y: f64,
    /// Grid rotation in radians.
    pub angle: f64,
    pub curvature_x: f64,
    pub curvature_y: f64,
    /// Grid shift in tiles.
    pub shift_x: f64,
    pub shift_y: f64,
}

impl Default for GlassTilesParams {
    fn default() -> Self {
        Self {
            center: Center::default(),
            size_x: 0.2,
            size_y: 0.2,
            angle: 0.0,
            curvature_x: 0.5,
            curvature_y: 0.5,
            shift_x: 0.0,
            shift_y: 0.0,
        }
    }
}

impl GlassTilesParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        params::center(&self.center)?;
        params::at_least("size_x", self.size_x, 0.0)?;
        params::at_least("size_y", self.size_y, 0.0)?;
        params::finite("angle", self.angle)?;
        params::finite("curvature_x", self.curvature_x)?;
        params::finite("curvature_y", self.curvature_y)?;
        params::finite("shift_x", self.shift_x)?;
        params::finite("shift_y", self.shift_y)
    }

    pub fn prepare(&self, width: u32, height: u32) -> GlassTiles {
        let unit = half_short_side(width, height);
        GlassTiles {
            center: self.center.resolve(width, height),
            size_x: params::extent("size_x", self.size_x * unit),
            size_y: params::extent("size_y", self.size_y * unit),
            angle: self.angle,
            curvature_x: self.curvature_x,
            curvature_y: self.curvature_y,
            shift_x: self.shift_x,
            shift_y: self.shift_y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlassTiles {
    center: Point2D,
    size_x: f64,
    size_y: f64,
    angle: f64,
    curvature_x: f64,
    curvature_y: f64,
    shift_x: f64,
    shift_y: f64,
}

impl GlassTiles {
    /// Displacement of one axis inside its tile.
    #[inline]
    fn bend(pos: f64, size: f64, shift: f64, curvature: f64) -> f64 {
        let local = fract(pos / size + shift) - 0.5;
        curvature * size * (local * FRAC_PI_2).tan()
    }
}

impl InverseMapping for GlassTiles {
    #[inline]
    fn map(&self, x: f64, y: f64) -> Mapped {
        if self.curvature_x == 0.0 && self.curvature_y == 0.0 {
            return Mapped::PassThrough;
        }
        let (dx, dy) = center_offset(x, y, self.center);
        let (gx, gy) = rotate(dx, dy, -self.angle);
        let gx = gx + Self::bend(gx, self.size_x, self.shift_x, self.curvature_x);
        let gy = gy + Self::bend(gy, self.size_y, self.shift_y, self.curvature_y);
        let (dx, dy) = rotate(gx, gy, self.angle);
        Mapped::Sample(from_center_offset(dx, dy, self.center))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_curvature_is_pass_through() {
        let g = GlassTilesParams {
            curvature_x: 0.0,
            curvature_y: 0.0,
            ..Default::default()
        }
        .prepare(50, 50);
        assert_eq!(g.map(7.0, 9.0), Mapped::PassThrough);
    }

    #[test]
    fn test_displacement_is_bounded() {
        let g = GlassTilesParams {
            angle: 0.4,
            curvature_x: 2.0,
            curvature_y: -1.5,
            ..Default::default()
        }
        .prepare(100, 100);
        // Tiles are 10 px, so the bound is 20 px along x and 15 px along y
        let limit = (20.0f64).hypot(15.0) + 1e-9;
        for y in 0..100 {
            for x in 0..100 {
                let (xf, yf) = (x as f64, y as f64);
                let p = g.map(xf, yf).source(xf, yf);
                assert!(Point2D::new(xf, yf).distance(p) <= limit);
            }
        }
    }

    #[test]
    fn test_tile_center_is_fixed() {
        let g = GlassTilesParams {
            center: Center::Absolute { x: 0.0, y: 0.0 },
            ..Default::default()
        }
        .prepare(100, 100);
        // Tiles are 10 px starting at the center; (5, 5) is a tile middle
        let p = g.map(4.5, 4.5).source(0.0, 0.0);
        assert!((p.x - 4.5).abs() < 1e-9);
        assert!((p.y - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_zero_size_does_not_nan() {
        let g = GlassTilesParams {
            size_x: 0.0,
            size_y: 0.0,
            ..Default::default()
        }
        .prepare(10, 10);
        assert!(g.map(3.0, 3.0).source(0.0, 0.0).is_finite());
    }
}
