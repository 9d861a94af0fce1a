//! Polar Tiles: tile the polar plane with copies of the image.
//!
//! # Algorithm
//!
//! The zoomed offset is converted to polar `(r, θ)`. The turn is split into
//! `angular_divisions` sectors and the half-diagonal into `radial_divisions`
//! rings; each cell samples a whole copy of the image:
//!
//! ```text
//! u = frac((θ + rotation) · n / 2π)
//! v = frac(r · m / max_r + curvature · sin(π u))
//! ```
//!
//! The curvature term bends the ring boundaries and vanishes at sector edges,
//! so neighbouring sectors still meet. `(u, v)` is scaled onto the lattice
//! `0..=width-1, 0..=height-1`.

use super::{InverseMapping, Mapped};
use crate::geometry::{center_offset, half_diagonal, normalize_angle, to_polar, Center, Point2D};
use crate::params::{self, ParamError};
use crate::wave::fract;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolarTilesParams {
    pub center: Center,
    pub zoom: f64,
    /// Rotation in radians.
    pub rotation: f64,
    pub angular_divisions: u32,
    pub radial_divisions: u32,
    pub curvature: f64,
}

impl Default for PolarTilesParams {
    fn default() -> Self {
        Self {
            center: Center::default(),
            zoom: 1.0,
            rotation: 0.0,
            angular_divisions: 8,
            radial_divisions: 4,
            curvature: 0.0,
        }
    }
}

impl PolarTilesParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        params::center(&self.center)?;
        params::positive("zoom", self.zoom)?;
        params::finite("rotation", self.rotation)?;
        params::divisions("angular_divisions", self.angular_divisions)?;
        params::divisions("radial_divisions", self.radial_divisions)?;
        params::finite("curvature", self.curvature)
    }

    pub fn prepare(&self, width: u32, height: u32) -> PolarTiles {
        PolarTiles {
            center: self.center.resolve(width, height),
            zoom: params::extent("zoom", self.zoom),
            rotation: self.rotation,
            angular: self.angular_divisions.max(1) as f64,
            radial: self.radial_divisions.max(1) as f64,
            curvature: self.curvature,
            max_radius: half_diagonal(width, height),
            max_x: width.saturating_sub(1) as f64,
            max_y: height.saturating_sub(1) as f64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarTiles {
    center: Point2D,
    zoom: f64,
    rotation: f64,
    angular: f64,
    radial: f64,
    curvature: f64,
    max_radius: f64,
    max_x: f64,
    max_y: f64,
}

impl InverseMapping for PolarTiles {
    #[inline]
    fn map(&self, x: f64, y: f64) -> Mapped {
        let (dx, dy) = center_offset(x, y, self.center);
        let (r, theta) = to_polar(dx / self.zoom, dy / self.zoom);

        let u = fract(normalize_angle(theta + self.rotation) / TAU * self.angular);
        let v = fract(r * self.radial / self.max_radius + self.curvature * (PI * u).sin());
        Mapped::Sample(Point2D::new(u * self.max_x, v * self.max_y))
    }
}
