//! Polar coordinate remaps.
//!
//! - [`PolarMode::RectToPolar`]: the image is read as a polar plot. The angle
//!   is measured clockwise from straight up and selects the source column
//!   (right to left); the radius, relative to `max(cx, cy)`, selects the row.
//! - [`PolarMode::PolarToRect`]: the inverse unrolling; columns become angles
//!   and rows become radii.
//! - [`PolarMode::InvertInCircle`]: inversion in the ellipse with semi-axes
//!   `(cx, cy)`. The squared distance is floored at [`MIN_EXTENT`] so the pole
//!   maps to a finite point.

use super::{InverseMapping, Mapped};
use crate::geometry::{
    center_offset, from_center_offset, guard_extent, normalize_angle, Center, Point2D, MIN_EXTENT,
};
use crate::params::{self, ParamError};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolarMode {
    #[default]
    RectToPolar,
    PolarToRect,
    InvertInCircle,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolarParams {
    pub center: Center,
    pub mode: PolarMode,
    pub zoom: f64,
    /// Angle offset in radians.
    pub angle: f64,
}

impl Default for PolarParams {
    fn default() -> Self {
        Self {
            center: Center::default(),
            mode: PolarMode::RectToPolar,
            zoom: 1.0,
            angle: 0.0,
        }
    }
}

impl PolarParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        params::center(&self.center)?;
        params::positive("zoom", self.zoom)?;
        params::finite("angle", self.angle)
    }

    pub fn prepare(&self, width: u32, height: u32) -> Polar {
        let center = self.center.resolve(width, height);
        Polar {
            center,
            mode: self.mode,
            zoom: params::extent("zoom", self.zoom),
            angle: self.angle,
            radius: guard_extent(center.x.abs().max(center.y.abs())),
            width: width as f64,
            height: params::extent("height", height as f64),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polar {
    center: Point2D,
    mode: PolarMode,
    zoom: f64,
    angle: f64,
    radius: f64,
    width: f64,
    height: f64,
}

impl Polar {
    fn rect_to_polar(&self, x: f64, y: f64) -> Point2D {
        let (dx, dy) = center_offset(x, y, self.center);
        let r = dx.hypot(dy);
        let theta = if r == 0.0 {
            0.0
        } else {
            normalize_angle(dx.atan2(-dy))
        };
        let theta = theta + self.angle;
        let r = r / self.zoom;

        let last = self.width - 1.0;
        Point2D::new(last - last / TAU * theta, self.height * r / self.radius)
    }

    fn polar_to_rect(&self, x: f64, y: f64) -> Point2D {
        let theta = (x + 0.5) / self.width * TAU + self.angle;
        let r = self.radius * (y + 0.5) / self.height / self.zoom;
        let (sin, cos) = theta.sin_cos();
        from_center_offset(-r * sin, -r * cos, self.center)
    }

    fn invert_in_circle(&self, x: f64, y: f64) -> Point2D {
        let (dx, dy) = center_offset(x, y, self.center);
        let d2 = (dx * dx + dy * dy).max(MIN_EXTENT);
        let rel_x = self.center.x * self.center.x * dx / d2 * self.zoom;
        let rel_y = self.center.y * self.center.y * dy / d2 * self.zoom;
        let shift = (self.width - 1.0) / TAU * self.angle;
        from_center_offset(rel_x - shift, rel_y, self.center)
    }
}

impl InverseMapping for Polar {
    #[inline]
    fn map(&self, x: f64, y: f64) -> Mapped {
        Mapped::Sample(match self.mode {
            PolarMode::RectToPolar => self.rect_to_polar(x, y),
            PolarMode::PolarToRect => self.polar_to_rect(x, y),
            PolarMode::InvertInCircle => self.invert_in_circle(x, y),
        })
    }
}
