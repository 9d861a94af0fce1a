//! Mirror: fold the image along a line through a center.
//!
//! The fold line passes through the center with normal `(cos a, sin a)`, so an
//! angle of 0 gives a vertical fold that copies the left half onto the right.
//! Pixels on the negative side of the normal are kept; every other pixel
//! samples its reflection `p - 2 (p · n) n`.

use super::{InverseMapping, Mapped};
use crate::geometry::{center_offset, from_center_offset, AreaShape, Center, Point2D};
use crate::params::{self, ParamError};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorParams {
    pub center: Center,
    /// Direction of the fold normal, in radians.
    pub angle: f64,
}

impl MirrorParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        params::center(&self.center)?;
        params::finite("angle", self.angle)
    }

    pub fn prepare(&self, width: u32, height: u32) -> Mirror {
        let (sin, cos) = self.angle.sin_cos();
        Mirror {
            center: self.center.resolve(width, height),
            normal: (cos, sin),
            angle: self.angle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mirror {
    center: Point2D,
    normal: (f64, f64),
    angle: f64,
}

impl InverseMapping for Mirror {
    #[inline]
    fn map(&self, x: f64, y: f64) -> Mapped {
        let (dx, dy) = center_offset(x, y, self.center);
        let (nx, ny) = self.normal;
        let d = dx * nx + dy * ny;
        if d <= 0.0 {
            return Mapped::PassThrough;
        }
        Mapped::Sample(from_center_offset(
            dx - 2.0 * d * nx,
            dy - 2.0 * d * ny,
            self.center,
        ))
    }

    fn affected_area(&self) -> Vec<AreaShape> {
        vec![AreaShape::Line {
            point: self.center,
            angle: self.angle + FRAC_PI_2,
        }]
    }
}
