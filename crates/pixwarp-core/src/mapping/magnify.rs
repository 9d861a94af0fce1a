//! Magnify: a loupe with a soft rim.
//!
//! # Algorithm
//!
//! Inside the lens every offset from the center is divided by the
//! magnification. The lens outline is a [`SoftShape`]; its `outside` value `o`
//! blends the magnified offset towards identity:
//!
//! ```text
//! d' = d / m · (1 - o) + d · o
//! ```
//!
//! Pixels fully outside (`o == 1`) pass through, and a magnification of 1 is
//! the identity everywhere.

use super::{InverseMapping, Mapped};
use crate::geometry::{center_offset, from_center_offset, half_short_side, AreaShape, Center, Point2D};
use crate::params::{self, ParamError};
use crate::shape::{BlurredShape, ShapeKind, SoftShape};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagnifyParams {
    pub center: Center,
    /// Zoom factor inside the lens; 2.0 shows the content twice as large.
    pub magnification: f64,
    pub shape: ShapeKind,
    /// Relative outer radius along x.
    pub radius_x: f64,
    /// Relative outer radius along y.
    pub radius_y: f64,
    /// Width of the soft rim as a fraction of the radius (0 = hard edge).
    pub softness: f64,
}

impl Default for MagnifyParams {
    fn default() -> Self {
        Self {
            center: Center::default(),
            magnification: 2.0,
            shape: ShapeKind::Ellipse,
            radius_x: 0.5,
            radius_y: 0.5,
            softness: 0.5,
        }
    }
}

impl MagnifyParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        params::center(&self.center)?;
        params::positive("magnification", self.magnification)?;
        params::at_least("radius_x", self.radius_x, 0.0)?;
        params::at_least("radius_y", self.radius_y, 0.0)?;
        params::within("softness", self.softness, 0.0, 1.0)
    }

    pub fn prepare(&self, width: u32, height: u32) -> Magnify {
        let center = self.center.resolve(width, height);
        let unit = half_short_side(width, height);
        Magnify {
            center,
            magnification: params::extent("magnification", self.magnification),
            lens: SoftShape::with_softness(
                self.shape,
                center,
                self.radius_x * unit,
                self.radius_y * unit,
                self.softness,
            ),
            identity: self.magnification == 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Magnify {
    center: Point2D,
    magnification: f64,
    lens: SoftShape,
    identity: bool,
}

impl InverseMapping for Magnify {
    #[inline]
    fn map(&self, x: f64, y: f64) -> Mapped {
        if self.identity {
            return Mapped::PassThrough;
        }
        let outside = self.lens.outside(x + 0.5, y + 0.5);
        if outside >= 1.0 {
            return Mapped::PassThrough;
        }
        let (dx, dy) = center_offset(x, y, self.center);
        let k = (1.0 - outside) / self.magnification + outside;
        Mapped::Sample(from_center_offset(dx * k, dy * k, self.center))
    }

    fn affected_area(&self) -> Vec<AreaShape> {
        self.lens.outlines()
    }
}
