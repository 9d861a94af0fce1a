//! Circle to Square: stretch a disc so it fills a square.
//!
//! Inside the square of half-size `radius` each output point `(u, v)` (in
//! units of the radius) samples the disc point given by the elliptical grid
//! mapping:
//!
//! ```text
//! x = u · sqrt(1 - v²/2)
//! y = v · sqrt(1 - u²/2)
//! ```
//!
//! The result is linearly blended with identity by `amount`. Pixels outside
//! the square pass through.

use super::{InverseMapping, Mapped};
use crate::geometry::{
    center_offset, from_center_offset, half_short_side, AreaShape, Center, Point2D,
};
use crate::params::{self, ParamError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleToSquareParams {
    pub center: Center,
    /// Relative half-size of the square.
    pub radius: f64,
    /// 0 = unchanged, 1 = full circle-to-square.
    pub amount: f64,
}

impl Default for CircleToSquareParams {
    fn default() -> Self {
        Self {
            center: Center::default(),
            radius: 0.8,
            amount: 1.0,
        }
    }
}

impl CircleToSquareParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        params::center(&self.center)?;
        params::at_least("radius", self.radius, 0.0)?;
        params::within("amount", self.amount, 0.0, 1.0)
    }

    pub fn prepare(&self, width: u32, height: u32) -> CircleToSquare {
        CircleToSquare {
            center: self.center.resolve(width, height),
            radius: params::extent("radius", self.radius * half_short_side(width, height)),
            amount: self.amount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleToSquare {
    center: Point2D,
    radius: f64,
    amount: f64,
}

impl InverseMapping for CircleToSquare {
    #[inline]
    fn map(&self, x: f64, y: f64) -> Mapped {
        if self.amount == 0.0 {
            return Mapped::PassThrough;
        }
        let (dx, dy) = center_offset(x, y, self.center);
        let u = dx / self.radius;
        let v = dy / self.radius;
        if u.abs() > 1.0 || v.abs() > 1.0 {
            return Mapped::PassThrough;
        }

        let disc_u = u * (1.0 - v * v / 2.0).sqrt();
        let disc_v = v * (1.0 - u * u / 2.0).sqrt();
        let u = u + (disc_u - u) * self.amount;
        let v = v + (disc_v - v) * self.amount;
        Mapped::Sample(from_center_offset(u * self.radius, v * self.radius, self.center))
    }

    fn affected_area(&self) -> Vec<AreaShape> {
        vec![AreaShape::Rect {
            x: self.center.x - self.radius,
            y: self.center.y - self.radius,
            width: 2.0 * self.radius,
            height: 2.0 * self.radius,
        }]
    }
}
