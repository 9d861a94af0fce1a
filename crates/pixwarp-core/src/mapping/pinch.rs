//! Pinch: squeeze or bulge the image towards a center, with an optional twirl.
//!
//! # Algorithm
//!
//! For an offset at distance `d` with `0 < d ≤ radius`, let `s = d / radius`:
//!
//! ```text
//! factor = sin(π/2 · s)^(-amount)
//! twirl  = angle · (1 - s)²
//! d'     = rot(twirl) · (d · factor)
//! ```
//!
//! Positive amounts pinch, negative amounts bulge. Both effects vanish at the
//! rim, and the pole and everything outside the radius pass through.

use super::{rotate, InverseMapping, Mapped};
use crate::geometry::{
    center_offset, from_center_offset, half_short_side, AreaShape, Center, Point2D,
};
use crate::params::{self, ParamError};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinchParams {
    pub center: Center,
    /// Relative radius of the affected disc.
    pub radius: f64,
    /// Pinch strength in `[-1, 1]`; negative values bulge.
    pub amount: f64,
    /// Twirl at the center, in radians.
    pub angle: f64,
}

impl Default for PinchParams {
    fn default() -> Self {
        Self {
            center: Center::default(),
            radius: 1.0,
            amount: 0.5,
            angle: 0.0,
        }
    }
}

impl PinchParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        params::center(&self.center)?;
        params::at_least("radius", self.radius, 0.0)?;
        params::within("amount", self.amount, -1.0, 1.0)?;
        params::finite("angle", self.angle)
    }

    pub fn prepare(&self, width: u32, height: u32) -> Pinch {
        Pinch {
            center: self.center.resolve(width, height),
            radius: params::extent("radius", self.radius * half_short_side(width, height)),
            amount: self.amount,
            angle: self.angle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pinch {
    center: Point2D,
    radius: f64,
    amount: f64,
    angle: f64,
}

impl InverseMapping for Pinch {
    #[inline]
    fn map(&self, x: f64, y: f64) -> Mapped {
        if self.amount == 0.0 && self.angle == 0.0 {
            return Mapped::PassThrough;
        }
        let (dx, dy) = center_offset(x, y, self.center);
        let d = dx.hypot(dy);
        if d == 0.0 || d > self.radius {
            return Mapped::PassThrough;
        }

        let s = d / self.radius;
        let factor = (FRAC_PI_2 * s).sin().powf(-self.amount);
        let e = 1.0 - s;
        let (dx, dy) = rotate(dx * factor, dy * factor, self.angle * e * e);
        Mapped::Sample(from_center_offset(dx, dy, self.center))
    }

    fn affected_area(&self) -> Vec<AreaShape> {
        vec![AreaShape::circle(self.center, self.radius)]
    }
}
