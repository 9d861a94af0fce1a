//! Swirl: rotate pixels around a center, more strongly near the middle.
//!
//! # Algorithm
//!
//! The output offset from the center is divided by `zoom` and converted to
//! polar `(r, θ)`. Inside the radius the angle is advanced by
//! `amount · ((radius - r) / radius)²`, which falls smoothly to zero at the
//! rim. The angle shift is applied as a rotation of the offset, so the pole
//! needs no `atan2` and stays exactly where it is.

use super::{rotate, InverseMapping, Mapped};
use crate::geometry::{
    center_offset, from_center_offset, half_short_side, AreaShape, Center, Point2D,
};
use crate::params::{self, ParamError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwirlParams {
    pub center: Center,
    /// Relative radius of the swirled disc.
    pub radius: f64,
    /// Rotation at the center, in radians.
    pub amount: f64,
    pub zoom: f64,
}

impl Default for SwirlParams {
    fn default() -> Self {
        Self {
            center: Center::default(),
            radius: 1.0,
            amount: 0.0,
            zoom: 1.0,
        }
    }
}

impl SwirlParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        params::center(&self.center)?;
        params::at_least("radius", self.radius, 0.0)?;
        params::finite("amount", self.amount)?;
        params::positive("zoom", self.zoom)
    }

    pub fn prepare(&self, width: u32, height: u32) -> Swirl {
        Swirl {
            center: self.center.resolve(width, height),
            radius: params::extent("radius", self.radius * half_short_side(width, height)),
            amount: self.amount,
            zoom: params::extent("zoom", self.zoom),
            identity: self.amount == 0.0 && self.zoom == 1.0,
        }
    }
}

/// Prepared swirl in pixel units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swirl {
    center: Point2D,
    radius: f64,
    amount: f64,
    zoom: f64,
    identity: bool,
}

impl InverseMapping for Swirl {
    #[inline]
    fn map(&self, x: f64, y: f64) -> Mapped {
        if self.identity {
            return Mapped::PassThrough;
        }
        let (dx, dy) = center_offset(x, y, self.center);
        let (dx, dy) = (dx / self.zoom, dy / self.zoom);

        let r = dx.hypot(dy);
        let (dx, dy) = if r > 0.0 && r < self.radius {
            let t = (self.radius - r) / self.radius;
            rotate(dx, dy, self.amount * t * t)
        } else {
            (dx, dy)
        };
        Mapped::Sample(from_center_offset(dx, dy, self.center))
    }

    fn affected_area(&self) -> Vec<AreaShape> {
        // Any zoom moves every pixel
        if self.zoom != 1.0 {
            return Vec::new();
        }
        vec![AreaShape::circle(self.center, self.radius)]
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: swirl never produces non-finite coordinates.
        #[test]
        fn prop_finite(
            amount in -50.0f64..50.0,
            zoom in 0.01f64..10.0,
            cx in -2.0f64..3.0,
            x in 0u32..64,
            y in 0u32..64,
        ) {
            let s = SwirlParams {
                center: Center::Relative { x: cx, y: 0.5 },
                amount,
                zoom,
                ..Default::default()
            }
            .prepare(64, 64);
            prop_assert!(s.map(x as f64, y as f64).source(0.0, 0.0).is_finite());
        }
    }
}
