//! Angular and radial waves around a center.
//!
//! Both mappings work in polar coordinates of the zoomed offset and perturb
//! one coordinate by a wave of the other:
//!
//! ```text
//! angular:  θ' = θ + amplitude · wave(r / wavelength + phase)
//! radial:   r' = r + amplitude · wave(divisions · θ / 2π + phase)
//! ```
//!
//! The pole has no angle, so both leave it unperturbed.

use super::{rotate, InverseMapping, Mapped};
use crate::geometry::{
    center_offset, from_center_offset, from_polar, half_short_side, to_polar, Center, Point2D,
};
use crate::params::{self, ParamError};
use crate::wave::WaveShape;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

// =============================================================================
// Angular waves
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AngularWavesParams {
    pub center: Center,
    /// Relative distance between wave crests.
    pub wavelength: f64,
    /// Peak angle shift, in radians.
    pub amplitude: f64,
    /// Phase offset in periods.
    pub phase: f64,
    pub shape: WaveShape,
    pub zoom: f64,
}

impl Default for AngularWavesParams {
    fn default() -> Self {
        Self {
            center: Center::default(),
            wavelength: 0.2,
            amplitude: 0.2,
            phase: 0.0,
            shape: WaveShape::Sine,
            zoom: 1.0,
        }
    }
}

impl AngularWavesParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        params::center(&self.center)?;
        params::at_least("wavelength", self.wavelength, 0.0)?;
        params::finite("amplitude", self.amplitude)?;
        params::finite("phase", self.phase)?;
        params::positive("zoom", self.zoom)
    }

    pub fn prepare(&self, width: u32, height: u32) -> AngularWaves {
        AngularWaves {
            center: self.center.resolve(width, height),
            wavelength: params::extent(
                "wavelength",
                self.wavelength * half_short_side(width, height),
            ),
            amplitude: self.amplitude,
            phase: self.phase,
            shape: self.shape,
            zoom: params::extent("zoom", self.zoom),
            identity: self.amplitude == 0.0 && self.zoom == 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularWaves {
    center: Point2D,
    wavelength: f64,
    amplitude: f64,
    phase: f64,
    shape: WaveShape,
    zoom: f64,
    identity: bool,
}

impl InverseMapping for AngularWaves {
    #[inline]
    fn map(&self, x: f64, y: f64) -> Mapped {
        if self.identity {
            return Mapped::PassThrough;
        }
        let (dx, dy) = center_offset(x, y, self.center);
        let (dx, dy) = (dx / self.zoom, dy / self.zoom);
        let r = dx.hypot(dy);
        if r == 0.0 {
            return Mapped::Sample(from_center_offset(0.0, 0.0, self.center));
        }
        let shift = self.amplitude * self.shape.eval(r / self.wavelength + self.phase);
        let (dx, dy) = rotate(dx, dy, shift);
        Mapped::Sample(from_center_offset(dx, dy, self.center))
    }
}

// =============================================================================
// Radial waves
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadialWavesParams {
    pub center: Center,
    /// Wave periods per full turn; whole numbers keep the seam invisible.
    pub angular_division: f64,
    /// Relative peak radius shift.
    pub amplitude: f64,
    /// Phase offset in periods.
    pub phase: f64,
    pub shape: WaveShape,
    pub zoom: f64,
}

impl Default for RadialWavesParams {
    fn default() -> Self {
        Self {
            center: Center::default(),
            angular_division: 8.0,
            amplitude: 0.1,
            phase: 0.0,
            shape: WaveShape::Sine,
            zoom: 1.0,
        }
    }
}

impl RadialWavesParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        params::center(&self.center)?;
        params::finite("angular_division", self.angular_division)?;
        params::finite("amplitude", self.amplitude)?;
        params::finite("phase", self.phase)?;
        params::positive("zoom", self.zoom)
    }

    pub fn prepare(&self, width: u32, height: u32) -> RadialWaves {
        RadialWaves {
            center: self.center.resolve(width, height),
            angular_division: self.angular_division,
            amplitude: self.amplitude * half_short_side(width, height),
            phase: self.phase,
            shape: self.shape,
            zoom: params::extent("zoom", self.zoom),
            identity: self.amplitude == 0.0 && self.zoom == 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialWaves {
    center: Point2D,
    angular_division: f64,
    amplitude: f64,
    phase: f64,
    shape: WaveShape,
    zoom: f64,
    identity: bool,
}

impl InverseMapping for RadialWaves {
    #[inline]
    fn map(&self, x: f64, y: f64) -> Mapped {
        if self.identity {
            return Mapped::PassThrough;
        }
        let (dx, dy) = center_offset(x, y, self.center);
        let (r, theta) = to_polar(dx / self.zoom, dy / self.zoom);
        if r == 0.0 {
            return Mapped::Sample(from_center_offset(0.0, 0.0, self.center));
        }
        let r = r + self.amplitude
            * self
                .shape
                .eval(self.angular_division * theta / TAU + self.phase);
        let (dx, dy) = from_polar(r, theta);
        Mapped::Sample(from_center_offset(dx, dy, self.center))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angular_zero_amplitude_is_pass_through() {
        let w = AngularWavesParams {
            amplitude: 0.0,
            ..Default::default()
        }
        .prepare(16, 16);
        assert_eq!(w.map(3.0, 4.0), Mapped::PassThrough);
    }

    #[test]
    fn test_radial_zero_amplitude_is_pass_through() {
        let w = RadialWavesParams {
            amplitude: 0.0,
            ..Default::default()
        }
        .prepare(16, 16);
        assert_eq!(w.map(3.0, 4.0), Mapped::PassThrough);
    }

    #[test]
    fn test_angular_preserves_radius() {
        let w = AngularWavesParams {
            amplitude: 1.0,
            ..Default::default()
        }
        .prepare(64, 64);
        let c = Point2D::new(32.0, 32.0);
        for (x, y) in [(40.0, 32.0), (10.0, 50.0), (33.0, 20.0)] {
            let src = w.map(x, y).source(x, y);
            let before = Point2D::new(x + 0.5, y + 0.5).distance(c);
            let after = Point2D::new(src.x + 0.5, src.y + 0.5).distance(c);
            assert!((before - after).abs() < 1e-9);
        }
    }

    #[test]
    fn test_radial_preserves_angle() {
        let w = RadialWavesParams {
            amplitude: 0.05,
            ..Default::default()
        }
        .prepare(64, 64);
        let (x, y) = (45.0, 40.0);
        let src = w.map(x, y).source(x, y);
        let before = (y + 0.5 - 32.0).atan2(x + 0.5 - 32.0);
        let after = (src.y + 0.5 - 32.0).atan2(src.x + 0.5 - 32.0);
        assert!((before - after).abs() < 1e-9);
    }

    #[test]
    fn test_radial_shift_follows_wave() {
        let w = RadialWavesParams {
            center: Center::Absolute { x: 0.5, y: 0.5 },
            angular_division: 4.0,
            amplitude: 0.1,
            shape: WaveShape::Triangle,
            ..Default::default()
        }
        .prepare(100, 100);
        // θ = π/8 gives phase 0.25, the triangle peak; amplitude is 5 px
        let theta = std::f64::consts::PI / 8.0;
        let (dx, dy) = from_polar(20.0, theta);
        let src = w.map(dx, dy).source(0.0, 0.0);
        let r = (src.x).hypot(src.y);
        assert!((r - 25.0).abs() < 1e-9, "got {}", r);
    }

    #[test]
    fn test_poles_are_stable() {
        let center = Center::Absolute { x: 8.5, y: 8.5 };
        let a = AngularWavesParams {
            center,
            amplitude: 3.0,
            phase: 0.3,
            ..Default::default()
        }
        .prepare(17, 17);
        let r = RadialWavesParams {
            center,
            amplitude: 0.5,
            phase: 0.3,
            ..Default::default()
        }
        .prepare(17, 17);
        assert_eq!(a.map(8.0, 8.0), Mapped::Sample(Point2D::new(8.0, 8.0)));
        assert_eq!(r.map(8.0, 8.0), Mapped::Sample(Point2D::new(8.0, 8.0)));
    }

    #[test]
    fn test_validate() {
        assert!(AngularWavesParams::default().validate().is_ok());
        assert!(RadialWavesParams::default().validate().is_ok());
        let bad = RadialWavesParams {
            angular_division: f64::NAN,
            ..Default::default()
        };
        assert_eq!(
            bad.validate(),
            Err(ParamError::NonFinite { name: "angular_division" })
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn shape_strategy() -> impl Strategy<Value = WaveShape> {
        prop_oneof![
            Just(WaveShape::Sine),
            Just(WaveShape::Triangle),
            Just(WaveShape::Sawtooth),
            Just(WaveShape::Noise),
        ]
    }

    proptest! {
        /// Property: both wave mappings stay finite for any wave shape.
        #[test]
        fn prop_finite(
            shape in shape_strategy(),
            amplitude in -5.0f64..5.0,
            phase in -3.0f64..3.0,
            wavelength in 0.0f64..2.0,
            x in 0u32..48,
            y in 0u32..48,
        ) {
            let a = AngularWavesParams { shape, amplitude, phase, wavelength, ..Default::default() }
                .prepare(48, 48);
            let r = RadialWavesParams { shape, amplitude, phase, ..Default::default() }
                .prepare(48, 48);
            let (xf, yf) = (x as f64, y as f64);
            prop_assert!(a.map(xf, yf).source(xf, yf).is_finite());
            prop_assert!(r.map(xf, yf).source(xf, yf).is_finite());
        }
    }
}
