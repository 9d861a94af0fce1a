//! Periodic wave shapes used by the wave mappings.
//!
//! Every shape is evaluated on a phase with period 1 and returns a value in
//! `[-1, 1]`. Sine, triangle and sawtooth all start at 0 and rise, so switching
//! the shape keeps the pattern roughly aligned.
//!
//! The noise shape is 1D gradient noise whose lattice wraps every
//! [`NOISE_CELLS`] cells, which makes it periodic with period 1 as well. That
//! keeps a radial wave seamless where the angle wraps around.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Lattice cells per unit of phase for [`WaveShape::Noise`].
pub const NOISE_CELLS: i64 = 8;

/// Waveform of a wave mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaveShape {
    #[default]
    Sine,
    Triangle,
    Sawtooth,
    /// Smooth deterministic gradient noise.
    Noise,
}

impl WaveShape {
    /// Evaluate the wave at `phase`; one period spans `[0, 1)`.
    #[inline]
    pub fn eval(self, phase: f64) -> f64 {
        if !phase.is_finite() {
            return 0.0;
        }
        match self {
            WaveShape::Sine => (phase * TAU).sin(),
            WaveShape::Triangle => 1.0 - 4.0 * (fract(phase + 0.25) - 0.5).abs(),
            WaveShape::Sawtooth => 2.0 * fract(phase + 0.5) - 1.0,
            WaveShape::Noise => noise(phase * NOISE_CELLS as f64),
        }
    }
}

/// Fractional part in `[0, 1)` for negative inputs too.
#[inline]
pub fn fract(v: f64) -> f64 {
    let f = v - v.floor();
    // v - floor(v) can round up to 1.0 for tiny negative v
    if f >= 1.0 {
        0.0
    } else {
        f
    }
}

// =============================================================================
// Gradient noise
// =============================================================================

/// Ken Perlin's reference permutation.
const PERM: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209, 76,
    132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173,
    186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, 207, 206,
    59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44, 154, 163,
    70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232,
    178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162,
    241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, 184, 84, 204,
    176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29, 24, 72, 243, 141,
    128, 195, 78, 66, 215, 61, 156, 180,
];

/// Gradient at lattice point `i`, in `[-1, 1]`.
#[inline]
fn gradient(i: i64) -> f64 {
    let cell = i.rem_euclid(NOISE_CELLS) as usize;
    PERM[cell] as f64 / 127.5 - 1.0
}

#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Periodic 1D gradient noise, zero at every lattice point.
fn noise(x: f64) -> f64 {
    let x0 = x.floor();
    let xi = x0 as i64;
    let xf = x - x0;

    let a = gradient(xi) * xf;
    let b = gradient(xi + 1) * (xf - 1.0);
    (2.0 * lerp(a, b, fade(xf))).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPES: [WaveShape; 4] = [
        WaveShape::Sine,
        WaveShape::Triangle,
        WaveShape::Sawtooth,
        WaveShape::Noise,
    ];

    #[test]
    fn test_all_shapes_start_at_zero() {
        for shape in SHAPES {
            assert!(shape.eval(0.0).abs() < 1e-12, "{:?}", shape);
        }
    }

    #[test]
    fn test_triangle_key_points() {
        let t = WaveShape::Triangle;
        assert!((t.eval(0.25) - 1.0).abs() < 1e-12);
        assert!(t.eval(0.5).abs() < 1e-12);
        assert!((t.eval(0.75) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sawtooth_rises() {
        let s = WaveShape::Sawtooth;
        assert!((s.eval(0.25) - 0.5).abs() < 1e-12);
        assert!((s.eval(-0.25) + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_phase_is_flat() {
        for shape in SHAPES {
            assert_eq!(shape.eval(f64::NAN), 0.0);
            assert_eq!(shape.eval(f64::INFINITY), 0.0);
        }
    }

    #[test]
    fn test_noise_is_not_constant() {
        let values: Vec<f64> = (0..32).map(|i| WaveShape::Noise.eval(i as f64 / 32.0 + 0.01)).collect();
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert!(max - min > 0.1);
    }

    #[test]
    fn test_fract_negative() {
        assert!((fract(-0.25) - 0.75).abs() < 1e-12);
        assert_eq!(fract(3.0), 0.0);
        assert!((0.0..1.0).contains(&fract(-1e-20)));
    }
}
