//! Sub-pixel sampling of a [`Raster`] at continuous coordinates.
//!
//! Three kernels are provided:
//! - **NearestNeighbor**: rounds half up (`floor(x + 0.5)`) and reads one pixel
//! - **Bilinear**: weights the 2×2 surrounding lattice points
//! - **Bicubic**: Catmull-Rom over the 4×4 surrounding lattice points
//!
//! Every lattice point is resolved on its own through the [`EdgeAction`]; a
//! point that resolves to "transparent" contributes `(0, 0, 0, 0)` to the
//! blend, so colors fade towards transparency near the border instead of
//! being renormalised. Channels are blended in premultiplied space and never
//! unpremultiplied.

use crate::edge::EdgeAction;
use crate::raster::{pack, unpack, Raster};
use serde::{Deserialize, Serialize};

/// Coordinates beyond this magnitude are treated as far off the raster.
///
/// Keeps `floor` + lattice offsets inside `i64` for wildly divergent
/// mappings; every edge action gives the same answer for such points as for
/// any other far-away point on the same side.
const COORD_LIMIT: f64 = 1.0e9;

/// Interpolation kernel used when sampling the source raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Nearest pixel, ties rounded up.
    NearestNeighbor,
    /// 2×2 bilinear blend.
    #[default]
    Bilinear,
    /// 4×4 Catmull-Rom blend.
    Bicubic,
}

impl Interpolation {
    /// Sample `raster` at `(x, y)`.
    ///
    /// Returns a premultiplied pixel. An empty raster or a non-finite
    /// coordinate yields a transparent pixel.
    #[inline]
    pub fn sample(self, raster: &Raster, x: f64, y: f64, edge: EdgeAction) -> u32 {
        if raster.is_empty() || !x.is_finite() || !y.is_finite() {
            return 0;
        }
        match self {
            Interpolation::NearestNeighbor => sample_nearest(raster, x, y, edge),
            Interpolation::Bilinear => sample_bilinear(raster, x, y, edge),
            Interpolation::Bicubic => sample_bicubic(raster, x, y, edge),
        }
    }
}

/// Read one lattice point through the edge action.
#[inline]
fn fetch(raster: &Raster, x: i64, y: i64, edge: EdgeAction) -> u32 {
    match edge.resolve(x, y, raster.width(), raster.height()) {
        Some((rx, ry)) => raster.get(rx, ry),
        None => 0,
    }
}

#[inline]
fn fetch_f64(raster: &Raster, x: i64, y: i64, edge: EdgeAction) -> [f64; 4] {
    let [a, r, g, b] = unpack(fetch(raster, x, y, edge));
    [a as f64, r as f64, g as f64, b as f64]
}

/// Split a coordinate into its lattice cell and the fractional offset.
#[inline]
fn split(v: f64) -> (i64, f64) {
    let v = v.clamp(-COORD_LIMIT, COORD_LIMIT);
    let floor = v.floor();
    (floor as i64, v - floor)
}

/// Round to the nearest integer, ties towards positive infinity.
///
/// `floor(v + 0.5)` is off by one for the largest double below `0.5`, whose
/// sum with `0.5` rounds to `1.0`.
#[inline]
fn round_half_up(v: f64) -> f64 {
    let floor = v.floor();
    if v - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Sample the nearest pixel.
///
/// Ties round up so that `x.5` reads the pixel to the right/below.
pub fn sample_nearest(raster: &Raster, x: f64, y: f64, edge: EdgeAction) -> u32 {
    let (ix, _) = split(round_half_up(x));
    let (iy, _) = split(round_half_up(y));
    fetch(raster, ix, iy, edge)
}

/// Sample using bilinear interpolation.
///
/// Bilinear interpolation considers the 4 nearest lattice points and weights
/// their contribution based on distance.
pub fn sample_bilinear(raster: &Raster, x: f64, y: f64, edge: EdgeAction) -> u32 {
    let (x0, fx) = split(x);
    let (y0, fy) = split(y);

    let p00 = fetch_f64(raster, x0, y0, edge);
    let p10 = fetch_f64(raster, x0 + 1, y0, edge);
    let p01 = fetch_f64(raster, x0, y0 + 1, edge);
    let p11 = fetch_f64(raster, x0 + 1, y0 + 1, edge);

    let w00 = (1.0 - fx) * (1.0 - fy);
    let w10 = fx * (1.0 - fy);
    let w01 = (1.0 - fx) * fy;
    let w11 = fx * fy;

    let mut result = [0u8; 4];
    for i in 0..4 {
        let v = p00[i] * w00 + p10[i] * w10 + p01[i] * w01 + p11[i] * w11;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }
    pack(result)
}

/// Catmull-Rom basis weights for lattice offsets -1, 0, 1, 2.
#[inline]
fn catmull_rom_weights(t: f64) -> [f64; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        -0.5 * t3 + t2 - 0.5 * t,
        1.5 * t3 - 2.5 * t2 + 1.0,
        -1.5 * t3 + 2.0 * t2 + 0.5 * t,
        0.5 * t3 - 0.5 * t2,
    ]
}

/// Sample using a 4×4 Catmull-Rom kernel.
///
/// The kernel overshoots near hard edges, so alpha is clamped to `[0, 255]`
/// and each color channel to `[0, alpha]` before rounding.
pub fn sample_bicubic(raster: &Raster, x: f64, y: f64, edge: EdgeAction) -> u32 {
    let (x0, fx) = split(x);
    let (y0, fy) = split(y);
    let wx = catmull_rom_weights(fx);
    let wy = catmull_rom_weights(fy);

    let mut sum = [0.0f64; 4];
    for (j, wyj) in wy.iter().enumerate() {
        if *wyj == 0.0 {
            continue;
        }
        let py = y0 + j as i64 - 1;
        for (i, wxi) in wx.iter().enumerate() {
            if *wxi == 0.0 {
                continue;
            }
            let p = fetch_f64(raster, x0 + i as i64 - 1, py, edge);
            let w = wxi * wyj;
            for c in 0..4 {
                sum[c] += p[c] * w;
            }
        }
    }

    let alpha = sum[0].clamp(0.0, 255.0);
    let mut result = [alpha.round() as u8, 0, 0, 0];
    for c in 1..4 {
        result[c] = sum[c].clamp(0.0, alpha).round() as u8;
    }
    pack(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3×2 raster with distinct opaque pixels.
    fn test_raster() -> Raster {
        Raster::from_premultiplied(
            3,
            2,
            vec![
                0xFF000000, 0xFF640000, 0xFFC80000, //
                0xFF006400, 0xFF646400, 0xFFC86400,
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_integer_coordinates_exact_for_all_kernels() {
        let r = test_raster();
        for kind in [
            Interpolation::NearestNeighbor,
            Interpolation::Bilinear,
            Interpolation::Bicubic,
        ] {
            for y in 0..2 {
                for x in 0..3 {
                    let got = kind.sample(&r, x as f64, y as f64, EdgeAction::Transparent);
                    assert_eq!(got, r.get(x, y), "{:?} at ({}, {})", kind, x, y);
                }
            }
        }
    }

    #[test]
    fn test_nearest_ties_round_up() {
        let r = test_raster();
        assert_eq!(sample_nearest(&r, 0.5, 0.0, EdgeAction::Clamp), r.get(1, 0));
        assert_eq!(sample_nearest(&r, 0.49, 0.0, EdgeAction::Clamp), r.get(0, 0));
        assert_eq!(sample_nearest(&r, 0.0, 0.5, EdgeAction::Clamp), r.get(0, 1));
    }

    #[test]
    fn test_nearest_just_below_tie_rounds_down() {
        let r = test_raster();
        let below = 0.49999999999999994;
        assert!(below < 0.5);
        assert_eq!(sample_nearest(&r, below, 0.0, EdgeAction::Clamp), r.get(0, 0));
        assert_eq!(sample_nearest(&r, 0.0, below, EdgeAction::Clamp), r.get(0, 0));
        assert_eq!(round_half_up(1.5), 2.0);
        assert_eq!(round_half_up(-1.5), -1.0);
        assert_eq!(round_half_up(-1.51), -2.0);
    }

    #[test]
    fn test_nearest_negative_tie() {
        // -0.5 rounds up to 0, still inside
        let r = test_raster();
        assert_eq!(
            sample_nearest(&r, -0.5, 0.0, EdgeAction::Transparent),
            r.get(0, 0)
        );
        assert_eq!(sample_nearest(&r, -0.51, 0.0, EdgeAction::Transparent), 0);
    }

    #[test]
    fn test_bilinear_midpoint() {
        let r = test_raster();
        // Halfway between red 0x00 and 0x64
        let p = sample_bilinear(&r, 0.5, 0.0, EdgeAction::Clamp);
        assert_eq!(unpack(p), [255, 50, 0, 0]);
    }

    #[test]
    fn test_bilinear_center_of_four() {
        let r = test_raster();
        let p = sample_bilinear(&r, 0.5, 0.5, EdgeAction::Clamp);
        assert_eq!(unpack(p), [255, 50, 50, 0]);
    }

    #[test]
    fn test_bilinear_transparent_corner_attenuates() {
        let r = Raster::filled(2, 2, 0xFFFFFFFF).unwrap();
        // Right half of the footprint falls off the raster
        let p = sample_bilinear(&r, 1.5, 0.0, EdgeAction::Transparent);
        let [a, red, g, b] = unpack(p);
        assert_eq!(a, 128);
        assert_eq!((red, g, b), (128, 128, 128));
    }

    #[test]
    fn test_bilinear_wrap_corner() {
        let r = test_raster();
        // Between the last column and the first column (wrapped)
        let p = sample_bilinear(&r, 2.5, 0.0, EdgeAction::Wrap);
        assert_eq!(unpack(p), [255, 100, 0, 0]);
    }

    #[test]
    fn test_non_finite_is_transparent() {
        let r = test_raster();
        for kind in [Interpolation::NearestNeighbor, Interpolation::Bilinear] {
            assert_eq!(kind.sample(&r, f64::NAN, 0.0, EdgeAction::Clamp), 0);
            assert_eq!(kind.sample(&r, 0.0, f64::INFINITY, EdgeAction::Clamp), 0);
        }
    }

    #[test]
    fn test_far_coordinates_do_not_overflow() {
        let r = test_raster();
        let p = Interpolation::Bicubic.sample(&r, 1e300, -1e300, EdgeAction::Wrap);
        assert!(crate::raster::is_premultiplied(p));
        let p = Interpolation::Bilinear.sample(&r, -1e300, 1e300, EdgeAction::Clamp);
        assert_eq!(p, r.get(0, 1));
    }

    #[test]
    fn test_empty_raster_is_transparent() {
        let r = Raster::new(0, 0).unwrap();
        assert_eq!(
            Interpolation::Bilinear.sample(&r, 0.0, 0.0, EdgeAction::Clamp),
            0
        );
    }

    #[test]
    fn test_bicubic_overshoot_stays_premultiplied() {
        // Hard edge between transparent and opaque white
        let r = Raster::from_premultiplied(4, 1, vec![0, 0, 0xFFFFFFFF, 0xFFFFFFFF]).unwrap();
        for i in 0..=30 {
            let x = i as f64 / 10.0;
            let p = sample_bicubic(&r, x, 0.0, EdgeAction::Clamp);
            assert!(crate::raster::is_premultiplied(p), "x = {}", x);
        }
    }

    #[test]
    fn test_catmull_rom_weights_sum_to_one() {
        for i in 0..=10 {
            let w = catmull_rom_weights(i as f64 / 10.0);
            let sum: f64 = w.iter().sum();
            assert!((sum - 1.0).abs() < 1e-12);
        }
    }
}
