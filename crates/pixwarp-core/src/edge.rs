//! Edge handling for source coordinates outside the raster.
//!
//! Inverse mappings routinely land outside `[0, width) × [0, height)`. An
//! [`EdgeAction`] decides what the sampler reads in that case. It is chosen once
//! per pass and resolves every lattice point independently, so two corners of
//! one bilinear footprint may resolve differently near an edge.

use serde::{Deserialize, Serialize};

/// Policy for resolving out-of-range source coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeAction {
    /// Repeat the nearest edge pixel.
    #[default]
    Clamp,
    /// Tile the image: wrap around to the opposite edge.
    Wrap,
    /// No sample: the result is fully transparent.
    Transparent,
    /// Mirror the image at each edge (triangle wave, period `2 * len`).
    Reflect,
}

impl EdgeAction {
    /// All edge actions, in display order.
    pub const ALL: [EdgeAction; 4] = [
        EdgeAction::Clamp,
        EdgeAction::Wrap,
        EdgeAction::Transparent,
        EdgeAction::Reflect,
    ];

    /// Resolve one axis of a lattice coordinate.
    ///
    /// Returns `None` for [`EdgeAction::Transparent`] when `i` is out of range.
    /// `len` must be non-zero.
    #[inline]
    pub fn resolve_axis(self, i: i64, len: u32) -> Option<u32> {
        debug_assert!(len > 0);
        let n = len as i64;
        if (0..n).contains(&i) {
            return Some(i as u32);
        }
        match self {
            EdgeAction::Clamp => Some(i.clamp(0, n - 1) as u32),
            EdgeAction::Wrap => Some(i.rem_euclid(n) as u32),
            EdgeAction::Transparent => None,
            EdgeAction::Reflect => Some(reflect_triangle(i, n) as u32),
        }
    }

    /// Resolve a lattice point against a `width × height` raster.
    ///
    /// A point is transparent as soon as either axis is out of range under
    /// [`EdgeAction::Transparent`].
    #[inline]
    pub fn resolve(self, x: i64, y: i64, width: u32, height: u32) -> Option<(u32, u32)> {
        let rx = self.resolve_axis(x, width)?;
        let ry = self.resolve_axis(y, height)?;
        Some((rx, ry))
    }
}

/// Triangle-wave reflection of `i` into `[0, n)`.
///
/// The edge pixel is repeated at each fold: `-1 -> 0`, `n -> n - 1`.
#[inline]
pub fn reflect_triangle(i: i64, n: i64) -> i64 {
    let period = 2 * n;
    let m = i.rem_euclid(period);
    if m < n {
        m
    } else {
        period - 1 - m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range_unchanged_for_all_actions() {
        for action in EdgeAction::ALL {
            for i in 0..5 {
                assert_eq!(action.resolve_axis(i, 5), Some(i as u32));
            }
        }
    }

    #[test]
    fn test_clamp() {
        assert_eq!(EdgeAction::Clamp.resolve_axis(-7, 4), Some(0));
        assert_eq!(EdgeAction::Clamp.resolve_axis(4, 4), Some(3));
        assert_eq!(EdgeAction::Clamp.resolve_axis(100, 4), Some(3));
    }

    #[test]
    fn test_wrap_negative_uses_floored_modulo() {
        assert_eq!(EdgeAction::Wrap.resolve_axis(-1, 4), Some(3));
        assert_eq!(EdgeAction::Wrap.resolve_axis(-4, 4), Some(0));
        assert_eq!(EdgeAction::Wrap.resolve_axis(-5, 4), Some(3));
        assert_eq!(EdgeAction::Wrap.resolve_axis(9, 4), Some(1));
    }

    #[test]
    fn test_transparent() {
        assert_eq!(EdgeAction::Transparent.resolve_axis(-1, 4), None);
        assert_eq!(EdgeAction::Transparent.resolve_axis(4, 4), None);
        assert_eq!(EdgeAction::Transparent.resolve(1, 9, 4, 4), None);
        assert_eq!(EdgeAction::Transparent.resolve(1, 2, 4, 4), Some((1, 2)));
    }

    #[test]
    fn test_reflect_boundaries() {
        let a = EdgeAction::Reflect;
        assert_eq!(a.resolve_axis(-1, 4), Some(0));
        assert_eq!(a.resolve_axis(-2, 4), Some(1));
        assert_eq!(a.resolve_axis(4, 4), Some(3));
        assert_eq!(a.resolve_axis(5, 4), Some(2));
        assert_eq!(a.resolve_axis(7, 4), Some(0));
        assert_eq!(a.resolve_axis(8, 4), Some(0));
    }

    #[test]
    fn test_reflect_single_pixel() {
        for i in -5..5 {
            assert_eq!(EdgeAction::Reflect.resolve_axis(i, 1), Some(0));
        }
    }

    #[test]
    fn test_resolve_axes_independent() {
        // x wraps, y already in range
        assert_eq!(EdgeAction::Wrap.resolve(-1, 2, 4, 3), Some((3, 2)));
        assert_eq!(EdgeAction::Clamp.resolve(-3, 10, 4, 3), Some((0, 2)));
    }

    #[test]
    fn test_default_is_clamp() {
        assert_eq!(EdgeAction::default(), EdgeAction::Clamp);
    }
}
