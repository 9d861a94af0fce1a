//! Soft-edged shapes with an "outside" membership function.
//!
//! A [`BlurredShape`] answers how far outside a region a pixel is: `0.0`
//! fully inside, `1.0` fully outside, and a smooth value in the transition
//! band between an inner and an outer outline. Magnify uses it to blend
//! between the magnified and the identity mapping.
//!
//! ## Algorithm
//!
//! For a point `p` at offset `d` from the center, the ray from the center
//! through `p` crosses the inner outline at `|d| / n_in` and the outer outline
//! at `|d| / n_out`, where `n` is the shape's normalised distance (1.0 on the
//! outline). The position between the two crossings is passed through
//! smootherstep.

use crate::geometry::{guard_extent, AreaShape, Point2D, MIN_EXTENT};
use serde::{Deserialize, Serialize};

/// Smootherstep interpolation function.
///
/// Returns values from 0.0 to 1.0 with zero velocity and acceleration at boundaries,
/// producing smooth, natural-looking transitions without visible banding.
///
/// Formula: `6t^5 - 15t^4 + 10t^3`
#[inline]
pub fn smootherstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Soft "outside" membership of a region.
pub trait BlurredShape: Sync {
    /// 0 = fully inside, 1 = fully outside, fractional = soft transition.
    fn outside(&self, x: f64, y: f64) -> f64;
}

/// Outline family of a [`SoftShape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    #[default]
    Ellipse,
    Rectangle,
}

impl ShapeKind {
    /// Normalised distance of offset `(dx, dy)`; 1.0 lies on the outline
    /// with radii `(rx, ry)`.
    #[inline]
    fn norm(self, dx: f64, dy: f64, rx: f64, ry: f64) -> f64 {
        let u = dx / rx;
        let v = dy / ry;
        match self {
            ShapeKind::Ellipse => u.hypot(v),
            ShapeKind::Rectangle => u.abs().max(v.abs()),
        }
    }
}

/// An ellipse or rectangle with a feathered border.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftShape {
    kind: ShapeKind,
    center: Point2D,
    inner_rx: f64,
    inner_ry: f64,
    outer_rx: f64,
    outer_ry: f64,
}

impl SoftShape {
    /// Create a shape from explicit inner and outer radii.
    ///
    /// Radii are floored at [`MIN_EXTENT`] and the outer outline is never
    /// allowed inside the inner one.
    pub fn new(
        kind: ShapeKind,
        center: Point2D,
        inner_rx: f64,
        inner_ry: f64,
        outer_rx: f64,
        outer_ry: f64,
    ) -> Self {
        let inner_rx = guard_extent(inner_rx.abs());
        let inner_ry = guard_extent(inner_ry.abs());
        Self {
            kind,
            center,
            inner_rx,
            inner_ry,
            outer_rx: outer_rx.abs().max(inner_rx),
            outer_ry: outer_ry.abs().max(inner_ry),
        }
    }

    /// Create a shape whose outer outline has radii `(rx, ry)` and whose
    /// inner outline is shrunk by `softness` (0.0 = hard edge, 1.0 = fades
    /// from the center).
    pub fn with_softness(
        kind: ShapeKind,
        center: Point2D,
        rx: f64,
        ry: f64,
        softness: f64,
    ) -> Self {
        let inner = 1.0 - softness.clamp(0.0, 1.0);
        Self::new(kind, center, rx * inner, ry * inner, rx, ry)
    }

    /// Inner and outer outlines for overlay rendering.
    pub fn outlines(&self) -> Vec<AreaShape> {
        let make = |rx: f64, ry: f64| match self.kind {
            ShapeKind::Ellipse => AreaShape::Ellipse {
                center: self.center,
                radius_x: rx,
                radius_y: ry,
            },
            ShapeKind::Rectangle => AreaShape::Rect {
                x: self.center.x - rx,
                y: self.center.y - ry,
                width: 2.0 * rx,
                height: 2.0 * ry,
            },
        };
        vec![
            make(self.inner_rx, self.inner_ry),
            make(self.outer_rx, self.outer_ry),
        ]
    }
}

impl BlurredShape for SoftShape {
    fn outside(&self, x: f64, y: f64) -> f64 {
        let dx = x - self.center.x;
        let dy = y - self.center.y;

        let n_in = self.kind.norm(dx, dy, self.inner_rx, self.inner_ry);
        if n_in <= 1.0 {
            return 0.0;
        }
        let n_out = self.kind.norm(dx, dy, self.outer_rx, self.outer_ry);
        if n_out >= 1.0 {
            return 1.0;
        }

        // Fraction of the way from the inner to the outer crossing
        let inv_in = 1.0 / n_in;
        let inv_out = 1.0 / n_out;
        let span = inv_out - inv_in;
        if span <= MIN_EXTENT {
            return 1.0;
        }
        smootherstep((1.0 - inv_in) / span)
    }
}
