//! Inverse coordinate mappings.
//!
//! Every distortion filter is an inverse mapping: for each output pixel it
//! names the continuous source coordinate to sample, or signals that the
//! source pixel is copied unchanged. Mappings are pure functions of the output
//! coordinate and their prepared parameters, so the engine can evaluate pixels
//! in any order and on any thread.
//!
//! # Parameter Lifecycle
//!
//! 1. A host fills in a [`MappingParams`] variant (serde-friendly, defaults for
//!    every field).
//! 2. [`MappingParams::validate`] rejects non-finite or out-of-range values.
//! 3. [`MappingParams::prepare`] resolves centers and relative radii against
//!    the raster size and floors degenerate extents, producing a
//!    [`PreparedMapping`].
//!
//! # Units
//!
//! - Angles are in radians
//! - Radii and tile sizes marked *relative* are fractions of half the shorter
//!   raster side (see [`half_short_side`](crate::geometry::half_short_side))

mod circle_square;
mod glass_tiles;
mod little_planet;
mod magnify;
mod mirror;
mod pinch;
mod polar;
mod polar_tiles;
mod swirl;
mod waves;

pub use circle_square::{CircleToSquare, CircleToSquareParams};
pub use glass_tiles::{GlassTiles, GlassTilesParams};
pub use little_planet::{LittlePlanet, LittlePlanetParams};
pub use magnify::{Magnify, MagnifyParams};
pub use mirror::{Mirror, MirrorParams};
pub use pinch::{Pinch, PinchParams};
pub use polar::{Polar, PolarMode, PolarParams};
pub use polar_tiles::{PolarTiles, PolarTilesParams};
pub use swirl::{Swirl, SwirlParams};
pub use waves::{AngularWaves, AngularWavesParams, RadialWaves, RadialWavesParams};

use crate::geometry::{AreaShape, Point2D};
use crate::params::ParamError;
use serde::{Deserialize, Serialize};

/// Result of mapping one output pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mapped {
    /// Sample the source at this continuous lattice coordinate.
    Sample(Point2D),
    /// Copy the source pixel at the output coordinate.
    PassThrough,
}

impl Mapped {
    /// Source coordinate for the output pixel `(x, y)`.
    #[inline]
    pub fn source(self, x: f64, y: f64) -> Point2D {
        match self {
            Mapped::Sample(p) => p,
            Mapped::PassThrough => Point2D::new(x, y),
        }
    }

    /// Whether the pixel at `(x, y)` reads anything other than itself.
    #[inline]
    pub fn moves(self, x: f64, y: f64) -> bool {
        match self {
            Mapped::Sample(p) => p.x != x || p.y != y,
            Mapped::PassThrough => false,
        }
    }
}

/// An output-to-source coordinate mapping.
///
/// Implementations must be deterministic and free of inter-pixel state.
pub trait InverseMapping: Sync {
    /// Map the output lattice coordinate `(x, y)` to a source coordinate.
    fn map(&self, x: f64, y: f64) -> Mapped;

    /// Outlines of the region this mapping visibly changes.
    ///
    /// An empty list means the whole raster is affected.
    fn affected_area(&self) -> Vec<AreaShape> {
        Vec::new()
    }
}

/// User-facing parameters of one distortion, tagged by `"type"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MappingParams {
    Swirl(SwirlParams),
    Mirror(MirrorParams),
    Magnify(MagnifyParams),
    LittlePlanet(LittlePlanetParams),
    AngularWaves(AngularWavesParams),
    RadialWaves(RadialWavesParams),
    CircleToSquare(CircleToSquareParams),
    PolarTiles(PolarTilesParams),
    GlassTiles(GlassTilesParams),
    Pinch(PinchParams),
    Polar(PolarParams),
}

impl Default for MappingParams {
    fn default() -> Self {
        MappingParams::Swirl(SwirlParams::default())
    }
}

impl MappingParams {
    /// Short name of the mapping, as used in the `"type"` tag.
    pub fn name(&self) -> &'static str {
        match self {
            MappingParams::Swirl(_) => "swirl",
            MappingParams::Mirror(_) => "mirror",
            MappingParams::Magnify(_) => "magnify",
            MappingParams::LittlePlanet(_) => "little_planet",
            MappingParams::AngularWaves(_) => "angular_waves",
            MappingParams::RadialWaves(_) => "radial_waves",
            MappingParams::CircleToSquare(_) => "circle_to_square",
            MappingParams::PolarTiles(_) => "polar_tiles",
            MappingParams::GlassTiles(_) => "glass_tiles",
            MappingParams::Pinch(_) => "pinch",
            MappingParams::Polar(_) => "polar",
        }
    }

    /// Reject parameters that no mapping can make sense of.
    pub fn validate(&self) -> Result<(), ParamError> {
        match self {
            MappingParams::Swirl(p) => p.validate(),
            MappingParams::Mirror(p) => p.validate(),
            MappingParams::Magnify(p) => p.validate(),
            MappingParams::LittlePlanet(p) => p.validate(),
            MappingParams::AngularWaves(p) => p.validate(),
            MappingParams::RadialWaves(p) => p.validate(),
            MappingParams::CircleToSquare(p) => p.validate(),
            MappingParams::PolarTiles(p) => p.validate(),
            MappingParams::GlassTiles(p) => p.validate(),
            MappingParams::Pinch(p) => p.validate(),
            MappingParams::Polar(p) => p.validate(),
        }
    }

    /// Resolve the parameters against a `width × height` raster.
    ///
    /// Validates first, so a prepared mapping never carries non-finite values.
    pub fn prepare(&self, width: u32, height: u32) -> Result<PreparedMapping, ParamError> {
        self.validate()?;
        Ok(match self {
            MappingParams::Swirl(p) => PreparedMapping::Swirl(p.prepare(width, height)),
            MappingParams::Mirror(p) => PreparedMapping::Mirror(p.prepare(width, height)),
            MappingParams::Magnify(p) => PreparedMapping::Magnify(p.prepare(width, height)),
            MappingParams::LittlePlanet(p) => {
                PreparedMapping::LittlePlanet(p.prepare(width, height))
            }
            MappingParams::AngularWaves(p) => {
                PreparedMapping::AngularWaves(p.prepare(width, height))
            }
            MappingParams::RadialWaves(p) => PreparedMapping::RadialWaves(p.prepare(width, height)),
            MappingParams::CircleToSquare(p) => {
                PreparedMapping::CircleToSquare(p.prepare(width, height))
            }
            MappingParams::PolarTiles(p) => PreparedMapping::PolarTiles(p.prepare(width, height)),
            MappingParams::GlassTiles(p) => PreparedMapping::GlassTiles(p.prepare(width, height)),
            MappingParams::Pinch(p) => PreparedMapping::Pinch(p.prepare(width, height)),
            MappingParams::Polar(p) => PreparedMapping::Polar(p.prepare(width, height)),
        })
    }
}

/// A mapping resolved to pixel space for one raster size.
#[derive(Debug, Clone, PartialEq)]
pub enum PreparedMapping {
    Swirl(Swirl),
    Mirror(Mirror),
    Magnify(Magnify),
    LittlePlanet(LittlePlanet),
    AngularWaves(AngularWaves),
    RadialWaves(RadialWaves),
    CircleToSquare(CircleToSquare),
    PolarTiles(PolarTiles),
    GlassTiles(GlassTiles),
    Pinch(Pinch),
    Polar(Polar),
}

/// Run `$body` with `$m` bound to the concrete mapping inside a
/// [`PreparedMapping`], so callers get a monomorphised code path.
macro_rules! dispatch {
    ($prepared:expr, $m:ident => $body:expr) => {
        match $prepared {
            $crate::mapping::PreparedMapping::Swirl($m) => $body,
            $crate::mapping::PreparedMapping::Mirror($m) => $body,
            $crate::mapping::PreparedMapping::Magnify($m) => $body,
            $crate::mapping::PreparedMapping::LittlePlanet($m) => $body,
            $crate::mapping::PreparedMapping::AngularWaves($m) => $body,
            $crate::mapping::PreparedMapping::RadialWaves($m) => $body,
            $crate::mapping::PreparedMapping::CircleToSquare($m) => $body,
            $crate::mapping::PreparedMapping::PolarTiles($m) => $body,
            $crate::mapping::PreparedMapping::GlassTiles($m) => $body,
            $crate::mapping::PreparedMapping::Pinch($m) => $body,
            $crate::mapping::PreparedMapping::Polar($m) => $body,
        }
    };
}
pub(crate) use dispatch;

impl InverseMapping for PreparedMapping {
    #[inline]
    fn map(&self, x: f64, y: f64) -> Mapped {
        dispatch!(self, m => m.map(x, y))
    }

    fn affected_area(&self) -> Vec<AreaShape> {
        dispatch!(self, m => m.affected_area())
    }
}

/// Rotate an offset by `angle` radians.
#[inline]
pub(crate) fn rotate(dx: f64, dy: f64, angle: f64) -> (f64, f64) {
    let (sin, cos) = angle.sin_cos();
    (dx * cos - dy * sin, dx * sin + dy * cos)
}
