//! The resampling engine: one parallel pass of an inverse mapping.
//!
//! # Algorithm
//!
//! For every output pixel `(x, y)` the mapping names a source coordinate or
//! signals pass-through. Pass-through copies the source pixel; anything else is
//! sampled with the pass's interpolation and edge action.
//!
//! # Concurrency
//!
//! Output rows are grouped into blocks of [`ROWS_PER_BLOCK`] and handed to the
//! rayon pool. Every block owns a disjoint slice of a freshly allocated buffer,
//! while the source raster and the mapping are shared immutably. The
//! destination is only replaced once every block has finished, so a failed or
//! cancelled pass never exposes partial results.

use crate::geometry::{union_bounds, AreaShape, PixelRect};
use crate::mapping::{dispatch, InverseMapping, Mapped};
use crate::params::{FilterParameters, ParamError};
use crate::raster::{allocate, Raster, RasterError};
use crate::{edge::EdgeAction, interpolate::Interpolation};
use log::*;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Rows processed between two cancellation checks.
pub const ROWS_PER_BLOCK: usize = 16;

/// Errors that end a pass without touching the destination.
#[derive(Debug, Error, PartialEq)]
pub enum ResampleError {
    #[error("Dimension mismatch: source is {src_width}x{src_height}, destination is {dst_width}x{dst_height}")]
    DimensionMismatch {
        src_width: u32,
        src_height: u32,
        dst_width: u32,
        dst_height: u32,
    },

    #[error("Pass was cancelled")]
    Cancelled,

    #[error(transparent)]
    Param(#[from] ParamError),

    #[error(transparent)]
    Raster(#[from] RasterError),
}

/// Cooperative cancellation flag shared between a pass and its caller.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every pass holding this token to stop at its next row block.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Per-pass sampling settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResampleOptions {
    pub edge: EdgeAction,
    pub interpolation: Interpolation,
    pub track_affected_area: bool,
}

impl From<&FilterParameters> for ResampleOptions {
    fn from(params: &FilterParameters) -> Self {
        Self {
            edge: params.edge,
            interpolation: params.interpolation,
            track_affected_area: params.track_affected_area,
        }
    }
}

/// Summary of a finished pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PassReport {
    /// Output rows written.
    pub rows: u32,
    /// Bounding box of pixels that read anything other than themselves.
    /// Only measured when affected-area tracking is on.
    pub affected_bounds: Option<PixelRect>,
    /// Outlines of the mapping's region of effect, for overlays.
    /// Only filled in when affected-area tracking is on.
    pub affected_area: Vec<AreaShape>,
}

/// Run one pass of `mapping` from `src` into `dst`.
///
/// # Arguments
///
/// * `src` - Source raster, read only
/// * `dst` - Destination raster of the same size; replaced on success
/// * `mapping` - Inverse mapping prepared for this raster size
/// * `options` - Edge action, interpolation and tracking switch
/// * `cancel` - Checked before every row block
///
/// # Returns
///
/// A [`PassReport`], or an error with `dst` left untouched.
pub fn resample<M: InverseMapping + ?Sized>(
    src: &Raster,
    dst: &mut Raster,
    mapping: &M,
    options: ResampleOptions,
    cancel: &CancelToken,
) -> Result<PassReport, ResampleError> {
    let (width, height) = src.dimensions();
    if dst.dimensions() != (width, height) {
        return Err(ResampleError::DimensionMismatch {
            src_width: width,
            src_height: height,
            dst_width: dst.width(),
            dst_height: dst.height(),
        });
    }

    debug!(
        "resample {}x{} edge={:?} interpolation={:?} track={}",
        width, height, options.edge, options.interpolation, options.track_affected_area
    );

    if cancel.is_cancelled() {
        info!("resample {}x{} cancelled before start", width, height);
        return Err(ResampleError::Cancelled);
    }
    if src.is_empty() {
        return Ok(PassReport::default());
    }

    let mut out = allocate(width, height)?;
    out.resize(width as usize * height as usize, 0);

    let row_len = width as usize;
    let bounds = out
        .par_chunks_mut(row_len * ROWS_PER_BLOCK)
        .enumerate()
        .map(|(block, chunk)| {
            if cancel.is_cancelled() {
                return Err(ResampleError::Cancelled);
            }
            let first_row = block * ROWS_PER_BLOCK;
            let mut bounds = None;
            for (i, row) in chunk.chunks_mut(row_len).enumerate() {
                let y = (first_row + i) as u32;
                bounds = union_bounds(bounds, render_row(src, row, y, mapping, options));
            }
            Ok(bounds)
        })
        .try_reduce(|| None, |a, b| Ok(union_bounds(a, b)));

    let bounds = match bounds {
        Ok(bounds) => bounds,
        Err(err) => {
            if err == ResampleError::Cancelled {
                info!("resample {}x{} cancelled", width, height);
            }
            return Err(err);
        }
    };

    dst.replace_pixels(out);

    let affected_area = if options.track_affected_area {
        mapping.affected_area()
    } else {
        Vec::new()
    };
    debug!("resample {}x{} done, affected bounds {:?}", width, height, bounds);

    Ok(PassReport {
        rows: height,
        affected_bounds: bounds,
        affected_area,
    })
}

/// Fill one output row; returns the moved-pixel bounds when tracking.
#[inline]
fn render_row<M: InverseMapping + ?Sized>(
    src: &Raster,
    row: &mut [u32],
    y: u32,
    mapping: &M,
    options: ResampleOptions,
) -> Option<PixelRect> {
    let yf = y as f64;
    let mut moved: Option<(u32, u32)> = None;

    for (x, out) in row.iter_mut().enumerate() {
        let x = x as u32;
        let xf = x as f64;
        let mapped = mapping.map(xf, yf);
        *out = match mapped {
            Mapped::PassThrough => src.get(x, y),
            Mapped::Sample(p) => options
                .interpolation
                .sample(src, p.x, p.y, options.edge),
        };
        if options.track_affected_area && mapped.moves(xf, yf) {
            moved = Some(match moved {
                Some((min, _)) => (min, x),
                None => (x, x),
            });
        }
    }

    moved.map(|(min_x, max_x)| PixelRect {
        min_x,
        min_y: y,
        max_x: max_x + 1,
        max_y: y + 1,
    })
}

/// Validate `params`, prepare the mapping for `src` and run one pass.
///
/// Returns the new raster and the pass report. The mapping is dispatched once
/// so the per-pixel loop is specialised for the concrete mapping type.
pub fn apply(
    src: &Raster,
    params: &FilterParameters,
    cancel: &CancelToken,
) -> Result<(Raster, PassReport), ResampleError> {
    let (width, height) = src.dimensions();
    let mapping = params.prepare(width, height)?;
    trace!("apply {} to {}x{}", params.mapping.name(), width, height);

    let mut dst = Raster::new(width, height)?;
    let options = ResampleOptions::from(params);
    let report = dispatch!(&mapping, m => resample(src, &mut dst, m, options, cancel))?;
    Ok((dst, report))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::geometry::Center;
    use crate::mapping::{
        AngularWavesParams, CircleToSquareParams, GlassTilesParams, LittlePlanetParams,
        MagnifyParams, MappingParams, MirrorParams, PinchParams, PolarParams, PolarTilesParams,
        RadialWavesParams, SwirlParams,
    };
    use crate::raster::premultiply;
    use proptest::prelude::*;

    fn raster_strategy() -> impl Strategy<Value = Raster> {
        (1u32..12, 1u32..12).prop_flat_map(|(w, h)| {
            prop::collection::vec(any::<[u8; 4]>(), (w * h) as usize).prop_map(move |px| {
                let pixels = px
                    .into_iter()
                    .map(|[r, g, b, a]| premultiply(r, g, b, a))
                    .collect();
                Raster::from_premultiplied(w, h, pixels).unwrap()
            })
        })
    }

    fn mapping_strategy() -> impl Strategy<Value = MappingParams> {
        let center = (-0.5f64..1.5, -0.5f64..1.5).prop_map(|(x, y)| Center::Relative { x, y });
        (center, -6.0f64..6.0, 0.1f64..3.0, 0usize..11).prop_map(|(center, amount, zoom, kind)| {
            match kind {
                0 => MappingParams::Swirl(SwirlParams { center, amount, zoom, radius: 1.0 }),
                1 => MappingParams::Mirror(MirrorParams { center, angle: amount }),
                2 => MappingParams::Magnify(MagnifyParams {
                    center,
                    magnification: zoom,
                    ..Default::default()
                }),
                3 => MappingParams::LittlePlanet(LittlePlanetParams {
                    center,
                    rotation: amount,
                    inner_zoom: zoom,
                    ..Default::default()
                }),
                4 => MappingParams::AngularWaves(AngularWavesParams {
                    center,
                    amplitude: amount,
                    zoom,
                    ..Default::default()
                }),
                5 => MappingParams::RadialWaves(RadialWavesParams {
                    center,
                    amplitude: amount / 6.0,
                    zoom,
                    ..Default::default()
                }),
                6 => MappingParams::CircleToSquare(CircleToSquareParams {
                    center,
                    amount: amount.abs() / 6.0,
                    ..Default::default()
                }),
                7 => MappingParams::PolarTiles(PolarTilesParams {
                    center,
                    zoom,
                    curvature: amount,
                    ..Default::default()
                }),
                8 => MappingParams::GlassTiles(GlassTilesParams {
                    center,
                    curvature_x: amount,
                    angle: zoom,
                    ..Default::default()
                }),
                9 => MappingParams::Pinch(PinchParams {
                    center,
                    amount: amount / 6.0,
                    angle: zoom,
                    ..Default::default()
                }),
                _ => MappingParams::Polar(PolarParams {
                    center,
                    zoom,
                    angle: amount,
                    ..Default::default()
                }),
            }
        })
    }

    fn options_strategy() -> impl Strategy<Value = (EdgeAction, Interpolation)> {
        (
            prop_oneof![
                Just(EdgeAction::Clamp),
                Just(EdgeAction::Wrap),
                Just(EdgeAction::Transparent),
                Just(EdgeAction::Reflect),
            ],
            prop_oneof![
                Just(Interpolation::NearestNeighbor),
                Just(Interpolation::Bilinear),
                Just(Interpolation::Bicubic),
            ],
        )
    }

    proptest! {
        /// Property: every pass keeps every output pixel premultiplied.
        #[test]
        fn prop_alpha_invariant(
            src in raster_strategy(),
            mapping in mapping_strategy(),
            (edge, interpolation) in options_strategy(),
        ) {
            let p = FilterParameters::new(mapping)
                .with_edge(edge)
                .with_interpolation(interpolation);
            let (out, _) = apply(&src, &p, &CancelToken::new()).unwrap();
            prop_assert!(out.satisfies_alpha_invariant());
            prop_assert!(out
                .pixels()
                .iter()
                .all(|&px| crate::raster::is_premultiplied(px)));
        }

        /// Property: identical inputs give byte-identical outputs.
        #[test]
        fn prop_deterministic(
            src in raster_strategy(),
            mapping in mapping_strategy(),
            (edge, interpolation) in options_strategy(),
        ) {
            let p = FilterParameters::new(mapping)
                .with_edge(edge)
                .with_interpolation(interpolation)
                .with_affected_area(true);
            let a = apply(&src, &p, &CancelToken::new()).unwrap();
            let b = apply(&src, &p, &CancelToken::new()).unwrap();
            prop_assert_eq!(a, b);
        }

        /// Property: a zero-amount swirl reproduces the source exactly.
        #[test]
        fn prop_zero_swirl_identity(
            src in raster_strategy(),
            (edge, interpolation) in options_strategy(),
        ) {
            let p = FilterParameters::new(MappingParams::Swirl(SwirlParams::default()))
                .with_edge(edge)
                .with_interpolation(interpolation);
            let (out, _) = apply(&src, &p, &CancelToken::new()).unwrap();
            prop_assert_eq!(out, src);
        }
    }
}
