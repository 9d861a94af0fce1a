//! Pixwarp Core - Geometric distortion engine
//!
//! This crate resamples premultiplied ARGB rasters under inverse coordinate
//! mappings: swirl, mirror, magnify, little planet, angular and radial waves,
//! circle to square, polar tiles, glass tiles, pinch and polar remaps. Out of
//! range reads are resolved by an [`EdgeAction`] and fractional coordinates
//! are sampled with an [`Interpolation`] kernel.
//!
//! # Example Flow
//!
//! 1. Build a [`Raster`] from RGBA bytes
//! 2. Describe the effect with [`FilterParameters`]
//! 3. Call [`apply`] with a [`CancelToken`] the caller can trip
//!
//! The library logs through the `log` facade and installs no logger itself.

pub mod edge;
pub mod engine;
pub mod geometry;
pub mod interpolate;
pub mod mapping;
pub mod params;
pub mod raster;
pub mod shape;
pub mod wave;

pub use edge::EdgeAction;
pub use engine::{apply, resample, CancelToken, PassReport, ResampleError, ResampleOptions};
pub use geometry::{AreaShape, Center, PixelRect, Point2D};
pub use interpolate::Interpolation;
pub use mapping::{InverseMapping, Mapped, MappingParams, PreparedMapping};
pub use params::{FilterParameters, ParamError};
pub use raster::{Raster, RasterError};
pub use shape::{BlurredShape, ShapeKind, SoftShape};
pub use wave::WaveShape;
