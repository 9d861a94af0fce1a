//! Filter parameter snapshot and validation.
//!
//! [`FilterParameters`] captures every knob of one pass before it starts. The
//! engine never reads anything mutable while pixels are being computed.

use crate::edge::EdgeAction;
use crate::geometry::{Center, MIN_EXTENT};
use crate::interpolate::Interpolation;
use crate::mapping::{MappingParams, PreparedMapping};
use log::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors rejected before a pass starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("parameter `{name}` is not a finite number")]
    NonFinite { name: &'static str },

    #[error("parameter `{name}` is out of range: {value}")]
    OutOfRange { name: &'static str, value: f64 },

    #[error("parameter `{name}` needs at least one division")]
    ZeroDivisions { name: &'static str },
}

/// Immutable snapshot of everything one pass needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterParameters {
    /// Which distortion to apply, with its parameters.
    pub mapping: MappingParams,
    /// How out-of-range source coordinates are resolved.
    pub edge: EdgeAction,
    /// How fractional source coordinates are sampled.
    pub interpolation: Interpolation,
    /// Measure the bounding box of moved pixels during the pass.
    pub track_affected_area: bool,
}

impl FilterParameters {
    /// Parameters for `mapping` with default edge handling and interpolation.
    pub fn new(mapping: MappingParams) -> Self {
        Self {
            mapping,
            ..Self::default()
        }
    }

    pub fn with_edge(mut self, edge: EdgeAction) -> Self {
        self.edge = edge;
        self
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn with_affected_area(mut self, track: bool) -> Self {
        self.track_affected_area = track;
        self
    }

    /// Check finiteness and ranges of every numeric knob.
    pub fn validate(&self) -> Result<(), ParamError> {
        self.mapping.validate()
    }

    /// Validate and resolve the mapping for a `width × height` raster.
    pub fn prepare(&self, width: u32, height: u32) -> Result<PreparedMapping, ParamError> {
        self.mapping.prepare(width, height)
    }
}

// =============================================================================
// Validation helpers shared by the mapping parameter structs
// =============================================================================

#[inline]
pub(crate) fn finite(name: &'static str, value: f64) -> Result<(), ParamError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ParamError::NonFinite { name })
    }
}

/// Finite and `>= min`.
pub(crate) fn at_least(name: &'static str, value: f64, min: f64) -> Result<(), ParamError> {
    finite(name, value)?;
    if value < min {
        return Err(ParamError::OutOfRange { name, value });
    }
    Ok(())
}

/// Finite and strictly positive.
pub(crate) fn positive(name: &'static str, value: f64) -> Result<(), ParamError> {
    finite(name, value)?;
    if value <= 0.0 {
        return Err(ParamError::OutOfRange { name, value });
    }
    Ok(())
}

/// Finite and within `[lo, hi]`.
pub(crate) fn within(name: &'static str, value: f64, lo: f64, hi: f64) -> Result<(), ParamError> {
    finite(name, value)?;
    if value < lo || value > hi {
        return Err(ParamError::OutOfRange { name, value });
    }
    Ok(())
}

pub(crate) fn center(center: &Center) -> Result<(), ParamError> {
    let (x, y) = center.coords();
    finite("center.x", x)?;
    finite("center.y", y)
}

pub(crate) fn divisions(name: &'static str, value: u32) -> Result<(), ParamError> {
    if value == 0 {
        return Err(ParamError::ZeroDivisions { name });
    }
    Ok(())
}

/// Floor a prepared extent at [`MIN_EXTENT`], logging when it had to.
pub(crate) fn extent(name: &'static str, value: f64) -> f64 {
    if value < MIN_EXTENT {
        trace!("{} = {} clamped to {}", name, value, MIN_EXTENT);
        MIN_EXTENT
    } else {
        value
    }
}
