//! WASM bindings for the distortion filters.
//!
//! Parameters arrive as plain JavaScript objects shaped like
//! `FilterParameters`; missing fields take their defaults.

use crate::types::JsRaster;
use pixwarp_core::{apply, AreaShape, CancelToken, FilterParameters};
use wasm_bindgen::prelude::*;

/// Apply one distortion to an image.
///
/// # Arguments
///
/// * `image` - Source image (straight-alpha RGBA)
/// * `params` - Filter parameters object
///
/// # Returns
///
/// New `JsRaster` of the same size, or an error string for invalid parameters.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const swirled = apply_distortion(image, {
///   mapping: { type: 'swirl', amount: 2.5, radius: 0.8 },
///   edge: 'reflect',
///   interpolation: 'bicubic',
/// });
/// ```
#[wasm_bindgen]
pub fn apply_distortion(image: &JsRaster, params: JsValue) -> Result<JsRaster, JsValue> {
    let params = parse_params(params)?;
    distort(image, &params).map_err(|e| JsValue::from_str(&e))
}

/// Outlines of the region a distortion changes, for overlay rendering.
///
/// Returns an array of `{ shape: 'ellipse' | 'rect' | 'line', ... }` objects.
/// An empty array means the whole image is affected.
#[wasm_bindgen]
pub fn affected_area(width: u32, height: u32, params: JsValue) -> Result<JsValue, JsValue> {
    let params = parse_params(params)?;
    let shapes = outlines(width, height, &params).map_err(|e| JsValue::from_str(&e))?;
    serde_wasm_bindgen::to_value(&shapes).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parse_params(params: JsValue) -> Result<FilterParameters, JsValue> {
    serde_wasm_bindgen::from_value(params)
        .map_err(|e| JsValue::from_str(&format!("Invalid filter parameters: {}", e)))
}

/// Run a pass without touching `JsValue`, so it can be tested natively.
pub(crate) fn distort(image: &JsRaster, params: &FilterParameters) -> Result<JsRaster, String> {
    let src = image.to_raster().map_err(|e| e.to_string())?;
    // A wasm call cannot be interrupted, so the token is never tripped
    let (out, _) = apply(&src, params, &CancelToken::new()).map_err(|e| e.to_string())?;
    Ok(JsRaster::from_raster(&out))
}

pub(crate) fn outlines(
    width: u32,
    height: u32,
    params: &FilterParameters,
) -> Result<Vec<AreaShape>, String> {
    use pixwarp_core::InverseMapping;

    let mapping = params.prepare(width, height).map_err(|e| e.to_string())?;
    Ok(mapping.affected_area())
}
