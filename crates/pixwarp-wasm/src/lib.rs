//! Pixwarp WASM - WebAssembly bindings for the distortion engine
//!
//! This crate exposes the pixwarp-core filters to JavaScript/TypeScript
//! applications.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper for RGBA image data
//! - `distort` - Filter application and affected-area outlines
//! - `logger` - Bridge from the `log` facade to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { apply_distortion, JsRaster } from '@pixwarp/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const data = ctx.getImageData(0, 0, w, h);
//! const image = new JsRaster(w, h, new Uint8Array(data.data.buffer));
//! const out = apply_distortion(image, { mapping: { type: 'pinch', amount: 0.6 } });
//! ctx.putImageData(new ImageData(out.image_data(), w, h), 0, 0);
//! ```

use wasm_bindgen::prelude::*;

mod distort;
mod logger;
mod types;

// Re-export public types
pub use distort::{affected_area, apply_distortion};
pub use types::JsRaster;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::install(log::LevelFilter::Info);
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
