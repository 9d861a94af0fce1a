//! Premultiplied ARGB pixel buffers.
//!
//! A [`Raster`] stores one `u32` per pixel in `0xAARRGGBB` order with the
//! color channels already multiplied by alpha. Every constructor upholds the
//! premultiplied invariant (each color channel is at most alpha), which in
//! particular means a pixel with zero alpha is exactly `0`.

use thiserror::Error;

/// Largest width or height a raster may have.
pub const MAX_DIMENSION: u32 = 1 << 15;

/// Error types for raster construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RasterError {
    /// Pixel buffer length doesn't match the dimensions.
    #[error("Invalid pixel data: expected {expected} pixels (width * height), got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// A pixel has a color channel larger than its alpha.
    #[error("Pixel {index} is not premultiplied: a color channel exceeds alpha")]
    NotPremultiplied { index: usize },

    /// Width or height exceeds [`MAX_DIMENSION`].
    #[error("Raster too large: {width}x{height} exceeds the {max} pixel limit per side", max = MAX_DIMENSION)]
    TooLarge { width: u32, height: u32 },

    /// The pixel buffer could not be allocated.
    #[error("Out of memory allocating a {width}x{height} raster")]
    AllocationFailed { width: u32, height: u32 },
}

/// Split a packed pixel into `[a, r, g, b]`.
#[inline]
pub fn unpack(pixel: u32) -> [u8; 4] {
    pixel.to_be_bytes()
}

/// Pack `[a, r, g, b]` into a pixel.
#[inline]
pub fn pack(channels: [u8; 4]) -> u32 {
    u32::from_be_bytes(channels)
}

/// Check the premultiplied invariant for a single pixel.
#[inline]
pub fn is_premultiplied(pixel: u32) -> bool {
    let [a, r, g, b] = unpack(pixel);
    r <= a && g <= a && b <= a
}

/// Premultiply a straight-alpha RGBA color into a packed pixel.
#[inline]
pub fn premultiply(r: u8, g: u8, b: u8, a: u8) -> u32 {
    let scale = |c: u8| ((c as u32 * a as u32 + 127) / 255) as u8;
    pack([a, scale(r), scale(g), scale(b)])
}

/// Convert a packed premultiplied pixel back to straight-alpha RGBA.
#[inline]
pub fn unpremultiply(pixel: u32) -> [u8; 4] {
    let [a, r, g, b] = unpack(pixel);
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let scale = |c: u8| ((c as u32 * 255 + a as u32 / 2) / a as u32).min(255) as u8;
    [scale(r), scale(g), scale(b), a]
}

/// A rectangular grid of premultiplied ARGB pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Raster {
    /// Create a fully transparent raster.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::TooLarge`] for dimensions above [`MAX_DIMENSION`]
    /// and [`RasterError::AllocationFailed`] when the buffer cannot be reserved.
    pub fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        Self::filled(width, height, 0)
    }

    /// Create a raster where every pixel has the same premultiplied value.
    pub fn filled(width: u32, height: u32, pixel: u32) -> Result<Self, RasterError> {
        if !is_premultiplied(pixel) {
            return Err(RasterError::NotPremultiplied { index: 0 });
        }
        let mut pixels = allocate(width, height)?;
        pixels.resize(width as usize * height as usize, pixel);
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Wrap an existing buffer of premultiplied pixels.
    ///
    /// The buffer must hold exactly `width * height` pixels and every pixel
    /// must satisfy the premultiplied invariant.
    pub fn from_premultiplied(
        width: u32,
        height: u32,
        pixels: Vec<u32>,
    ) -> Result<Self, RasterError> {
        check_dimensions(width, height)?;
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(RasterError::BufferSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        if let Some(index) = pixels.iter().position(|&p| !is_premultiplied(p)) {
            return Err(RasterError::NotPremultiplied { index });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a raster from straight-alpha RGBA bytes (4 bytes per pixel).
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self, RasterError> {
        check_dimensions(width, height)?;
        let expected = width as usize * height as usize;
        if bytes.len() != expected * 4 {
            return Err(RasterError::BufferSizeMismatch {
                expected,
                actual: bytes.len() / 4,
            });
        }
        let mut pixels = allocate(width, height)?;
        pixels.extend(
            bytes
                .chunks_exact(4)
                .map(|c| premultiply(c[0], c[1], c[2], c[3])),
        );
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a raster from an `image::RgbaImage`.
    pub fn from_rgba_image(img: &image::RgbaImage) -> Result<Self, RasterError> {
        let (width, height) = img.dimensions();
        Self::from_rgba_bytes(width, height, img.as_raw())
    }

    /// Convert to straight-alpha RGBA bytes.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|&p| unpremultiply(p)).collect()
    }

    /// Convert to an `image::RgbaImage` for encoding or display.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.to_rgba_bytes())
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Check if this raster has no pixels.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Row-major pixel data.
    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Read the pixel at an in-bounds coordinate.
    ///
    /// Callers resolve out-of-range coordinates with an
    /// [`EdgeAction`](crate::edge::EdgeAction) first; an out-of-range read
    /// is a bug and panics.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u32 {
        debug_assert!(x < self.width && y < self.height, "read outside raster");
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Replace the whole buffer with one of identical length.
    pub(crate) fn replace_pixels(&mut self, pixels: Vec<u32>) {
        debug_assert_eq!(pixels.len(), self.pixels.len());
        self.pixels = pixels;
    }

    /// Check that `alpha == 0` implies `pixel == 0` everywhere.
    pub fn satisfies_alpha_invariant(&self) -> bool {
        self.pixels.iter().all(|&p| p >> 24 != 0 || p == 0)
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<(), RasterError> {
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(RasterError::TooLarge { width, height });
    }
    Ok(())
}

/// Reserve a pixel buffer, reporting allocation failure instead of aborting.
pub(crate) fn allocate(width: u32, height: u32) -> Result<Vec<u32>, RasterError> {
    check_dimensions(width, height)?;
    let len = width as usize * height as usize;
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(len)
        .map_err(|_| RasterError::AllocationFailed { width, height })?;
    Ok(pixels)
}
