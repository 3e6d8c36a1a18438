use egui::{ColorImage, Vec2, vec2};
use image::RgbaImage;
use image::imageops;
use std::sync::Arc;

use crate::error::DecodeError;
use crate::id_generator::generate_id;

/// Decoded photo shown behind the ink.
///
/// Pixel data is shared, so cloning hands a worker thread a snapshot
/// without copying the bitmap.
#[derive(Clone)]
pub struct BackgroundImage {
    id: u64,
    pixels: Arc<RgbaImage>,
}

// Custom Debug implementation so logs don't dump pixel data
impl std::fmt::Debug for BackgroundImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundImage")
            .field("id", &self.id)
            .field("width", &self.pixels.width())
            .field("height", &self.pixels.height())
            .finish()
    }
}

impl BackgroundImage {
    pub fn from_rgba(pixels: RgbaImage) -> Result<Self, DecodeError> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(DecodeError::EmptyImage);
        }
        Ok(Self {
            id: generate_id(),
            pixels: Arc::new(pixels),
        })
    }

    /// Decode any format the `image` crate understands
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let decoded = image::load_from_memory(bytes)?;
        log::debug!("Decoded background: {}x{}", decoded.width(), decoded.height());
        Self::from_rgba(decoded.to_rgba8())
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Intrinsic size in pixels
    pub fn size(&self) -> Vec2 {
        vec2(self.pixels.width() as f32, self.pixels.height() as f32)
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Display copy whose longest side is at most `max_side` pixels.
    ///
    /// GPUs refuse textures over their size limit, so oversized photos are
    /// downscaled for the screen. Exports keep using [`Self::pixels`].
    pub fn to_color_image(&self, max_side: usize) -> ColorImage {
        let (width, height) = self.pixels.dimensions();
        let longest = width.max(height) as usize;
        let max_side = max_side.max(1);
        if longest <= max_side {
            return ColorImage::from_rgba_unmultiplied([width as usize, height as usize], self.pixels.as_raw());
        }

        let factor = max_side as f64 / longest as f64;
        let fit = |side: u32| ((f64::from(side) * factor).round() as u32).clamp(1, max_side as u32);
        let (new_width, new_height) = (fit(width), fit(height));
        log::debug!(
            "Downscaling background {}x{} to {}x{} for display",
            width,
            height,
            new_width,
            new_height
        );
        let display = imageops::thumbnail(&*self.pixels, new_width, new_height);
        ColorImage::from_rgba_unmultiplied([new_width as usize, new_height as usize], display.as_raw())
    }
}
