//! Flattens the background photo and the ink into one opaque raster.
//!
//! Layers, bottom to top:
//! 1. opaque white, so an export is never transparent
//! 2. the background, aspect-fit and centered, never cropped or stretched
//! 3. the stroke snapshot over the full canvas

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::background::BackgroundImage;
use crate::error::ExportResult;
use crate::geometry::{CanvasBounds, aspect_fit};
use crate::surface::StrokeSnapshot;

pub const BASE_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Final composited raster, handed straight to the photo library
#[derive(Clone, Debug, PartialEq)]
pub struct ExportedImage {
    image: RgbaImage,
}

impl ExportedImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_rgba(self) -> RgbaImage {
        self.image
    }

    pub fn is_opaque(&self) -> bool {
        self.image.pixels().all(|p| p.0[3] == u8::MAX)
    }
}

/// Composite `background` and `strokes` over white at `scale` pixels per point.
///
/// `strokes` is expected to already be `bounds.pixel_size(scale)`; a
/// mismatched snapshot is resized to cover the canvas.
pub fn export(
    bounds: CanvasBounds,
    background: Option<&BackgroundImage>,
    strokes: &StrokeSnapshot,
    scale: f32,
) -> ExportResult<ExportedImage> {
    let [width, height] = bounds.pixel_size(scale)?;
    let mut output = RgbaImage::from_pixel(width, height, BASE_COLOR);

    if let Some(background) = background {
        draw_background(&mut output, background, bounds, scale);
    }

    if strokes.dimensions() == (width, height) {
        imageops::overlay(&mut output, strokes, 0, 0);
    } else {
        log::warn!(
            "Stroke snapshot is {:?}, expected {}x{}; resizing",
            strokes.dimensions(),
            width,
            height
        );
        let resized = imageops::resize(strokes, width, height, FilterType::Triangle);
        imageops::overlay(&mut output, &resized, 0, 0);
    }

    // Blending over an opaque base can round alpha down to 254
    for pixel in output.pixels_mut() {
        pixel.0[3] = u8::MAX;
    }

    log::debug!("Exported {}x{} image at scale {}", width, height, scale);
    Ok(ExportedImage { image: output })
}

fn draw_background(output: &mut RgbaImage, background: &BackgroundImage, bounds: CanvasBounds, scale: f32) {
    let Some(rect) = aspect_fit(background.size(), bounds) else {
        log::warn!("Background {:?} has no area; exporting without it", background);
        return;
    };

    let x = (rect.min.x * scale).round() as i64;
    let y = (rect.min.y * scale).round() as i64;
    let w = ((rect.width() * scale).round() as u32).clamp(1, output.width());
    let h = ((rect.height() * scale).round() as u32).clamp(1, output.height());

    let pixels = background.pixels();
    if pixels.dimensions() == (w, h) {
        imageops::overlay(output, pixels, x, y);
    } else {
        let fitted = imageops::resize(pixels, w, h, FilterType::Triangle);
        imageops::overlay(output, &fitted, x, y);
    }
}
