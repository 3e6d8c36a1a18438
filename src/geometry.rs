use egui::{Rect, Vec2, pos2, vec2};

use crate::error::{ExportError, ExportResult};

/// Longest side an export raster may have, in pixels
pub const MAX_EXPORT_SIDE: u32 = 16_384;
/// Pixel budget for one export raster (256 MiB of RGBA)
pub const MAX_EXPORT_PIXELS: u64 = 64 * 1024 * 1024;

/// Size of the export target in points. The origin is always zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasBounds {
    width: f32,
    height: f32,
}

impl CanvasBounds {
    /// Validates that both sides are finite and strictly positive.
    pub fn new(width: f32, height: f32) -> ExportResult<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ExportError::InvalidBounds { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn from_size(size: Vec2) -> ExportResult<Self> {
        Self::new(size.x, size.y)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn size(&self) -> Vec2 {
        vec2(self.width, self.height)
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_size(pos2(0.0, 0.0), self.size())
    }

    /// Output raster size in whole pixels, never smaller than 1x1.
    ///
    /// Fails for a non-positive or non-finite `scale`, and for rasters over
    /// [`MAX_EXPORT_SIDE`] or [`MAX_EXPORT_PIXELS`], before anything is allocated.
    pub fn pixel_size(&self, scale: f32) -> ExportResult<[u32; 2]> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ExportError::InvalidScale(scale));
        }
        let width = (f64::from(self.width) * f64::from(scale)).round().max(1.0);
        let height = (f64::from(self.height) * f64::from(scale)).round().max(1.0);

        let max_side = f64::from(MAX_EXPORT_SIDE);
        if width > max_side || height > max_side || width * height > MAX_EXPORT_PIXELS as f64 {
            return Err(ExportError::TooLarge {
                width: width as f32,
                height: height as f32,
                max_side: MAX_EXPORT_SIDE,
                max_pixels: MAX_EXPORT_PIXELS,
            });
        }
        Ok([width as u32, height as u32])
    }
}

/// Placement of an image of `image_size` inside `bounds`, preserving its aspect ratio.
///
/// A wider image spans the full width and is centered vertically; a taller (or
/// equally proportioned) one spans the full height and is centered horizontally.
///
/// Returns `None` for images with a zero or non-finite side, which callers
/// treat as "no background".
pub fn aspect_fit(image_size: Vec2, bounds: CanvasBounds) -> Option<Rect> {
    if !(image_size.x.is_finite() && image_size.y.is_finite())
        || image_size.x <= 0.0
        || image_size.y <= 0.0
    {
        log::warn!("Skipping aspect fit for degenerate image size {:?}", image_size);
        return None;
    }

    let image_aspect = image_size.x / image_size.y;
    let canvas_aspect = bounds.aspect();

    let rect = if image_aspect > canvas_aspect {
        let width = bounds.width();
        let height = width / image_aspect;
        Rect::from_min_size(pos2(0.0, (bounds.height() - height) / 2.0), vec2(width, height))
    } else {
        let height = bounds.height();
        let width = height * image_aspect;
        Rect::from_min_size(pos2((bounds.width() - width) / 2.0, 0.0), vec2(width, height))
    };

    log::debug!("Aspect fit {:?} into {:?} -> {:?}", image_size, bounds.size(), rect);
    Some(rect)
}

/// Same as [`aspect_fit`] but positioned inside an arbitrary on-screen rect.
pub fn aspect_fit_in(image_size: Vec2, target: Rect) -> Option<Rect> {
    let bounds = CanvasBounds::from_size(target.size()).ok()?;
    aspect_fit(image_size, bounds).map(|rect| rect.translate(target.min.to_vec2()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(w: f32, h: f32) -> CanvasBounds {
        CanvasBounds::new(w, h).unwrap()
    }

    #[test]
    fn wide_image_fills_width_and_centers_vertically() {
        let rect = aspect_fit(vec2(200.0, 100.0), bounds(300.0, 400.0)).unwrap();
        assert_eq!(rect.min, pos2(0.0, 125.0));
        assert_eq!(rect.size(), vec2(300.0, 150.0));
    }

    #[test]
    fn tall_image_fills_height_and_centers_horizontally() {
        let rect = aspect_fit(vec2(100.0, 400.0), bounds(300.0, 400.0)).unwrap();
        assert_eq!(rect.min, pos2(100.0, 0.0));
        assert_eq!(rect.size(), vec2(100.0, 400.0));
    }

    #[test]
    fn equal_aspect_fills_canvas() {
        let rect = aspect_fit(vec2(30.0, 40.0), bounds(300.0, 400.0)).unwrap();
        assert_eq!(rect, bounds(300.0, 400.0).rect());
    }

    #[test]
    fn rejects_non_positive_bounds() {
        assert!(CanvasBounds::new(0.0, 10.0).is_err());
        assert!(CanvasBounds::new(10.0, -1.0).is_err());
        assert!(CanvasBounds::new(f32::NAN, 10.0).is_err());
        assert!(CanvasBounds::new(f32::INFINITY, 10.0).is_err());
    }

    #[test]
    fn zero_height_image_has_no_placement() {
        assert!(aspect_fit(vec2(100.0, 0.0), bounds(300.0, 400.0)).is_none());
        assert!(aspect_fit(vec2(0.0, 100.0), bounds(300.0, 400.0)).is_none());
    }

    #[test]
    fn placement_is_always_contained() {
        let canvases = [(300.0, 400.0), (1.0, 1000.0), (1920.0, 1080.0), (7.5, 3.25)];
        let images = [(200.0, 100.0), (1.0, 1.0), (4000.0, 3.0), (3.0, 4000.0), (640.0, 480.0)];
        for &(cw, ch) in &canvases {
            let canvas = bounds(cw, ch);
            let outer = canvas.rect().expand(1e-3);
            for &(iw, ih) in &images {
                let rect = aspect_fit(vec2(iw, ih), canvas).unwrap();
                assert!(outer.contains_rect(rect), "{rect:?} escapes {cw}x{ch}");
                let ratio = rect.width() / rect.height();
                assert!((ratio - iw / ih).abs() / (iw / ih) < 1e-3);
            }
        }
    }

    #[test]
    fn fit_in_offsets_by_target_origin() {
        let target = Rect::from_min_size(pos2(10.0, 60.0), vec2(300.0, 400.0));
        let rect = aspect_fit_in(vec2(200.0, 100.0), target).unwrap();
        assert_eq!(rect.min, pos2(10.0, 185.0));
    }

    #[test]
    fn pixel_size_rounds_and_clamps() {
        assert_eq!(bounds(300.0, 400.0).pixel_size(2.0), Ok([600, 800]));
        assert_eq!(bounds(0.2, 0.2).pixel_size(1.0), Ok([1, 1]));
    }

    #[test]
    fn pixel_size_rejects_bad_scale() {
        assert_eq!(bounds(10.0, 10.0).pixel_size(0.0), Err(ExportError::InvalidScale(0.0)));
        assert!(bounds(10.0, 10.0).pixel_size(f32::INFINITY).is_err());
    }

    #[test]
    fn pixel_size_refuses_huge_rasters() {
        assert!(matches!(bounds(1e10, 1e10).pixel_size(1.0), Err(ExportError::TooLarge { .. })));
        // Each side fits, the area doesn't
        assert!(matches!(bounds(16_000.0, 16_000.0).pixel_size(1.0), Err(ExportError::TooLarge { .. })));
        assert!(matches!(bounds(1000.0, 700.0).pixel_size(100.0), Err(ExportError::TooLarge { .. })));
        let side = MAX_EXPORT_SIDE as f32;
        assert_eq!(bounds(side, 1.0).pixel_size(1.0), Ok([MAX_EXPORT_SIDE, 1]));
    }
}
