//! The drawing-surface seam and its software stroke rasterizer.
//!
//! The exporter never touches strokes. It asks a [`DrawingSurface`] for a
//! [`StrokeLayer`] snapshot and lets the snapshot rasterize itself, which
//! can happen on a worker thread because the snapshot owns its data.

use egui::{Color32, Pos2, pos2};
use image::{GrayImage, Luma, Pixel, Rgba, RgbaImage};

use crate::error::ExportResult;
use crate::geometry::CanvasBounds;
use crate::stroke::{Stroke, StrokeRef};

/// Transparent raster of the ink, sized to the export target in pixels
pub type StrokeSnapshot = RgbaImage;

/// Frozen copy of the ink at the moment an export was requested
pub trait StrokeLayer: Send {
    /// Render the strokes over `bounds` at `scale` pixels per point.
    /// Fails like [`CanvasBounds::pixel_size`] for a bad scale or an oversized raster.
    fn rasterize(&self, bounds: CanvasBounds, scale: f32) -> ExportResult<StrokeSnapshot>;

    fn is_empty(&self) -> bool;
}

/// The live canvas the user draws on
pub trait DrawingSurface {
    /// Current layout size; fails until the surface has a positive area.
    fn bounds(&self) -> ExportResult<CanvasBounds>;

    /// Snapshot the committed strokes for rasterization elsewhere.
    fn capture(&self) -> Box<dyn StrokeLayer>;

    /// Drop every stroke.
    fn reset(&mut self);
}

/// Committed strokes captured from an [`crate::InkCanvas`]
#[derive(Clone, Debug, Default)]
pub struct InkLayer {
    strokes: Vec<StrokeRef>,
}

impl InkLayer {
    pub fn new(strokes: Vec<StrokeRef>) -> Self {
        Self { strokes }
    }

    pub fn strokes(&self) -> &[StrokeRef] {
        &self.strokes
    }
}

impl StrokeLayer for InkLayer {
    fn rasterize(&self, bounds: CanvasBounds, scale: f32) -> ExportResult<StrokeSnapshot> {
        rasterize_strokes(&self.strokes, bounds, scale)
    }

    fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
}

/// Pixel-space box touched by one stroke, inclusive min and exclusive max
#[derive(Debug, Clone, Copy)]
struct Area {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl Area {
    fn union(self, other: Area) -> Area {
        Area {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// Stamp each stroke as a chain of anti-aliased round dabs.
///
/// Coverage inside one stroke is max-combined so overlapping dabs don't
/// darken; separate strokes are alpha-blended in order.
pub fn rasterize_strokes(strokes: &[StrokeRef], bounds: CanvasBounds, scale: f32) -> ExportResult<StrokeSnapshot> {
    let [width, height] = bounds.pixel_size(scale)?;
    let mut layer = RgbaImage::new(width, height);
    let mut mask = GrayImage::new(width, height);

    for stroke in strokes {
        if let Some(area) = stamp_stroke(&mut mask, stroke, scale) {
            flush_mask(&mut layer, &mut mask, area, stroke.color());
        }
    }

    Ok(layer)
}

fn stamp_stroke(mask: &mut GrayImage, stroke: &Stroke, scale: f32) -> Option<Area> {
    let points = stroke.points();
    let first = *points.first()?;
    let radius = (stroke.thickness() * scale / 2.0).max(0.5);
    let to_px = |p: Pos2| pos2(p.x * scale, p.y * scale);

    let mut touched = stamp_dab(mask, to_px(first), radius);
    for pair in points.windows(2) {
        let (a, b) = (to_px(pair[0]), to_px(pair[1]));
        let length = a.distance(b);
        let spacing = (radius * 0.5).max(0.5);
        let steps = (length / spacing).ceil().max(1.0) as u32;
        for step in 1..=steps {
            let t = step as f32 / steps as f32;
            let dab = stamp_dab(mask, a.lerp(b, t), radius);
            touched = match (touched, dab) {
                (Some(acc), Some(area)) => Some(acc.union(area)),
                (acc, area) => acc.or(area),
            };
        }
    }
    touched
}

fn stamp_dab(mask: &mut GrayImage, center: Pos2, radius: f32) -> Option<Area> {
    let (w, h) = mask.dimensions();
    let reach = radius + 1.0;
    let x0 = (center.x - reach).floor().max(0.0) as u32;
    let y0 = (center.y - reach).floor().max(0.0) as u32;
    let x1 = ((center.x + reach).ceil().max(0.0) as u32).min(w);
    let y1 = ((center.y + reach).ceil().max(0.0) as u32).min(h);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }

    for y in y0..y1 {
        for x in x0..x1 {
            let d = pos2(x as f32 + 0.5, y as f32 + 0.5).distance(center);
            let coverage = (radius + 0.5 - d).clamp(0.0, 1.0);
            if coverage <= 0.0 {
                continue;
            }
            let value = (coverage * 255.0).round() as u8;
            let Luma([current]) = *mask.get_pixel(x, y);
            if value > current {
                mask.put_pixel(x, y, Luma([value]));
            }
        }
    }
    Some(Area { x0, y0, x1, y1 })
}

fn flush_mask(layer: &mut RgbaImage, mask: &mut GrayImage, area: Area, color: Color32) {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    for y in area.y0..area.y1 {
        for x in area.x0..area.x1 {
            let Luma([coverage]) = *mask.get_pixel(x, y);
            if coverage == 0 {
                continue;
            }
            mask.put_pixel(x, y, Luma([0]));
            let alpha = (u16::from(coverage) * u16::from(a) / 255) as u8;
            layer.get_pixel_mut(x, y).blend(&Rgba([r, g, b, alpha]));
        }
    }
}
