use egui::{Painter, Pos2, Rect, Response, Shape, Vec2};

use crate::error::ExportResult;
use crate::geometry::CanvasBounds;
use crate::stroke::{MutableStroke, StrokeRef};
use crate::surface::{DrawingSurface, InkLayer, StrokeLayer};
use crate::tool_picker::Pen;

/// Desktop drawing surface: collects pointer drags into strokes and
/// paints them with the egui painter.
#[derive(Debug, Default)]
pub struct InkCanvas {
    strokes: Vec<StrokeRef>,
    // Transient state: the stroke being drawn (if any)
    current_stroke: Option<MutableStroke>,
    layout_size: Vec2,
}

impl InkCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the size the canvas was laid out at this frame.
    pub fn set_layout_size(&mut self, size: Vec2) {
        self.layout_size = size;
    }

    pub fn strokes(&self) -> &[StrokeRef] {
        &self.strokes
    }

    pub fn is_drawing(&self) -> bool {
        self.current_stroke.is_some()
    }

    pub fn on_pointer_down(&mut self, pos: Pos2, pen: Pen) {
        let mut stroke = MutableStroke::new(pen.color, pen.width);
        stroke.add_point(pos);
        self.current_stroke = Some(stroke);
    }

    /// Start a stroke once a drag is recognized. egui only reports the drag
    /// after the pointer has moved past its threshold, so the stroke begins
    /// at the press position and continues to where the pointer is now.
    pub fn on_drag_start(&mut self, press_origin: Pos2, current: Pos2, pen: Pen) {
        self.on_pointer_down(press_origin, pen);
        self.on_pointer_move(current);
    }

    pub fn on_pointer_move(&mut self, pos: Pos2) {
        if let Some(stroke) = &mut self.current_stroke {
            stroke.add_point(pos);
        }
    }

    pub fn on_pointer_up(&mut self) {
        if let Some(stroke) = self.current_stroke.take() {
            if !stroke.points().is_empty() {
                log::debug!("Committed stroke with {} points", stroke.points().len());
                self.strokes.push(stroke.into_stroke_ref());
            }
        }
    }

    /// Route egui drag events to the stroke builder. Positions are
    /// converted to canvas-local coordinates relative to `canvas_rect`.
    pub fn handle_input(&mut self, response: &Response, canvas_rect: Rect, pen: Pen) {
        let local = |pos: Pos2| (pos - canvas_rect.min).to_pos2();

        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                let origin = response.ctx.input(|i| i.pointer.press_origin()).unwrap_or(pos);
                self.on_drag_start(local(origin), local(pos), pen);
            }
        } else if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.on_pointer_move(local(pos));
            }
        }

        if response.drag_stopped() {
            self.on_pointer_up();
        } else if response.clicked() {
            // A tap without movement still leaves a dot
            if let Some(pos) = response.interact_pointer_pos() {
                self.on_pointer_down(local(pos), pen);
                self.on_pointer_up();
            }
        }
    }

    /// Paint committed strokes and the in-progress preview.
    pub fn paint(&self, painter: &Painter, canvas_rect: Rect) {
        let offset = canvas_rect.min.to_vec2();
        let shapes = self
            .strokes
            .iter()
            .map(|stroke| (stroke.points(), stroke.color(), stroke.thickness()))
            .chain(
                self.current_stroke
                    .iter()
                    .map(|stroke| (stroke.points(), stroke.color(), stroke.thickness())),
            );

        for (points, color, thickness) in shapes {
            match points {
                [] => {}
                [single] => {
                    painter.circle_filled(*single + offset, thickness / 2.0, color);
                }
                _ => {
                    let screen: Vec<Pos2> = points.iter().map(|p| *p + offset).collect();
                    painter.add(Shape::line(screen, egui::Stroke::new(thickness, color)));
                }
            }
        }
    }
}

impl DrawingSurface for InkCanvas {
    fn bounds(&self) -> ExportResult<CanvasBounds> {
        CanvasBounds::from_size(self.layout_size)
    }

    fn capture(&self) -> Box<dyn StrokeLayer> {
        Box::new(InkLayer::new(self.strokes.clone()))
    }

    fn reset(&mut self) {
        self.strokes.clear();
        self.current_stroke = None;
    }
}
