use eframe::egui::{self, Color32, Rect, TextureHandle, TextureOptions, pos2};

use crate::background::BackgroundImage;
use crate::config::AppConfig;
use crate::geometry::aspect_fit_in;
use crate::grid::paint_dotted_grid;
use crate::ink_canvas::InkCanvas;
use crate::tool_picker::Pen;

/// GPU copy of the current background, re-uploaded only when the image changes
#[derive(Default)]
pub struct BackgroundTexture {
    cached: Option<(u64, TextureHandle)>,
}

impl BackgroundTexture {
    pub fn get_or_upload(&mut self, ctx: &egui::Context, image: &BackgroundImage) -> &TextureHandle {
        if self.cached.as_ref().is_some_and(|(id, _)| *id != image.id()) {
            self.cached = None;
        }
        let (_, handle) = self.cached.get_or_insert_with(|| {
            log::debug!("Uploading background texture {}", image.id());
            let max_side = ctx.input(|i| i.max_texture_side);
            let handle = ctx.load_texture(
                format!("background_{}", image.id()),
                image.to_color_image(max_side),
                TextureOptions::LINEAR,
            );
            (image.id(), handle)
        });
        handle
    }

    pub fn release(&mut self) {
        self.cached = None;
    }
}

/// Inputs for one frame of the canvas area
pub struct CanvasView<'a> {
    pub canvas: &'a mut InkCanvas,
    pub background: Option<&'a BackgroundImage>,
    pub texture: &'a mut BackgroundTexture,
    pub pen: Pen,
    pub config: &'a AppConfig,
}

/// White page, fitted background, dot grid and ink, bottom to top.
pub fn canvas_panel(ctx: &egui::Context, view: CanvasView<'_>) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(Color32::WHITE))
        .show(ctx, |ui| {
            let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            view.canvas.set_layout_size(rect.size());

            match view.background {
                Some(image) => {
                    if let Some(fitted) = aspect_fit_in(image.size(), rect) {
                        let texture = view.texture.get_or_upload(ctx, image);
                        painter.image(
                            texture.id(),
                            fitted,
                            Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                            Color32::WHITE,
                        );
                    }
                }
                None => view.texture.release(),
            }

            paint_dotted_grid(&painter, rect, view.config.grid_spacing, view.config.grid_dot_size);

            view.canvas.handle_input(&response, rect, view.pen);
            view.canvas.paint(&painter, rect);

            if view.canvas.is_drawing() {
                ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
            }
        });
}
