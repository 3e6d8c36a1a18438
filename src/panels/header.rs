use eframe::egui::{self, Color32, Mesh, Shape, pos2};

use crate::components::HeaderButton;

pub const HEADER_HEIGHT: f32 = 60.0;

/// Buttons the header can report in one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    Import,
    Clear,
    Save,
    TogglePen,
}

/// What the header needs to know about the rest of the app this frame
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderState {
    pub is_saving: bool,
    /// A picker dialog or dropped-file decode is still running
    pub is_importing: bool,
    pub pen_visible: bool,
}

/// Gradient title bar with the import, clear and save buttons.
pub fn header_panel(ctx: &egui::Context, state: HeaderState) -> Option<HeaderAction> {
    let mut action = None;

    egui::TopBottomPanel::top("header")
        .exact_height(HEADER_HEIGHT)
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            paint_gradient(ui.painter(), ui.max_rect());

            ui.horizontal_centered(|ui| {
                ui.add_space(20.0);
                ui.label(egui::RichText::new("✏").size(20.0).color(Color32::WHITE));
                ui.add_space(4.0);
                ui.label(egui::RichText::new("InkBoard").size(20.0).strong().color(Color32::WHITE));

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.add_space(20.0);
                    ui.spacing_mut().item_spacing.x = 12.0;

                    // Right-to-left, so the last button added is leftmost
                    if state.is_saving {
                        ui.add(egui::Spinner::new().color(Color32::WHITE).size(24.0));
                    } else if HeaderButton::new("💾", "Save to library").show(ui).clicked() {
                        action = Some(HeaderAction::Save);
                    }
                    if HeaderButton::new("🗑", "Clear canvas").show(ui).clicked() {
                        action = Some(HeaderAction::Clear);
                    }
                    if HeaderButton::new("🖼", "Choose background")
                        .enabled(!state.is_importing)
                        .show(ui)
                        .clicked()
                    {
                        action = Some(HeaderAction::Import);
                    }
                    if HeaderButton::new("🖊", "Show pen settings")
                        .active(state.pen_visible)
                        .show(ui)
                        .clicked()
                    {
                        action = Some(HeaderAction::TogglePen);
                    }
                });
            });
        });

    if let Some(action) = action {
        log::info!("Header action: {:?}", action);
    }
    action
}

/// Orange to red, left to right (both at 80% over white)
fn paint_gradient(painter: &egui::Painter, rect: egui::Rect) {
    let left = Color32::from_rgb(255, 183, 51);
    let right = Color32::from_rgb(255, 98, 89);

    let mut mesh = Mesh::default();
    mesh.colored_vertex(rect.left_top(), left);
    mesh.colored_vertex(rect.right_top(), right);
    mesh.colored_vertex(rect.right_bottom(), right);
    mesh.colored_vertex(pos2(rect.left(), rect.bottom()), left);
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    painter.add(Shape::mesh(mesh));
}
