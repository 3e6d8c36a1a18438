use egui::{Color32, Slider};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

pub const MIN_PEN_WIDTH: f32 = 1.0;
pub const MAX_PEN_WIDTH: f32 = 50.0;

/// Ink settings applied to new strokes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    pub color: Color32,
    pub width: f32,
}

/// Floating palette for pen color and width
#[derive(Debug, Clone, PartialEq)]
pub struct ToolPicker {
    pen: Pen,
    visible: bool,
}

/// What survives an app restart, stored through eframe persistence
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPickerSettings {
    pub pen_color: [u8; 4],
    pub pen_width: f32,
    pub visible: bool,
}

impl Default for ToolPickerSettings {
    fn default() -> Self {
        Self {
            pen_color: [0, 0, 0, 255],
            pen_width: 2.0,
            visible: true,
        }
    }
}

impl ToolPicker {
    pub fn from_config(config: &AppConfig) -> Self {
        let [r, g, b, a] = config.pen_color;
        Self {
            pen: Pen {
                color: Color32::from_rgba_unmultiplied(r, g, b, a),
                width: config.pen_width.clamp(MIN_PEN_WIDTH, MAX_PEN_WIDTH),
            },
            visible: true,
        }
    }

    pub fn from_settings(settings: ToolPickerSettings) -> Self {
        let [r, g, b, a] = settings.pen_color;
        Self {
            pen: Pen {
                color: Color32::from_rgba_unmultiplied(r, g, b, a),
                width: settings.pen_width.clamp(MIN_PEN_WIDTH, MAX_PEN_WIDTH),
            },
            visible: settings.visible,
        }
    }

    pub fn settings(&self) -> ToolPickerSettings {
        ToolPickerSettings {
            pen_color: self.pen.color.to_srgba_unmultiplied(),
            pen_width: self.pen.width,
            visible: self.visible,
        }
    }

    pub fn pen(&self) -> Pen {
        self.pen
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        if !self.visible {
            return;
        }

        let mut open = true;
        egui::Window::new("Pen")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -16.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Color:");
                    egui::color_picker::color_edit_button_srgba(
                        ui,
                        &mut self.pen.color,
                        egui::color_picker::Alpha::Opaque,
                    );
                });

                ui.horizontal(|ui| {
                    ui.label("Width:");
                    ui.add(Slider::new(&mut self.pen.width, MIN_PEN_WIDTH..=MAX_PEN_WIDTH));
                });
            });

        if !open {
            self.visible = false;
        }
    }
}
