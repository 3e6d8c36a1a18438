use eframe::egui;
use std::path::Path;

use super::ImageSource;
use super::dialog::IMAGE_EXTENSIONS;

/// Accepts images dragged onto the window as an alternative to the dialog
#[derive(Debug, Default)]
pub struct DropHandler {
    rejected: Vec<String>,
}

impl DropHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the first image among files dropped this frame, if any.
    pub fn take_dropped(&mut self, ctx: &egui::Context) -> Option<ImageSource> {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());

        for file in dropped {
            let name = Self::display_name(&file);
            if !Self::is_image_file(&file) {
                log::warn!("Dropped file is not a supported type: {}", name);
                self.rejected.push(name);
                continue;
            }

            if let Some(bytes) = file.bytes {
                log::info!("Using dropped image {} ({} bytes)", name, bytes.len());
                return Some(ImageSource::Bytes(bytes));
            }
            if let Some(path) = file.path {
                log::info!("Using dropped image {}", path.display());
                return Some(ImageSource::Path(path));
            }
            log::warn!("Dropped file has no accessible data: {}", name);
        }
        None
    }

    /// Names of dropped files that were not images, oldest first
    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }

    pub fn clear_rejected(&mut self) {
        self.rejected.clear();
    }

    fn display_name(file: &egui::DroppedFile) -> String {
        if let Some(path) = &file.path {
            path.display().to_string()
        } else if !file.name.is_empty() {
            file.name.clone()
        } else {
            "unknown".to_owned()
        }
    }

    /// Check MIME type first, then the extension
    fn is_image_file(file: &egui::DroppedFile) -> bool {
        if file.mime.starts_with("image/") {
            return true;
        }
        let name = file
            .path
            .as_deref()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| file.name.clone().into());
        has_image_extension(&name)
    }

    /// Darken the window while files hover over it
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, Id, LayerId, Order, TextStyle};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let text = ctx.input(|i| {
            let mut text = "Drop to use as background:\n".to_owned();
            for file in &i.raw.hovered_files {
                if let Some(path) = &file.path {
                    text += &format!("\n{}", path.display());
                } else if !file.mime.is_empty() {
                    text += &format!("\n{}", file.mime);
                }
            }
            text
        });

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            TextStyle::Heading.resolve(&ctx.style()),
            Color32::WHITE,
        );
    }
}

pub(crate) fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}
