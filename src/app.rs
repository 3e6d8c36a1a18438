use std::sync::Arc;

use eframe::egui;

use crate::config::AppConfig;
use crate::ink_canvas::InkCanvas;
use crate::library::{DirectoryLibrary, PhotoLibrary};
use crate::panels::{BackgroundTexture, CanvasView, HeaderAction, HeaderState, canvas_panel, header_panel, overlays};
use crate::picker::{DropHandler, FileDialogPicker, ImagePicker, PickerSessions, decode_in_background};
use crate::state::CanvasModel;
use crate::tool_picker::{ToolPicker, ToolPickerSettings};
use crate::worker::{PendingExport, spawn_export};

/// The single-screen drawing app.
///
/// Only the tool picker settings are persisted between runs; the drawing
/// and background always start empty.
pub struct InkBoardApp {
    config: AppConfig,
    model: CanvasModel,
    canvas: InkCanvas,
    tool_picker: ToolPicker,
    picker: Box<dyn ImagePicker>,
    sessions: PickerSessions,
    drop_handler: DropHandler,
    library: Arc<dyn PhotoLibrary>,
    pending_export: Option<PendingExport>,
    texture: BackgroundTexture,
}

impl InkBoardApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let tool_picker = match cc
            .storage
            .and_then(|storage| eframe::get_value::<ToolPickerSettings>(storage, eframe::APP_KEY))
        {
            Some(settings) => {
                log::info!("Restored tool picker settings: {:?}", settings);
                ToolPicker::from_settings(settings)
            }
            None => ToolPicker::from_config(&config),
        };

        let library = Arc::new(DirectoryLibrary::new(config.output_dir.clone()));
        log::info!("Saving drawings to {}", library.dir().display());

        Self::with_parts(
            config,
            tool_picker,
            Box::new(FileDialogPicker::with_title("Choose a background photo")),
            library,
        )
    }

    /// Assemble the app from explicit collaborators.
    pub fn with_parts(
        config: AppConfig,
        tool_picker: ToolPicker,
        picker: Box<dyn ImagePicker>,
        library: Arc<dyn PhotoLibrary>,
    ) -> Self {
        Self {
            model: CanvasModel::from_config(&config),
            canvas: InkCanvas::new(),
            tool_picker,
            picker,
            sessions: PickerSessions::new(),
            drop_handler: DropHandler::new(),
            library,
            pending_export: None,
            texture: BackgroundTexture::default(),
            config,
        }
    }

    pub fn model(&self) -> &CanvasModel {
        &self.model
    }

    pub fn canvas(&self) -> &InkCanvas {
        &self.canvas
    }

    fn poll_export(&mut self, now: f64) {
        let Some(pending) = &mut self.pending_export else {
            return;
        };
        if let Some(report) = pending.poll() {
            self.pending_export = None;
            log::debug!("Export report arrived after {:?}", report.elapsed);
            self.model.finish_save(report.result, now);
        }
    }

    fn poll_imports(&mut self, ctx: &egui::Context) {
        if let Some(result) = self.sessions.poll() {
            self.model.apply_pick(result);
        }

        if let Some(source) = self.drop_handler.take_dropped(ctx) {
            let (session, reply) = self.sessions.begin();
            decode_in_background(session, source, reply);
        }

        if !self.drop_handler.rejected().is_empty() {
            let names = self.drop_handler.rejected().join(", ");
            self.model.show_notice(format!("Not an image: {names}"));
            self.drop_handler.clear_rejected();
        }
    }

    fn handle_action(&mut self, ctx: &egui::Context, action: HeaderAction, now: f64) {
        match action {
            HeaderAction::Import => {
                if self.sessions.is_open() {
                    log::warn!("Import requested while a pick is open; ignoring");
                    return;
                }
                let (session, reply) = self.sessions.begin();
                self.picker.present(session, reply);
            }
            HeaderAction::Clear => self.model.clear(&mut self.canvas),
            HeaderAction::Save => {
                let scale = self.config.export_scale_or(ctx.pixels_per_point());
                if let Some(job) = self.model.request_export(&self.canvas, scale, now) {
                    let ctx = ctx.clone();
                    self.pending_export = Some(spawn_export(job, Arc::clone(&self.library), move || {
                        ctx.request_repaint()
                    }));
                }
            }
            HeaderAction::TogglePen => self.tool_picker.toggle(),
        }
    }
}

impl eframe::App for InkBoardApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.tool_picker.settings());
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|i| i.time);

        self.poll_export(now);
        self.poll_imports(ctx);

        if let Some(remaining) = self.model.tick(now) {
            ctx.request_repaint_after(std::time::Duration::from_secs_f64(remaining));
        }

        let header = HeaderState {
            is_saving: self.model.is_saving(),
            is_importing: self.sessions.is_open(),
            pen_visible: self.tool_picker.is_visible(),
        };
        if let Some(action) = header_panel(ctx, header) {
            self.handle_action(ctx, action, now);
        }

        canvas_panel(
            ctx,
            CanvasView {
                canvas: &mut self.canvas,
                background: self.model.background(),
                texture: &mut self.texture,
                pen: self.tool_picker.pen(),
                config: &self.config,
            },
        );

        self.tool_picker.show(ctx);
        overlays(ctx, &mut self.model);
        self.drop_handler.preview_files_being_dropped(ctx);

        // Pickers report on a plain channel, so keep polling while one is open
        if self.sessions.is_open() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SaveError;
    use crate::exporter::ExportedImage;
    use crate::library::SavedAsset;
    use crate::picker::{PickSender, SessionId};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Never reports, like a dialog the user hasn't closed yet
    struct PendingPicker {
        presented: Arc<AtomicUsize>,
    }

    impl ImagePicker for PendingPicker {
        fn present(&self, _session: SessionId, _reply: PickSender) {
            self.presented.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct NullLibrary;

    impl PhotoLibrary for NullLibrary {
        fn save(&self, _image: &ExportedImage) -> Result<SavedAsset, SaveError> {
            Err(SaveError::WorkerLost)
        }
    }

    #[test]
    fn second_import_waits_for_the_open_dialog() {
        let presented = Arc::new(AtomicUsize::new(0));
        let config = AppConfig::default();
        let mut app = InkBoardApp::with_parts(
            config.clone(),
            ToolPicker::from_config(&config),
            Box::new(PendingPicker {
                presented: presented.clone(),
            }),
            Arc::new(NullLibrary),
        );
        let ctx = egui::Context::default();

        app.handle_action(&ctx, HeaderAction::Import, 0.0);
        app.handle_action(&ctx, HeaderAction::Import, 0.1);

        assert_eq!(presented.load(Ordering::SeqCst), 1);
        assert!(app.sessions.is_open());
    }
}
