use crate::background::BackgroundImage;
use crate::config::AppConfig;
use crate::error::JobError;
use crate::event::{CanvasEvent, EventBus, EventHandler};
use crate::library::SavedAsset;
use crate::picker::PickResult;
use crate::surface::DrawingSurface;
use crate::worker::ExportJob;

use super::SaveStatus;

/// UI state for the single canvas screen.
///
/// Owned by the UI thread. Workers never touch it; their results come back
/// through [`CanvasModel::finish_save`] and [`CanvasModel::apply_pick`].
#[derive(Debug)]
pub struct CanvasModel {
    background: Option<BackgroundImage>,
    save_status: SaveStatus,
    /// Import problems shown as a dismissable banner
    notice: Option<String>,
    success_banner_secs: f64,
    events: EventBus,
}

impl Default for CanvasModel {
    fn default() -> Self {
        Self::new(2.0)
    }
}

impl CanvasModel {
    pub fn new(success_banner_secs: f64) -> Self {
        Self {
            background: None,
            save_status: SaveStatus::Idle,
            notice: None,
            success_banner_secs: success_banner_secs.max(0.0),
            events: EventBus::new(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.success_banner_secs)
    }

    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.events.subscribe(handler);
    }

    pub fn background(&self) -> Option<&BackgroundImage> {
        self.background.as_ref()
    }

    pub fn set_background(&mut self, image: BackgroundImage) {
        log::info!("Background set: {:?}", image);
        self.background = Some(image);
        self.events.emit(CanvasEvent::BackgroundChanged { present: true });
    }

    pub fn clear_background(&mut self) {
        if self.background.take().is_some() {
            self.events.emit(CanvasEvent::BackgroundChanged { present: false });
        }
    }

    /// Wipe the ink and drop the background. Safe to call repeatedly.
    pub fn clear(&mut self, surface: &mut dyn DrawingSurface) {
        surface.reset();
        self.clear_background();
        log::info!("Canvas cleared");
        self.events.emit(CanvasEvent::Cleared);
    }

    /// Apply the result of a picker session.
    pub fn apply_pick(&mut self, result: PickResult) {
        match result {
            PickResult::Picked(image) => {
                self.notice = None;
                self.set_background(image);
            }
            PickResult::Cancelled => log::debug!("Pick cancelled; background unchanged"),
            PickResult::Failed(err) => self.show_notice(format!("Couldn't use that image: {err}")),
        }
    }

    /// Show an import problem that didn't come from a picker session.
    pub fn show_notice(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.notice = Some(message.clone());
        self.events.emit(CanvasEvent::ImportFailed { message });
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        if self.notice.take().is_some() {
            self.events.emit(CanvasEvent::NoticeDismissed);
        }
    }

    pub fn save_status(&self) -> &SaveStatus {
        &self.save_status
    }

    pub fn is_saving(&self) -> bool {
        self.save_status.is_saving()
    }

    /// Mark a save as in flight. Returns `false` (and changes nothing) if
    /// one already is.
    pub fn begin_save(&mut self) -> bool {
        if self.save_status.is_saving() {
            log::warn!("Save requested while another is in flight; ignoring");
            return false;
        }
        self.save_status = SaveStatus::Saving;
        self.events.emit(CanvasEvent::SaveStarted);
        true
    }

    /// Start a save and snapshot everything the worker needs.
    ///
    /// Returns `None` if a save is already running, or if the surface can't
    /// be exported (in which case the failure is already reflected in
    /// [`Self::save_status`]).
    pub fn request_export(&mut self, surface: &dyn DrawingSurface, scale: f32, now: f64) -> Option<ExportJob> {
        if !self.begin_save() {
            return None;
        }
        match ExportJob::capture(surface, self.background.as_ref(), scale) {
            Ok(job) => Some(job),
            Err(err) => {
                self.finish_save(Err(err), now);
                None
            }
        }
    }

    /// Apply a worker's report. `now` is the UI clock in seconds.
    pub fn finish_save(&mut self, result: Result<SavedAsset, JobError>, now: f64) {
        match result {
            Ok(asset) => {
                let path = asset.path.clone();
                self.save_status = SaveStatus::Succeeded { asset, since: now };
                self.events.emit(CanvasEvent::SaveSucceeded { path });
            }
            Err(err) => {
                let message = format!("Couldn't save the drawing: {err}");
                self.save_status = SaveStatus::Failed {
                    message: message.clone(),
                };
                self.events.emit(CanvasEvent::SaveFailed { message });
            }
        }
    }

    /// Advance time-based state. Returns the seconds until the next
    /// transition, so the caller can schedule a repaint.
    pub fn tick(&mut self, now: f64) -> Option<f64> {
        let SaveStatus::Succeeded { asset, since } = &self.save_status else {
            return None;
        };

        let remaining = since + self.success_banner_secs - now;
        if remaining > 0.0 {
            return Some(remaining);
        }

        self.save_status = SaveStatus::Confirmed { asset: asset.clone() };
        self.events.emit(CanvasEvent::SaveConfirmed);
        None
    }

    /// Close the success or failure alert.
    pub fn dismiss_alert(&mut self) {
        if self.save_status.shows_alert() {
            self.save_status = SaveStatus::Idle;
            self.events.emit(CanvasEvent::AlertDismissed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DecodeError, SaveError};
    use crate::event::EventLog;
    use crate::ink_canvas::InkCanvas;
    use image::RgbaImage;

    fn asset() -> SavedAsset {
        SavedAsset {
            id: uuid::Uuid::nil(),
            path: "/tmp/out.png".into(),
        }
    }

    fn background() -> BackgroundImage {
        BackgroundImage::from_rgba(RgbaImage::new(2, 1)).unwrap()
    }

    #[test]
    fn second_save_is_ignored_while_saving() {
        let mut model = CanvasModel::default();
        assert!(model.begin_save());
        assert!(!model.begin_save());
        assert!(model.is_saving());
    }

    #[test]
    fn success_then_alert_after_banner() {
        let mut model = CanvasModel::new(2.0);
        model.begin_save();
        model.finish_save(Ok(asset()), 10.0);
        assert!(model.save_status().shows_success_overlay());

        assert_eq!(model.tick(11.0), Some(1.0));
        assert!(model.save_status().shows_success_overlay());

        assert_eq!(model.tick(12.0), None);
        assert!(matches!(model.save_status(), SaveStatus::Confirmed { .. }));
        assert!(model.save_status().success_message().is_some());

        model.dismiss_alert();
        assert_eq!(model.save_status(), &SaveStatus::Idle);
    }

    #[test]
    fn failure_and_success_are_exclusive() {
        let mut model = CanvasModel::default();
        model.begin_save();
        model.finish_save(Err(SaveError::Encode("disk full".into()).into()), 0.0);

        let status = model.save_status();
        assert!(status.failure_message().unwrap().contains("disk full"));
        assert!(status.success_message().is_none());
        assert!(!status.is_saving());

        model.begin_save();
        model.finish_save(Ok(asset()), 1.0);
        assert!(model.save_status().failure_message().is_none());
        assert!(model.save_status().success_message().is_some());
    }

    #[test]
    fn export_request_without_layout_fails_fast() {
        let mut model = CanvasModel::default();
        let canvas = InkCanvas::new();
        assert!(model.request_export(&canvas, 1.0, 0.0).is_none());
        assert!(model.save_status().failure_message().is_some());
    }

    #[test]
    fn failed_pick_keeps_background_and_sets_notice() {
        let mut model = CanvasModel::default();
        model.set_background(background());
        let id = model.background().unwrap().id();

        model.apply_pick(PickResult::Failed(DecodeError::EmptyImage));
        assert_eq!(model.background().unwrap().id(), id);
        assert!(model.notice().is_some());

        model.apply_pick(PickResult::Cancelled);
        assert_eq!(model.background().unwrap().id(), id);

        model.dismiss_notice();
        assert!(model.notice().is_none());
    }

    #[test]
    fn clear_is_idempotent_and_emits() {
        let log = EventLog::new();
        let mut model = CanvasModel::default();
        model.subscribe(Box::new(log.clone()));
        let mut canvas = InkCanvas::new();

        model.set_background(background());
        model.clear(&mut canvas);
        model.clear(&mut canvas);

        assert!(model.background().is_none());
        assert_eq!(
            log.events(),
            vec![
                CanvasEvent::BackgroundChanged { present: true },
                CanvasEvent::BackgroundChanged { present: false },
                CanvasEvent::Cleared,
                CanvasEvent::Cleared,
            ]
        );
    }
}
