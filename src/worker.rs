//! Runs rasterize, composite and save off the UI thread.
//!
//! The worker only reads the [`ExportJob`] captured at request time and
//! reports back through a oneshot channel. All UI state changes happen on
//! the thread that polls the [`PendingExport`].

use futures::channel::oneshot;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::background::BackgroundImage;
use crate::error::{JobError, SaveError};
use crate::exporter;
use crate::geometry::CanvasBounds;
use crate::library::{PhotoLibrary, SavedAsset};
use crate::surface::{DrawingSurface, StrokeLayer};

/// Everything the worker needs, owned so nothing is shared with the UI
pub struct ExportJob {
    bounds: CanvasBounds,
    background: Option<BackgroundImage>,
    strokes: Box<dyn StrokeLayer>,
    scale: f32,
}

impl std::fmt::Debug for ExportJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportJob")
            .field("bounds", &self.bounds)
            .field("background", &self.background)
            .field("strokes_empty", &self.strokes.is_empty())
            .field("scale", &self.scale)
            .finish()
    }
}

impl ExportJob {
    pub fn new(
        bounds: CanvasBounds,
        background: Option<BackgroundImage>,
        strokes: Box<dyn StrokeLayer>,
        scale: f32,
    ) -> Self {
        Self {
            bounds,
            background,
            strokes,
            scale,
        }
    }

    /// Snapshot the surface and background as they are right now.
    pub fn capture(
        surface: &dyn DrawingSurface,
        background: Option<&BackgroundImage>,
        scale: f32,
    ) -> Result<Self, JobError> {
        let bounds = surface.bounds()?;
        Ok(Self::new(bounds, background.cloned(), surface.capture(), scale))
    }

    /// Rasterize, composite and save, blocking the calling thread.
    pub fn run(self, library: &dyn PhotoLibrary) -> Result<SavedAsset, JobError> {
        let snapshot = self.strokes.rasterize(self.bounds, self.scale)?;
        let image = exporter::export(self.bounds, self.background.as_ref(), &snapshot, self.scale)?;
        Ok(library.save(&image)?)
    }
}

/// What the worker hands back to the UI thread
#[derive(Debug)]
pub struct ExportReport {
    pub result: Result<SavedAsset, JobError>,
    pub elapsed: Duration,
}

impl ExportReport {
    fn worker_lost() -> Self {
        Self {
            result: Err(JobError::Save(SaveError::WorkerLost)),
            elapsed: Duration::ZERO,
        }
    }
}

/// Handle to an export running on a worker thread
#[derive(Debug)]
pub struct PendingExport {
    receiver: oneshot::Receiver<ExportReport>,
}

impl PendingExport {
    /// Non-blocking check, meant to be called once per frame.
    ///
    /// A worker that died without reporting turns into a `WorkerLost` report,
    /// so a failure is never silently dropped.
    pub fn poll(&mut self) -> Option<ExportReport> {
        match self.receiver.try_recv() {
            Ok(report) => report,
            Err(oneshot::Canceled) => {
                log::error!("Export worker exited without a report");
                Some(ExportReport::worker_lost())
            }
        }
    }

    /// Block until the worker reports.
    pub fn wait(self) -> ExportReport {
        futures::executor::block_on(self.receiver).unwrap_or_else(|_| ExportReport::worker_lost())
    }
}

/// Start `job` on its own thread. `on_done` runs on the worker after the
/// report is sent; the app uses it to wake the UI.
pub fn spawn_export<F>(job: ExportJob, library: Arc<dyn PhotoLibrary>, on_done: F) -> PendingExport
where
    F: FnOnce() + Send + 'static,
{
    let (sender, receiver) = oneshot::channel();
    log::info!("Starting export: {:?}", job);

    let spawned = std::thread::Builder::new()
        .name("inkboard-export".to_owned())
        .spawn(move || {
            let started = Instant::now();
            let result = job.run(library.as_ref());
            let elapsed = started.elapsed();
            match &result {
                Ok(asset) => log::info!("Export finished in {:?}: {}", elapsed, asset.path.display()),
                Err(err) => log::error!("Export failed after {:?}: {}", elapsed, err),
            }
            // Receiver may be gone if the window closed mid-export
            let _ = sender.send(ExportReport { result, elapsed });
            on_done();
        });

    if let Err(err) = spawned {
        // The closure (and the sender inside it) is dropped, so the
        // receiver resolves to `WorkerLost`.
        log::error!("Failed to spawn export worker: {}", err);
    }

    PendingExport { receiver }
}
