use std::io::Cursor;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use egui::{Color32, pos2, vec2};
use image::{ImageFormat, Rgba, RgbaImage};
use inkboard::picker::{ImageSource, PickResult, PickerSessions, decode_in_background};
use inkboard::{
    BackgroundImage, CanvasModel, DirectoryLibrary, DrawingSurface, ExportedImage, InkCanvas, Pen, PhotoLibrary, SaveError, SaveStatus,
    SavedAsset, spawn_export,
};

/// Keeps exports in memory so tests can compare pixels
#[derive(Default)]
struct KeepingLibrary {
    saved: Mutex<Vec<ExportedImage>>,
}

impl PhotoLibrary for KeepingLibrary {
    fn save(&self, image: &ExportedImage) -> Result<SavedAsset, SaveError> {
        self.saved.lock().unwrap().push(image.clone());
        Ok(SavedAsset {
            id: uuid::Uuid::new_v4(),
            path: "memory".into(),
        })
    }
}

impl KeepingLibrary {
    fn last(&self) -> ExportedImage {
        self.saved.lock().unwrap().last().cloned().unwrap()
    }
}

fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("inkboard-test-{}", uuid::Uuid::new_v4()))
}

fn laid_out_canvas() -> InkCanvas {
    let mut canvas = InkCanvas::new();
    canvas.set_layout_size(vec2(40.0, 30.0));
    canvas.on_pointer_down(
        pos2(5.0, 5.0),
        Pen {
            color: Color32::RED,
            width: 4.0,
        },
    );
    canvas.on_pointer_move(pos2(35.0, 25.0));
    canvas.on_pointer_up();
    canvas
}

fn png_bytes(width: u32, height: u32) -> Arc<[u8]> {
    let mut out = Cursor::new(Vec::new());
    RgbaImage::from_pixel(width, height, Rgba([0, 128, 255, 255]))
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner().into()
}

fn wait_for_pick(sessions: &mut PickerSessions) -> PickResult {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(result) = sessions.poll() {
            return result;
        }
        assert!(Instant::now() < deadline, "picker never reported");
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn save_writes_png_and_walks_status() {
    let dir = temp_dir();
    let library = Arc::new(DirectoryLibrary::new(&dir));
    let mut model = CanvasModel::new(1.5);
    let canvas = laid_out_canvas();

    let job = model.request_export(&canvas, 2.0, 0.0).unwrap();
    assert!(model.is_saving());
    assert!(model.request_export(&canvas, 2.0, 0.0).is_none());

    let report = spawn_export(job, library, || {}).wait();
    model.finish_save(report.result, 3.0);

    let SaveStatus::Succeeded { asset, .. } = model.save_status().clone() else {
        panic!("expected success, got {:?}", model.save_status());
    };
    let saved = image::open(&asset.path).unwrap().to_rgba8();
    assert_eq!(saved.dimensions(), (80, 60));
    assert_eq!(*saved.get_pixel(79, 0), Rgba([255, 255, 255, 255]));
    assert!(saved.pixels().all(|p| p.0[3] == 255));

    assert!(model.tick(4.0).is_some());
    assert!(model.tick(4.5).is_none());
    assert!(matches!(model.save_status(), SaveStatus::Confirmed { .. }));
    model.dismiss_alert();
    assert!(!model.save_status().shows_alert());

    std::fs::remove_dir_all(dir).unwrap();
}

#[test]
fn unwritable_library_surfaces_failure() {
    let blocker = temp_dir();
    std::fs::write(&blocker, b"not a directory").unwrap();
    let library = Arc::new(DirectoryLibrary::new(blocker.join("nested")));

    let mut model = CanvasModel::default();
    let job = model.request_export(&laid_out_canvas(), 1.0, 0.0).unwrap();
    let report = spawn_export(job, library, || {}).wait();
    model.finish_save(report.result, 1.0);

    let status = model.save_status();
    assert!(status.failure_message().is_some());
    assert!(status.success_message().is_none());
    assert!(status.shows_alert());

    std::fs::remove_file(blocker).unwrap();
}

#[test]
fn drawing_after_request_does_not_change_export() {
    let dir = temp_dir();
    let mut model = CanvasModel::default();
    let mut canvas = laid_out_canvas();

    let job = model.request_export(&canvas, 1.0, 0.0).unwrap();
    canvas.reset();

    let report = spawn_export(job, Arc::new(DirectoryLibrary::new(&dir)), || {}).wait();
    let asset = report.result.unwrap();
    let saved = image::open(&asset.path).unwrap().to_rgba8();
    assert!(saved.pixels().any(|p| *p != Rgba([255, 255, 255, 255])));

    std::fs::remove_dir_all(dir).unwrap();
}

#[test]
fn picked_image_becomes_background() {
    let mut sessions = PickerSessions::new();
    let mut model = CanvasModel::default();

    let (session, reply) = sessions.begin();
    decode_in_background(session, ImageSource::Bytes(png_bytes(6, 3)), reply);
    model.apply_pick(wait_for_pick(&mut sessions));

    assert_eq!(model.background().unwrap().size(), vec2(6.0, 3.0));
    assert!(model.notice().is_none());
}

#[test]
fn garbage_bytes_keep_previous_background() {
    let mut sessions = PickerSessions::new();
    let mut model = CanvasModel::default();

    let (session, reply) = sessions.begin();
    decode_in_background(session, ImageSource::Bytes(png_bytes(2, 2)), reply);
    model.apply_pick(wait_for_pick(&mut sessions));
    let id = model.background().unwrap().id();

    let (session, reply) = sessions.begin();
    decode_in_background(session, ImageSource::Bytes(Arc::from(&b"not an image"[..])), reply);
    model.apply_pick(wait_for_pick(&mut sessions));

    assert_eq!(model.background().unwrap().id(), id);
    assert!(model.notice().is_some());
}

#[test]
fn cancelled_session_never_applies() {
    let mut sessions = PickerSessions::new();
    let (session, reply) = sessions.begin();
    sessions.cancel();
    decode_in_background(session, ImageSource::Bytes(png_bytes(2, 2)), reply);

    std::thread::sleep(Duration::from_millis(200));
    assert!(sessions.poll().is_none());
}

#[test]
fn clear_then_export_matches_a_fresh_canvas() {
    let library = KeepingLibrary::default();

    let mut model = CanvasModel::default();
    let mut canvas = laid_out_canvas();
    let photo = RgbaImage::from_pixel(80, 20, Rgba([0, 128, 255, 255]));
    model.set_background(BackgroundImage::from_rgba(photo).unwrap());
    model.clear(&mut canvas);
    model.clear(&mut canvas);
    model.request_export(&canvas, 2.0, 0.0).unwrap().run(&library).unwrap();
    let cleared = library.last();

    let mut fresh_model = CanvasModel::default();
    let mut fresh_canvas = InkCanvas::new();
    fresh_canvas.set_layout_size(vec2(40.0, 30.0));
    fresh_model.request_export(&fresh_canvas, 2.0, 0.0).unwrap().run(&library).unwrap();

    assert_eq!(cleared, library.last());
    assert!(cleared.as_rgba().pixels().all(|p| *p == Rgba([255, 255, 255, 255])));
}
