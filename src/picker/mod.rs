//! Background photo selection.
//!
//! A pick is asynchronous: the picker reports on a channel tagged with the
//! [`SessionId`] it was started with, and [`PickerSessions`] only lets the
//! newest session through. A cancelled or superseded session delivers
//! nothing.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::background::BackgroundImage;
use crate::error::DecodeError;

mod dialog;
mod dropped_files;

pub use dialog::FileDialogPicker;
pub use dropped_files::DropHandler;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

#[derive(Debug)]
pub enum PickResult {
    Picked(BackgroundImage),
    /// The user closed the picker without choosing anything
    Cancelled,
    Failed(DecodeError),
}

#[derive(Debug)]
pub struct PickOutcome {
    pub session: SessionId,
    pub result: PickResult,
}

pub type PickSender = Sender<PickOutcome>;

/// Something that can ask the user for zero or one image
pub trait ImagePicker {
    /// Start picking. Must return promptly and report exactly once on `reply`.
    fn present(&self, session: SessionId, reply: PickSender);
}

/// Where picked image data lives
#[derive(Debug, Clone)]
pub enum ImageSource {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

/// Read and decode `source`. Runs on whatever thread the picker uses.
pub fn load_source(source: ImageSource) -> PickResult {
    let decoded = match source {
        ImageSource::Path(path) => match std::fs::read(&path) {
            Ok(bytes) => BackgroundImage::decode(&bytes),
            Err(err) => {
                log::error!("Failed to read image file {}: {}", path.display(), err);
                Err(DecodeError::Io(err.to_string()))
            }
        },
        ImageSource::Bytes(bytes) => BackgroundImage::decode(&bytes),
    };

    match decoded {
        Ok(image) => PickResult::Picked(image),
        Err(err) => {
            log::warn!("Picked image could not be decoded: {}", err);
            PickResult::Failed(err)
        }
    }
}

/// Decode `source` on a short-lived thread and report to `reply`.
pub fn decode_in_background(session: SessionId, source: ImageSource, reply: PickSender) {
    let spawned = std::thread::Builder::new()
        .name("inkboard-decode".to_owned())
        .spawn({
            let reply = reply.clone();
            move || {
                let result = load_source(source);
                let _ = reply.send(PickOutcome { session, result });
            }
        });

    if let Err(err) = spawned {
        log::error!("Failed to spawn decode thread: {}", err);
        let _ = reply.send(PickOutcome {
            session,
            result: PickResult::Failed(DecodeError::Io(err.to_string())),
        });
    }
}

/// Tracks which pick the UI is still waiting for
#[derive(Debug)]
pub struct PickerSessions {
    next_id: u64,
    current: Option<SessionId>,
    sender: PickSender,
    receiver: Receiver<PickOutcome>,
}

impl Default for PickerSessions {
    fn default() -> Self {
        Self::new()
    }
}

impl PickerSessions {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            next_id: 1,
            current: None,
            sender,
            receiver,
        }
    }

    /// Open a new session, superseding any open one.
    pub fn begin(&mut self) -> (SessionId, PickSender) {
        let id = SessionId(self.next_id);
        self.next_id += 1;
        if let Some(old) = self.current.replace(id) {
            log::debug!("Pick session {:?} superseded by {:?}", old, id);
        }
        (id, self.sender.clone())
    }

    /// Forget the open session; its result will be discarded when it arrives.
    pub fn cancel(&mut self) {
        if let Some(id) = self.current.take() {
            log::debug!("Pick session {:?} cancelled", id);
        }
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Take the open session's result if it has arrived. Each session
    /// yields at most one result; stale outcomes are dropped.
    pub fn poll(&mut self) -> Option<PickResult> {
        while let Ok(outcome) = self.receiver.try_recv() {
            if self.current == Some(outcome.session) {
                self.current = None;
                return Some(outcome.result);
            }
            log::warn!("Dropping result of stale pick session {:?}", outcome.session);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;
    use std::time::{Duration, Instant};

    fn png(w: u32, h: u32) -> Arc<[u8]> {
        let mut out = Cursor::new(Vec::new());
        RgbaImage::from_pixel(w, h, Rgba([1, 2, 3, 255]))
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner().into()
    }

    fn wait_for(sessions: &mut PickerSessions) -> PickResult {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(result) = sessions.poll() {
                return result;
            }
            assert!(Instant::now() < deadline, "no pick result");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn current_session_delivers_once() {
        let mut sessions = PickerSessions::new();
        let (id, reply) = sessions.begin();
        reply.send(PickOutcome { session: id, result: PickResult::Cancelled }).unwrap();
        reply.send(PickOutcome { session: id, result: PickResult::Cancelled }).unwrap();

        assert!(matches!(sessions.poll(), Some(PickResult::Cancelled)));
        assert!(!sessions.is_open());
        assert!(sessions.poll().is_none());
    }

    #[test]
    fn superseded_session_delivers_nothing() {
        let mut sessions = PickerSessions::new();
        let (old, reply) = sessions.begin();
        let (new, _) = sessions.begin();
        assert_ne!(old, new);

        reply.send(PickOutcome { session: old, result: PickResult::Cancelled }).unwrap();
        assert!(sessions.poll().is_none());
        assert!(sessions.is_open());
    }

    #[test]
    fn cancelled_session_delivers_nothing() {
        let mut sessions = PickerSessions::new();
        let (id, reply) = sessions.begin();
        sessions.cancel();
        reply.send(PickOutcome { session: id, result: PickResult::Cancelled }).unwrap();
        assert!(sessions.poll().is_none());
    }

    #[test]
    fn background_decode_delivers_image() {
        let mut sessions = PickerSessions::new();
        let (id, reply) = sessions.begin();
        decode_in_background(id, ImageSource::Bytes(png(3, 2)), reply);

        match wait_for(&mut sessions) {
            PickResult::Picked(image) => assert_eq!(image.size(), egui::vec2(3.0, 2.0)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn undecodable_bytes_fail() {
        let result = load_source(ImageSource::Bytes(Arc::from(&b"nope"[..])));
        assert!(matches!(result, PickResult::Failed(DecodeError::Unsupported(_))));
    }

    #[test]
    fn missing_path_fails() {
        let result = load_source(ImageSource::Path("/no/such/picture.png".into()));
        assert!(matches!(result, PickResult::Failed(DecodeError::Io(_))));
    }
}
