use std::path::PathBuf;

/// Notifications emitted by [`crate::state::CanvasModel`] whenever its
/// observable state changes
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    BackgroundChanged {
        present: bool,
    },
    Cleared,
    ImportFailed {
        message: String,
    },
    SaveStarted,
    SaveSucceeded {
        path: PathBuf,
    },
    SaveFailed {
        message: String,
    },
    /// The success overlay timed out and the confirmation alert opened
    SaveConfirmed,
    AlertDismissed,
    NoticeDismissed,
}
