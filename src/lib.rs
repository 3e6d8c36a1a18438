#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod background;
pub mod components;
pub mod config;
pub mod error;
pub mod event;
pub mod exporter;
pub mod geometry;
pub mod grid;
pub mod id_generator;
pub mod ink_canvas;
pub mod library;
pub mod panels;
pub mod picker;
pub mod state;
pub mod stroke;
pub mod surface;
pub mod tool_picker;
pub mod util;
pub mod worker;

pub use app::InkBoardApp;
pub use background::BackgroundImage;
pub use config::AppConfig;
pub use error::{DecodeError, ExportError, JobError, SaveError};
pub use exporter::{ExportedImage, export};
pub use geometry::{CanvasBounds, aspect_fit};
pub use ink_canvas::InkCanvas;
pub use library::{DirectoryLibrary, PhotoLibrary, SavedAsset};
pub use state::{CanvasModel, SaveStatus};
pub use stroke::Stroke;
pub use surface::{DrawingSurface, StrokeLayer, StrokeSnapshot};
pub use tool_picker::{Pen, ToolPicker};
pub use worker::{ExportJob, PendingExport, spawn_export};
