pub mod canvas_panel;
pub mod header;
pub mod overlays;

pub use canvas_panel::{BackgroundTexture, CanvasView, canvas_panel};
pub use header::{HEADER_HEIGHT, HeaderAction, HeaderState, header_panel};
pub use overlays::overlays;
