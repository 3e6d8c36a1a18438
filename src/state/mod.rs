mod model;
mod save_status;

pub use model::CanvasModel;
pub use save_status::SaveStatus;
