#![warn(clippy::all, rust_2018_idioms)]

use inkboard::{AppConfig, InkBoardApp};

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let config = AppConfig::load_from_env();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 768.0])
            .with_min_inner_size([320.0, 240.0])
            .with_title("InkBoard"),
        ..Default::default()
    };

    eframe::run_native(
        "InkBoard",
        options,
        Box::new(move |cc| Ok(Box::new(InkBoardApp::new(cc, config)))),
    )
}
