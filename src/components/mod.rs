mod header_button;

pub use header_button::HeaderButton;
