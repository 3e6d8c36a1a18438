use thiserror::Error;

/// Errors raised before compositing starts
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExportError {
    #[error("Canvas bounds must be positive, got {width}x{height}")]
    InvalidBounds { width: f32, height: f32 },

    #[error("Export scale must be positive, got {0}")]
    InvalidScale(f32),

    #[error("Export of {width}x{height} pixels exceeds the {max_side}px / {max_pixels} pixel limit")]
    TooLarge {
        width: f32,
        height: f32,
        max_side: u32,
        max_pixels: u64,
    },
}

/// Errors that can occur while turning picked data into a background
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Unsupported or corrupt image: {0}")]
    Unsupported(#[from] image::ImageError),

    #[error("Image has no pixels")]
    EmptyImage,

    #[error("Failed to read image: {0}")]
    Io(String),
}

/// Errors reported by the photo library collaborator
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Export worker stopped before reporting a result")]
    WorkerLost,
}

/// Anything that can go wrong between pressing save and the file landing on disk
#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Save(#[from] SaveError),
}

/// Errors while loading the JSON config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;
