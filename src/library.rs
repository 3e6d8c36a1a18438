use image::ImageFormat;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::SaveError;
use crate::exporter::ExportedImage;
use crate::util::time;

/// Where a saved export ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedAsset {
    pub id: Uuid,
    pub path: PathBuf,
}

/// Destination for finished exports. Implementations run on the export
/// worker thread, never on the UI thread.
pub trait PhotoLibrary: Send + Sync {
    fn save(&self, image: &ExportedImage) -> Result<SavedAsset, SaveError>;
}

/// Writes each export as a PNG into one directory
#[derive(Debug, Clone)]
pub struct DirectoryLibrary {
    dir: PathBuf,
}

impl DirectoryLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_name(id: &Uuid) -> String {
        let short = id.simple().to_string();
        format!("inkboard-{}-{}.png", time::timestamp_millis(), &short[..8])
    }
}

impl PhotoLibrary for DirectoryLibrary {
    fn save(&self, image: &ExportedImage) -> Result<SavedAsset, SaveError> {
        fs::create_dir_all(&self.dir)?;

        let id = Uuid::new_v4();
        let path = self.dir.join(Self::file_name(&id));

        image
            .as_rgba()
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|err| match err {
                image::ImageError::IoError(io) => SaveError::Io(io),
                other => SaveError::Encode(other.to_string()),
            })?;

        log::info!("Saved {}x{} export to {}", image.width(), image.height(), path.display());
        Ok(SavedAsset { id, path })
    }
}
