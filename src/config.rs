use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Environment variable naming the JSON config file
pub const CONFIG_ENV: &str = "INKBOARD_CONFIG";

/// Highest export density accepted from the config file
pub const MAX_EXPORT_SCALE: f32 = 8.0;

/// Application settings. Every field has a default, so a config file
/// only needs the keys it wants to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory exported PNGs are written to
    pub output_dir: PathBuf,
    /// Pixel density of exports; `None` uses the window's pixels per point
    pub export_scale: Option<f32>,
    /// How long the "saved" overlay stays up before the confirmation alert
    pub success_banner_secs: f64,
    pub grid_spacing: f32,
    pub grid_dot_size: f32,
    pub pen_width: f32,
    pub pen_color: [u8; 4],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            export_scale: None,
            success_banner_secs: 2.0,
            grid_spacing: 20.0,
            grid_dot_size: 2.0,
            pen_width: 2.0,
            pen_color: [0, 0, 0, 255],
        }
    }
}

fn default_output_dir() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|dirs| dirs.picture_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("InkBoard")
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from `$INKBOARD_CONFIG`, falling back to defaults when the
    /// variable is unset or the file is unusable.
    pub fn load_from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            log::debug!("{} not set, using default config", CONFIG_ENV);
            return Self::default();
        };
        let path = PathBuf::from(path);
        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(err) => {
                log::error!("Ignoring config {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Scale to export at, given the display's pixels per point.
    /// Configured values are capped at [`MAX_EXPORT_SCALE`].
    pub fn export_scale_or(&self, pixels_per_point: f32) -> f32 {
        match self.export_scale {
            Some(scale) if scale.is_finite() && scale > MAX_EXPORT_SCALE => {
                log::warn!("Configured export scale {} is too large, using {}", scale, MAX_EXPORT_SCALE);
                MAX_EXPORT_SCALE
            }
            Some(scale) if scale.is_finite() && scale > 0.0 => scale,
            Some(scale) => {
                log::warn!("Configured export scale {} is invalid, using display scale", scale);
                pixels_per_point
            }
            None => pixels_per_point,
        }
    }
}
