// SPDX-License-Identifier: GPL-3.0-or-later
// src/config.rs
//
// Cropper configuration, persisted as TOML in the user's config directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constant::{
    BACKGROUND_RGB, CONFIG_DIR, CONFIG_FILE, MAX_ZOOM, MIN_ZOOM, OUTPUT_SIZE, VIEWPORT_DIAMETER,
    ZOOM_STEP,
};
use crate::domain::raster::Interpolation;
use crate::domain::transform::{PanLimit, ZoomRange};
use crate::error::ConfigError;

/// Global configuration for a crop session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    /// Diameter of the circular viewport in display units.
    pub viewport_diameter: f32,
    /// Edge length of the exported square PNG.
    pub output_size: u32,
    /// Minimum zoom factor (e.g., 0.2 = 20% of the fitted size).
    pub min_zoom: f32,
    /// Maximum zoom factor (e.g., 4.0 = 400% of the fitted size).
    pub max_zoom: f32,
    /// Zoom change per button press.
    pub zoom_step: f32,
    /// RGB fill behind the image.
    pub background: [u8; 3],
    /// Leave pixels outside the circle fully transparent instead of filled.
    pub transparent_corners: bool,
    /// Resampling used when drawing the source image.
    pub interpolation: Interpolation,
    /// How far the image may be panned away from the viewport.
    pub pan_limit: PanLimit,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            viewport_diameter: VIEWPORT_DIAMETER,
            output_size: OUTPUT_SIZE,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            background: BACKGROUND_RGB,
            transparent_corners: false,
            interpolation: Interpolation::default(),
            pan_limit: PanLimit::default(),
        }
    }
}

impl CropConfig {
    /// Default location: `<config dir>/circlecrop/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the default location, falling back to defaults when no file exists.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.viewport_diameter.is_finite() && self.viewport_diameter > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "viewport_diameter must be positive, got {}",
                self.viewport_diameter
            )));
        }
        if self.output_size == 0 {
            return Err(ConfigError::Invalid("output_size must be positive".into()));
        }
        if !(self.min_zoom.is_finite() && self.max_zoom.is_finite())
            || self.min_zoom <= 0.0
            || self.min_zoom > self.max_zoom
        {
            return Err(ConfigError::Invalid(format!(
                "zoom bounds must satisfy 0 < min <= max, got [{}, {}]",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "zoom_step must be positive, got {}",
                self.zoom_step
            )));
        }
        Ok(())
    }

    pub fn zoom_range(&self) -> ZoomRange {
        ZoomRange::new(self.min_zoom, self.max_zoom)
    }
}
