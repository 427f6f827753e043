// SPDX-License-Identifier: GPL-3.0-or-later
// src/constant.rs
//
// Cropper constants that should not be changed by the user.

/// Diameter of the circular viewport in display units.
pub const VIEWPORT_DIAMETER: f32 = 220.0;

/// Edge length of the exported square raster in pixels.
pub const OUTPUT_SIZE: u32 = 400;

/// Lower zoom bound (relative to the fit-to-viewport base scale).
pub const MIN_ZOOM: f32 = 0.2;

/// Upper zoom bound (relative to the fit-to-viewport base scale).
pub const MAX_ZOOM: f32 = 4.0;

/// Zoom applied to a freshly loaded image.
pub const DEFAULT_ZOOM: f32 = 1.0;

/// Zoom change per +/- button press.
pub const ZOOM_STEP: f32 = 0.1;

/// Background seen through transparent pixels and exposed margins (white).
pub const BACKGROUND_RGB: [u8; 3] = [255, 255, 255];

/// Tolerance for scale comparisons.
pub const SCALE_EPSILON: f32 = 0.0001;

/// MIME type of the exported raster.
pub const PNG_MIME: &str = "image/png";

/// Config directory name under the platform config dir.
pub const CONFIG_DIR: &str = "circlecrop";

/// Config file name.
pub const CONFIG_FILE: &str = "config.toml";
