// SPDX-License-Identifier: GPL-3.0-or-later
// src/lib.rs
//
// Circular portrait cropper: pan and zoom an image inside a round viewport
// and export exactly what is visible as a square PNG.

pub mod app;
pub mod config;
pub mod constant;
pub mod domain;
pub mod error;

pub use app::{CropMessage, CropSession, PointerEvent, PointerPhase, SessionState};
pub use config::CropConfig;
pub use domain::raster::CroppedImage;
pub use domain::source::{DecodingLoader, ImageLoader, ImageSource, SourceImage};
pub use error::{ConfigError, CropError, EncodeError, LoadError};
