// SPDX-License-Identifier: GPL-3.0-or-later
// src/error.rs
//
// Error types for loading, rasterizing and driving a crop session.

use std::path::PathBuf;

/// The source image could not be turned into pixels.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("unsupported image source: {0}")]
    UnsupportedSource(String),

    #[error("malformed data URI: {0}")]
    MalformedDataUri(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("image has zero width or height ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
}

/// The rasterization backend produced no usable output.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("cannot allocate a {width}x{height} surface")]
    Surface { width: u32, height: u32 },

    #[error("failed to encode PNG: {0}")]
    Png(String),

    #[error("raster backend returned no data")]
    Empty,
}

/// Errors returned by `CropSession::update`.
#[derive(Debug, thiserror::Error)]
pub enum CropError {
    #[error("no image is loaded")]
    NotReady,

    #[error("the crop session has already ended")]
    Finished,

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Invalid or unreadable configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}
