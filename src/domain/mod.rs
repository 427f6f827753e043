// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/mod.rs
//
// Pure cropping model: source images, view transform, rasterization.

pub mod raster;
pub mod source;
pub mod transform;
