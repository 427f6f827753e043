// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/transform.rs
//
// Pan/zoom state of the image inside the circular viewport.

use serde::{Deserialize, Serialize};

use crate::constant::DEFAULT_ZOOM;

/// Translation of the image center relative to the viewport center, in display units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

impl Offset {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Inclusive bounds for the zoom factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomRange {
    min: f32,
    max: f32,
}

impl ZoomRange {
    /// Bounds are expected to be validated already (`0 < min <= max`).
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn clamp(&self, zoom: f32) -> f32 {
        zoom.clamp(self.min, self.max)
    }
}

/// How far the image may be dragged away from the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanLimit {
    /// No clamping; the image may leave the viewport entirely.
    #[default]
    Free,
    /// The image must always cover the whole viewport when it is large enough to.
    Cover,
}

/// User-controlled part of the view: pan offset and zoom factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub offset: Offset,
    pub zoom: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            offset: Offset::ZERO,
            zoom: DEFAULT_ZOOM,
        }
    }
}

/// Scale that makes the shorter image axis span exactly `diameter`.
pub fn base_scale(natural_width: u32, natural_height: u32, diameter: f32) -> f32 {
    let shorter = natural_width.min(natural_height).max(1);
    diameter / shorter as f32
}

/// Where the image box sits inside the viewport box, in display units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewLayout {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Fixed geometry of one loaded image in one viewport.
///
/// Computed once per source image; only `Transform` changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Framing {
    natural_width: u32,
    natural_height: u32,
    diameter: f32,
    base_scale: f32,
}

impl Framing {
    pub fn new(natural_width: u32, natural_height: u32, diameter: f32) -> Self {
        Self {
            natural_width,
            natural_height,
            diameter,
            base_scale: base_scale(natural_width, natural_height, diameter),
        }
    }

    pub fn natural_size(&self) -> (u32, u32) {
        (self.natural_width, self.natural_height)
    }

    pub fn diameter(&self) -> f32 {
        self.diameter
    }

    pub fn base_scale(&self) -> f32 {
        self.base_scale
    }

    /// Base scale times zoom: display units per source pixel.
    pub fn effective_scale(&self, transform: &Transform) -> f32 {
        self.base_scale * transform.zoom
    }

    /// Displayed image size (width, height) in display units.
    pub fn display_size(&self, transform: &Transform) -> (f32, f32) {
        let scale = self.effective_scale(transform);
        (
            self.natural_width as f32 * scale,
            self.natural_height as f32 * scale,
        )
    }

    /// Image box relative to the top-left corner of the viewport box.
    pub fn preview_layout(&self, transform: &Transform) -> PreviewLayout {
        let (width, height) = self.display_size(transform);
        let center = self.diameter / 2.0;
        PreviewLayout {
            left: center + transform.offset.x - width / 2.0,
            top: center + transform.offset.y - height / 2.0,
            width,
            height,
        }
    }

    /// Clamp the offset according to `limit`.
    pub fn limit_pan(&self, transform: &mut Transform, limit: PanLimit) {
        match limit {
            PanLimit::Free => {}
            PanLimit::Cover => {
                let (width, height) = self.display_size(transform);
                let max_x = ((width - self.diameter) / 2.0).max(0.0);
                let max_y = ((height - self.diameter) / 2.0).max(0.0);
                transform.offset.x = transform.offset.x.clamp(-max_x, max_x);
                transform.offset.y = transform.offset.y.clamp(-max_y, max_y);
            }
        }
    }
}
