// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/raster/mod.rs
//
// Rasterize the current viewport into a square, circle-clipped PNG.

mod surface;

pub use surface::{Circle, DrawRect, PixelSurface, RasterSurface};

use std::path::Path;

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::domain::source::{SourceImage, png_data_uri};
use crate::domain::transform::{Framing, Transform};
use crate::error::EncodeError;

/// Resampling used when the source image is scaled onto the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    Nearest,
    #[default]
    Bilinear,
}

/// Fill behaviour for a render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub background: Rgba<u8>,
    /// Leave the corners outside the circle transparent instead of background-filled.
    pub transparent_corners: bool,
}

/// Draw what is visible in the viewport onto `surface`.
///
/// The surface is treated as a square of its width; the viewport diameter maps
/// onto that width and the pan offset is scaled by the same factor.
pub fn render_crop<S: RasterSurface>(
    surface: &mut S,
    source: &SourceImage,
    framing: &Framing,
    transform: &Transform,
    options: &RenderOptions,
) {
    let size = surface.dimensions().0 as f32;
    let half = size / 2.0;

    if !options.transparent_corners {
        surface.fill(options.background);
    }
    surface.clip(Circle {
        cx: half,
        cy: half,
        radius: half,
    });
    surface.fill(options.background);

    let scale_factor = size / framing.diameter();
    let final_scale = framing.effective_scale(transform) * scale_factor;
    let (natural_width, natural_height) = framing.natural_size();
    let width = natural_width as f32 * final_scale;
    let height = natural_height as f32 * final_scale;
    let center_x = half + transform.offset.x * scale_factor;
    let center_y = half + transform.offset.y * scale_factor;

    surface.draw_image(
        source,
        DrawRect {
            x: center_x - width / 2.0,
            y: center_y - height / 2.0,
            width,
            height,
        },
    );
}

/// Final output handed to the confirm callback.
#[derive(Clone, PartialEq, Eq)]
pub struct CroppedImage {
    png: Vec<u8>,
    size: u32,
}

impl std::fmt::Debug for CroppedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CroppedImage({0}x{0}, {1} bytes)", self.size, self.png.len())
    }
}

impl CroppedImage {
    /// Encode a rendered surface as PNG.
    pub fn encode<S: RasterSurface>(surface: &S) -> Result<Self, EncodeError> {
        let png = surface.encode_png()?;
        Ok(Self {
            png,
            size: surface.dimensions().0,
        })
    }

    /// Edge length in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    /// `data:image/png;base64,...`
    pub fn to_data_uri(&self) -> String {
        png_data_uri(&self.png)
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, &self.png)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transform::Offset;
    use image::RgbaImage;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn options() -> RenderOptions {
        RenderOptions {
            background: WHITE,
            transparent_corners: false,
        }
    }

    #[test]
    fn fitted_square_fills_circle() {
        let source = SourceImage::new(RgbaImage::from_pixel(50, 50, RED)).unwrap();
        let framing = Framing::new(50, 50, 220.0);
        let mut surface = PixelSurface::new(100, 100, Interpolation::Bilinear).unwrap();

        render_crop(
            &mut surface,
            &source,
            &framing,
            &Transform::default(),
            &options(),
        );

        let image = surface.into_image();
        assert_eq!(image.get_pixel(50, 50), &RED);
        assert_eq!(image.get_pixel(50, 2), &RED);
        assert_eq!(image.get_pixel(0, 0), &WHITE);
    }

    #[test]
    fn panned_away_image_leaves_only_background() {
        let source = SourceImage::new(RgbaImage::from_pixel(50, 50, RED)).unwrap();
        let framing = Framing::new(50, 50, 220.0);
        let transform = Transform {
            offset: Offset::new(1000.0, 0.0),
            zoom: 1.0,
        };
        let mut surface = PixelSurface::new(64, 64, Interpolation::Nearest).unwrap();

        render_crop(&mut surface, &source, &framing, &transform, &options());

        assert!(surface.into_image().pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn transparent_corners_stay_clear() {
        let source = SourceImage::new(RgbaImage::from_pixel(10, 10, RED)).unwrap();
        let framing = Framing::new(10, 10, 220.0);
        let mut surface = PixelSurface::new(40, 40, Interpolation::Nearest).unwrap();

        render_crop(
            &mut surface,
            &source,
            &framing,
            &Transform::default(),
            &RenderOptions {
                background: WHITE,
                transparent_corners: true,
            },
        );

        let image = surface.into_image();
        assert_eq!(image.get_pixel(0, 0).0[3], 0);
        assert_eq!(image.get_pixel(20, 20), &RED);
    }

    #[test]
    fn cropped_image_data_uri() {
        let surface = PixelSurface::new(4, 4, Interpolation::Nearest).unwrap();
        let cropped = CroppedImage::encode(&surface).unwrap();
        assert_eq!(cropped.size(), 4);
        assert!(cropped.to_data_uri().starts_with("data:image/png;base64,"));
    }
}
