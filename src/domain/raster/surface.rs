// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/raster/surface.rs
//
// 2D raster surface for the crop pipeline: circular clip, fill, scaled image
// draw and PNG encode, backed by a tiny-skia pixmap.

use image::{Rgba, RgbaImage};
use tiny_skia::{
    FillRule, FilterQuality, Mask, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Transform,
};

use super::Interpolation;
use crate::domain::source::SourceImage;
use crate::error::EncodeError;

/// Shrinks the anti-aliased clip edge so no covered pixel has its center
/// outside the nominal circle.
const CLIP_INSET: f32 = 0.75;

/// Circle in surface pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub cx: f32,
    pub cy: f32,
    pub radius: f32,
}

/// Destination rectangle for a scaled image draw, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl DrawRect {
    fn is_drawable(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }
}

/// What the crop pipeline needs from a 2D graphics backend.
pub trait RasterSurface {
    /// Surface size (width, height) in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Restrict every later fill and draw to `circle`.
    fn clip(&mut self, circle: Circle);

    /// Paint every pixel inside the clip with `color`.
    fn fill(&mut self, color: Rgba<u8>);

    /// Draw `image` scaled into `rect`, compositing over what is already there.
    fn draw_image(&mut self, image: &SourceImage, rect: DrawRect);

    /// Encode the surface contents as PNG.
    fn encode_png(&self) -> Result<Vec<u8>, EncodeError>;
}

/// CPU surface backed by a `tiny_skia::Pixmap`.
pub struct PixelSurface {
    pixmap: Pixmap,
    clip: Option<Mask>,
    quality: FilterQuality,
}

impl std::fmt::Debug for PixelSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelSurface")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .field("clipped", &self.clip.is_some())
            .field("quality", &self.quality)
            .finish()
    }
}

impl PixelSurface {
    /// A fully transparent surface.
    pub fn new(width: u32, height: u32, interpolation: Interpolation) -> Result<Self, EncodeError> {
        let pixmap =
            Pixmap::new(width, height).ok_or(EncodeError::Surface { width, height })?;
        let quality = match interpolation {
            Interpolation::Nearest => FilterQuality::Nearest,
            Interpolation::Bilinear => FilterQuality::Bilinear,
        };
        Ok(Self {
            pixmap,
            clip: None,
            quality,
        })
    }

    /// Copy the contents out as straight-alpha RGBA.
    pub fn into_image(self) -> RgbaImage {
        // tiny-skia stores premultiplied alpha; `image` expects straight alpha.
        let (width, height) = (self.pixmap.width(), self.pixmap.height());
        let data = self
            .pixmap
            .pixels()
            .iter()
            .flat_map(|pixel| {
                let color = pixel.demultiply();
                [color.red(), color.green(), color.blue(), color.alpha()]
            })
            .collect();
        RgbaImage::from_raw(width, height, data).unwrap_or_else(|| RgbaImage::new(width, height))
    }
}

impl RasterSurface for PixelSurface {
    fn dimensions(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    fn clip(&mut self, circle: Circle) {
        let Some(mut mask) = Mask::new(self.pixmap.width(), self.pixmap.height()) else {
            return;
        };
        // A circle too small to build leaves the mask empty: everything is clipped.
        if let Some(path) = PathBuilder::from_circle(circle.cx, circle.cy, circle.radius - CLIP_INSET)
        {
            mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
        }
        self.clip = Some(mask);
    }

    fn fill(&mut self, color: Rgba<u8>) {
        let [r, g, b, a] = color.0;
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = false;

        let Some(rect) = Rect::from_xywh(
            0.0,
            0.0,
            self.pixmap.width() as f32,
            self.pixmap.height() as f32,
        ) else {
            return;
        };
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), self.clip.as_ref());
    }

    fn draw_image(&mut self, image: &SourceImage, rect: DrawRect) {
        if !rect.is_drawable() {
            return;
        }
        let (src_w, src_h) = image.dimensions();
        let transform = Transform::from_row(
            rect.width / src_w as f32,
            0.0,
            0.0,
            rect.height / src_h as f32,
            rect.x,
            rect.y,
        );
        let paint = PixmapPaint {
            quality: self.quality,
            ..PixmapPaint::default()
        };
        self.pixmap.draw_pixmap(
            0,
            0,
            image.pixmap().as_ref(),
            &paint,
            transform,
            self.clip.as_ref(),
        );
    }

    fn encode_png(&self) -> Result<Vec<u8>, EncodeError> {
        let bytes = self
            .pixmap
            .encode_png()
            .map_err(|e| EncodeError::Png(e.to_string()))?;
        if bytes.is_empty() {
            return Err(EncodeError::Empty);
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn source(pixels: RgbaImage) -> SourceImage {
        SourceImage::new(pixels).unwrap()
    }

    fn rect(x: f32, y: f32, width: f32, height: f32) -> DrawRect {
        DrawRect {
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn zero_sized_surface_is_rejected() {
        let err = PixelSurface::new(0, 10, Interpolation::Nearest).unwrap_err();
        assert!(matches!(err, EncodeError::Surface { width: 0, .. }));
    }

    #[test]
    fn fill_respects_clip() {
        let mut surface = PixelSurface::new(10, 10, Interpolation::Nearest).unwrap();
        surface.clip(Circle {
            cx: 5.0,
            cy: 5.0,
            radius: 5.0,
        });
        surface.fill(WHITE);

        let image = surface.into_image();
        assert_eq!(image.get_pixel(5, 5), &WHITE);
        assert_eq!(image.get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
        assert_eq!(image.get_pixel(9, 9), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn clip_never_covers_pixel_centers_outside_circle() {
        let mut surface = PixelSurface::new(64, 64, Interpolation::Nearest).unwrap();
        surface.clip(Circle {
            cx: 32.0,
            cy: 32.0,
            radius: 32.0,
        });
        surface.fill(RED);

        for (x, y, pixel) in surface.into_image().enumerate_pixels() {
            let dx = x as f32 + 0.5 - 32.0;
            let dy = y as f32 + 0.5 - 32.0;
            if dx * dx + dy * dy > 32.0 * 32.0 {
                assert_eq!(pixel.0[3], 0, "({x}, {y})");
            }
        }
    }

    #[test]
    fn degenerate_clip_hides_everything() {
        let mut surface = PixelSurface::new(8, 8, Interpolation::Nearest).unwrap();
        surface.clip(Circle {
            cx: 4.0,
            cy: 4.0,
            radius: 0.0,
        });
        surface.fill(RED);
        assert!(surface.into_image().pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn draw_scales_into_rect() {
        let mut pixels = RgbaImage::from_pixel(2, 1, RED);
        pixels.put_pixel(1, 0, BLUE);

        let mut surface = PixelSurface::new(8, 4, Interpolation::Nearest).unwrap();
        surface.draw_image(&source(pixels), rect(0.0, 0.0, 8.0, 4.0));

        let image = surface.into_image();
        assert_eq!(image.get_pixel(1, 2), &RED);
        assert_eq!(image.get_pixel(6, 2), &BLUE);
    }

    #[test]
    fn draw_outside_rect_leaves_pixels_alone() {
        let mut surface = PixelSurface::new(10, 10, Interpolation::Bilinear).unwrap();
        surface.fill(WHITE);
        surface.draw_image(
            &source(RgbaImage::from_pixel(4, 4, RED)),
            rect(6.0, 6.0, 4.0, 4.0),
        );

        let image = surface.into_image();
        assert_eq!(image.get_pixel(2, 2), &WHITE);
        assert_eq!(image.get_pixel(8, 8), &RED);
    }

    #[test]
    fn non_finite_rect_draws_nothing() {
        let mut surface = PixelSurface::new(4, 4, Interpolation::Bilinear).unwrap();
        surface.fill(WHITE);
        surface.draw_image(
            &source(RgbaImage::from_pixel(2, 2, RED)),
            rect(f32::NAN, 0.0, 4.0, 4.0),
        );
        assert!(surface.into_image().pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn transparent_source_shows_background() {
        let mut surface = PixelSurface::new(4, 4, Interpolation::Bilinear).unwrap();
        surface.fill(WHITE);
        surface.draw_image(
            &source(RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0]))),
            rect(0.0, 0.0, 4.0, 4.0),
        );
        assert_eq!(surface.into_image().get_pixel(1, 1), &WHITE);
    }

    #[test]
    fn half_alpha_blends_over_white() {
        let mut surface = PixelSurface::new(4, 4, Interpolation::Nearest).unwrap();
        surface.fill(WHITE);
        surface.draw_image(
            &source(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 128]))),
            rect(0.0, 0.0, 4.0, 4.0),
        );

        let blended = *surface.into_image().get_pixel(2, 2);
        assert_eq!(blended.0[3], 255);
        assert!((120..=135).contains(&blended.0[0]), "{blended:?}");
    }

    #[test]
    fn encode_produces_png() {
        let surface = PixelSurface::new(3, 3, Interpolation::Nearest).unwrap();
        let bytes = surface.encode_png().unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
