// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/source.rs
//
// Source image references and the loader that turns them into pixels.

use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader, RgbaImage};
use tiny_skia::{ColorU8, IntSize, Pixmap};

use crate::error::LoadError;

/// A caller-supplied reference to the image to crop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// `data:<mime>;base64,<payload>`
    DataUri(String),
    /// Local file, given as a plain path or a `file://` URI.
    Path(PathBuf),
    /// Any other URI (http, blob, ...). Fetching these is the host's job.
    Remote(String),
}

impl ImageSource {
    /// Classify a reference string. Never fails; unusable references fail at load time.
    pub fn parse(reference: &str) -> Self {
        let trimmed = reference.trim();
        if has_data_prefix(trimmed) {
            return Self::DataUri(trimmed.to_string());
        }
        if let Some(path) = trimmed.strip_prefix("file://") {
            return Self::Path(PathBuf::from(path));
        }
        if trimmed.contains("://") {
            return Self::Remote(trimmed.to_string());
        }
        Self::Path(PathBuf::from(trimmed))
    }

    /// Read a file into an embedded data URI.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mime = image::guess_format(&bytes)
            .or_else(|_| ImageFormat::from_path(path))
            .map(|format| format.to_mime_type())
            .unwrap_or("application/octet-stream");

        Ok(Self::DataUri(format!(
            "data:{mime};base64,{}",
            BASE64.encode(&bytes)
        )))
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Payloads can be megabytes long.
            Self::DataUri(uri) => {
                let header = uri.split(',').next().unwrap_or_default();
                write!(f, "{header},... ({} bytes)", uri.len())
            }
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Remote(uri) => write!(f, "{uri}"),
        }
    }
}

/// Decoded source pixels. Immutable once loaded.
///
/// Keeps a premultiplied copy for the raster surface so the conversion
/// happens once per load rather than once per frame.
#[derive(Clone)]
pub struct SourceImage {
    pixels: RgbaImage,
    pixmap: Pixmap,
}

impl fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.dimensions();
        write!(f, "SourceImage({width}x{height})")
    }
}

impl SourceImage {
    pub fn new(pixels: RgbaImage) -> Result<Self, LoadError> {
        let (width, height) = pixels.dimensions();
        let pixmap = premultiplied_pixmap(&pixels).ok_or(LoadError::EmptyImage { width, height })?;
        Ok(Self { pixels, pixmap })
    }

    pub fn from_dynamic(image: DynamicImage) -> Result<Self, LoadError> {
        Self::new(image.to_rgba8())
    }

    /// Natural pixel dimensions (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub(crate) fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

/// `None` when either side is zero.
fn premultiplied_pixmap(pixels: &RgbaImage) -> Option<Pixmap> {
    let size = IntSize::from_wh(pixels.width(), pixels.height())?;
    let data = pixels
        .pixels()
        .flat_map(|pixel| {
            let [r, g, b, a] = pixel.0;
            let color = ColorU8::from_rgba(r, g, b, a).premultiply();
            [color.red(), color.green(), color.blue(), color.alpha()]
        })
        .collect();
    Pixmap::from_vec(data, size)
}

/// Turns an `ImageSource` into decoded pixels.
pub trait ImageLoader {
    fn load(&self, source: &ImageSource) -> Result<SourceImage, LoadError>;
}

/// Default loader: decodes data URIs and local files with `image`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodingLoader;

impl ImageLoader for DecodingLoader {
    fn load(&self, source: &ImageSource) -> Result<SourceImage, LoadError> {
        let image = match source {
            ImageSource::DataUri(uri) => {
                let bytes = decode_data_uri(uri)?;
                image::load_from_memory(&bytes)?
            }
            ImageSource::Path(path) => ImageReader::open(path)
                .and_then(ImageReader::with_guessed_format)
                .map_err(|source| LoadError::Io {
                    path: path.clone(),
                    source,
                })?
                .decode()?,
            ImageSource::Remote(uri) => return Err(LoadError::UnsupportedSource(uri.clone())),
        };

        log::debug!("decoded {source}: {}x{}", image.width(), image.height());
        SourceImage::from_dynamic(image)
    }
}

/// Extract the payload bytes of a base64 data URI.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, LoadError> {
    let rest = uri
        .get(5..)
        .filter(|_| has_data_prefix(uri))
        .ok_or_else(|| LoadError::MalformedDataUri("missing data: prefix".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| LoadError::MalformedDataUri("missing ',' separator".into()))?;

    if !header
        .split(';')
        .any(|param| param.eq_ignore_ascii_case("base64"))
    {
        return Err(LoadError::MalformedDataUri(
            "only base64 payloads are supported".into(),
        ));
    }

    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    BASE64
        .decode(compact.as_bytes())
        .map_err(|e| LoadError::MalformedDataUri(e.to_string()))
}

fn has_data_prefix(reference: &str) -> bool {
    reference
        .get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

/// Encode PNG bytes as a data URI.
pub fn png_data_uri(png: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        crate::constant::PNG_MIME,
        BASE64.encode(png)
    )
}

/// Encode an in-memory image as a PNG data URI (test and host convenience).
pub fn encode_png_data_uri(image: &RgbaImage) -> Result<String, image::ImageError> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(png_data_uri(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn parse_classifies_references() {
        assert!(matches!(
            ImageSource::parse("data:image/png;base64,AAAA"),
            ImageSource::DataUri(_)
        ));
        assert_eq!(
            ImageSource::parse("file:///tmp/a.png"),
            ImageSource::Path(PathBuf::from("/tmp/a.png"))
        );
        assert_eq!(
            ImageSource::parse("photos/b.jpg"),
            ImageSource::Path(PathBuf::from("photos/b.jpg"))
        );
        assert!(matches!(
            ImageSource::parse("https://example.com/c.png"),
            ImageSource::Remote(_)
        ));
    }

    #[test]
    fn data_uri_round_trips_through_loader() {
        let image = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        let uri = encode_png_data_uri(&image).unwrap();

        let loaded = DecodingLoader.load(&ImageSource::parse(&uri)).unwrap();
        assert_eq!(loaded.dimensions(), (3, 2));
        assert_eq!(loaded.pixels().get_pixel(2, 1), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn non_base64_data_uri_is_rejected() {
        let err = decode_data_uri("data:image/svg+xml,<svg/>").unwrap_err();
        assert!(matches!(err, LoadError::MalformedDataUri(_)));
    }

    #[test]
    fn garbage_payload_is_a_decode_error() {
        let uri = format!("data:image/png;base64,{}", BASE64.encode(b"not an image"));
        let err = DecodingLoader.load(&ImageSource::DataUri(uri)).unwrap_err();
        assert!(matches!(err, LoadError::Decode(_)));
    }

    #[test]
    fn remote_sources_are_unsupported() {
        let err = DecodingLoader
            .load(&ImageSource::parse("https://example.com/c.png"))
            .unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedSource(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = DecodingLoader
            .load(&ImageSource::parse("/definitely/not/here.png"))
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn from_file_embeds_mime_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("face.png");
        RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]))
            .save(&path)
            .unwrap();

        let source = ImageSource::from_file(&path).unwrap();
        let ImageSource::DataUri(uri) = &source else {
            panic!("expected data URI, got {source:?}");
        };
        assert!(uri.starts_with("data:image/png;base64,"));
        assert_eq!(DecodingLoader.load(&source).unwrap().dimensions(), (4, 4));
    }

    #[test]
    fn pixmap_is_premultiplied() {
        let image = SourceImage::new(RgbaImage::from_pixel(2, 2, Rgba([200, 100, 0, 128]))).unwrap();
        let pixel = image.pixmap().pixel(1, 1).unwrap();
        assert_eq!(pixel.alpha(), 128);
        assert!((99..=101).contains(&pixel.red()), "{pixel:?}");
        assert_eq!(pixel.demultiply().alpha(), 128);
    }

    #[test]
    fn empty_pixels_are_rejected() {
        let err = SourceImage::new(RgbaImage::new(0, 5)).unwrap_err();
        assert!(matches!(err, LoadError::EmptyImage { width: 0, height: 5 }));
    }
}
