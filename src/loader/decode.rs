//! Raster decoding for the standard image formats (PNG, JPEG, BMP, TIFF,
//! WebP, GIF).

use image::ImageFormat;

use super::{ImageDimensions, LoadError};

/// A decoded RGBA8 image.
#[derive(Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8 pixels
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    pub fn dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.width, self.height)
    }
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pixels", &format_args!("{} bytes", self.pixels.len()))
            .finish()
    }
}

/// Identify the format from the leading magic bytes.
pub fn sniff_format(data: &[u8]) -> Option<ImageFormat> {
    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some(ImageFormat::Png);
    }

    // JPEG: FF D8 FF
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some(ImageFormat::Jpeg);
    }

    // GIF: GIF87a / GIF89a
    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return Some(ImageFormat::Gif);
    }

    // TIFF: 49 49 2A 00 (little endian) or 4D 4D 00 2A (big endian)
    if data.starts_with(&[0x49, 0x49, 0x2A, 0x00]) || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
    {
        return Some(ImageFormat::Tiff);
    }

    // WebP: RIFF....WEBP
    if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        return Some(ImageFormat::WebP);
    }

    // BMP: 42 4D (BM)
    if data.len() >= 14 && data.starts_with(b"BM") {
        return Some(ImageFormat::Bmp);
    }

    None
}

/// Decode image bytes to RGBA8.
pub fn decode_image(data: &[u8]) -> Result<DecodedImage, LoadError> {
    let format = sniff_format(data).ok_or(LoadError::UnsupportedFormat)?;

    let img = image::load_from_memory_with_format(data, format)
        .map_err(|e| LoadError::Decode(e.to_string()))?
        .to_rgba8();

    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(LoadError::EmptyImage { width, height });
    }

    log::debug!(
        "🖼️ Decoded {:?} image {}x{} ({} bytes)",
        format,
        width,
        height,
        data.len()
    );

    Ok(DecodedImage {
        width,
        height,
        pixels: img.into_raw(),
    })
}
