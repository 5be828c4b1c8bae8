// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Logo images — sniff the encoded format and read pixel dimensions with the
// `image` crate so the DOCX writer can embed the bytes untouched and size the
// drawing to a fixed height while keeping the aspect ratio.

use std::io::Cursor;

use formwerk_core::error::FormwerkError;
use image::{ImageFormat, ImageReader};
use tracing::{debug, instrument};

/// English Metric Units per inch, the length unit of DrawingML.
pub const EMU_PER_INCH: f64 = 914_400.0;

/// Encodings a DOCX consumer is guaranteed to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoFormat {
    Png,
    Jpeg,
    Gif,
}

impl LogoFormat {
    fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::Gif => Some(Self::Gif),
            _ => None,
        }
    }

    /// File extension used for the part name under `word/media/`.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
        }
    }

    /// MIME type registered in `[Content_Types].xml`.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
        }
    }
}

/// An encoded logo plus the metadata needed to place it.
#[derive(Debug, Clone)]
pub struct LogoImage {
    bytes: Vec<u8>,
    format: LogoFormat,
    width_px: u32,
    height_px: u32,
}

impl LogoImage {
    /// Inspect encoded bytes. Only the header is read, pixels are not decoded.
    #[instrument(skip(bytes), fields(bytes_len = bytes.len()))]
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, FormwerkError> {
        let reader = ImageReader::new(Cursor::new(bytes.as_slice()))
            .with_guessed_format()
            .map_err(|err| FormwerkError::Image(format!("failed to sniff logo: {err}")))?;

        let format = reader
            .format()
            .and_then(LogoFormat::from_image_format)
            .ok_or_else(|| {
                FormwerkError::Image("logo is not a PNG, JPEG or GIF image".into())
            })?;

        let (width_px, height_px) = reader
            .into_dimensions()
            .map_err(|err| FormwerkError::Image(format!("failed to read logo size: {err}")))?;

        if width_px == 0 || height_px == 0 {
            return Err(FormwerkError::Image("logo has zero size".into()));
        }

        debug!(?format, width_px, height_px, "Logo inspected");

        Ok(Self {
            bytes,
            format,
            width_px,
            height_px,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> LogoFormat {
        self.format
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width_px, self.height_px)
    }

    /// Drawing extent `(cx, cy)` in EMU for a rendered height in inches.
    pub fn extent_emu(&self, height_in: f32) -> (u64, u64) {
        let cy = f64::from(height_in) * EMU_PER_INCH;
        let cx = cy * f64::from(self.width_px) / f64::from(self.height_px);
        (cx.round() as u64, cy.round() as u64)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};

    /// Encode a solid-colour test image.
    pub(crate) fn encoded(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([238, 83, 64]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img).write_to(&mut out, format).unwrap();
        out.into_inner()
    }

    #[test]
    fn png_is_recognised_with_dimensions() {
        let logo = LogoImage::from_bytes(encoded(40, 10, ImageFormat::Png)).unwrap();
        assert_eq!(logo.format(), LogoFormat::Png);
        assert_eq!(logo.dimensions(), (40, 10));
        assert_eq!(logo.format().content_type(), "image/png");
    }

    #[test]
    fn jpeg_is_recognised() {
        let logo = LogoImage::from_bytes(encoded(8, 8, ImageFormat::Jpeg)).unwrap();
        assert_eq!(logo.format(), LogoFormat::Jpeg);
        assert_eq!(logo.format().extension(), "jpeg");
    }

    #[test]
    fn garbage_is_rejected() {
        let err = LogoImage::from_bytes(b"<html>404 Not Found</html>".to_vec()).unwrap_err();
        assert!(matches!(err, FormwerkError::Image(_)));
    }

    #[test]
    fn extent_keeps_aspect_ratio() {
        let logo = LogoImage::from_bytes(encoded(40, 10, ImageFormat::Png)).unwrap();
        let (cx, cy) = logo.extent_emu(0.5);
        assert_eq!(cy, 457_200);
        assert_eq!(cx, 4 * 457_200);
    }
}
