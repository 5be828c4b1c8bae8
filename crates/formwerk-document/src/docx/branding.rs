// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Header/footer branding assets handed to the DOCX writer.

use formwerk_core::Rgb;
use formwerk_core::config::BrandingConfig;
use tracing::warn;

use crate::image::LogoImage;

/// Everything the writer needs to draw the header and footer.
///
/// Logos are optional: a missing or undecodable logo simply leaves its
/// paragraph empty.
#[derive(Debug, Clone)]
pub struct Branding {
    pub header_logo: Option<LogoImage>,
    pub footer_logo: Option<LogoImage>,
    pub header_logo_height_in: f32,
    pub footer_logo_height_in: f32,
    pub footer_lines: Vec<String>,
    pub footer_font: String,
    pub footer_font_size_pt: f32,
    pub footer_color: Rgb,
}

impl Branding {
    /// Branding without logos, taking text and sizes from the config.
    pub fn from_config(config: &BrandingConfig) -> Self {
        Self {
            header_logo: None,
            footer_logo: None,
            header_logo_height_in: config.header_logo_height_in,
            footer_logo_height_in: config.footer_logo_height_in,
            footer_lines: config.footer_lines.clone(),
            footer_font: config.footer_font.clone(),
            footer_font_size_pt: config.footer_font_size_pt,
            footer_color: config.footer_color,
        }
    }

    /// Attach downloaded logo bytes. Bytes that are not a usable image are
    /// dropped with a warning instead of failing the document.
    pub fn with_logos(mut self, header: Option<Vec<u8>>, footer: Option<Vec<u8>>) -> Self {
        self.header_logo = header.and_then(|bytes| inspect("header", bytes));
        self.footer_logo = footer.and_then(|bytes| inspect("footer", bytes));
        self
    }
}

impl Default for Branding {
    fn default() -> Self {
        Self::from_config(&BrandingConfig::default())
    }
}

fn inspect(slot: &str, bytes: Vec<u8>) -> Option<LogoImage> {
    match LogoImage::from_bytes(bytes) {
        Ok(logo) => Some(logo),
        Err(e) => {
            warn!(slot, error = %e, "omitting unusable logo");
            None
        }
    }
}
