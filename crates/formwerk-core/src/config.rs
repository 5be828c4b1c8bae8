// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FormwerkError, Result};
use crate::style::{GRAY_100, StyleSheet};
use crate::types::Rgb;

/// Persistent service settings, read from a JSON file.
///
/// Every section is optional in the file; whatever is missing keeps its
/// default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Page geometry of generated documents.
    pub page: PageSetup,
    /// Header/footer branding.
    pub branding: BrandingConfig,
    /// File name offered in the `Content-Disposition` header.
    pub download_name: String,
    /// Heading-depth → formatting table.
    pub styles: StyleSheet,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            page: PageSetup::default(),
            branding: BrandingConfig::default(),
            download_name: "fearless_document.docx".into(),
            styles: StyleSheet::default(),
        }
    }
}

impl AppConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&data)
    }

    /// Reject values that would produce a broken document or server.
    pub fn validate(&self) -> Result<()> {
        if self.server.max_request_bytes == 0 {
            return Err(FormwerkError::Config(
                "server.max_request_bytes must be positive".into(),
            ));
        }
        let margins = [
            ("top", self.page.top_in),
            ("bottom", self.page.bottom_in),
            ("left", self.page.left_in),
            ("right", self.page.right_in),
            ("header_distance", self.page.header_distance_in),
            ("footer_distance", self.page.footer_distance_in),
        ];
        for (name, value) in margins {
            if !value.is_finite() || value < 0.0 {
                return Err(FormwerkError::Config(format!(
                    "page.{name}_in must be a non-negative number, got {value}"
                )));
            }
        }
        let branding = &self.branding;
        for (name, value) in [
            ("header_logo_height_in", branding.header_logo_height_in),
            ("footer_logo_height_in", branding.footer_logo_height_in),
            ("footer_font_size_pt", branding.footer_font_size_pt),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(FormwerkError::Config(format!(
                    "branding.{name} must be positive, got {value}"
                )));
            }
        }
        if self.server.read_timeout_secs == 0 {
            return Err(FormwerkError::Config(
                "server.read_timeout_secs must be positive".into(),
            ));
        }
        self.styles.validate()?;
        if self.download_name.trim().is_empty()
            || self.download_name.contains('"')
            || self.download_name.chars().any(char::is_control)
        {
            return Err(FormwerkError::Config(format!(
                "download_name {:?} is not a usable file name",
                self.download_name
            )));
        }
        Ok(())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind (default all interfaces).
    pub bind_address: IpAddr,
    /// TCP port (default 5000). Port 0 picks an ephemeral port.
    pub port: u16,
    /// Largest request (headers + body) accepted before answering 413.
    pub max_request_bytes: usize,
    /// Seconds a client may take to send a complete request.
    pub read_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 5000,
            max_request_bytes: 16 * 1024 * 1024,
            read_timeout_secs: 30,
        }
    }
}

/// Page margins and header/footer distances, in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSetup {
    pub top_in: f32,
    pub bottom_in: f32,
    pub left_in: f32,
    pub right_in: f32,
    pub header_distance_in: f32,
    pub footer_distance_in: f32,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            top_in: 1.0,
            bottom_in: 0.5,
            left_in: 1.0,
            right_in: 1.0,
            header_distance_in: 0.5,
            footer_distance_in: 0.3,
        }
    }
}

/// Header/footer branding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandingConfig {
    /// Logo placed in the page header. `None` disables it.
    pub header_logo_url: Option<String>,
    /// Logo placed at the top of the footer. `None` disables it.
    pub footer_logo_url: Option<String>,
    pub header_logo_height_in: f32,
    pub footer_logo_height_in: f32,
    /// Centred text lines printed under the footer logo.
    pub footer_lines: Vec<String>,
    pub footer_font: String,
    pub footer_font_size_pt: f32,
    pub footer_color: Rgb,
    /// Per-request timeout for logo downloads.
    pub fetch_timeout_secs: u64,
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            header_logo_url: Some(
                "https://raw.githubusercontent.com/diya-noor/fearless-agent/main/fearless_icon_logo.png"
                    .into(),
            ),
            footer_logo_url: Some(
                "https://raw.githubusercontent.com/diya-noor/fearless-agent/main/fearless_text_logo.png"
                    .into(),
            ),
            header_logo_height_in: 0.5,
            footer_logo_height_in: 0.2,
            footer_lines: vec![
                "8 Market Place, Suite 200, Baltimore, MD 21202".into(),
                "(410) 394-9600  /  fax (410) 779-3706  /  fearless.tech".into(),
            ],
            footer_font: "Montserrat".into(),
            footer_font_size_pt: 7.0,
            footer_color: GRAY_100,
            fetch_timeout_secs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.page.bottom_in, 0.5);
        assert_eq!(config.branding.footer_lines.len(), 2);
    }

    #[test]
    fn empty_object_yields_defaults() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config.download_name, "fearless_document.docx");
        assert_eq!(config.styles, StyleSheet::default());
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let config = AppConfig::from_json(
            r#"{ "server": { "port": 8080 }, "branding": { "header_logo_url": null } }"#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.max_request_bytes, 16 * 1024 * 1024);
        assert!(config.branding.header_logo_url.is_none());
        assert!(config.branding.footer_logo_url.is_some());
    }

    #[test]
    fn negative_margin_is_rejected() {
        let err = AppConfig::from_json(r#"{ "page": { "left_in": -1.0 } }"#).unwrap_err();
        assert!(matches!(err, FormwerkError::Config(_)));
    }

    #[test]
    fn quoted_download_name_is_rejected() {
        let err = AppConfig::from_json(r#"{ "download_name": "a\"b.docx" }"#).unwrap_err();
        assert!(matches!(err, FormwerkError::Config(_)));
    }

    #[test]
    fn negative_style_size_is_rejected() {
        let json = r##"{ "styles": { "body": {
            "font_family": "Montserrat", "size_pt": -10.0, "bold": false,
            "color": "#494F56", "alignment": "left",
            "space_before_pt": 0.0, "space_after_pt": 16.0, "line_spacing": 1.5
        } } }"##;
        let err = AppConfig::from_json(json).unwrap_err();
        assert!(matches!(err, FormwerkError::Config(ref m) if m.contains("styles.body.size_pt")));
    }

    #[test]
    fn zero_read_timeout_is_rejected() {
        let err = AppConfig::from_json(r#"{ "server": { "read_timeout_secs": 0 } }"#).unwrap_err();
        assert!(matches!(err, FormwerkError::Config(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "download_name": "report.docx" }}"#).unwrap();
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.download_name, "report.docx");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = AppConfig::load("/nonexistent/formwerk/config.json").unwrap_err();
        assert!(matches!(err, FormwerkError::Io(_)));
    }
}
