// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the text-to-document engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FormwerkError;

/// Character whose leading run marks a heading and gives its depth.
pub const HEADING_MARKER: char = '#';

/// An 8-bit-per-channel RGB colour.
///
/// Serialised as a `#RRGGBB` hex string so style sheets stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Upper-case hex without the leading `#`, as OOXML `w:color` wants it.
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.hex())
    }
}

impl FromStr for Rgb {
    type Err = FormwerkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(FormwerkError::Config(format!(
                "colour must be #RRGGBB, got {s:?}"
            )));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|e| FormwerkError::Config(format!("colour {s:?}: {e}")))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = FormwerkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    /// OOXML `w:jc` value.
    pub fn ooxml_value(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// Complete formatting for one paragraph and its single run.
///
/// Every attribute is always present so a document writer can apply it
/// directly without consulting document-level defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleDescriptor {
    pub font_family: String,
    pub size_pt: f32,
    pub bold: bool,
    pub color: Rgb,
    pub alignment: Alignment,
    pub space_before_pt: f32,
    pub space_after_pt: f32,
    /// Line spacing as a multiple of single spacing.
    pub line_spacing: f32,
}

/// One logical paragraph: trimmed, non-blank physical lines in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphUnit {
    lines: Vec<String>,
}

impl ParagraphUnit {
    /// Build a unit from already-trimmed lines.
    ///
    /// Returns `None` when no non-blank line is left, so a unit can never
    /// consist only of blank lines.
    pub fn new(lines: Vec<String>) -> Option<Self> {
        let lines: Vec<String> = lines
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .collect();
        if lines.is_empty() {
            None
        } else {
            Some(Self { lines })
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines joined with single line feeds.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Classification the resolver settled on for a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    /// Heading with the raw marker depth (not clamped).
    Heading { depth: usize },
    Body,
}

/// Final output unit of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyledBlock {
    pub text: String,
    pub kind: BlockKind,
    pub descriptor: StyleDescriptor,
}

/// Lifecycle of the embedded HTTP document server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerStatus {
    Stopped,
    Starting,
    Running,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_parses_with_and_without_hash() {
        assert_eq!("#EE5340".parse::<Rgb>().unwrap(), Rgb::new(238, 83, 64));
        assert_eq!("5c3977".parse::<Rgb>().unwrap(), Rgb::new(92, 57, 119));
    }

    #[test]
    fn rgb_rejects_garbage() {
        assert!("#EE53".parse::<Rgb>().is_err());
        assert!("#GG0000".parse::<Rgb>().is_err());
        assert!("".parse::<Rgb>().is_err());
        assert!("##EE5340".parse::<Rgb>().is_err());
    }

    #[test]
    fn rgb_serialises_as_hex_string() {
        let json = serde_json::to_string(&Rgb::new(73, 79, 86)).unwrap();
        assert_eq!(json, "\"#494F56\"");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgb::new(73, 79, 86));
    }

    #[test]
    fn paragraph_unit_refuses_blank_lines_only() {
        assert!(ParagraphUnit::new(vec![]).is_none());
        assert!(ParagraphUnit::new(vec![String::new(), "  ".into()]).is_none());
    }

    #[test]
    fn paragraph_unit_joins_with_line_feeds() {
        let unit = ParagraphUnit::new(vec!["a".into(), "b".into(), "c".into()]).unwrap();
        assert_eq!(unit.text(), "a\nb\nc");
        assert_eq!(unit.lines().len(), 3);
    }
}
