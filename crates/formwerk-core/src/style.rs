// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Style sheet — the fixed heading-depth → formatting rule table.
//
// The table is data, not branching: a bounded `StyleBucket` enumeration
// selects one immutable `StyleDescriptor` from a `StyleSheet`. The canonical
// sheet is the house style; deployments may override any bucket from the
// `styles` section of the configuration file.

use serde::{Deserialize, Serialize};

use crate::error::{FormwerkError, Result};
use crate::types::{Alignment, Rgb, StyleDescriptor};

// ---------------------------------------------------------------------------
// House palette
// ---------------------------------------------------------------------------

/// `#EE5340` — title and subsection headings.
pub const ORANGE: Rgb = Rgb::new(238, 83, 64);

/// `#5C3977` — section and minor headings.
pub const PURPLE: Rgb = Rgb::new(92, 57, 119);

/// `#494F56` — body text and footer lines.
pub const GRAY_100: Rgb = Rgb::new(73, 79, 86);

/// `#7F8388` — subtitle.
pub const GRAY_70: Rgb = Rgb::new(127, 131, 136);

const DISPLAY_FONT: &str = "Montserrat Alternates";
const TEXT_FONT: &str = "Montserrat";

/// Depth bucket used to look up a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleBucket {
    /// Depth 1.
    Title,
    /// Depth 2.
    Subtitle,
    /// Depth 3.
    Section,
    /// Depth 4.
    Subsection,
    /// Depth 5 and deeper.
    Minor,
    /// Not a heading.
    Body,
}

impl StyleBucket {
    /// Every bucket, in heading-depth order with body last.
    pub const ALL: [StyleBucket; 6] = [
        Self::Title,
        Self::Subtitle,
        Self::Section,
        Self::Subsection,
        Self::Minor,
        Self::Body,
    ];

    /// Bucket for a heading marker depth; 0 means body text and anything
    /// past 4 collapses into `Minor`.
    pub fn for_depth(depth: usize) -> Self {
        match depth {
            0 => Self::Body,
            1 => Self::Title,
            2 => Self::Subtitle,
            3 => Self::Section,
            4 => Self::Subsection,
            _ => Self::Minor,
        }
    }

    /// Short label used in log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Subtitle => "subtitle",
            Self::Section => "section",
            Self::Subsection => "subsection",
            Self::Minor => "minor",
            Self::Body => "body",
        }
    }
}

/// One descriptor per bucket.
///
/// Missing buckets in a deserialised sheet keep their canonical values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSheet {
    pub title: StyleDescriptor,
    pub subtitle: StyleDescriptor,
    pub section: StyleDescriptor,
    pub subsection: StyleDescriptor,
    pub minor: StyleDescriptor,
    pub body: StyleDescriptor,
}

impl StyleSheet {
    /// Look up the descriptor for a bucket.
    pub fn get(&self, bucket: StyleBucket) -> &StyleDescriptor {
        match bucket {
            StyleBucket::Title => &self.title,
            StyleBucket::Subtitle => &self.subtitle,
            StyleBucket::Section => &self.section,
            StyleBucket::Subsection => &self.subsection,
            StyleBucket::Minor => &self.minor,
            StyleBucket::Body => &self.body,
        }
    }

    /// Reject descriptors that cannot be written as OOXML measurements:
    /// sizes must be positive, spacing non-negative, and all values finite.
    pub fn validate(&self) -> Result<()> {
        for bucket in StyleBucket::ALL {
            let d = self.get(bucket);
            let name = bucket.label();
            if d.font_family.trim().is_empty() {
                return Err(FormwerkError::Config(format!(
                    "styles.{name}.font_family must not be empty"
                )));
            }
            if !d.size_pt.is_finite() || d.size_pt <= 0.0 {
                return Err(FormwerkError::Config(format!(
                    "styles.{name}.size_pt must be positive, got {}",
                    d.size_pt
                )));
            }
            if !d.line_spacing.is_finite() || d.line_spacing <= 0.0 {
                return Err(FormwerkError::Config(format!(
                    "styles.{name}.line_spacing must be positive, got {}",
                    d.line_spacing
                )));
            }
            for (field, value) in [
                ("space_before_pt", d.space_before_pt),
                ("space_after_pt", d.space_after_pt),
            ] {
                if !value.is_finite() || value < 0.0 {
                    return Err(FormwerkError::Config(format!(
                        "styles.{name}.{field} must be non-negative, got {value}"
                    )));
                }
            }
        }
        Ok(())
    }
}

fn heading(
    font: &str,
    size_pt: f32,
    color: Rgb,
    space_before_pt: f32,
    space_after_pt: f32,
) -> StyleDescriptor {
    StyleDescriptor {
        font_family: font.to_string(),
        size_pt,
        bold: true,
        color,
        alignment: Alignment::Left,
        space_before_pt,
        space_after_pt,
        line_spacing: 1.0,
    }
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self {
            title: heading(DISPLAY_FONT, 28.0, ORANGE, 32.0, 2.0),
            subtitle: heading(DISPLAY_FONT, 22.0, GRAY_70, 26.0, 20.0),
            section: heading(TEXT_FONT, 18.0, PURPLE, 20.0, 16.0),
            subsection: heading(TEXT_FONT, 14.0, ORANGE, 16.0, 12.0),
            minor: heading(TEXT_FONT, 12.0, PURPLE, 12.0, 10.0),
            body: StyleDescriptor {
                font_family: TEXT_FONT.to_string(),
                size_pt: 10.0,
                bold: false,
                color: GRAY_100,
                alignment: Alignment::Left,
                space_before_pt: 0.0,
                space_after_pt: 16.0,
                line_spacing: 1.5,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_buckets_clamp_at_five() {
        assert_eq!(StyleBucket::for_depth(0), StyleBucket::Body);
        assert_eq!(StyleBucket::for_depth(1), StyleBucket::Title);
        assert_eq!(StyleBucket::for_depth(4), StyleBucket::Subsection);
        assert_eq!(StyleBucket::for_depth(5), StyleBucket::Minor);
        assert_eq!(StyleBucket::for_depth(42), StyleBucket::Minor);
    }

    #[test]
    fn heading_sizes_shrink_with_depth() {
        let sheet = StyleSheet::default();
        let sizes: Vec<f32> = (1..=5)
            .map(|d| sheet.get(StyleBucket::for_depth(d)).size_pt)
            .collect();
        assert!(sizes.windows(2).all(|w| w[0] > w[1]), "sizes: {sizes:?}");
        assert!(sheet.body.size_pt < sheet.minor.size_pt);
    }

    #[test]
    fn every_heading_is_bold_and_body_is_not() {
        let sheet = StyleSheet::default();
        for depth in 1..=5 {
            assert!(sheet.get(StyleBucket::for_depth(depth)).bold);
        }
        let body = sheet.get(StyleBucket::Body);
        assert!(!body.bold);
        assert_eq!(body.line_spacing, 1.5);
        assert_eq!(body.color, GRAY_100);
        assert_eq!(body.alignment, Alignment::Left);
    }

    #[test]
    fn partial_override_keeps_other_buckets() {
        let json = r##"{
            "title": {
                "font_family": "Georgia",
                "size_pt": 30.0,
                "bold": true,
                "color": "#000000",
                "alignment": "center",
                "space_before_pt": 0.0,
                "space_after_pt": 6.0,
                "line_spacing": 1.0
            }
        }"##;
        let sheet: StyleSheet = serde_json::from_str(json).unwrap();
        assert_eq!(sheet.title.font_family, "Georgia");
        assert_eq!(sheet.title.alignment, Alignment::Center);
        assert_eq!(sheet.subtitle, StyleSheet::default().subtitle);
        assert_eq!(sheet.body, StyleSheet::default().body);
    }

    #[test]
    fn canonical_sheet_is_valid() {
        assert!(StyleSheet::default().validate().is_ok());
    }

    #[test]
    fn unwritable_measurements_are_rejected() {
        let cases: [fn(&mut StyleSheet); 6] = [
            |s| s.title.size_pt = -4.0,
            |s| s.subtitle.size_pt = 0.0,
            |s| s.section.space_before_pt = -1.0,
            |s| s.minor.space_after_pt = f32::NAN,
            |s| s.body.line_spacing = 0.0,
            |s| s.body.font_family = "  ".into(),
        ];
        for mutate in cases {
            let mut sheet = StyleSheet::default();
            mutate(&mut sheet);
            assert!(matches!(sheet.validate(), Err(FormwerkError::Config(_))));
        }
    }
}
