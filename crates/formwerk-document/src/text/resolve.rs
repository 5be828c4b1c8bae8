// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Style resolver — classifies a paragraph unit as heading or body text and
// attaches the matching descriptor from the style sheet.
//
// Each unit is resolved on its own; there is no state carried between units.

use std::sync::OnceLock;

use formwerk_core::{
    BlockKind, HEADING_MARKER, ParagraphUnit, StyleBucket, StyleSheet, StyledBlock,
};
use tracing::debug;

use super::segment::segment;

/// Number of characters of block text echoed into debug logs.
const LOG_PREVIEW_CHARS: usize = 50;

/// Does `text` open with a heading marker?
///
/// The marker must stand alone, be followed by another marker, or be
/// followed by whitespace. `#1 priority` is body text.
pub fn is_heading(text: &str) -> bool {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(HEADING_MARKER), None) => true,
        (Some(HEADING_MARKER), Some(next)) => next == HEADING_MARKER || next.is_whitespace(),
        _ => false,
    }
}

/// Length of the leading marker run.
pub fn heading_depth(text: &str) -> usize {
    text.chars().take_while(|&c| c == HEADING_MARKER).count()
}

/// Resolve a unit against the canonical style sheet.
pub fn resolve(unit: &ParagraphUnit) -> StyledBlock {
    static CANONICAL: OnceLock<StyleResolver> = OnceLock::new();
    CANONICAL.get_or_init(StyleResolver::default).resolve(unit)
}

/// Resolves paragraph units against a fixed style sheet.
#[derive(Debug, Clone, Default)]
pub struct StyleResolver {
    sheet: StyleSheet,
}

impl StyleResolver {
    pub fn new(sheet: StyleSheet) -> Self {
        Self { sheet }
    }

    pub fn sheet(&self) -> &StyleSheet {
        &self.sheet
    }

    /// Produce exactly one styled block for `unit`. Total over all inputs.
    pub fn resolve(&self, unit: &ParagraphUnit) -> StyledBlock {
        let text = unit.text();

        if is_heading(&text) {
            let depth = heading_depth(&text);
            // The marker is ASCII, so `depth` chars are `depth` bytes.
            let heading_text = text[depth..].trim_start();
            if !heading_text.is_empty() {
                return self.block(
                    heading_text.to_string(),
                    BlockKind::Heading { depth },
                    StyleBucket::for_depth(depth),
                );
            }
            debug!(depth, "marker with no content, treating as body text");
        }

        self.block(text, BlockKind::Body, StyleBucket::Body)
    }

    /// Segment `raw` and resolve every unit, preserving input order.
    pub fn transform(&self, raw: &str) -> Vec<StyledBlock> {
        segment(raw).iter().map(|unit| self.resolve(unit)).collect()
    }

    fn block(&self, text: String, kind: BlockKind, bucket: StyleBucket) -> StyledBlock {
        debug!(
            style = bucket.label(),
            text = %preview(&text),
            "resolved block"
        );
        StyledBlock {
            text,
            kind,
            descriptor: self.sheet.get(bucket).clone(),
        }
    }
}

fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(LOG_PREVIEW_CHARS).collect();
    if text.chars().nth(LOG_PREVIEW_CHARS).is_some() {
        out.push_str("...");
    }
    out
}
