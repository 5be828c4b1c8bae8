// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text engine — raw text → paragraph units → styled blocks.
//
// Pure and stateless: no I/O, no shared mutable state, safe to call from any
// number of connection tasks at once.

pub mod resolve;
pub mod segment;

pub use resolve::{StyleResolver, heading_depth, is_heading, resolve};
pub use segment::{normalize_newlines, segment};

use formwerk_core::StyledBlock;

/// Segment `raw` and resolve every unit against the canonical style sheet.
pub fn transform(raw: &str) -> Vec<StyledBlock> {
    StyleResolver::default().transform(raw)
}
