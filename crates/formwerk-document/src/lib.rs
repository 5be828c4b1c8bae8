// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// formwerk-document — Text engine and DOCX assembly for Formwerk.
//
// Provides the paragraph segmenter and style resolver (raw text → styled
// blocks), logo inspection for header/footer branding, and the writer that
// packages styled blocks into a `.docx` file.

pub mod docx;
pub mod image;
pub mod text;

// Re-export the primary entry points so callers can use `formwerk_document::DocxWriter` etc.
pub use docx::{Branding, DOCX_MIME_TYPE, DocxWriter};
pub use crate::image::LogoImage;
pub use text::{StyleResolver, resolve, segment, transform};
