// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DOCX module — OOXML packaging, branding and the document writer.

pub mod branding;
mod package;
pub mod writer;
mod xml;

pub use branding::Branding;
pub use writer::{DOCX_MIME_TYPE, DocxWriter};
