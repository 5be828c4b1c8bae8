// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// formwerk-server — HTTP service wrapping the text engine and DOCX writer.

pub mod branding;
pub mod http;
pub mod routes;
pub mod server;

pub use branding::LogoFetcher;
pub use server::DocumentServer;
