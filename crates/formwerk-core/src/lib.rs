// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Formwerk — Core types, style sheet and error definitions shared across all crates.

pub mod config;
pub mod error;
pub mod style;
pub mod types;

pub use config::AppConfig;
pub use error::FormwerkError;
pub use style::{StyleBucket, StyleSheet};
pub use types::*;
