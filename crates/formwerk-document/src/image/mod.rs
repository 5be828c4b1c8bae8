// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — logo format detection and sizing for header/footer branding.

pub mod logo;

pub use logo::{LogoFormat, LogoImage};
