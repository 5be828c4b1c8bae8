// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer — startup plumbing between the binary and the backend crates.

pub mod config_loader;
pub mod data_dir;
