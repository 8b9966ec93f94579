// gitdeck: Desktop Git Client Engine
//
// SPDX-FileCopyrightText: 2026 gitdeck contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core modules for subprocess management.
//!
//! ```text
//!        core
//!         |
//!         v
//!      process
//!         |
//!    ProcessBuilder
//!    ProcessOutput
//! ```

pub mod process;
