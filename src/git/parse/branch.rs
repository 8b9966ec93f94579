// gitdeck: Desktop Git Client Engine
//
// SPDX-FileCopyrightText: 2026 gitdeck contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Branch listing parsing.
//!
//! ```text
//!   main
//! * feature/x        <- leading '*' marks the checked-out branch
//! * (HEAD detached at abc1234)   <- skipped with a warning
//! ```

use crate::git::model::Branch;

use super::{Parsed, ParseWarning};

/// Parse `git branch` output.
///
/// Each line is trimmed; a leading `*` marks the current branch and is
/// stripped from the name; empty lines are discarded. Detached-HEAD
/// placeholder lines are not branches and are skipped with a warning, so a
/// detached repository yields zero current entries.
#[must_use]
pub fn parse_branches(output: &str) -> Parsed<Branch> {
    let mut entries = Vec::new();
    let mut warnings = Vec::new();

    for line in output.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let (is_current, name) = trimmed
            .strip_prefix('*')
            .map_or((false, trimmed), |rest| (true, rest.trim_start()));

        if name.is_empty() || name.starts_with('(') {
            warnings.push(ParseWarning::new("branch", line));
            continue;
        }

        entries.push(Branch {
            name: name.to_string(),
            is_current,
        });
    }

    Parsed::new(entries, warnings)
}
