// gitdeck: Desktop Git Client Engine
//
// SPDX-FileCopyrightText: 2026 gitdeck contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Remote listing parsing.
//!
//! ```text
//! origin\thttps://example.com/repo.git (fetch)
//! origin\thttps://example.com/repo.git (push)    <- dropped
//! ```

use crate::git::model::Remote;

use super::{Parsed, ParseWarning};

/// Parse `git remote -v` output.
///
/// Only the `(fetch)` entry is retained per remote name, preserving first
/// occurrence order; `(push)` duplicates are expected and silently dropped.
#[must_use]
pub fn parse_remotes(output: &str) -> Parsed<Remote> {
    let mut entries: Vec<Remote> = Vec::new();
    let mut warnings = Vec::new();

    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let Some((name, rest)) = line.split_once('\t') else {
            warnings.push(ParseWarning::new("remote", line));
            continue;
        };

        let Some(url) = rest.strip_suffix(" (fetch)") else {
            if rest.ends_with(" (push)") {
                continue;
            }
            warnings.push(ParseWarning::new("remote", line));
            continue;
        };

        // Names are unique per repository; git itself never emits two fetch
        // lines for one name, so a duplicate is malformed input.
        if entries.iter().any(|r| r.name == name) {
            warnings.push(ParseWarning::new("remote", line));
            continue;
        }

        entries.push(Remote {
            name: name.to_string(),
            url: url.to_string(),
        });
    }

    Parsed::new(entries, warnings)
}
