// gitdeck: Desktop Git Client Engine
//
// SPDX-FileCopyrightText: 2026 gitdeck contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Stash listing parsing.
//!
//! ```text
//! stash@{0}: WIP on main: abc1234 message        (plain form)
//! stash@{0}: On main: msg<US>2026-01-10T...      (client's --pretty form)
//! ```

use std::sync::OnceLock;

use chrono::DateTime;
use regex::Regex;

use crate::git::model::Stash;

use super::{FIELD_SEP, Parsed, ParseWarning};

fn selector_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^stash@\{(\d+)\}:\s*(.*)$").expect("static regex"))
}

/// Parse `git stash list` output.
///
/// Accepts the plain `stash@{N}: <message>` shape; when the client's
/// `--pretty` adds a US-separated author date after the message, the date is
/// captured as well. `N` is parsed as the index, so the listing keeps git's
/// LIFO order whatever order the lines arrive in memory.
#[must_use]
pub fn parse_stashes(output: &str) -> Parsed<Stash> {
    let mut entries = Vec::new();
    let mut warnings = Vec::new();

    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let (head, date_raw) = match line.split_once(FIELD_SEP) {
            Some((head, date)) => (head, Some(date)),
            None => (line, None),
        };

        let Some(caps) = selector_re().captures(head) else {
            warnings.push(ParseWarning::new("stash", line));
            continue;
        };

        let Ok(index) = caps[1].parse::<usize>() else {
            warnings.push(ParseWarning::new("stash", line));
            continue;
        };

        let date = date_raw.and_then(|raw| DateTime::parse_from_rfc3339(raw.trim()).ok());
        if date_raw.is_some() && date.is_none() {
            warnings.push(ParseWarning::new("stash", line));
        }

        entries.push(Stash {
            index,
            message: caps[2].to_string(),
            date,
        });
    }

    Parsed::new(entries, warnings)
}
