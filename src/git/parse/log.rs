// gitdeck: Desktop Git Client Engine
//
// SPDX-FileCopyrightText: 2026 gitdeck contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Commit log parsing over control-character framing.
//!
//! ```text
//! --pretty=format:%x1e%H%x1f%h%x1f%aI%x1f%B
//!
//! RS (0x1e) starts each record, US (0x1f) separates fields.
//! ```
//!
//! The delimiters live outside the printable text domain, so ordinary
//! messages can never collide with them. A message that does embed one of
//! the control bytes is still recovered exactly: fields split with
//! `splitn` (the message takes the remainder), and a record fragment whose
//! head is not `40-hex US` is glued back onto the previous message with the
//! record byte restored.

use chrono::DateTime;

use crate::git::model::Commit;

use super::{Parsed, ParseWarning};

/// Record separator starting each commit record.
pub const RECORD_SEP: char = '\u{1e}';
/// Unit separator between fields within a record.
pub const FIELD_SEP: char = '\u{1f}';

/// `--pretty` format the client passes to `git log`.
pub const LOG_FORMAT: &str = "--pretty=format:%x1e%H%x1f%h%x1f%aI%x1f%B";

/// Parse `git log` output produced with [`LOG_FORMAT`].
///
/// `head_hash` marks the matching commit as HEAD; at most one entry can
/// match because object ids are unique within a listing.
#[must_use]
pub fn parse_log(output: &str, head_hash: Option<&str>) -> Parsed<Commit> {
    let mut warnings = Vec::new();

    // Re-glue fragments created by a RECORD_SEP embedded in a message body:
    // a genuine record starts with a full hash followed by a field byte.
    let mut records: Vec<String> = Vec::new();
    for fragment in output.split(RECORD_SEP) {
        if fragment.is_empty() && records.is_empty() {
            // Leading empty fragment before the first record byte.
            continue;
        }
        if starts_new_record(fragment) || records.is_empty() {
            records.push(fragment.to_string());
        } else if let Some(last) = records.last_mut() {
            last.push(RECORD_SEP);
            last.push_str(fragment);
        }
    }

    let mut entries = Vec::new();
    for record in &records {
        match parse_record(record, head_hash) {
            Some(commit) => entries.push(commit),
            None => warnings.push(ParseWarning::new("log", record.clone())),
        }
    }

    Parsed::new(entries, warnings)
}

/// A fragment opens a record iff it leads with `<40 hex><US>`.
fn starts_new_record(fragment: &str) -> bool {
    let head: Vec<char> = fragment.chars().take(41).collect();
    head.len() == 41 && head[40] == FIELD_SEP && head[..40].iter().all(char::is_ascii_hexdigit)
}

fn parse_record(record: &str, head_hash: Option<&str>) -> Option<Commit> {
    // The message is the remainder; embedded FIELD_SEP bytes stay intact.
    let mut fields = record.splitn(4, FIELD_SEP);
    let hash = fields.next()?.trim();
    let short_hash = fields.next()?.trim();
    let date_raw = fields.next()?.trim();
    let message = fields.next()?;

    if hash.len() != 40 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let author_date = DateTime::parse_from_rfc3339(date_raw).ok()?;

    Some(Commit {
        hash: hash.to_string(),
        short_hash: short_hash.to_string(),
        // %B ends with the stored body's newline, and git appends another
        // between format records; both are framing, not message text.
        message: message.trim_end_matches('\n').to_string(),
        author_date,
        is_head: head_hash == Some(hash),
    })
}
