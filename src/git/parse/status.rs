// gitdeck: Desktop Git Client Engine
//
// SPDX-FileCopyrightText: 2026 gitdeck contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Porcelain v1 status parsing.
//!
//! ```text
//! XY path            X = index column, Y = worktree column
//! ?? file            untracked
//! R  old -> new      rename, old path captured
//! UU file            unmerged
//! ```

use crate::git::model::{ChangeKind, FileChange};

use super::{Parsed, ParseWarning};

/// Parse `git status --porcelain` output.
///
/// Deterministic: identical input always yields an identical entry list.
/// Unknown two-character codes degrade to [`ChangeKind::Modified`] with a
/// warning instead of failing the parse. An empty output is a clean tree,
/// not an error.
#[must_use]
pub fn parse_status(output: &str) -> Parsed<FileChange> {
    let mut entries = Vec::new();
    let mut warnings = Vec::new();

    for line in output.lines() {
        if line.is_empty() {
            continue;
        }
        // Two ASCII status columns, one separator, at least one path byte.
        if line.len() < 4 || !line.is_char_boundary(2) || !line.is_char_boundary(3) {
            warnings.push(ParseWarning::new("status", line));
            continue;
        }
        let (code, rest) = line.split_at(2);
        let path = &rest[1..];
        if path.is_empty() {
            warnings.push(ParseWarning::new("status", line));
            continue;
        }

        let mut chars = code.chars();
        let (index, worktree) = (
            chars.next().unwrap_or(' '),
            chars.next().unwrap_or(' '),
        );

        let kind = match classify(index, worktree) {
            Some(kind) => kind,
            None => {
                warnings.push(ParseWarning::new("status", line));
                ChangeKind::Modified
            }
        };

        if kind == ChangeKind::Renamed {
            // `R  old -> new`: keep both sides.
            if let Some((old, new)) = path.split_once(" -> ") {
                entries.push(FileChange {
                    path: new.to_string(),
                    status: ChangeKind::Renamed,
                    original_path: Some(old.to_string()),
                });
            } else {
                warnings.push(ParseWarning::new("status", line));
                entries.push(FileChange::new(path, ChangeKind::Renamed));
            }
        } else {
            entries.push(FileChange::new(path, kind));
        }
    }

    Parsed::new(entries, warnings)
}

/// Deterministic mapping of the two porcelain columns.
///
/// `None` means the code is unknown; the caller degrades it to Modified with
/// a warning. `AA`/`DD` are unmerged states in git-status(1) and classify as
/// Conflicted alongside the `U` codes.
const fn classify(index: char, worktree: char) -> Option<ChangeKind> {
    match (index, worktree) {
        ('?', '?') => Some(ChangeKind::Untracked),
        ('U', _) | (_, 'U') | ('A', 'A') | ('D', 'D') => Some(ChangeKind::Conflicted),
        ('R', _) => Some(ChangeKind::Renamed),
        ('A', _) | (_, 'A') => Some(ChangeKind::Added),
        ('D', _) | (_, 'D') => Some(ChangeKind::Deleted),
        ('M', _) | (_, 'M') => Some(ChangeKind::Modified),
        _ => None,
    }
}
