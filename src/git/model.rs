// gitdeck: Desktop Git Client Engine
//
// SPDX-FileCopyrightText: 2026 gitdeck contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Domain entities produced by the engine.
//!
//! All types here are immutable value snapshots: created fresh on each
//! successful parse, owned entirely by the caller, superseded rather than
//! mutated. The engine keeps no references back into them.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

/// A local branch as listed by `git branch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Branch {
    /// Branch name with the current-branch marker stripped.
    pub name: String,
    /// True for the checked-out branch. At most one per listing.
    pub is_current: bool,
}

/// A commit as listed by `git log`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    /// Full 40-hex object id.
    pub hash: String,
    /// Abbreviated object id.
    pub short_hash: String,
    /// Full commit message body, exactly as recorded.
    pub message: String,
    /// Author date.
    pub author_date: DateTime<FixedOffset>,
    /// True if this commit is the current HEAD. At most one per listing.
    pub is_head: bool,
}

/// Classification of a working-tree change, derived from the two-character
/// porcelain status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    Renamed,
    Untracked,
    /// Unmerged path. Only reachable through a failed merge.
    Conflicted,
}

/// A single changed path from `git status --porcelain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    /// Path relative to the repository root.
    pub path: String,
    /// Deterministic mapping of the porcelain code.
    pub status: ChangeKind,
    /// Previous path for renames (`R` codes).
    pub original_path: Option<String>,
}

impl FileChange {
    /// Shorthand used by parsers and tests for non-rename entries.
    #[must_use]
    pub fn new(path: impl Into<String>, status: ChangeKind) -> Self {
        Self {
            path: path.into(),
            status,
            original_path: None,
        }
    }

    /// True for unmerged paths.
    #[must_use]
    pub const fn is_conflicted(&self) -> bool {
        matches!(self.status, ChangeKind::Conflicted)
    }
}

/// A configured remote, one entry per name (fetch URL retained).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Remote {
    pub name: String,
    pub url: String,
}

/// A stash entry. Index 0 is the most recent; indices shift after
/// apply/drop, so a listing is only valid until the next stash mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stash {
    /// Position in git's LIFO stash list.
    pub index: usize,
    /// Stash message (`WIP on ...` unless a message was given).
    pub message: String,
    /// Author date of the stash commit, when the listing carried one.
    pub date: Option<DateTime<FixedOffset>>,
}

/// Ahead/behind counts against the configured upstream.
///
/// Recomputed, never mutated in place: every value carries the instant it
/// was derived so consumers can reason about staleness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    /// Commits on HEAD that are not on the upstream.
    pub ahead: u32,
    /// Commits on the upstream that are not on HEAD.
    pub behind: u32,
    /// When the counts were computed.
    pub computed_at: DateTime<Utc>,
}
