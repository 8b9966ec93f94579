// gitdeck: Desktop Git Client Engine
//
// SPDX-FileCopyrightText: 2026 gitdeck contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Merge workflow and conflict resolution.
//!
//! ```text
//! Idle --merge--> Merging --+--> Clean                    (auto-committed)
//!                           '--> Conflicted --resolve*--> Resolved
//!                                    |                        |
//!                                  abort                  finalize
//!                                    v                        v
//!                                  Idle                   Committed
//! ```
//!
//! Conflict extraction splits working-tree content on the literal marker
//! lines `<<<<<<<` / `=======` / `>>>>>>>` into (ours, theirs) hunk pairs,
//! preserving every unconflicted byte verbatim so resolved files reassemble
//! exactly.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::error::{EngineResult, GitError};
use crate::git::client::GitClient;
use crate::git::runner::CommandRunner;

/// Merge workflow states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeState {
    Idle,
    Merging,
    Clean,
    Conflicted,
    Resolved,
    Committed,
}

impl MergeState {
    const fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Merging => "merging",
            Self::Clean => "clean",
            Self::Conflicted => "conflicted",
            Self::Resolved => "resolved",
            Self::Committed => "committed",
        }
    }
}

/// Outcome of starting a merge.
#[derive(Debug)]
pub enum MergeOutcome {
    /// git auto-committed the merge; nothing left to do.
    Clean,
    /// The merge stopped on conflicts; resolve each file, then finalize.
    Conflicted(Vec<ConflictFile>),
}

/// A piece of a conflicted file: either verbatim text or one conflict
/// region's two sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictSegment {
    /// Unconflicted text, kept exactly as read (including newlines).
    Text(String),
    /// One `<<<<<<<`/`=======`/`>>>>>>>` region.
    Conflict { ours: String, theirs: String },
}

/// A conflicted file split into segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictFile {
    /// Path relative to the repository root.
    pub path: String,
    /// Interleaved text and conflict segments, in file order.
    pub segments: Vec<ConflictSegment>,
}

impl ConflictFile {
    /// The (ours, theirs) hunk pairs in file order.
    #[must_use]
    pub fn hunks(&self) -> Vec<(&str, &str)> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                ConflictSegment::Conflict { ours, theirs } => {
                    Some((ours.as_str(), theirs.as_str()))
                }
                ConflictSegment::Text(_) => None,
            })
            .collect()
    }
}

/// Per-hunk side selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HunkChoice {
    Ours,
    Theirs,
}

/// How to resolve one conflicted file.
#[derive(Debug, Clone)]
pub enum FileResolution {
    /// One choice per conflict hunk, in file order.
    Hunks(Vec<HunkChoice>),
    /// Replace the whole file with caller-merged content.
    Custom(String),
}

/// Drives one merge workflow against one repository.
///
/// The engine does not hold the repository lock across the workflow: each
/// step locks for its own duration, and the state machine sequences the
/// steps. One `MergeEngine` instance per attempted merge.
pub struct MergeEngine<'a, R: CommandRunner> {
    client: &'a GitClient<R>,
    repo: PathBuf,
    state: MergeState,
}

impl<'a, R: CommandRunner> MergeEngine<'a, R> {
    #[must_use]
    pub fn new(client: &'a GitClient<R>, repo: impl Into<PathBuf>) -> Self {
        Self {
            client,
            repo: repo.into(),
            state: MergeState::Idle,
        }
    }

    /// Current workflow state.
    #[must_use]
    pub const fn state(&self) -> MergeState {
        self.state
    }

    /// Merge `source` into the checked-out branch.
    ///
    /// A zero exit means git auto-committed the merge: the outcome is
    /// [`MergeOutcome::Clean`]. A conflict-signalling failure transitions to
    /// `Conflicted` and returns the extracted conflict files. Any other
    /// failure resets to `Idle` and propagates.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::MergeState`] when called outside `Idle`,
    /// [`GitError::BranchNotFound`] for unknown sources, or any classified
    /// error from the underlying command.
    pub async fn merge(&mut self, source: &str) -> EngineResult<MergeOutcome> {
        self.expect_state(MergeState::Idle, "merge")?;
        self.transition(MergeState::Merging);

        let result = self
            .client
            .run_mutating(
                &self.repo,
                "merge",
                &["merge", "--no-edit", source],
                Some(source),
                true,
            )
            .await;

        match result {
            Ok(_) => {
                self.transition(MergeState::Clean);
                info!(repo = %self.repo.display(), source, "merge committed cleanly");
                Ok(MergeOutcome::Clean)
            }
            Err(e) if e.is_merge_conflict() => {
                self.transition(MergeState::Conflicted);
                let files = self.collect_conflicts().await?;
                Ok(MergeOutcome::Conflicted(files))
            }
            Err(e) => {
                self.transition(MergeState::Idle);
                Err(e)
            }
        }
    }

    /// Re-read the conflicted files from the working tree.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::MergeState`] outside `Conflicted`, or an I/O
    /// error reading the working tree.
    pub async fn conflicts(&self) -> EngineResult<Vec<ConflictFile>> {
        self.expect_state(MergeState::Conflicted, "conflicts")?;
        self.collect_conflicts().await
    }

    /// Write a resolution for one conflicted file and stage it.
    ///
    /// When the last conflicted entry leaves `git status`, the workflow
    /// transitions to `Resolved`.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::MergeState`] outside `Conflicted`, an error when
    /// the hunk choice count does not match the file, or any staging error.
    pub async fn resolve(
        &mut self,
        file: &ConflictFile,
        resolution: &FileResolution,
    ) -> EngineResult<()> {
        self.expect_state(MergeState::Conflicted, "resolve")?;

        let content = match resolution {
            FileResolution::Custom(content) => content.clone(),
            FileResolution::Hunks(choices) => render_resolution(file, choices)?,
        };

        let abs = self.repo.join(&file.path);
        tokio::fs::write(&abs, content).await?;
        self.client.stage(&self.repo, &[file.path.as_str()]).await?;
        debug!(repo = %self.repo.display(), file = %file.path, "conflict resolved and staged");

        if !self.any_conflicts_left().await? {
            self.transition(MergeState::Resolved);
        }
        Ok(())
    }

    /// Finalize the merge commit once every conflict is resolved.
    ///
    /// Uses git's prepared merge message unless `message` overrides it.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::MergeState`] outside `Resolved`, or any
    /// classified commit error.
    pub async fn finalize(&mut self, message: Option<&str>) -> EngineResult<()> {
        self.expect_state(MergeState::Resolved, "finalize")?;

        let args: Vec<&str> = match message {
            Some(message) => vec!["commit", "-m", message],
            None => vec!["commit", "--no-edit"],
        };
        self.client
            .run_mutating(&self.repo, "merge-finalize", &args, None, true)
            .await?;
        self.transition(MergeState::Committed);
        info!(repo = %self.repo.display(), "merge finalized");
        Ok(())
    }

    /// Abort the merge and return the repository to its pre-merge HEAD.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::MergeState`] when no merge is in progress, or any
    /// classified error from `git merge --abort`.
    pub async fn abort(&mut self) -> EngineResult<()> {
        if !matches!(
            self.state,
            MergeState::Conflicted | MergeState::Resolved | MergeState::Merging
        ) {
            return Err(self.state_error("abort"));
        }
        self.client
            .run_mutating(&self.repo, "merge-abort", &["merge", "--abort"], None, true)
            .await?;
        self.transition(MergeState::Idle);
        Ok(())
    }

    // --- internals ---

    async fn collect_conflicts(&self) -> EngineResult<Vec<ConflictFile>> {
        let changes = self.client.status(&self.repo).await?;
        let mut files = Vec::new();
        for change in changes.iter().filter(|c| c.is_conflicted()) {
            let abs = self.repo.join(&change.path);
            let content = tokio::fs::read_to_string(&abs).await?;
            files.push(ConflictFile {
                path: change.path.clone(),
                segments: split_conflicts(&content),
            });
        }
        Ok(files)
    }

    async fn any_conflicts_left(&self) -> EngineResult<bool> {
        let changes = self.client.status(&self.repo).await?;
        Ok(changes.iter().any(|c| c.is_conflicted()))
    }

    fn expect_state(&self, expected: MergeState, operation: &'static str) -> EngineResult<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(self.state_error(operation))
        }
    }

    fn state_error(&self, operation: &'static str) -> crate::error::EngineError {
        GitError::MergeState {
            operation,
            state: self.state.name(),
        }
        .into()
    }

    fn transition(&mut self, next: MergeState) {
        self.state = next;
        self.client.publish_merge_state(&self.repo, next.name());
    }
}

/// Split file content on conflict markers.
///
/// Marker lines are matched by prefix (`<<<<<<<`, `>>>>>>>` carry labels;
/// the separator is exactly `=======`). Content outside regions, including
/// newlines, is preserved verbatim. A truncated region (EOF before the
/// closing marker) degrades to verbatim text rather than being dropped.
#[must_use]
pub fn split_conflicts(content: &str) -> Vec<ConflictSegment> {
    #[derive(PartialEq)]
    enum Mode {
        Text,
        Ours,
        Theirs,
    }

    let mut segments = Vec::new();
    let mut mode = Mode::Text;
    let mut text = String::new();
    let mut ours = String::new();
    let mut theirs = String::new();
    // Raw region lines, kept so a truncated region can be restored verbatim.
    let mut raw_region = String::new();

    for line in content.split_inclusive('\n') {
        let bare = line.strip_suffix('\n').unwrap_or(line);
        match mode {
            Mode::Text => {
                if bare.starts_with("<<<<<<<") {
                    mode = Mode::Ours;
                    raw_region.clear();
                    raw_region.push_str(line);
                    ours.clear();
                    theirs.clear();
                } else {
                    text.push_str(line);
                }
            }
            Mode::Ours => {
                raw_region.push_str(line);
                if bare == "=======" {
                    mode = Mode::Theirs;
                } else {
                    ours.push_str(line);
                }
            }
            Mode::Theirs => {
                raw_region.push_str(line);
                if bare.starts_with(">>>>>>>") {
                    if !text.is_empty() {
                        segments.push(ConflictSegment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(ConflictSegment::Conflict {
                        ours: std::mem::take(&mut ours),
                        theirs: std::mem::take(&mut theirs),
                    });
                    mode = Mode::Text;
                } else {
                    theirs.push_str(line);
                }
            }
        }
    }

    if mode == Mode::Text {
        if !text.is_empty() {
            segments.push(ConflictSegment::Text(text));
        }
    } else {
        // Truncated region: restore what was consumed as plain text.
        text.push_str(&raw_region);
        segments.push(ConflictSegment::Text(text));
    }

    segments
}

/// Reassemble a resolved file from per-hunk choices.
///
/// # Errors
///
/// Fails when the number of choices does not match the file's hunk count.
pub fn render_resolution(
    file: &ConflictFile,
    choices: &[HunkChoice],
) -> EngineResult<String> {
    let hunk_count = file
        .segments
        .iter()
        .filter(|s| matches!(s, ConflictSegment::Conflict { .. }))
        .count();
    if choices.len() != hunk_count {
        return Err(crate::error::EngineError::other(format!(
            "resolution for '{}' supplies {} choices for {} hunks",
            file.path,
            choices.len(),
            hunk_count
        )));
    }

    let mut out = String::new();
    let mut next_choice = choices.iter();
    for segment in &file.segments {
        match segment {
            ConflictSegment::Text(text) => out.push_str(text),
            ConflictSegment::Conflict { ours, theirs } => {
                match next_choice.next().expect("count checked above") {
                    HunkChoice::Ours => out.push_str(ours),
                    HunkChoice::Theirs => out.push_str(theirs),
                }
            }
        }
    }
    Ok(out)
}
