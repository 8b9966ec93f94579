// gitdeck: Desktop Git Client Engine
//
// SPDX-FileCopyrightText: 2026 gitdeck contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Logical git operations over the runner seam.
//!
//! ```text
//! status/log/branches  -> fixed argv -> lock -> run -> parse -> entities
//! commit/push/pull/... -> fixed argv -> lock -> run -> classify -> events
//! sync_status          -> cache hit? else rev-parse + rev-list x2
//! ```
//!
//! Every operation serializes per repository path through [`RepoLocks`].
//! Arguments are always argv arrays; nothing is ever interpolated into a
//! shell string. Non-zero exits are classified against known stderr
//! patterns before crossing the engine boundary.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::core::process::builder::ProcessOutput;
use crate::error::{EngineResult, GitError, ParseError};
use crate::git::events::{EngineEvent, EventSink, NullSink};
use crate::git::lock::RepoLocks;
use crate::git::model::{Branch, Commit, FileChange, Remote, Stash, SyncStatus};
use crate::git::parse::{
    LOG_FORMAT, Parsed, parse_branches, parse_log, parse_remotes, parse_stashes, parse_status,
};
use crate::git::runner::{CommandRunner, SystemRunner};
use crate::git::sync::SyncStatusTracker;

/// The engine's entry point: one method per logical git operation.
///
/// Generic over the [`CommandRunner`] so tests substitute scripted doubles;
/// production uses [`SystemRunner`].
pub struct GitClient<R: CommandRunner = SystemRunner> {
    runner: R,
    locks: RepoLocks,
    sync: SyncStatusTracker,
    events: Arc<dyn EventSink>,
}

impl<R: CommandRunner> GitClient<R> {
    /// Creates a client over the given runner with no event sink.
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            locks: RepoLocks::new(),
            sync: SyncStatusTracker::new(),
            events: Arc::new(NullSink),
        }
    }

    /// Installs an event sink the engine publishes to after operations.
    #[must_use]
    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// The sync cache; exposed for consumers that manage invalidation
    /// around operations the client does not perform itself.
    #[must_use]
    pub const fn sync_tracker(&self) -> &SyncStatusTracker {
        &self.sync
    }

    /// The runner this client executes through.
    #[must_use]
    pub const fn runner(&self) -> &R {
        &self.runner
    }

    // --- queries ---

    /// True if `repo` lies inside a git working tree.
    pub async fn is_repository(&self, repo: &Path) -> bool {
        let _guard = self.locks.acquire(repo).await;
        match self.runner.run_git(&["rev-parse", "--is-inside-work-tree"], repo).await {
            Ok(output) => output.success() && output.stdout().trim() == "true",
            Err(_) => false,
        }
    }

    /// Working-tree changes from `git status --porcelain`.
    ///
    /// # Errors
    ///
    /// Returns a classified error on subprocess failure or a non-zero exit;
    /// an empty output is a clean tree, not an error.
    pub async fn status(&self, repo: &Path) -> EngineResult<Vec<FileChange>> {
        let _guard = self.locks.acquire(repo).await;
        self.status_locked(repo).await
    }

    async fn status_locked(&self, repo: &Path) -> EngineResult<Vec<FileChange>> {
        let args = ["status", "--porcelain"];
        let output = self.run_checked(repo, &args, None).await?;
        ensure_parsed("status", output.stdout(), parse_status(output.stdout()))
    }

    /// Commit history, newest first, with the HEAD commit marked.
    ///
    /// # Errors
    ///
    /// Returns a classified error on failure. A repository with no commits
    /// yet yields an empty listing.
    pub async fn log(&self, repo: &Path, limit: Option<usize>) -> EngineResult<Vec<Commit>> {
        let _guard = self.locks.acquire(repo).await;

        let limit_arg = limit.map(|n| format!("--max-count={n}"));
        let mut args = vec!["log", LOG_FORMAT];
        if let Some(limit_arg) = &limit_arg {
            args.push(limit_arg);
        }

        let output = match self.run_checked(repo, &args, None).await {
            Ok(output) => output,
            Err(e) if is_empty_history(&e) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let head = self.head_hash_locked(repo).await?;
        let parsed = parse_log(output.stdout(), Some(&head));
        ensure_parsed("log", output.stdout(), parsed)
    }

    /// Local branches with the checked-out one marked.
    ///
    /// # Errors
    ///
    /// Returns a classified error on failure.
    pub async fn branches(&self, repo: &Path) -> EngineResult<Vec<Branch>> {
        let _guard = self.locks.acquire(repo).await;
        let output = self.run_checked(repo, &["branch", "--list"], None).await?;
        ensure_parsed("branch", output.stdout(), parse_branches(output.stdout()))
    }

    /// Name of the checked-out branch, or `None` on a detached HEAD.
    ///
    /// # Errors
    ///
    /// Returns a classified error on failure.
    pub async fn current_branch(&self, repo: &Path) -> EngineResult<Option<String>> {
        let _guard = self.locks.acquire(repo).await;
        let output = self
            .run_checked(repo, &["branch", "--show-current"], None)
            .await?;
        let name = output.stdout().trim();
        Ok((!name.is_empty()).then(|| name.to_string()))
    }

    /// Configured remotes, one entry per name (fetch URL).
    ///
    /// # Errors
    ///
    /// Returns a classified error on failure.
    pub async fn remotes(&self, repo: &Path) -> EngineResult<Vec<Remote>> {
        let _guard = self.locks.acquire(repo).await;
        let output = self.run_checked(repo, &["remote", "-v"], None).await?;
        ensure_parsed("remote", output.stdout(), parse_remotes(output.stdout()))
    }

    /// Stash entries in git's LIFO order with author dates.
    ///
    /// # Errors
    ///
    /// Returns a classified error on failure.
    pub async fn stash_list(&self, repo: &Path) -> EngineResult<Vec<Stash>> {
        let _guard = self.locks.acquire(repo).await;
        let output = self
            .run_checked(
                repo,
                &["stash", "list", "--pretty=format:%gd: %gs%x1f%aI"],
                None,
            )
            .await?;
        ensure_parsed("stash", output.stdout(), parse_stashes(output.stdout()))
    }

    /// Full hash of HEAD.
    ///
    /// # Errors
    ///
    /// Returns a classified error on failure or when the output is empty.
    pub async fn head_hash(&self, repo: &Path) -> EngineResult<String> {
        let _guard = self.locks.acquire(repo).await;
        self.head_hash_locked(repo).await
    }

    async fn head_hash_locked(&self, repo: &Path) -> EngineResult<String> {
        let output = self.run_checked(repo, &["rev-parse", "HEAD"], None).await?;
        let hash = output.stdout().trim().to_string();
        if hash.is_empty() {
            return Err(GitError::EmptyOutput {
                command: "git rev-parse HEAD".to_string(),
            }
            .into());
        }
        Ok(hash)
    }

    /// Short name of the upstream ref of the current branch.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::NoUpstream`] when none is configured.
    pub async fn upstream_ref(&self, repo: &Path) -> EngineResult<String> {
        let _guard = self.locks.acquire(repo).await;
        self.upstream_ref_locked(repo).await
    }

    async fn upstream_ref_locked(&self, repo: &Path) -> EngineResult<String> {
        let args = ["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{upstream}"];
        let output = self.run_checked(repo, &args, None).await?;
        let upstream = output.stdout().trim().to_string();
        if upstream.is_empty() {
            return Err(GitError::EmptyOutput {
                command: "git rev-parse --abbrev-ref --symbolic-full-name @{upstream}".to_string(),
            }
            .into());
        }
        Ok(upstream)
    }

    /// Ahead/behind counts against the upstream, cached per path.
    ///
    /// A cached value is returned without spawning anything; recomputation
    /// happens only after a mutating operation invalidated the entry (or on
    /// first use). Counts come from two rev-list invocations: commits in
    /// HEAD not in upstream (ahead) and the reverse (behind).
    ///
    /// # Errors
    ///
    /// Returns [`GitError::NoUpstream`] when the branch tracks nothing,
    /// otherwise a classified error on failure.
    pub async fn sync_status(&self, repo: &Path) -> EngineResult<SyncStatus> {
        if let Some(cached) = self.sync.cached(repo) {
            debug!(repo = %repo.display(), "sync status cache hit");
            return Ok(cached);
        }

        let _guard = self.locks.acquire(repo).await;
        let head = self.head_hash_locked(repo).await?;
        let upstream = self.upstream_ref_locked(repo).await?;

        let ahead = self
            .rev_list_count(repo, &format!("{upstream}..HEAD"))
            .await?;
        let behind = self
            .rev_list_count(repo, &format!("HEAD..{upstream}"))
            .await?;

        let status = SyncStatus {
            ahead,
            behind,
            computed_at: Utc::now(),
        };
        self.sync.store(repo, head, upstream, status.clone());
        self.events.publish(EngineEvent::SyncStatusChanged {
            repo: repo.to_path_buf(),
            status: status.clone(),
        });
        Ok(status)
    }

    async fn rev_list_count(&self, repo: &Path, range: &str) -> EngineResult<u32> {
        let output = self.run_checked(repo, &["rev-list", range], None).await?;
        let count = output
            .stdout()
            .lines()
            .filter(|l| !l.trim().is_empty())
            .count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    // --- mutations ---

    /// Switch to an existing branch.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::BranchNotFound`] for unknown names, otherwise a
    /// classified error.
    pub async fn checkout(&self, repo: &Path, branch: &str) -> EngineResult<()> {
        self.run_mutating(repo, "checkout", &["checkout", branch], Some(branch), true)
            .await?;
        Ok(())
    }

    /// Create a branch, optionally from a base ref.
    ///
    /// # Errors
    ///
    /// Returns a classified error on failure.
    pub async fn create_branch(
        &self,
        repo: &Path,
        name: &str,
        base: Option<&str>,
    ) -> EngineResult<()> {
        let mut args = vec!["branch", name];
        if let Some(base) = base {
            args.push(base);
        }
        self.run_mutating(repo, "create-branch", &args, Some(name), false)
            .await?;
        Ok(())
    }

    /// Stage the given paths (`git add --`).
    ///
    /// # Errors
    ///
    /// Returns a classified error on failure.
    pub async fn stage(&self, repo: &Path, paths: &[&str]) -> EngineResult<()> {
        let mut args = vec!["add", "--"];
        args.extend_from_slice(paths);
        self.run_mutating(repo, "stage", &args, None, false).await?;
        Ok(())
    }

    /// Record a commit with the given message.
    ///
    /// # Errors
    ///
    /// Returns a classified error on failure.
    pub async fn commit(&self, repo: &Path, message: &str) -> EngineResult<()> {
        self.run_mutating(repo, "commit", &["commit", "-m", message], None, true)
            .await?;
        Ok(())
    }

    /// Push the current branch to its upstream.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::AuthenticationRequired`] on credential
    /// rejections, otherwise a classified error.
    pub async fn push(&self, repo: &Path) -> EngineResult<()> {
        self.run_mutating(repo, "push", &["push", "--quiet"], None, true)
            .await?;
        Ok(())
    }

    /// Pull from the upstream.
    ///
    /// # Errors
    ///
    /// Returns a classified error; conflicting pulls surface the
    /// merge-conflict signal for the merge engine.
    pub async fn pull(&self, repo: &Path) -> EngineResult<()> {
        self.run_mutating(repo, "pull", &["pull", "--quiet"], None, true)
            .await?;
        Ok(())
    }

    /// Fetch from the default remote.
    ///
    /// # Errors
    ///
    /// Returns a classified error on failure.
    pub async fn fetch(&self, repo: &Path) -> EngineResult<()> {
        self.run_mutating(repo, "fetch", &["fetch", "--quiet"], None, true)
            .await?;
        Ok(())
    }

    /// Save the working tree to a new stash entry.
    ///
    /// # Errors
    ///
    /// Returns a classified error on failure.
    pub async fn stash_push(&self, repo: &Path, message: Option<&str>) -> EngineResult<()> {
        let mut args = vec!["stash", "push"];
        if let Some(message) = message {
            args.extend_from_slice(&["--message", message]);
        }
        self.run_mutating(repo, "stash-push", &args, None, false)
            .await?;
        Ok(())
    }

    /// Apply a stash entry, keeping it in the list.
    ///
    /// # Errors
    ///
    /// Returns a classified error; a conflicting apply surfaces the
    /// merge-conflict signal.
    pub async fn stash_apply(&self, repo: &Path, index: usize) -> EngineResult<()> {
        let selector = format!("stash@{{{index}}}");
        self.run_mutating(repo, "stash-apply", &["stash", "apply", &selector], None, true)
            .await?;
        Ok(())
    }

    /// Apply a stash entry and drop it. Indices of later entries shift.
    ///
    /// # Errors
    ///
    /// Returns a classified error on failure.
    pub async fn stash_pop(&self, repo: &Path, index: usize) -> EngineResult<()> {
        let selector = format!("stash@{{{index}}}");
        self.run_mutating(repo, "stash-pop", &["stash", "pop", &selector], None, true)
            .await?;
        Ok(())
    }

    /// Drop a stash entry without applying. Indices of later entries shift.
    ///
    /// # Errors
    ///
    /// Returns a classified error on failure.
    pub async fn stash_drop(&self, repo: &Path, index: usize) -> EngineResult<()> {
        let selector = format!("stash@{{{index}}}");
        self.run_mutating(repo, "stash-drop", &["stash", "drop", &selector], None, false)
            .await?;
        Ok(())
    }

    // --- internals ---

    /// Runs git under the path lock, classifies failures, publishes the
    /// operation event, and invalidates the sync cache when the operation
    /// can move refs.
    pub(crate) async fn run_mutating(
        &self,
        repo: &Path,
        operation: &'static str,
        args: &[&str],
        branch_hint: Option<&str>,
        invalidates_sync: bool,
    ) -> EngineResult<ProcessOutput> {
        let _guard = self.locks.acquire(repo).await;
        let result = self.run_checked(repo, args, branch_hint).await;

        match &result {
            Ok(_) => {
                if invalidates_sync {
                    self.sync.invalidate(repo);
                }
                self.events.publish(EngineEvent::OperationCompleted {
                    repo: repo.to_path_buf(),
                    operation,
                });
            }
            Err(e) => {
                self.events.publish(EngineEvent::OperationFailed {
                    repo: repo.to_path_buf(),
                    operation,
                    summary: e.to_string(),
                });
            }
        }
        result
    }

    /// Runs git and classifies any non-zero exit into a [`GitError`].
    pub(crate) async fn run_checked(
        &self,
        repo: &Path,
        args: &[&str],
        branch_hint: Option<&str>,
    ) -> EngineResult<ProcessOutput> {
        let output = self.runner.run_git(args, repo).await?;
        if output.success() {
            return Ok(output);
        }
        Err(classify_failure(repo, args, &output, branch_hint).into())
    }

    /// Publish a merge state transition on behalf of the merge engine.
    pub(crate) fn publish_merge_state(&self, repo: &Path, state: &'static str) {
        self.events.publish(EngineEvent::MergeStateChanged {
            repo: repo.to_path_buf(),
            state,
        });
    }
}

/// Classify a non-zero git exit by its stderr (and stdout for merge
/// conflicts, which git reports on stdout).
fn classify_failure(
    repo: &Path,
    args: &[&str],
    output: &ProcessOutput,
    branch_hint: Option<&str>,
) -> GitError {
    let command = render_command(args);
    let stderr = output.stderr().trim().to_string();
    let haystack = format!(
        "{}\n{}",
        output.stdout().to_lowercase(),
        stderr.to_lowercase()
    );

    if haystack.contains("not a git repository") {
        return GitError::NotARepository {
            path: repo.display().to_string(),
        };
    }
    if haystack.contains("conflict (")
        || haystack.contains("automatic merge failed")
        || haystack.contains("fix conflicts and then commit")
        || haystack.contains("needs merge")
    {
        return GitError::MergeConflict { stderr };
    }
    if haystack.contains("authentication failed")
        || haystack.contains("could not read username")
        || haystack.contains("could not read password")
        || haystack.contains("permission denied")
        || haystack.contains("403")
    {
        return GitError::AuthenticationRequired { command, stderr };
    }
    if haystack.contains("no upstream branch")
        || haystack.contains("does not have an upstream")
        || haystack.contains("no upstream configured")
    {
        return GitError::NoUpstream {
            branch: branch_hint.unwrap_or("HEAD").to_string(),
        };
    }
    if haystack.contains("did not match any file(s) known to git")
        || haystack.contains("not something we can merge")
        || haystack.contains("couldn't find remote ref")
    {
        return GitError::BranchNotFound {
            branch: branch_hint.unwrap_or("<unknown>").to_string(),
        };
    }

    GitError::CommandFailed {
        command,
        exit_code: output.exit_code(),
        stderr,
    }
}

/// True when the failure is git refusing to log an unborn branch.
fn is_empty_history(e: &crate::error::EngineError) -> bool {
    matches!(
        e.as_git(),
        Some(GitError::CommandFailed { stderr, .. })
            if stderr.contains("does not have any commits yet")
    )
}

fn render_command(args: &[&str]) -> String {
    let mut command = String::from("git");
    for arg in args {
        command.push(' ');
        command.push_str(arg);
    }
    command
}

/// Log recovered per-line warnings; fail only when the whole output was
/// expected to parse and nothing did.
fn ensure_parsed<T>(
    context: &'static str,
    raw: &str,
    parsed: Parsed<T>,
) -> EngineResult<Vec<T>> {
    for warning in &parsed.warnings {
        warn!(context = warning.context, line = %warning.line, "skipped malformed line");
    }
    if parsed.entries.is_empty() && !parsed.warnings.is_empty() && !raw.trim().is_empty() {
        let line = parsed
            .warnings
            .first()
            .map_or_else(String::new, |w| w.line.clone());
        return Err(ParseError::Malformed { context, line }.into());
    }
    Ok(parsed.entries)
}

impl GitClient<SystemRunner> {
    /// Convenience constructor resolving `git` from PATH.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::ExecutableNotFound` when no git is available.
    pub fn from_path() -> EngineResult<Self> {
        Ok(Self::new(SystemRunner::from_path()?))
    }
}
