// gitdeck: Desktop Git Client Engine
//
// SPDX-FileCopyrightText: 2026 gitdeck contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Ahead/behind cache.
//!
//! ```text
//! SyncStatusTracker
//!   /repo/a --> { SyncStatus, head, upstream }
//!
//! get:        cached value, zero subprocesses
//! recompute:  client runs rev-list twice, stores fresh value
//! invalidate: commit/merge/push/pull/fetch/checkout/stash-apply
//! ```
//!
//! Recomputation is caller-driven; nothing polls in the background. The
//! entry records the `(HEAD, upstream)` pair it was derived from, so a
//! consumer can tell which ref state a value describes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex as StdMutex, PoisonError};

use crate::git::model::SyncStatus;

/// One cached computation.
#[derive(Debug, Clone)]
struct CachedSync {
    status: SyncStatus,
    head: String,
    upstream: String,
}

/// Cache of the last computed [`SyncStatus`] per repository path.
#[derive(Debug, Default)]
pub struct SyncStatusTracker {
    inner: StdMutex<HashMap<PathBuf, CachedSync>>,
}

impl SyncStatusTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached status for `repo_path`, if a computation is still
    /// valid (i.e. no mutating operation invalidated it). Never touches a
    /// subprocess.
    #[must_use]
    pub fn cached(&self, repo_path: &Path) -> Option<SyncStatus> {
        self.lock().get(repo_path).map(|entry| entry.status.clone())
    }

    /// Returns the `(HEAD, upstream)` pair the cached value was computed
    /// from, if any.
    #[must_use]
    pub fn ref_state(&self, repo_path: &Path) -> Option<(String, String)> {
        self.lock()
            .get(repo_path)
            .map(|entry| (entry.head.clone(), entry.upstream.clone()))
    }

    /// Stores a freshly computed status together with the ref state it was
    /// derived from. Always a new value, never an in-place mutation.
    pub fn store(
        &self,
        repo_path: &Path,
        head: impl Into<String>,
        upstream: impl Into<String>,
        status: SyncStatus,
    ) {
        self.lock().insert(
            repo_path.to_path_buf(),
            CachedSync {
                status,
                head: head.into(),
                upstream: upstream.into(),
            },
        );
    }

    /// Drops the cached value for `repo_path`. Called by every mutating
    /// operation that can move HEAD, the upstream, or remote refs.
    pub fn invalidate(&self, repo_path: &Path) {
        self.lock().remove(repo_path);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, CachedSync>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
