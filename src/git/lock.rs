// gitdeck: Desktop Git Client Engine
//
// SPDX-FileCopyrightText: 2026 gitdeck contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-repository serialization of git operations.
//!
//! ```text
//! RepoLocks
//!   /repo/a  --> Mutex  op1 -> op2 -> op3   (FIFO)
//!   /repo/b  --> Mutex  opX                 (concurrent with /repo/a)
//! ```
//!
//! Concurrent git invocations against one working tree race on
//! `.git/index.lock`; git offers no application-level concurrency control,
//! so the engine provides it. One fair async mutex per canonical path:
//! tokio queues waiters first-in-first-out, which totally orders operations
//! on a path while distinct paths proceed fully in parallel.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of per-repository locks.
///
/// Entries are created lazily on first use and live for the registry's
/// lifetime; a handful of `Arc<Mutex<()>>` per open repository is not worth
/// a reclamation scheme.
#[derive(Debug, Default)]
pub struct RepoLocks {
    inner: StdMutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl RepoLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `repo_path`, waiting FIFO behind earlier
    /// operations on the same repository.
    ///
    /// The guard is owned so it can cross await points inside the locked
    /// operation. Operations on other paths are unaffected.
    pub async fn acquire(&self, repo_path: &Path) -> OwnedMutexGuard<()> {
        self.handle_for(repo_path).lock_owned().await
    }

    /// Shared mutex handle for a path, keyed canonically so `/repo` and
    /// `/repo/.` serialize against each other.
    fn handle_for(&self, repo_path: &Path) -> Arc<Mutex<()>> {
        let key = repo_path
            .canonicalize()
            .unwrap_or_else(|_| repo_path.to_path_buf());
        let mut map = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(map.entry(key).or_default())
    }
}
