// gitdeck: Desktop Git Client Engine
//
// SPDX-FileCopyrightText: 2026 gitdeck contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Optional publish seam for engine events.
//!
//! ```text
//! GitClient ----publish----> EventSink (trait)
//!                              |-- NullSink     (default, discards)
//!                              '-- TracingSink  (CLI, logs at info)
//! ```
//!
//! Results always return to the caller directly; the sink is an additional
//! channel a UI layer may subscribe through. The engine knows nothing about
//! any particular notification system.

use std::path::PathBuf;

use crate::git::model::SyncStatus;

/// Something that happened inside the engine worth broadcasting.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// A mutating operation finished successfully.
    OperationCompleted { repo: PathBuf, operation: &'static str },
    /// A mutating operation failed; the summary is the typed error's
    /// human-readable rendering, raw stderr stays on the returned error.
    OperationFailed {
        repo: PathBuf,
        operation: &'static str,
        summary: String,
    },
    /// Ahead/behind counts were recomputed.
    SyncStatusChanged { repo: PathBuf, status: SyncStatus },
    /// The merge workflow changed state.
    MergeStateChanged { repo: PathBuf, state: &'static str },
}

/// Receives engine events. Implementations must be cheap and non-blocking;
/// they are called from inside locked sections.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: EngineEvent);
}

/// Discards every event. The default when no sink is wired.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&self, _event: EngineEvent) {}
}

/// Logs events through `tracing`; the sink the CLI installs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn publish(&self, event: EngineEvent) {
        match &event {
            EngineEvent::OperationCompleted { repo, operation } => {
                tracing::info!(repo = %repo.display(), operation, "operation completed");
            }
            EngineEvent::OperationFailed {
                repo,
                operation,
                summary,
            } => {
                tracing::warn!(repo = %repo.display(), operation, %summary, "operation failed");
            }
            EngineEvent::SyncStatusChanged { repo, status } => {
                tracing::info!(
                    repo = %repo.display(),
                    ahead = status.ahead,
                    behind = status.behind,
                    "sync status changed"
                );
            }
            EngineEvent::MergeStateChanged { repo, state } => {
                tracing::info!(repo = %repo.display(), state, "merge state changed");
            }
        }
    }
}
