// gitdeck: Desktop Git Client Engine
//
// SPDX-FileCopyrightText: 2026 gitdeck contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! The injected subprocess seam the client runs git through.
//!
//! ```text
//! GitClient<R: CommandRunner>
//!         |
//!         v
//!   SystemRunner ----> ProcessBuilder ----> git
//!   (production)       argv, cwd, env, timeout
//!
//!   test doubles script outputs + log argv
//! ```
//!
//! A trait instance replaces the original design's global shell singleton:
//! callers construct the runner explicitly, tests substitute doubles, and no
//! hidden process state exists anywhere.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::process::builder::{ProcessBuilder, ProcessFlags, ProcessOutput};
use crate::error::{EngineResult, ProcessError};

/// Runs one git invocation: argv array, explicit working directory, captured
/// output. Never a shell string.
///
/// Implementations must return `Ok` for non-zero exits; classification of
/// git failures belongs to the caller, which has the operation context.
pub trait CommandRunner: Send + Sync {
    /// Execute `git <args>` with `cwd` as working directory.
    ///
    /// # Errors
    ///
    /// Returns a `ProcessError` for spawn failures and timeouts only; a
    /// non-zero git exit is a successful run of the subprocess.
    fn run_git(
        &self,
        args: &[&str],
        cwd: &Path,
    ) -> impl Future<Output = EngineResult<ProcessOutput>> + Send;
}

/// Production runner spawning the real `git` binary.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    program: PathBuf,
    timeout: Option<Duration>,
    extra_env: Vec<(String, String)>,
}

impl SystemRunner {
    /// Creates a runner for a git binary resolved from PATH.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::ExecutableNotFound` if no `git` is on PATH.
    pub fn from_path() -> Result<Self, ProcessError> {
        let builder = ProcessBuilder::which("git")?;
        Ok(Self::new(builder.program().clone()))
    }

    /// Creates a runner for an explicitly configured git binary.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
            extra_env: Vec::new(),
        }
    }

    /// Sets a deadline applied to every invocation.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Adds an environment variable for every invocation.
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_env.push((key.into(), value.into()));
        self
    }

    /// Path of the git binary this runner spawns.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl CommandRunner for SystemRunner {
    async fn run_git(&self, args: &[&str], cwd: &Path) -> EngineResult<ProcessOutput> {
        let mut builder = ProcessBuilder::new(&self.program)
            .args(args)
            .cwd(cwd)
            .capture_output()
            .flag(ProcessFlags::ALLOW_FAILURE)
            // git must never block on an interactive prompt under the engine
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GCM_INTERACTIVE", "never");

        for (key, value) in &self.extra_env {
            builder = builder.env(key, value);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder.run().await
    }
}
