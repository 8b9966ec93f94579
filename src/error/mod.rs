// gitdeck: Desktop Git Client Engine
//
// SPDX-FileCopyrightText: 2026 gitdeck contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!            EngineError (~24 bytes)
//!                   |
//!     +------+-----+------+------+
//!     |      |     |      |      |
//!     v      v     v      v      v
//!    Git   Proc  Parse   Cfg   Io/Other
//!    Box    Box   Box    Box   Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Git     NotARepository, AuthenticationRequired, MergeConflict,
//!           NoUpstream, BranchNotFound, CommandFailed, EmptyOutput,
//!           MergeState
//!   Process ExecutableNotFound, SpawnFailed, NonZeroExit, Timeout,
//!           OutputError
//!   Parse   Malformed
//!   Config  ReadError, ParseError, InvalidValue, NotFound
//!
//! All variants boxed => EngineError fits in 24 bytes.
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`EngineError`].
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Top-level engine error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
/// Only values of this type cross into UI-facing code; raw process failures
/// and parse mishaps are classified at the layer that has enough context.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Git operation failed.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Output parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] Box<ParseError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

impl EngineError {
    /// Create a generic [`EngineError::Other`] from a message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into().into_boxed_str())
    }

    /// Returns the inner [`GitError`] if this is a git error.
    #[must_use]
    pub fn as_git(&self) -> Option<&GitError> {
        match self {
            Self::Git(e) => Some(e),
            _ => None,
        }
    }

    /// True if this error is the merge-conflict signal.
    ///
    /// A conflicted merge is a workflow state rather than a hard failure;
    /// the merge engine routes it into conflict extraction.
    #[must_use]
    pub fn is_merge_conflict(&self) -> bool {
        matches!(self.as_git(), Some(GitError::MergeConflict { .. }))
    }
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for EngineError {
                fn from(err: $error) -> Self {
                    EngineError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    GitError => Git,
    ProcessError => Process,
    ParseError => Parse,
    ConfigError => Config,
    std::io::Error => Io,
}

// --- Git Errors ---

/// Git operation errors, classified from subprocess exits.
///
/// A non-zero `git` exit is never swallowed: it is matched against known
/// stderr patterns and surfaced as the most specific variant available,
/// falling back to [`GitError::CommandFailed`].
#[derive(Debug, Error)]
pub enum GitError {
    /// The path is not inside a git working tree.
    #[error("not a git repository: {path}")]
    NotARepository { path: String },

    /// Remote operation rejected for authentication/permission reasons.
    #[error("authentication required: {command}")]
    AuthenticationRequired { command: String, stderr: String },

    /// Merge stopped on conflicts. A signal, not a hard failure: the merge
    /// engine transitions to conflict extraction when it sees this.
    #[error("merge stopped on conflicts")]
    MergeConflict { stderr: String },

    /// The current branch has no upstream configured.
    #[error("no upstream configured for branch '{branch}'")]
    NoUpstream { branch: String },

    /// Branch not found.
    #[error("branch not found: {branch}")]
    BranchNotFound { branch: String },

    /// Git command exited non-zero without matching a known pattern.
    #[error("git command failed: {command} (exit {exit_code}): {stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    /// Output was empty where content was required.
    #[error("git command produced no output: {command}")]
    EmptyOutput { command: String },

    /// Merge engine method called in a state that does not permit it.
    #[error("merge operation '{operation}' not valid in state {state}")]
    MergeState {
        operation: &'static str,
        state: &'static str,
    },
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with non-zero status.
    #[error("process '{command}' exited with code {code}")]
    NonZeroExit { command: String, code: i32 },

    /// Process exceeded its deadline and was killed.
    #[error("process '{command}' timed out after {timeout_secs} seconds")]
    Timeout { command: String, timeout_secs: u64 },

    /// Failed to read process output.
    #[error("failed to read output from process '{command}': {message}")]
    OutputError { command: String, message: String },
}

// --- Parse Errors ---

/// Raised when an entire expected output is empty or unparseable.
///
/// Single malformed lines never produce this: parsers skip them and record a
/// [`crate::git::parse::ParseWarning`] instead.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The output as a whole did not match the expected shape.
    #[error("unparseable {context} output: {line:?}")]
    Malformed { context: &'static str, line: String },
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },

    /// Configuration file not found.
    #[error("config file not found: {0}")]
    NotFound(String),
}
