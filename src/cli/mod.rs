// gitdeck: Desktop Git Client Engine
//
// SPDX-FileCopyrightText: 2026 gitdeck contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for gitdeck using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! gitdeck [global options] <command>
//! status | log | branches | remotes | sync
//! checkout <branch> | commit -m <msg>
//! push | pull | fetch
//! merge <branch> | merge --abort
//! stash {push|list|apply|pop|drop}
//! ```

pub mod global;

#[cfg(test)]
mod tests;

use crate::cli::global::GlobalOptions;
use clap::{Args, Parser, Subcommand};

/// gitdeck - headless front end of the gitdeck repository engine.
///
/// Runs the same engine the desktop client embeds: every command spawns
/// `git`, parses its output into typed snapshots, and prints them as text
/// or JSON.
#[derive(Debug, Parser)]
#[command(
    name = "gitdeck",
    author,
    version,
    about = "Git repository engine CLI",
    long_about = "gitdeck Copyright (C) 2026 gitdeck contributors\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Headless front end of the gitdeck repository engine. Commands\n\
                  operate on the repository given with --repo (default: the\n\
                  current directory). See `gitdeck <command> --help` for more\n\
                  information about a command."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show working-tree changes.
    Status,

    /// Show commit history.
    Log(LogArgs),

    /// List local branches.
    Branches,

    /// List configured remotes.
    Remotes,

    /// Show ahead/behind counts against the upstream.
    Sync,

    /// Switch to a branch.
    Checkout(CheckoutArgs),

    /// Record a commit of the staged changes.
    Commit(CommitArgs),

    /// Push the current branch to its upstream.
    Push,

    /// Pull from the upstream.
    Pull,

    /// Fetch from the default remote.
    Fetch,

    /// Merge a branch into the checked-out one.
    Merge(MergeArgs),

    /// Stash operations.
    Stash(StashArgs),

    /// Print version information.
    Version,
}

/// Arguments for the `log` command.
#[derive(Debug, Clone, Args)]
pub struct LogArgs {
    /// Maximum number of commits to show.
    #[arg(short = 'n', long = "limit", value_name = "COUNT")]
    pub limit: Option<usize>,
}

/// Arguments for the `checkout` command.
#[derive(Debug, Clone, Args)]
pub struct CheckoutArgs {
    /// Branch to switch to.
    #[arg(value_name = "BRANCH")]
    pub branch: String,
}

/// Arguments for the `commit` command.
#[derive(Debug, Clone, Args)]
pub struct CommitArgs {
    /// Commit message.
    #[arg(short = 'm', long = "message", required = true)]
    pub message: String,

    /// Stage the given paths before committing.
    #[arg(value_name = "PATH")]
    pub paths: Vec<String>,
}

/// Arguments for the `merge` command.
#[derive(Debug, Clone, Args)]
pub struct MergeArgs {
    /// Branch to merge into the checked-out one.
    #[arg(value_name = "BRANCH", required_unless_present = "abort")]
    pub source: Option<String>,

    /// Abort the in-progress merge instead.
    #[arg(long, conflicts_with = "source")]
    pub abort: bool,
}

/// Arguments for the `stash` command.
#[derive(Debug, Clone, Args)]
pub struct StashArgs {
    /// Stash subcommand.
    #[command(subcommand)]
    pub subcommand: StashSubcommand,
}

/// Stash subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum StashSubcommand {
    /// Save the working tree to a new stash entry.
    Push(StashPushArgs),

    /// List stash entries, most recent first.
    List,

    /// Apply an entry, keeping it in the list.
    Apply(StashIndexArgs),

    /// Apply an entry and drop it.
    Pop(StashIndexArgs),

    /// Drop an entry without applying it.
    Drop(StashIndexArgs),
}

/// Arguments for `stash push`.
#[derive(Debug, Clone, Args)]
pub struct StashPushArgs {
    /// Message for the stash entry.
    #[arg(short = 'm', long = "message")]
    pub message: Option<String>,
}

/// Index argument shared by apply/pop/drop.
#[derive(Debug, Clone, Args)]
pub struct StashIndexArgs {
    /// Stash index (0 = most recent).
    #[arg(value_name = "INDEX", default_value_t = 0)]
    pub index: usize,
}

/// Parse command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
