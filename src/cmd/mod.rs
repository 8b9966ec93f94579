// gitdeck: Desktop Git Client Engine
//
// SPDX-FileCopyrightText: 2026 gitdeck contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command handlers for the headless CLI.
//!
//! ```text
//! run_*_command(client, args)
//!   engine call --> snapshot --> text or JSON on stdout
//! ```
//!
//! Handlers own presentation only; every git semantic lives in the engine.

use std::path::Path;

use crate::cli::{CheckoutArgs, CommitArgs, LogArgs, MergeArgs, StashSubcommand};
use crate::error::Result;
use crate::git::client::GitClient;
use crate::git::merge::{MergeEngine, MergeOutcome};
use crate::git::runner::CommandRunner;

/// Show working-tree changes.
///
/// # Errors
///
/// Returns an error if the status query fails.
pub async fn run_status_command<R: CommandRunner>(
    client: &GitClient<R>,
    repo: &Path,
    json: bool,
) -> Result<()> {
    let changes = client.status(repo).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&changes)?);
        return Ok(());
    }
    if changes.is_empty() {
        println!("working tree clean");
        return Ok(());
    }
    for change in &changes {
        let original = change
            .original_path
            .as_deref()
            .map_or_else(String::new, |old| format!("{old} -> "));
        println!("{:>10?}  {original}{}", change.status, change.path);
    }
    Ok(())
}

/// Show commit history.
///
/// # Errors
///
/// Returns an error if the log query fails.
pub async fn run_log_command<R: CommandRunner>(
    client: &GitClient<R>,
    repo: &Path,
    args: &LogArgs,
    json: bool,
) -> Result<()> {
    let commits = client.log(repo, args.limit).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&commits)?);
        return Ok(());
    }
    for commit in &commits {
        let head = if commit.is_head { " (HEAD)" } else { "" };
        let subject = commit.message.lines().next().unwrap_or_default();
        println!(
            "{} {} {subject}{head}",
            commit.short_hash,
            commit.author_date.format("%Y-%m-%d"),
        );
    }
    Ok(())
}

/// List local branches.
///
/// # Errors
///
/// Returns an error if the branch query fails.
pub async fn run_branches_command<R: CommandRunner>(
    client: &GitClient<R>,
    repo: &Path,
    json: bool,
) -> Result<()> {
    let branches = client.branches(repo).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&branches)?);
        return Ok(());
    }
    for branch in &branches {
        let marker = if branch.is_current { "*" } else { " " };
        println!("{marker} {}", branch.name);
    }
    Ok(())
}

/// List configured remotes.
///
/// # Errors
///
/// Returns an error if the remote query fails.
pub async fn run_remotes_command<R: CommandRunner>(
    client: &GitClient<R>,
    repo: &Path,
    json: bool,
) -> Result<()> {
    let remotes = client.remotes(repo).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&remotes)?);
        return Ok(());
    }
    for remote in &remotes {
        println!("{:15} {}", remote.name, remote.url);
    }
    Ok(())
}

/// Show ahead/behind counts against the upstream.
///
/// # Errors
///
/// Returns an error if the repository has no upstream or the counts cannot
/// be computed.
pub async fn run_sync_command<R: CommandRunner>(
    client: &GitClient<R>,
    repo: &Path,
    json: bool,
) -> Result<()> {
    let status = client.sync_status(repo).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }
    println!("ahead {}, behind {}", status.ahead, status.behind);
    Ok(())
}

/// Switch to a branch.
///
/// # Errors
///
/// Returns an error if the checkout fails.
pub async fn run_checkout_command<R: CommandRunner>(
    client: &GitClient<R>,
    repo: &Path,
    args: &CheckoutArgs,
) -> Result<()> {
    client.checkout(repo, &args.branch).await?;
    println!("switched to '{}'", args.branch);
    Ok(())
}

/// Stage the given paths (if any) and record a commit.
///
/// # Errors
///
/// Returns an error if staging or the commit fails.
pub async fn run_commit_command<R: CommandRunner>(
    client: &GitClient<R>,
    repo: &Path,
    args: &CommitArgs,
) -> Result<()> {
    if !args.paths.is_empty() {
        let paths: Vec<&str> = args.paths.iter().map(String::as_str).collect();
        client.stage(repo, &paths).await?;
    }
    client.commit(repo, &args.message).await?;
    println!("committed");
    Ok(())
}

/// Push the current branch to its upstream.
///
/// # Errors
///
/// Returns an error if the push fails; the typed error's summary is what
/// the desktop client surfaces (e.g. "authentication required").
pub async fn run_push_command<R: CommandRunner>(client: &GitClient<R>, repo: &Path) -> Result<()> {
    client.push(repo).await?;
    println!("pushed");
    Ok(())
}

/// Pull from the upstream.
///
/// # Errors
///
/// Returns an error if the pull fails.
pub async fn run_pull_command<R: CommandRunner>(client: &GitClient<R>, repo: &Path) -> Result<()> {
    client.pull(repo).await?;
    println!("pulled");
    Ok(())
}

/// Fetch from the default remote.
///
/// # Errors
///
/// Returns an error if the fetch fails.
pub async fn run_fetch_command<R: CommandRunner>(client: &GitClient<R>, repo: &Path) -> Result<()> {
    client.fetch(repo).await?;
    println!("fetched");
    Ok(())
}

/// Merge a branch, or abort an in-progress merge.
///
/// A conflicted merge is not a failure here: the conflicts are listed and
/// the process exits cleanly so the user (or UI) can resolve them.
///
/// # Errors
///
/// Returns an error on hard merge failures (unknown branch, dirty tree).
pub async fn run_merge_command<R: CommandRunner>(
    client: &GitClient<R>,
    repo: &Path,
    args: &MergeArgs,
) -> Result<()> {
    if args.abort {
        // A fresh engine refuses abort in Idle; route straight to git, the
        // repository itself knows whether a merge is in progress.
        client
            .run_mutating(repo, "merge-abort", &["merge", "--abort"], None, true)
            .await?;
        println!("merge aborted");
        return Ok(());
    }

    let source = args.source.as_deref().expect("clap enforces source");
    let mut engine = MergeEngine::new(client, repo);
    match engine.merge(source).await? {
        MergeOutcome::Clean => println!("merged '{source}' cleanly"),
        MergeOutcome::Conflicted(files) => {
            println!("merge stopped on {} conflicted file(s):", files.len());
            for file in &files {
                println!("  {} ({} hunks)", file.path, file.hunks().len());
            }
            println!("resolve the files, then commit, or run `gitdeck merge --abort`");
        }
    }
    Ok(())
}

/// Stash operations.
///
/// # Errors
///
/// Returns an error if the underlying stash operation fails.
pub async fn run_stash_command<R: CommandRunner>(
    client: &GitClient<R>,
    repo: &Path,
    subcommand: &StashSubcommand,
    json: bool,
) -> Result<()> {
    match subcommand {
        StashSubcommand::Push(args) => {
            client.stash_push(repo, args.message.as_deref()).await?;
            println!("stashed");
        }
        StashSubcommand::List => {
            let stashes = client.stash_list(repo).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stashes)?);
            } else {
                for stash in &stashes {
                    println!("stash@{{{}}}: {}", stash.index, stash.message);
                }
            }
        }
        StashSubcommand::Apply(args) => {
            client.stash_apply(repo, args.index).await?;
            println!("applied stash@{{{}}}", args.index);
        }
        StashSubcommand::Pop(args) => {
            client.stash_pop(repo, args.index).await?;
            println!("popped stash@{{{}}}", args.index);
        }
        StashSubcommand::Drop(args) => {
            client.stash_drop(repo, args.index).await?;
            println!("dropped stash@{{{}}}", args.index);
        }
    }
    Ok(())
}
