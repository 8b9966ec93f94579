// gitdeck: Desktop Git Client Engine
//
// SPDX-FileCopyrightText: 2026 gitdeck contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the engine against real temporary repositories.
//!
//! Remote-facing operations (push/pull/ahead-behind) use local `file://`
//! clones so no test touches the network.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

use gitdeck::git::client::GitClient;
use gitdeck::git::merge::{FileResolution, HunkChoice, MergeEngine, MergeOutcome, MergeState};
use gitdeck::git::model::ChangeKind;
use gitdeck::git::runner::SystemRunner;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

/// Helper to run git commands in a directory.
fn run_git(args: &[&str], cwd: &Path) {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .env("GIT_AUTHOR_NAME", "Test")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_NAME", "Test")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Initialize a repository with an initial commit and a deterministic
/// default branch name.
fn init_repo_with_commit(path: &Path) -> String {
    run_git(&["init", "--quiet", "-b", "main"], path);
    run_git(&["config", "user.email", "test@example.com"], path);
    run_git(&["config", "user.name", "Test"], path);
    run_git(
        &["commit", "--allow-empty", "-m", "Initial commit", "--quiet"],
        path,
    );
    "main".to_string()
}

fn write_and_commit(path: &Path, file: &str, content: &str, message: &str) {
    std::fs::write(path.join(file), content).expect("write file");
    run_git(&["add", "--", file], path);
    run_git(&["commit", "-m", message, "--quiet"], path);
}

fn client() -> GitClient<SystemRunner> {
    GitClient::new(SystemRunner::from_path().expect("git on PATH"))
}

#[tokio::test]
async fn test_status_reflects_working_tree() {
    let repo = temp_dir();
    init_repo_with_commit(repo.path());

    std::fs::write(repo.path().join("tracked.txt"), "v1\n").expect("write");
    run_git(&["add", "--", "tracked.txt"], repo.path());
    run_git(&["commit", "-m", "add tracked", "--quiet"], repo.path());

    std::fs::write(repo.path().join("tracked.txt"), "v2\n").expect("modify");
    std::fs::write(repo.path().join("fresh.txt"), "new\n").expect("create");

    let client = client();
    let changes = client.status(repo.path()).await.expect("status");

    let modified = changes
        .iter()
        .find(|c| c.path == "tracked.txt")
        .expect("tracked.txt listed");
    assert_eq!(modified.status, ChangeKind::Modified);

    let untracked = changes
        .iter()
        .find(|c| c.path == "fresh.txt")
        .expect("fresh.txt listed");
    assert_eq!(untracked.status, ChangeKind::Untracked);
}

#[tokio::test]
async fn test_clean_tree_has_no_changes() {
    let repo = temp_dir();
    init_repo_with_commit(repo.path());

    let client = client();
    let changes = client.status(repo.path()).await.expect("status");
    assert!(changes.is_empty());
}

#[tokio::test]
async fn test_log_returns_commits_with_head_marked() {
    let repo = temp_dir();
    init_repo_with_commit(repo.path());
    write_and_commit(repo.path(), "a.txt", "a\n", "second commit");
    write_and_commit(repo.path(), "b.txt", "b\n", "third commit");

    let client = client();
    let commits = client.log(repo.path(), None).await.expect("log");

    assert_eq!(commits.len(), 3);
    assert_eq!(commits[0].message, "third commit");
    assert!(commits[0].is_head);
    assert!(commits.iter().skip(1).all(|c| !c.is_head));
    assert!(commits.iter().all(|c| c.hash.len() == 40));
}

#[tokio::test]
async fn test_log_message_with_control_bytes_roundtrips() {
    let repo = temp_dir();
    init_repo_with_commit(repo.path());

    // A message embedding both framing bytes must come back exactly.
    let message = "subject with \u{1e} and \u{1f} inside";
    std::fs::write(repo.path().join("f.txt"), "x\n").expect("write");
    run_git(&["add", "--", "f.txt"], repo.path());
    run_git(&["commit", "-m", message, "--quiet"], repo.path());

    let client = client();
    let commits = client.log(repo.path(), Some(1)).await.expect("log");
    assert_eq!(commits[0].message, message);
}

#[tokio::test]
async fn test_branches_and_checkout() {
    let repo = temp_dir();
    let default = init_repo_with_commit(repo.path());
    run_git(&["branch", "feature/x"], repo.path());

    let client = client();
    let branches = client.branches(repo.path()).await.expect("branches");
    assert_eq!(branches.len(), 2);
    assert_eq!(branches.iter().filter(|b| b.is_current).count(), 1);
    assert!(branches.iter().any(|b| b.name == "feature/x"));

    client
        .checkout(repo.path(), "feature/x")
        .await
        .expect("checkout");
    let current = client
        .current_branch(repo.path())
        .await
        .expect("current branch");
    assert_eq!(current.as_deref(), Some("feature/x"));

    client
        .checkout(repo.path(), &default)
        .await
        .expect("checkout back");
}

#[tokio::test]
async fn test_commit_through_engine() {
    let repo = temp_dir();
    init_repo_with_commit(repo.path());

    std::fs::write(repo.path().join("new.txt"), "content\n").expect("write");
    let client = client();
    client.stage(repo.path(), &["new.txt"]).await.expect("stage");
    client
        .commit(repo.path(), "engine commit")
        .await
        .expect("commit");

    let commits = client.log(repo.path(), Some(1)).await.expect("log");
    assert_eq!(commits[0].message, "engine commit");

    let changes = client.status(repo.path()).await.expect("status");
    assert!(changes.is_empty(), "tree clean after commit");
}

#[tokio::test]
async fn test_remotes_listing_keeps_fetch_entry() {
    let repo = temp_dir();
    init_repo_with_commit(repo.path());
    run_git(
        &["remote", "add", "origin", "https://example.com/repo.git"],
        repo.path(),
    );

    let client = client();
    let remotes = client.remotes(repo.path()).await.expect("remotes");
    assert_eq!(remotes.len(), 1);
    assert_eq!(remotes[0].name, "origin");
    assert_eq!(remotes[0].url, "https://example.com/repo.git");
}

#[tokio::test]
async fn test_stash_lifecycle() {
    let repo = temp_dir();
    init_repo_with_commit(repo.path());
    write_and_commit(repo.path(), "f.txt", "base\n", "base");

    let client = client();

    std::fs::write(repo.path().join("f.txt"), "dirty\n").expect("modify");
    client
        .stash_push(repo.path(), Some("first checkpoint"))
        .await
        .expect("stash push");

    std::fs::write(repo.path().join("f.txt"), "dirtier\n").expect("modify again");
    client
        .stash_push(repo.path(), Some("second checkpoint"))
        .await
        .expect("stash push 2");

    let stashes = client.stash_list(repo.path()).await.expect("stash list");
    assert_eq!(stashes.len(), 2);
    // LIFO: the most recent save is index 0.
    assert_eq!(stashes[0].index, 0);
    assert!(stashes[0].message.contains("second checkpoint"));
    assert!(stashes[1].message.contains("first checkpoint"));
    assert!(stashes[0].date.is_some());

    client.stash_apply(repo.path(), 1).await.expect("apply");
    let content = std::fs::read_to_string(repo.path().join("f.txt")).expect("read");
    assert_eq!(content, "dirty\n");

    // Reset the tree, then drop both entries; indices shift after each drop.
    run_git(&["checkout", "--", "f.txt"], repo.path());
    client.stash_drop(repo.path(), 0).await.expect("drop");
    client.stash_drop(repo.path(), 0).await.expect("drop again");
    let stashes = client.stash_list(repo.path()).await.expect("stash list");
    assert!(stashes.is_empty());
}

/// Seed a bare `file://` remote plus a working clone of it.
///
/// Pushes must target a bare repository (git refuses updates to a checked-out
/// branch), so the layout is seed -> bare -> clone.
fn setup_remote_pair(workdir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let seed = workdir.join("seed");
    std::fs::create_dir_all(&seed).expect("create seed dir");
    init_repo_with_commit(&seed);

    let bare = workdir.join("remote.git");
    let seed_url = format!("file://{}", seed.display());
    run_git(
        &["clone", "--bare", "--quiet", &seed_url, bare.to_str().expect("utf-8 path")],
        workdir,
    );

    let clone = workdir.join("clone");
    let bare_url = format!("file://{}", bare.display());
    run_git(
        &["clone", "--quiet", &bare_url, clone.to_str().expect("utf-8 path")],
        workdir,
    );
    run_git(&["config", "user.email", "test@example.com"], &clone);
    run_git(&["config", "user.name", "Test"], &clone);

    (bare, clone)
}

#[tokio::test]
async fn test_sync_status_against_file_remote() {
    let workdir = temp_dir();
    let (_bare, clone_path) = setup_remote_pair(workdir.path());

    let client = client();

    // in sync right after clone
    let status = client.sync_status(&clone_path).await.expect("sync");
    assert_eq!((status.ahead, status.behind), (0, 0));

    // three local commits through the engine -> ahead 3, behind 0
    for i in 0..3 {
        std::fs::write(clone_path.join("l.txt"), format!("v{i}\n")).expect("write");
        client.stage(&clone_path, &["l.txt"]).await.expect("stage");
        client
            .commit(&clone_path, &format!("local {i}"))
            .await
            .expect("commit");
    }
    let status = client.sync_status(&clone_path).await.expect("sync");
    assert_eq!((status.ahead, status.behind), (3, 0));

    // push brings it back in sync
    client.push(&clone_path).await.expect("push");
    let status = client.sync_status(&clone_path).await.expect("sync");
    assert_eq!((status.ahead, status.behind), (0, 0));
}

#[tokio::test]
async fn test_pull_from_file_remote() {
    let workdir = temp_dir();
    let (bare, clone_path) = setup_remote_pair(workdir.path());

    // a second author advances the remote after our clone
    let author = workdir.path().join("author");
    let bare_url = format!("file://{}", bare.display());
    run_git(
        &["clone", "--quiet", &bare_url, author.to_str().expect("utf-8 path")],
        workdir.path(),
    );
    run_git(&["config", "user.email", "other@example.com"], &author);
    run_git(&["config", "user.name", "Other"], &author);
    write_and_commit(&author, "u.txt", "u\n", "upstream advance");
    run_git(&["push", "--quiet"], &author);

    let client = client();
    client.fetch(&clone_path).await.expect("fetch");
    let status = client.sync_status(&clone_path).await.expect("sync");
    assert_eq!((status.ahead, status.behind), (0, 1));

    client.pull(&clone_path).await.expect("pull");
    let status = client.sync_status(&clone_path).await.expect("sync");
    assert_eq!((status.ahead, status.behind), (0, 0));
}

#[tokio::test]
async fn test_merge_conflict_resolution_end_to_end() {
    let repo = temp_dir();
    let default = init_repo_with_commit(repo.path());
    write_and_commit(repo.path(), "file.txt", "base\n", "base");

    // diverge: ours on main, theirs on feature
    run_git(&["checkout", "-b", "feature", "--quiet"], repo.path());
    write_and_commit(repo.path(), "file.txt", "theirs\n", "their change");
    run_git(&["checkout", &default, "--quiet"], repo.path());
    write_and_commit(repo.path(), "file.txt", "ours\n", "our change");

    let client = client();
    let mut engine = MergeEngine::new(&client, repo.path());

    let outcome = engine.merge("feature").await.expect("merge runs");
    let files = match outcome {
        MergeOutcome::Conflicted(files) => files,
        MergeOutcome::Clean => panic!("expected a conflict"),
    };
    assert_eq!(engine.state(), MergeState::Conflicted);
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "file.txt");
    assert_eq!(files[0].hunks(), vec![("ours\n", "theirs\n")]);

    engine
        .resolve(&files[0], &FileResolution::Hunks(vec![HunkChoice::Theirs]))
        .await
        .expect("resolve");
    assert_eq!(engine.state(), MergeState::Resolved);

    engine.finalize(None).await.expect("finalize");
    assert_eq!(engine.state(), MergeState::Committed);

    let content = std::fs::read_to_string(repo.path().join("file.txt")).expect("read");
    assert_eq!(content, "theirs\n");

    let changes = client.status(repo.path()).await.expect("status");
    assert!(changes.is_empty(), "tree clean after merge commit");

    // the merge commit has the divergent tips as parents
    let commits = client.log(repo.path(), Some(1)).await.expect("log");
    assert!(commits[0].is_head);
}

#[tokio::test]
async fn test_merge_abort_restores_premerge_head() {
    let repo = temp_dir();
    let default = init_repo_with_commit(repo.path());
    write_and_commit(repo.path(), "file.txt", "base\n", "base");

    run_git(&["checkout", "-b", "feature", "--quiet"], repo.path());
    write_and_commit(repo.path(), "file.txt", "theirs\n", "their change");
    run_git(&["checkout", &default, "--quiet"], repo.path());
    write_and_commit(repo.path(), "file.txt", "ours\n", "our change");

    let client = client();
    let head_before = client.head_hash(repo.path()).await.expect("head");

    let mut engine = MergeEngine::new(&client, repo.path());
    engine.merge("feature").await.expect("conflicted merge");
    assert_eq!(engine.state(), MergeState::Conflicted);

    engine.abort().await.expect("abort");
    assert_eq!(engine.state(), MergeState::Idle);

    let head_after = client.head_hash(repo.path()).await.expect("head");
    assert_eq!(head_before, head_after);
    let content = std::fs::read_to_string(repo.path().join("file.txt")).expect("read");
    assert_eq!(content, "ours\n");
}

#[tokio::test]
async fn test_merge_clean_when_no_divergence() {
    let repo = temp_dir();
    let default = init_repo_with_commit(repo.path());
    write_and_commit(repo.path(), "a.txt", "a\n", "on main");

    run_git(&["checkout", "-b", "feature", "--quiet"], repo.path());
    write_and_commit(repo.path(), "b.txt", "b\n", "on feature");
    run_git(&["checkout", &default, "--quiet"], repo.path());

    let client = client();
    let mut engine = MergeEngine::new(&client, repo.path());
    let outcome = engine.merge("feature").await.expect("merge");
    assert!(matches!(outcome, MergeOutcome::Clean));
    assert!(repo.path().join("b.txt").exists());
}

#[tokio::test]
async fn test_not_a_repository_error() {
    let not_repo = temp_dir();
    let client = client();

    let err = client
        .status(not_repo.path())
        .await
        .expect_err("bare temp dir is not a repository");
    assert!(
        err.to_string().contains("not a git repository"),
        "got: {err}"
    );
}
