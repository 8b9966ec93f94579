// gitdeck: Desktop Git Client Engine
//
// SPDX-FileCopyrightText: 2026 gitdeck contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{Cli, Command, StashSubcommand};
use clap::Parser;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).expect("should parse")
}

#[test]
fn test_parse_status() {
    let cli = parse(&["gitdeck", "status"]);
    assert!(matches!(cli.command, Some(Command::Status)));
    assert_eq!(cli.global.repo, std::path::PathBuf::from("."));
}

#[test]
fn test_parse_repo_and_json_flags() {
    let cli = parse(&["gitdeck", "--repo", "/work/project", "--json", "branches"]);
    assert!(matches!(cli.command, Some(Command::Branches)));
    assert_eq!(cli.global.repo, std::path::PathBuf::from("/work/project"));
    assert!(cli.global.json);
}

#[test]
fn test_parse_log_limit() {
    let cli = parse(&["gitdeck", "log", "-n", "25"]);
    match cli.command {
        Some(Command::Log(args)) => assert_eq!(args.limit, Some(25)),
        other => panic!("expected log command, got {other:?}"),
    }
}

#[test]
fn test_parse_commit_with_paths() {
    let cli = parse(&["gitdeck", "commit", "-m", "fix parser", "src/a.rs", "src/b.rs"]);
    match cli.command {
        Some(Command::Commit(args)) => {
            assert_eq!(args.message, "fix parser");
            assert_eq!(args.paths, vec!["src/a.rs", "src/b.rs"]);
        }
        other => panic!("expected commit command, got {other:?}"),
    }
}

#[test]
fn test_parse_merge_requires_source_or_abort() {
    assert!(Cli::try_parse_from(["gitdeck", "merge"]).is_err());

    let cli = parse(&["gitdeck", "merge", "feature/x"]);
    match cli.command {
        Some(Command::Merge(args)) => {
            assert_eq!(args.source.as_deref(), Some("feature/x"));
            assert!(!args.abort);
        }
        other => panic!("expected merge command, got {other:?}"),
    }

    let cli = parse(&["gitdeck", "merge", "--abort"]);
    match cli.command {
        Some(Command::Merge(args)) => assert!(args.abort),
        other => panic!("expected merge command, got {other:?}"),
    }
}

#[test]
fn test_parse_stash_subcommands() {
    let cli = parse(&["gitdeck", "stash", "push", "-m", "wip"]);
    match cli.command {
        Some(Command::Stash(args)) => match args.subcommand {
            StashSubcommand::Push(push) => assert_eq!(push.message.as_deref(), Some("wip")),
            other => panic!("expected stash push, got {other:?}"),
        },
        other => panic!("expected stash command, got {other:?}"),
    }

    let cli = parse(&["gitdeck", "stash", "drop", "2"]);
    match cli.command {
        Some(Command::Stash(args)) => match args.subcommand {
            StashSubcommand::Drop(drop) => assert_eq!(drop.index, 2),
            other => panic!("expected stash drop, got {other:?}"),
        },
        other => panic!("expected stash command, got {other:?}"),
    }
}

#[test]
fn test_log_level_range_enforced() {
    assert!(Cli::try_parse_from(["gitdeck", "-l", "9", "status"]).is_err());
}
