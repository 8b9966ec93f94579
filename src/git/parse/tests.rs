// gitdeck: Desktop Git Client Engine
//
// SPDX-FileCopyrightText: 2026 gitdeck contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{parse_branches, parse_log, parse_remotes, parse_stashes, parse_status};
use crate::git::model::ChangeKind;

// --- status ---

#[test]
fn test_status_modified_scenario() {
    let parsed = parse_status("M  src/a.go\n");
    assert_eq!(parsed.entries.len(), 1);
    assert_eq!(parsed.entries[0].path, "src/a.go");
    assert_eq!(parsed.entries[0].status, ChangeKind::Modified);
    assert!(parsed.warnings.is_empty());
}

#[test]
fn test_status_mapping_table() {
    let input = "?? notes.txt\n\
                 A  added.rs\n\
                  A intent.rs\n\
                 M  staged.rs\n\
                  M worktree.rs\n\
                 D  gone.rs\n\
                  D missing.rs\n\
                 UU both.rs\n\
                 AA both_added.rs\n\
                 DD both_deleted.rs\n";
    let parsed = parse_status(input);
    let kinds: Vec<_> = parsed.entries.iter().map(|e| e.status).collect();
    assert_eq!(
        kinds,
        vec![
            ChangeKind::Untracked,
            ChangeKind::Added,
            ChangeKind::Added,
            ChangeKind::Modified,
            ChangeKind::Modified,
            ChangeKind::Deleted,
            ChangeKind::Deleted,
            ChangeKind::Conflicted,
            ChangeKind::Conflicted,
            ChangeKind::Conflicted,
        ]
    );
    assert!(parsed.warnings.is_empty());
}

#[test]
fn test_status_rename_captures_both_paths() {
    let parsed = parse_status("R  old/name.rs -> new/name.rs\n");
    assert_eq!(parsed.entries.len(), 1);
    let entry = &parsed.entries[0];
    assert_eq!(entry.status, ChangeKind::Renamed);
    assert_eq!(entry.path, "new/name.rs");
    assert_eq!(entry.original_path.as_deref(), Some("old/name.rs"));
}

#[test]
fn test_status_unknown_code_degrades_to_modified() {
    let parsed = parse_status("XZ odd.rs\n");
    assert_eq!(parsed.entries.len(), 1);
    assert_eq!(parsed.entries[0].status, ChangeKind::Modified);
    assert_eq!(parsed.warnings.len(), 1);
    assert_eq!(parsed.warnings[0].context, "status");
}

#[test]
fn test_status_malformed_line_skipped() {
    let parsed = parse_status("M  good.rs\nxx\nM  also_good.rs\n");
    assert_eq!(parsed.entries.len(), 2);
    assert_eq!(parsed.warnings.len(), 1);
}

#[test]
fn test_status_is_idempotent() {
    let input = "M  a.rs\n?? b.rs\nR  c.rs -> d.rs\nUU e.rs\n";
    let first = parse_status(input);
    let second = parse_status(input);
    assert_eq!(first, second);
}

#[test]
fn test_status_empty_output_is_clean_tree() {
    let parsed = parse_status("");
    assert!(parsed.entries.is_empty());
    assert!(parsed.warnings.is_empty());
}

// --- log ---

const RS: char = '\u{1e}';
const US: char = '\u{1f}';

fn record(hash_byte: char, message: &str) -> String {
    let hash: String = std::iter::repeat_n(hash_byte, 40).collect();
    format!(
        "{RS}{hash}{US}{short}{US}2026-01-05T10:30:00+01:00{US}{message}",
        short = &hash[..7],
    )
}

#[test]
fn test_log_basic_records() {
    let output = format!(
        "{}\n{}",
        record('a', "first commit\n"),
        record('b', "second commit\n")
    );
    let parsed = parse_log(&output, None);
    assert_eq!(parsed.entries.len(), 2);
    assert_eq!(parsed.entries[0].message, "first commit");
    assert_eq!(parsed.entries[0].short_hash, "aaaaaaa");
    assert_eq!(parsed.entries[1].message, "second commit");
    assert!(parsed.warnings.is_empty());
}

#[test]
fn test_log_marks_head_commit() {
    let output = format!("{}{}", record('a', "tip\n"), record('b', "older\n"));
    let head: String = std::iter::repeat_n('a', 40).collect();
    let parsed = parse_log(&output, Some(&head));
    assert!(parsed.entries[0].is_head);
    assert!(!parsed.entries[1].is_head);
    assert_eq!(parsed.entries.iter().filter(|c| c.is_head).count(), 1);
}

#[test]
fn test_log_message_embedding_field_separator_survives() {
    let message = format!("subject with {US} embedded\n\nbody\n");
    let output = record('a', &message);
    let parsed = parse_log(&output, None);
    assert_eq!(parsed.entries.len(), 1);
    assert_eq!(
        parsed.entries[0].message,
        format!("subject with {US} embedded\n\nbody")
    );
}

#[test]
fn test_log_message_embedding_record_separator_survives() {
    // The delimiter-safety property: a message body containing the record
    // byte itself is recovered exactly, not split into a bogus record.
    let message = format!("weird {RS} message\n");
    let output = format!("{}{}", record('a', &message), record('b', "clean\n"));
    let parsed = parse_log(&output, None);
    assert_eq!(parsed.entries.len(), 2);
    assert_eq!(parsed.entries[0].message, format!("weird {RS} message"));
    assert_eq!(parsed.entries[1].message, "clean");
    assert!(parsed.warnings.is_empty());
}

#[test]
fn test_log_multiline_message_preserved() {
    let message = "subject\n\nparagraph one\nparagraph two\n";
    let output = record('c', message);
    let parsed = parse_log(&output, None);
    assert_eq!(
        parsed.entries[0].message,
        "subject\n\nparagraph one\nparagraph two"
    );
}

#[test]
fn test_log_stray_fragment_glues_to_previous_message() {
    let output = format!("{}{RS}garbage-without-fields", record('a', "ok\n"));
    let parsed = parse_log(&output, None);
    // The garbage fragment glues onto the previous message rather than
    // producing a phantom commit.
    assert_eq!(parsed.entries.len(), 1);
    assert_eq!(
        parsed.entries[0].message,
        format!("ok\n{RS}garbage-without-fields")
    );
}

#[test]
fn test_log_bad_date_is_rejected_per_record() {
    let hash: String = std::iter::repeat_n('d', 40).collect();
    let bad = format!("{RS}{hash}{US}ddddddd{US}not-a-date{US}msg\n");
    let output = format!("{}{}", record('a', "good\n"), bad);
    let parsed = parse_log(&output, None);
    assert_eq!(parsed.entries.len(), 1);
    assert_eq!(parsed.warnings.len(), 1);
    assert_eq!(parsed.warnings[0].context, "log");
}

// --- branch ---

#[test]
fn test_branch_listing_scenario() {
    let parsed = parse_branches("  main\n* feature/x\n");
    assert_eq!(parsed.entries.len(), 2);
    assert_eq!(parsed.entries[0].name, "main");
    assert!(!parsed.entries[0].is_current);
    assert_eq!(parsed.entries[1].name, "feature/x");
    assert!(parsed.entries[1].is_current);
}

#[test]
fn test_branch_at_most_one_current() {
    let inputs = [
        "  main\n* feature/x\n  release\n",
        "  main\n  release\n",
        "",
    ];
    for input in inputs {
        let parsed = parse_branches(input);
        let current = parsed.entries.iter().filter(|b| b.is_current).count();
        assert!(current <= 1, "input {input:?} produced {current} current");
    }
}

#[test]
fn test_branch_detached_head_line_skipped() {
    let parsed = parse_branches("* (HEAD detached at abc1234)\n  main\n");
    assert_eq!(parsed.entries.len(), 1);
    assert_eq!(parsed.entries[0].name, "main");
    assert!(!parsed.entries[0].is_current);
    assert_eq!(parsed.warnings.len(), 1);
}

#[test]
fn test_branch_empty_lines_discarded() {
    let parsed = parse_branches("\n  main\n\n");
    assert_eq!(parsed.entries.len(), 1);
}

// --- remote ---

#[test]
fn test_remote_fetch_entry_retained() {
    let output = "origin\thttps://example.com/repo.git (fetch)\n\
                  origin\thttps://example.com/repo.git (push)\n\
                  upstream\tgit@example.com:up/repo.git (fetch)\n\
                  upstream\tgit@example.com:up/repo.git (push)\n";
    let parsed = parse_remotes(output);
    assert_eq!(parsed.entries.len(), 2);
    assert_eq!(parsed.entries[0].name, "origin");
    assert_eq!(parsed.entries[0].url, "https://example.com/repo.git");
    assert_eq!(parsed.entries[1].name, "upstream");
    assert!(parsed.warnings.is_empty());
}

#[test]
fn test_remote_malformed_line_warns() {
    let parsed = parse_remotes("no-tab-here (fetch)\n");
    assert!(parsed.entries.is_empty());
    assert_eq!(parsed.warnings.len(), 1);
}

// --- stash ---

#[test]
fn test_stash_plain_listing() {
    let output = "stash@{0}: WIP on main: abc1234 fix parser\n\
                  stash@{1}: On feature/x: checkpoint\n";
    let parsed = parse_stashes(output);
    assert_eq!(parsed.entries.len(), 2);
    assert_eq!(parsed.entries[0].index, 0);
    assert_eq!(parsed.entries[0].message, "WIP on main: abc1234 fix parser");
    assert_eq!(parsed.entries[1].index, 1);
    assert!(parsed.entries[0].date.is_none());
}

#[test]
fn test_stash_listing_with_dates() {
    let output = format!("stash@{{0}}: On main: wip{US}2026-02-01T09:00:00+00:00\n");
    let parsed = parse_stashes(&output);
    assert_eq!(parsed.entries.len(), 1);
    assert_eq!(parsed.entries[0].message, "On main: wip");
    assert!(parsed.entries[0].date.is_some());
}

#[test]
fn test_stash_malformed_line_skipped() {
    let parsed = parse_stashes("stash@{0}: ok\nnot a stash line\nstash@{1}: also ok\n");
    assert_eq!(parsed.entries.len(), 2);
    assert_eq!(parsed.warnings.len(), 1);
}
