// gitdeck: Desktop Git Client Engine
//
// SPDX-FileCopyrightText: 2026 gitdeck contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use super::builder::{ProcessBuilder, ProcessFlags};
use crate::error::EngineError;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_process_echo() {
    let output = ProcessBuilder::new("echo")
        .arg("hello")
        .capture_output()
        .run()
        .await
        .expect("echo should succeed");

    assert!(output.success());
    insta::assert_snapshot!(output.stdout().trim(), @"hello");
}

#[tokio::test]
async fn test_process_exit_code() {
    let output = ProcessBuilder::new("false")
        .flag(ProcessFlags::ALLOW_FAILURE)
        .capture_output()
        .run()
        .await
        .expect("process should complete");

    assert!(!output.success());
    assert_eq!(output.exit_code(), 1);
}

#[tokio::test]
async fn test_nonzero_exit_is_error_without_allow_failure() {
    let result = ProcessBuilder::new("false").capture_output().run().await;
    match result {
        Err(EngineError::Process(e)) => {
            assert!(e.to_string().contains("exited with code 1"), "got: {e}");
        }
        other => panic!("expected NonZeroExit error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_process_env() {
    let output = ProcessBuilder::new("env")
        .env("GITDECK_TEST_VAR", "test_value")
        .capture_stdout()
        .run()
        .await
        .expect("env should succeed");

    assert!(
        output
            .stdout()
            .lines()
            .any(|l| l == "GITDECK_TEST_VAR=test_value"),
        "extra env var should be visible to the child"
    );
}

#[tokio::test]
async fn test_spawn_failure_is_typed() {
    let result = ProcessBuilder::new("/nonexistent/gitdeck-test-binary")
        .capture_output()
        .run()
        .await;
    match result {
        Err(EngineError::Process(e)) => {
            assert!(e.to_string().contains("failed to spawn"), "got: {e}");
        }
        other => panic!("expected SpawnFailed error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_large_output_does_not_deadlock() {
    // Write well past the OS pipe buffer (64 KiB on Linux) to both streams.
    // If either stream were read only after wait(), this would hang forever.
    let script = "for i in $(seq 1 4000); do \
                  echo 'stdout line padding padding padding padding'; \
                  echo 'stderr line padding padding padding padding' >&2; \
                  done";
    let output = ProcessBuilder::new("sh")
        .args(["-c", script])
        .capture_output()
        .timeout(Duration::from_secs(30))
        .run()
        .await
        .expect("large-output process should complete");

    assert!(output.success());
    assert_eq!(output.stdout().lines().count(), 4000);
    assert_eq!(output.stderr().lines().count(), 4000);
}

#[tokio::test]
async fn test_timeout_kills_process() {
    let result = ProcessBuilder::new("sleep")
        .arg("30")
        .capture_output()
        .timeout(Duration::from_millis(200))
        .run()
        .await;

    match result {
        Err(EngineError::Process(e)) => {
            assert!(e.to_string().contains("timed out"), "got: {e}");
        }
        other => panic!("expected Timeout error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_cancellation_interrupts_process() {
    let token = CancellationToken::new();
    let cancel = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        cancel.cancel();
    });

    let output = ProcessBuilder::new("sleep")
        .arg("30")
        .capture_output()
        .run_with_cancellation(token)
        .await
        .expect("cancelled process is not an error");

    assert!(output.is_interrupted());
}

#[tokio::test]
async fn test_pre_cancelled_token_skips_spawn() {
    let token = CancellationToken::new();
    token.cancel();

    let output = ProcessBuilder::new("sleep")
        .arg("30")
        .run_with_cancellation(token)
        .await
        .expect("pre-cancelled run returns immediately");

    assert!(output.is_interrupted());
    assert_eq!(output.exit_code(), -1);
}

#[test]
fn test_executable_lookup_found() {
    // sh is present on any platform these tests run on
    assert!(ProcessBuilder::exists("sh"), "sh should exist in PATH");

    let path = ProcessBuilder::find("sh").expect("sh should be found");
    assert!(path.exists());

    let builder = ProcessBuilder::which("sh").expect("which: sh should resolve");
    assert!(builder.program().exists());
}

#[test]
fn test_executable_lookup_not_found() {
    let program = "nonexistent_program_12345";

    assert!(!ProcessBuilder::exists(program));
    assert!(ProcessBuilder::find(program).is_none());

    let err = ProcessBuilder::which(program).expect_err("should not resolve");
    assert!(err.to_string().contains("not found"), "got: {err}");
}
