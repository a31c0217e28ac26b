// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

use super::*;
use tempfile::tempdir;

fn shell_spec(cwd: &std::path::Path, script: &str) -> RunSpec {
    RunSpec::new("/bin/sh", cwd.to_path_buf()).arg("-c").arg(script)
}

#[tokio::test]
async fn successful_run_reports_exit_code_zero() {
    let dir = tempdir().unwrap();
    let runner = LocalRunner::new(2);
    let spec = shell_spec(dir.path(), "echo hello; exit 0");
    let outcome = runner.run(spec, CancellationToken::new()).await.unwrap();
    assert!(outcome.success());
    assert_eq!(outcome.exit_code, Some(0));
    assert!(outcome.killed_reason.is_none());
}

#[tokio::test]
async fn nonzero_exit_is_not_success() {
    let dir = tempdir().unwrap();
    let runner = LocalRunner::new(2);
    let spec = shell_spec(dir.path(), "exit 7");
    let outcome = runner.run(spec, CancellationToken::new()).await.unwrap();
    assert!(!outcome.success());
    assert_eq!(outcome.exit_code, Some(7));
}

#[tokio::test]
async fn stderr_first_line_is_captured() {
    let dir = tempdir().unwrap();
    let runner = LocalRunner::new(2);
    let spec = shell_spec(dir.path(), "echo boom 1>&2; echo again 1>&2; exit 1");
    let outcome = runner.run(spec, CancellationToken::new()).await.unwrap();
    assert_eq!(outcome.first_error_line.as_deref(), Some("boom"));
}

#[tokio::test]
async fn idle_timeout_kills_silent_process() {
    let dir = tempdir().unwrap();
    let runner = LocalRunner::new(2);
    let mut spec = shell_spec(dir.path(), "sleep 5");
    spec.idle_timeout = Duration::from_millis(100);
    spec.hard_timeout = Duration::from_secs(30);
    spec.grace_period = Duration::from_millis(50);

    let outcome = runner.run(spec, CancellationToken::new()).await.unwrap();
    assert_eq!(outcome.killed_reason, Some(KilledReason::IdleTimeout));
    assert!(!outcome.success());
}

#[tokio::test]
async fn cancellation_kills_the_process() {
    let dir = tempdir().unwrap();
    let runner = LocalRunner::new(2);
    let mut spec = shell_spec(dir.path(), "sleep 5");
    spec.idle_timeout = Duration::from_secs(30);
    spec.grace_period = Duration::from_millis(50);
    let cancel = CancellationToken::new();

    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel_clone.cancel();
    });

    let outcome = runner.run(spec, cancel).await.unwrap();
    assert_eq!(outcome.killed_reason, Some(KilledReason::Cancelled));
}

#[test]
fn asr_idle_timeout_scales_with_duration_and_has_bounds() {
    assert_eq!(asr_idle_timeout(Duration::from_secs(60), None), Duration::from_secs(600));
    assert_eq!(asr_idle_timeout(Duration::from_secs(3600), None), Duration::from_secs(7200));
    assert_eq!(asr_idle_timeout(Duration::from_secs(100_000), None), Duration::from_secs(4 * 3600));
    assert_eq!(asr_idle_timeout(Duration::from_secs(60), Some(120)), Duration::from_secs(120));
}
