// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Supervises local subprocess invocations: audio extraction, ASR, the
//! finalizer, the subtitle burner.
//!
//! Every invocation gets its own process group so a kill reaches every
//! descendant, concurrent stdout/stderr draining that resets an idle
//! timer on each line, and a single global semaphore bounding how many
//! subprocesses run at once across all jobs.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

/// One local command to run to completion.
#[derive(Debug, Clone)]
pub struct RunSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub env: Vec<(String, String)>,
    /// Seconds with no new stdout/stderr line before the run is killed as
    /// stalled. Reset by every line read from either stream.
    pub idle_timeout: Duration,
    /// Absolute ceiling on the run's wall-clock duration regardless of
    /// output activity.
    pub hard_timeout: Duration,
    /// Grace period between a graceful terminate and a force-kill.
    pub grace_period: Duration,
}

impl RunSpec {
    pub fn new(program: impl Into<String>, cwd: PathBuf) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd,
            env: Vec::new(),
            idle_timeout: Duration::from_secs(600),
            hard_timeout: Duration::from_secs(4 * 3600),
            grace_period: Duration::from_secs(10),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KilledReason {
    IdleTimeout,
    HardTimeout,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub exit_code: Option<i32>,
    pub duration: Duration,
    pub first_error_line: Option<String>,
    pub killed_reason: Option<KilledReason>,
}

impl RunOutcome {
    pub fn success(&self) -> bool {
        self.killed_reason.is_none() && self.exit_code == Some(0)
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to spawn {program}: {source}")]
    Spawn { program: String, #[source] source: std::io::Error },
    #[error("io error supervising subprocess: {0}")]
    Io(#[from] std::io::Error),
    #[error("concurrency limiter is no longer accepting runs")]
    LimiterClosed,
    #[error("spawned child process exposed no pid")]
    NoPid,
    #[error("spawned child process exposed no piped {0}")]
    MissingPipe(&'static str),
}

/// Bounds total concurrent subprocesses across all jobs: a single
/// semaphore shared by every caller so the limit holds across jobs, not
/// just within one.
pub struct LocalRunner {
    semaphore: Arc<Semaphore>,
}

impl LocalRunner {
    pub fn new(max_concurrent: usize) -> Self {
        Self { semaphore: Arc::new(Semaphore::new(max_concurrent)) }
    }

    pub async fn run(
        &self,
        spec: RunSpec,
        cancel: CancellationToken,
    ) -> Result<RunOutcome, RunError> {
        let _permit = self.semaphore.acquire().await.map_err(|_| RunError::LimiterClosed)?;
        self.run_inner(spec, cancel).await
    }

    async fn run_inner(
        &self,
        spec: RunSpec,
        cancel: CancellationToken,
    ) -> Result<RunOutcome, RunError> {
        let start = Instant::now();
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .current_dir(&spec.cwd)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .process_group(0); // new process group; pgid == child's pid
        for (key, value) in &spec.env {
            cmd.env(key, value);
        }

        let mut child = cmd
            .spawn()
            .map_err(|source| RunError::Spawn { program: spec.program.clone(), source })?;
        let pid = child.id().ok_or(RunError::NoPid)? as i32;

        let last_output_ms = Arc::new(AtomicU64::new(epoch_ms()));
        let first_error_line: Arc<parking_lot::Mutex<Option<String>>> =
            Arc::new(parking_lot::Mutex::new(None));

        let stdout = child.stdout.take().ok_or(RunError::MissingPipe("stdout"))?;
        let stderr = child.stderr.take().ok_or(RunError::MissingPipe("stderr"))?;
        let out_task = tokio::spawn(drain_lines(stdout, last_output_ms.clone(), None));
        let err_task =
            tokio::spawn(drain_lines(stderr, last_output_ms.clone(), Some(first_error_line.clone())));

        let killed_reason = self.supervise(&mut child, pid, &spec, &cancel, &last_output_ms).await;

        let _ = out_task.await;
        let _ = err_task.await;

        let exit_code = match killed_reason {
            Some(_) => None,
            None => child.wait().await.ok().and_then(|status| status.code()),
        };

        Ok(RunOutcome {
            exit_code,
            duration: start.elapsed(),
            first_error_line: first_error_line.lock().clone(),
            killed_reason,
        })
    }

    /// Race the child's natural exit against the idle timer, the hard
    /// timeout, and cooperative cancellation. Returns `Some(reason)` if the
    /// child had to be killed.
    async fn supervise(
        &self,
        child: &mut tokio::process::Child,
        pid: i32,
        spec: &RunSpec,
        cancel: &CancellationToken,
        last_output_ms: &AtomicU64,
    ) -> Option<KilledReason> {
        let deadline = Instant::now() + spec.hard_timeout;
        let poll_interval = (spec.idle_timeout / 10).max(Duration::from_millis(20));

        loop {
            let sleep = tokio::time::sleep(poll_interval);
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    kill_process_group(pid, spec.grace_period).await;
                    return Some(KilledReason::Cancelled);
                }

                status = child.wait() => {
                    // Natural exit raced against a timer firing in the same
                    // tick: prefer letting it complete rather than killing
                    // an already-dead group.
                    let _ = status;
                    return None;
                }

                _ = sleep => {
                    if Instant::now() >= deadline {
                        kill_process_group(pid, spec.grace_period).await;
                        return Some(KilledReason::HardTimeout);
                    }
                    let idle_for = epoch_ms().saturating_sub(last_output_ms.load(Ordering::Acquire));
                    if idle_for >= spec.idle_timeout.as_millis() as u64 {
                        kill_process_group(pid, spec.grace_period).await;
                        return Some(KilledReason::IdleTimeout);
                    }
                }
            }
        }
    }
}

async fn drain_lines<R: tokio::io::AsyncRead + Unpin>(
    reader: R,
    last_output_ms: Arc<AtomicU64>,
    first_error_line: Option<Arc<parking_lot::Mutex<Option<String>>>>,
) {
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        last_output_ms.store(epoch_ms(), Ordering::Release);
        if let Some(sink) = &first_error_line {
            let mut guard = sink.lock();
            if guard.is_none() {
                *guard = Some(line);
            }
        }
    }
}

fn epoch_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64
}

/// Send SIGTERM to the whole process group; if it's still alive after
/// `grace_period`, escalate to SIGKILL.
async fn kill_process_group(pid: i32, grace_period: Duration) {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let group = Pid::from_raw(-pid);
    let _ = kill(group, Signal::SIGTERM);
    tokio::time::sleep(grace_period).await;
    let _ = kill(group, Signal::SIGKILL);
}

/// The default ASR idle-timeout rule: `max(10min, min(4h, 2 ×
/// audio_duration))`, used when the operator hasn't set an explicit
/// override in config.
pub fn asr_idle_timeout(audio_duration: Duration, override_seconds: Option<u64>) -> Duration {
    if let Some(secs) = override_seconds {
        return Duration::from_secs(secs);
    }
    let scaled = audio_duration * 2;
    scaled.clamp(Duration::from_secs(600), Duration::from_secs(4 * 3600))
}

#[cfg(test)]
#[path = "local_runner_tests.rs"]
mod tests;
