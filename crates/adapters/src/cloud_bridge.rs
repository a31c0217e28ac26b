// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Talks to the remote worker plane: submits a cloud-translation job,
//! polls for completion, and fetches the approved artifacts once the
//! human review step has signed off.
//!
//! `cloud_trigger` picks how a job is handed to the remote side: an HTTP
//! API call, a local command that kicks one off, or a purely manual drop
//! where an operator is expected to push the artifact into place
//! themselves. `Api` makes the network call itself; `Command` runs the
//! configured trigger command with `{cloud_job_id}`/`{bucket}`/`{prefix}`
//! substituted in; `Manual` does nothing here and the caller is expected
//! to poll `ObjectStore` directly.

use rand::Rng;
use reelforge_core::{CloudTrigger, CollaboratorCommand};
use std::time::Duration;
use thiserror::Error;

use crate::object_store::{ObjectKey, ObjectStore, ObjectStoreError};

#[derive(Debug, Error)]
pub enum CloudBridgeError {
    #[error("cloud submission failed after {attempts} attempts: {source}")]
    SubmitFailed { attempts: u32, #[source] source: reqwest::Error },
    #[error("cloud returned an error response: {0}")]
    RemoteError(String),
    #[error("artifact not ready yet")]
    NotReady,
    #[error("cloud trigger command {program} failed to spawn: {source}")]
    TriggerSpawn { program: String, #[source] source: std::io::Error },
    #[error("cloud trigger command {program} exited non-zero (code {code:?})")]
    TriggerNonZero { program: String, code: Option<i32> },
    #[error(transparent)]
    Object(#[from] ObjectStoreError),
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct SubmitRequest<'a> {
    pub file_stem: &'a str,
    pub source_uri: &'a str,
    pub target_languages: &'a [String],
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct SubmitResponse {
    pub cloud_job_id: String,
}

/// Mirrors `progress.json`'s schema, written by the remote worker under
/// `<bucket>/<prefix>/<cloud_job_id>/progress.json`.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ProgressDocument {
    pub stage: String,
    pub progress: u8,
    #[serde(default)]
    pub segments_done: Option<u32>,
    #[serde(default)]
    pub segments_total: Option<u32>,
}

/// Mirrors `review.json`'s schema, written under the same artifact prefix
/// once a human reviewer (operator or remote) has acted on a `Reviewing`
/// job (spec.md §6.4).
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ReviewDocument {
    pub approved: bool,
}

#[derive(Debug, Clone)]
pub enum PollOutcome {
    /// `progress.json` is not there yet — the remote worker hasn't started
    /// writing, or it was briefly unavailable. Not an error.
    NotReady,
    Progress(ProgressDocument),
    /// `approved.json` exists: the remote pipeline is done.
    Approved,
}

/// Retry policy for transient submit/poll failures: exponential backoff
/// with full jitter, capped, so a flapping endpoint doesn't turn into a
/// thundering herd across every job retrying at once.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base: Duration,
    pub cap: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 5, base: Duration::from_millis(250), cap: Duration::from_secs(30) }
    }
}

impl RetryPolicy {
    fn backoff_for(&self, attempt: u32) -> Duration {
        let exp = self.base.saturating_mul(1u32 << attempt.min(16));
        let capped = exp.min(self.cap);
        let jittered_ms = rand::thread_rng().gen_range(0..=capped.as_millis().max(1) as u64);
        Duration::from_millis(jittered_ms)
    }
}

pub struct CloudBridge {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl CloudBridge {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), base_url: base_url.into(), retry: RetryPolicy::default() }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// `trigger_command`/`bucket`/`prefix` are only consulted for
    /// `CloudTrigger::Command`; every other trigger ignores them.
    pub async fn submit(
        &self,
        trigger: CloudTrigger,
        request: &SubmitRequest<'_>,
        trigger_command: &CollaboratorCommand,
        bucket: &str,
        prefix: &str,
    ) -> Result<SubmitResponse, CloudBridgeError> {
        match trigger {
            CloudTrigger::Manual => Ok(SubmitResponse { cloud_job_id: request.file_stem.to_string() }),
            CloudTrigger::Command => {
                let cloud_job_id = request.file_stem.to_string();
                self.run_trigger_command(trigger_command, &cloud_job_id, bucket, prefix).await?;
                Ok(SubmitResponse { cloud_job_id })
            }
            CloudTrigger::Api => {
                let mut last_err = None;
                for attempt in 0..self.retry.max_attempts {
                    match self.try_submit(request).await {
                        Ok(resp) => return Ok(resp),
                        Err(e) if attempt + 1 < self.retry.max_attempts => {
                            last_err = Some(e);
                            tokio::time::sleep(self.retry.backoff_for(attempt)).await;
                        }
                        Err(e) => last_err = Some(e),
                    }
                }
                match last_err {
                    Some(source) => Err(CloudBridgeError::SubmitFailed { attempts: self.retry.max_attempts, source }),
                    None => Err(CloudBridgeError::RemoteError("retry policy allows zero attempts".into())),
                }
            }
        }
    }

    async fn try_submit(&self, request: &SubmitRequest<'_>) -> Result<SubmitResponse, reqwest::Error> {
        self.client
            .post(format!("{}/jobs", self.base_url))
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json::<SubmitResponse>()
            .await
    }

    /// Run the `cloud_trigger = "command"` external command, substituting
    /// `{cloud_job_id}`/`{bucket}`/`{prefix}` into its argument template
    /// (spec.md §4.4). Fire-and-forget in the sense that a non-zero exit
    /// surfaces as a retryable submit failure but does not itself reach
    /// into the remote worker plane — the caller's own retry budget
    /// governs whether `submit` is attempted again.
    async fn run_trigger_command(
        &self,
        command: &CollaboratorCommand,
        cloud_job_id: &str,
        bucket: &str,
        prefix: &str,
    ) -> Result<(), CloudBridgeError> {
        let substitutions = [("{cloud_job_id}", cloud_job_id), ("{bucket}", bucket), ("{prefix}", prefix)];
        let args: Vec<String> = command
            .args
            .iter()
            .map(|arg| {
                substitutions
                    .iter()
                    .fold(arg.clone(), |acc, (placeholder, value)| acc.replace(placeholder, value))
            })
            .collect();

        let status = tokio::process::Command::new(&command.program)
            .args(&args)
            .status()
            .await
            .map_err(|source| CloudBridgeError::TriggerSpawn { program: command.program.clone(), source })?;

        if status.success() {
            Ok(())
        } else {
            Err(CloudBridgeError::TriggerNonZero { program: command.program.clone(), code: status.code() })
        }
    }

    /// Read `progress.json` from the artifact prefix and report the
    /// remote worker's last known position. Never mutates remote state.
    /// A missing `progress.json` is reported as `NotReady`, not an error:
    /// the remote worker's own lifecycle is independent and its progress
    /// file may be briefly absent across a silent restart.
    pub async fn poll(&self, objects: &dyn ObjectStore, base: &ObjectKey) -> Result<PollOutcome, CloudBridgeError> {
        let approved_key = ObjectKey { key: "approved.json".to_string(), ..base.clone() };
        if objects.exists(&approved_key).await {
            return Ok(PollOutcome::Approved);
        }

        let progress_key = ObjectKey { key: "progress.json".to_string(), ..base.clone() };
        match objects.get(&progress_key).await {
            Ok(bytes) => {
                let doc: ProgressDocument = serde_json::from_slice(&bytes)
                    .map_err(|e| CloudBridgeError::RemoteError(format!("malformed progress.json: {e}")))?;
                Ok(PollOutcome::Progress(doc))
            }
            Err(ObjectStoreError::NotFound(_)) => Ok(PollOutcome::NotReady),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch the editor-approved artifact from the bucket once review has
    /// signed off. Returns `NotReady` rather than a hard error when the
    /// key simply doesn't exist yet, so callers can keep polling.
    pub async fn fetch_approved(
        &self,
        objects: &dyn ObjectStore,
        key: &ObjectKey,
    ) -> Result<Vec<u8>, CloudBridgeError> {
        match objects.get(key).await {
            Ok(bytes) => Ok(bytes),
            Err(ObjectStoreError::NotFound(_)) => Err(CloudBridgeError::NotReady),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch the cloud editor's quality report (`editor_report.json`,
    /// spec.md §3/§6.4) if the remote worker wrote one. Unlike
    /// `fetch_approved`, this artifact is genuinely optional — a remote
    /// pipeline that skips the editor pass never produces it — so a
    /// missing key is `Ok(None)`, not `NotReady`.
    pub async fn fetch_editor_report(
        &self,
        objects: &dyn ObjectStore,
        key: &ObjectKey,
    ) -> Result<Option<serde_json::Value>, CloudBridgeError> {
        match objects.get(key).await {
            Ok(bytes) => {
                let value = serde_json::from_slice(&bytes)
                    .map_err(|e| CloudBridgeError::RemoteError(format!("malformed editor_report.json: {e}")))?;
                Ok(Some(value))
            }
            Err(ObjectStoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch the human reviewer's verdict (`review.json`, spec.md §6.4)
    /// once a `Reviewing` job has been acted on. `Ok(None)` before the
    /// reviewer has decided — reviews run on human wall-clock time, so
    /// absence isn't a failure.
    pub async fn fetch_review(
        &self,
        objects: &dyn ObjectStore,
        key: &ObjectKey,
    ) -> Result<Option<ReviewDocument>, CloudBridgeError> {
        match objects.get(key).await {
            Ok(bytes) => {
                let doc = serde_json::from_slice(&bytes)
                    .map_err(|e| CloudBridgeError::RemoteError(format!("malformed review.json: {e}")))?;
                Ok(Some(doc))
            }
            Err(ObjectStoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "cloud_bridge_tests.rs"]
mod tests;
