// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Orchestrator configuration, loaded from a `toml` file.
//!
//! Replaces ad-hoc module-level config globals with an explicit struct
//! threaded through the orchestrator context.

use crate::stage::Stage;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: PathBuf, #[source] source: std::io::Error },
    #[error("failed to parse config file {path}: {source}")]
    Parse { path: PathBuf, #[source] source: toml::de::Error },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloudTrigger {
    Api,
    Command,
    Manual,
}

/// Per-stage tuning: how many jobs may occupy the stage concurrently, and
/// how many times a failed attempt is retried before the job goes DEAD
/// Retry budgets are configuration, not constants, so they can be tuned
/// per deployment without a rebuild.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StageLimits {
    pub concurrency: u32,
    pub retry_budget: u32,
    pub stall_seconds: u64,
}

impl Default for StageLimits {
    fn default() -> Self {
        Self { concurrency: 4, retry_budget: 2, stall_seconds: 30 * 60 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    pub inbox_dir: PathBuf,
    pub work_dir: PathBuf,
    pub delivery_dir: PathBuf,

    #[serde(default = "default_true")]
    pub cloud_pipeline: bool,
    #[serde(default)]
    pub cloud_trigger: CloudTrigger,
    pub jobs_bucket: Option<String>,
    pub jobs_prefix: Option<String>,
    /// Base URL `CloudBridge::submit` posts `{base_url}/jobs` against when
    /// `cloud_trigger` is `Api`. Unused for `Command`/`Manual` triggers.
    pub cloud_api_base_url: Option<String>,

    pub asr_idle_timeout_seconds: Option<u64>,

    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Per-stage overrides of [`StageLimits::default`], keyed by the
    /// stage's display name (e.g. `"transcribing"`).
    #[serde(default)]
    pub stage_limits: HashMap<String, StageLimits>,

    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    pub admin_token: Option<String>,

    #[serde(default)]
    pub review_required_default: bool,

    /// Stability-check parameters for InboxWatcher.
    #[serde(default = "default_stability_probes")]
    pub stability_probes: u32,
    #[serde(default = "default_stability_delay_ms")]
    pub stability_delay_ms: u64,
    #[serde(default = "default_min_age_seconds")]
    pub min_age_seconds: u64,

    /// Command templates for the opaque local collaborators (audio
    /// extractor, ASR, finalizer, burner). The orchestrator never
    /// interprets their internals — only their exit code and the artifact
    /// they're expected to leave behind.
    #[serde(default)]
    pub commands: CollaboratorCommands,
}

/// One invocable external command: a program plus its argument template.
/// `{input}` / `{output}` placeholders are substituted by the stage
/// handler with the job's concrete artifact paths before the command is
/// handed to `LocalRunner`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaboratorCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for CollaboratorCommand {
    fn default() -> Self {
        Self { program: "true".to_string(), args: Vec::new() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollaboratorCommands {
    #[serde(default)]
    pub audio_extract: CollaboratorCommand,
    #[serde(default)]
    pub asr: CollaboratorCommand,
    /// Local stand-in for the cloud translation pipeline, used when
    /// `cloud_pipeline` is disabled — same downstream artifact contract
    /// (an `{output}` approved-translation document), just produced
    /// on-box instead of by a remote worker.
    #[serde(default)]
    pub translator: CollaboratorCommand,
    #[serde(default)]
    pub finalizer: CollaboratorCommand,
    #[serde(default)]
    pub burner: CollaboratorCommand,
    /// External command that kicks off the remote execution when
    /// `cloud_trigger = "command"` (spec.md §4.4). Substituted with
    /// `{cloud_job_id}`/`{bucket}`/`{prefix}` rather than `{input}`/
    /// `{output}`, since there's no local artifact pair to point at — the
    /// command's job is only to tell the remote worker plane a new prefix
    /// is ready to pick up.
    #[serde(default)]
    pub cloud_trigger: CollaboratorCommand,
}

impl Default for CloudTrigger {
    fn default() -> Self {
        CloudTrigger::Api
    }
}

fn default_true() -> bool {
    true
}
fn default_tick_interval_ms() -> u64 {
    1_000
}
fn default_poll_interval_ms() -> u64 {
    5_000
}
fn default_bind_addr() -> String {
    "127.0.0.1:7620".to_string()
}
fn default_stability_probes() -> u32 {
    3
}
fn default_stability_delay_ms() -> u64 {
    1_000
}
fn default_min_age_seconds() -> u64 {
    3
}

impl OrchestratorConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let mut config: Self = toml::from_str(&text)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Overlay `REELFORGE_*` environment variables on top of the file-loaded
    /// config, so a deployment can tweak bind address, admin token, or the
    /// cloud bucket/prefix without touching the committed TOML. `lookup` is
    /// injected so tests can exercise this without mutating the real
    /// process environment.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("REELFORGE_BIND_ADDR") {
            self.bind_addr = v;
        }
        if let Some(v) = lookup("REELFORGE_ADMIN_TOKEN") {
            self.admin_token = Some(v);
        }
        if let Some(v) = lookup("REELFORGE_JOBS_BUCKET") {
            self.jobs_bucket = Some(v);
        }
        if let Some(v) = lookup("REELFORGE_JOBS_PREFIX") {
            self.jobs_prefix = Some(v);
        }
        if let Some(v) = lookup("REELFORGE_CLOUD_API_BASE_URL") {
            self.cloud_api_base_url = Some(v);
        }
        if let Some(v) = lookup("REELFORGE_CLOUD_PIPELINE") {
            if let Ok(parsed) = v.parse::<bool>() {
                self.cloud_pipeline = parsed;
            }
        }
        if let Some(v) = lookup("REELFORGE_TICK_INTERVAL_MS") {
            if let Ok(parsed) = v.parse::<u64>() {
                self.tick_interval_ms = parsed;
            }
        }
    }

    /// Resolve the config file path: `$REELFORGE_HOME/config.toml` if set,
    /// else `./reelforge.toml` in the current working directory.
    pub fn default_path() -> PathBuf {
        match std::env::var("REELFORGE_HOME") {
            Ok(home) => PathBuf::from(home).join("config.toml"),
            Err(_) => PathBuf::from("reelforge.toml"),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.cloud_pipeline && self.jobs_bucket.is_none() {
            return Err(ConfigError::Invalid(
                "cloud_pipeline is enabled but jobs_bucket is unset".to_string(),
            ));
        }
        if self.cloud_pipeline
            && self.cloud_trigger == CloudTrigger::Api
            && self.cloud_api_base_url.is_none()
        {
            return Err(ConfigError::Invalid(
                "cloud_trigger is \"api\" but cloud_api_base_url is unset".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the effective limits for `stage`, falling back to
    /// [`StageLimits::default`] when no override is configured.
    pub fn limits_for(&self, stage: Stage) -> StageLimits {
        self.stage_limits.get(stage.to_string().as_str()).copied().unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
