use std::path::PathBuf;
use std::sync::Arc;

use reelforge_adapters::{CloudBridge, LocalObjectStore, LocalRunner, ObjectStore};
use reelforge_core::{FakeClock, OrchestratorConfig, CloudTrigger};

use super::HandlerCtx;

pub fn test_config(work_dir: PathBuf) -> OrchestratorConfig {
    OrchestratorConfig {
        inbox_dir: work_dir.join("inbox"),
        work_dir: work_dir.clone(),
        delivery_dir: work_dir.join("delivery"),
        cloud_pipeline: true,
        cloud_trigger: CloudTrigger::Manual,
        jobs_bucket: Some("bucket".to_string()),
        jobs_prefix: Some("jobs".to_string()),
        asr_idle_timeout_seconds: Some(600),
        tick_interval_ms: 1_000,
        poll_interval_ms: 1_000,
        stage_limits: Default::default(),
        bind_addr: "127.0.0.1:0".to_string(),
        admin_token: None,
        review_required_default: false,
        stability_probes: 1,
        stability_delay_ms: 0,
        min_age_seconds: 0,
        commands: Default::default(),
    }
}

pub fn test_ctx(work_dir: PathBuf) -> HandlerCtx<FakeClock> {
    HandlerCtx {
        config: Arc::new(test_config(work_dir.clone())),
        local_runner: Arc::new(LocalRunner::new(4)),
        cloud: Arc::new(CloudBridge::new("http://localhost:0")),
        objects: Arc::new(LocalObjectStore::new(work_dir.join("objects"))) as Arc<dyn ObjectStore>,
        clock: FakeClock::new(),
    }
}
