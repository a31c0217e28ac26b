// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Shared scaffolding for ControlAPI integration tests: a minimal valid
//! config rooted in a tempdir, and a real server bound to an ephemeral
//! loopback port so tests exercise the actual HTTP stack (routing,
//! extraction, the auth middleware) rather than calling handlers directly.

use std::collections::HashMap;
use std::net::SocketAddr;

use reelforge_core::{CloudTrigger, OrchestratorConfig};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::context::DaemonContext;

pub fn test_config(dir: &TempDir) -> OrchestratorConfig {
    let root = dir.path();
    OrchestratorConfig {
        inbox_dir: root.join("inbox"),
        work_dir: root.join("work"),
        delivery_dir: root.join("delivery"),
        cloud_pipeline: false,
        cloud_trigger: CloudTrigger::Manual,
        jobs_bucket: None,
        jobs_prefix: None,
        cloud_api_base_url: None,
        asr_idle_timeout_seconds: None,
        tick_interval_ms: 1000,
        poll_interval_ms: 1000,
        stage_limits: HashMap::new(),
        bind_addr: "127.0.0.1:0".to_string(),
        admin_token: None,
        review_required_default: false,
        stability_probes: 1,
        stability_delay_ms: 1,
        min_age_seconds: 0,
        commands: Default::default(),
    }
}

pub struct TestServer {
    pub base_url: String,
    pub context: DaemonContext,
    shutdown: CancellationToken,
    _dir: TempDir,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

pub async fn spawn(admin_token: Option<String>) -> TestServer {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = test_config(&dir);
    config.admin_token = admin_token;
    tokio::fs::create_dir_all(&config.work_dir).await.expect("work dir");
    tokio::fs::create_dir_all(&config.inbox_dir).await.expect("inbox dir");
    tokio::fs::create_dir_all(&config.delivery_dir).await.expect("delivery dir");

    let context = DaemonContext::build(config).await.expect("build context");
    let app = super::router(context.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr: SocketAddr = listener.local_addr().expect("local addr");
    let shutdown = CancellationToken::new();
    let serve_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                serve_shutdown.cancelled().await;
            })
            .await;
    });

    TestServer { base_url: format!("http://{addr}"), context, shutdown, _dir: dir }
}
