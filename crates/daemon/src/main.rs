// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! `reelforged`: load configuration, bootstrap the orchestrator, and
//! serve the ControlAPI until asked to stop.

use reelforge_core::OrchestratorConfig;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::var("REELFORGE_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| OrchestratorConfig::default_path());
    let config = OrchestratorConfig::load(&config_path)?;

    let _log_guard = reelforge_daemon::logging::init(&config.work_dir);
    info!(config_path = %config_path.display(), "loaded configuration");

    let bootstrapped = reelforge_daemon::bootstrap(config).await?;
    let bind_addr = bootstrapped.context.config.bind_addr.clone();
    let app = reelforge_daemon::api::router(bootstrapped.context.clone());

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(%bind_addr, "control API listening");

    let shutdown = bootstrapped.shutdown.clone();
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            shutdown.cancel();
        })
        .await;

    if let Err(e) = &result {
        error!(error = %e, "control API server exited with error");
    }
    result.map_err(Into::into)
}

/// Waits for either Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
