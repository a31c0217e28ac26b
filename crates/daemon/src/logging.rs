// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! `tracing` initialization: `EnvFilter` on stderr plus a daily-rolling
//! file appender under `<work_dir>/logs/`, mirroring the teacher's
//! `oj-daemon` logging setup.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Install the global `tracing` subscriber. The returned guard must be
/// held for the lifetime of the process — dropping it stops the
/// non-blocking file writer from flushing.
pub fn init(work_dir: &Path) -> WorkerGuard {
    let logs_dir = work_dir.join("logs");
    let _ = std::fs::create_dir_all(&logs_dir);
    let file_appender = tracing_appender::rolling::daily(&logs_dir, "reelforged.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let file_layer = tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false);

    tracing_subscriber::registry().with(filter).with(stderr_layer).with(file_layer).init();

    guard
}
