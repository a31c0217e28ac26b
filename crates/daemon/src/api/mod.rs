// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! The ControlAPI (spec.md §4.8/§6.3): job queries, the NDJSON change
//! feed, upload, operator actions, and health — assembled into one axum
//! `Router` `main.rs` binds and serves.

mod actions;
mod auth;
mod health;
mod jobs;
mod stream;
mod upload;

#[cfg(test)]
mod test_support;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::context::DaemonContext;

pub fn router(context: DaemonContext) -> Router {
    Router::new()
        .route("/jobs", get(jobs::list))
        .route("/jobs/:file_stem", get(jobs::show))
        .route("/jobs/stream", get(stream::handle))
        .route("/upload", post(upload::handle))
        .route("/action", post(actions::handle))
        .route("/health", get(health::handle))
        .layer(middleware::from_fn_with_state(context.clone(), auth::guard))
        .layer(TraceLayer::new_for_http())
        .with_state(context)
}
