// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! `GET /jobs/stream`: a long-lived NDJSON feed of every job change, one
//! `JobDetail` per line, backed by `Store::subscribe`'s coalescing
//! subscription so a slow client falls behind without unbounding memory.

use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use futures_util::stream;
use reelforge_wire::JobDetail;

use crate::context::DaemonContext;

const QUEUE_DEPTH: usize = 64;

pub async fn handle(State(ctx): State<DaemonContext>) -> Response {
    let subscription = ctx.store.subscribe(QUEUE_DEPTH);

    let body_stream = stream::unfold(subscription, |mut subscription| async move {
        let notification = subscription.recv().await?;
        let detail = JobDetail::from_job(&notification.job);
        let mut line = serde_json::to_string(&detail).unwrap_or_default();
        line.push('\n');
        Some((Ok::<_, std::io::Error>(axum::body::Bytes::from(line)), subscription))
    });

    match Response::builder()
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .body(Body::from_stream(body_stream))
    {
        Ok(response) => response,
        Err(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}
