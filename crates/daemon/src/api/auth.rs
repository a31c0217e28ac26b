// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Optional bearer-token gate for the ControlAPI's mutating endpoints
//! (`POST /upload`, `POST /action`), per spec.md §4.8: "a single optional
//! bearer token gates mutating endpoints when bound to non-loopback."

use axum::extract::{Request, State};
use axum::http::{header, Method};
use axum::middleware::Next;
use axum::response::Response;
use reelforge_core::OrchestratorConfig;

use crate::context::DaemonContext;
use crate::error::ApiHttpError;

/// Whether `config` needs the admin token checked: an `admin_token` is
/// configured *and* `bind_addr` doesn't parse to a loopback address. A
/// bind that fails to parse is treated as non-loopback — fail closed
/// rather than silently skip the gate.
pub fn requires_auth(config: &OrchestratorConfig) -> bool {
    if config.admin_token.is_none() {
        return false;
    }
    match config.bind_addr.parse::<std::net::SocketAddr>() {
        Ok(addr) => !addr.ip().is_loopback(),
        Err(_) => true,
    }
}

pub async fn guard(
    State(ctx): State<DaemonContext>,
    req: Request,
    next: Next,
) -> Result<Response, ApiHttpError> {
    if req.method() != Method::POST || !requires_auth(&ctx.config) {
        return Ok(next.run(req).await);
    }

    let Some(token) = &ctx.config.admin_token else {
        return Ok(next.run(req).await);
    };

    let provided = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if provided != Some(token.as_str()) {
        return Err(ApiHttpError::unauthorized("missing or invalid bearer token"));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
