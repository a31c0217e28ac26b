// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! `POST /upload?filename=...`: write a media file's bytes atomically
//! into the inbox directory. Ingestion itself — stability probing,
//! extension filtering, job creation — is left to `inbox_task`, the same
//! loop that picks up files dropped there directly by hand or by a
//! separate transfer tool.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::context::DaemonContext;
use crate::error::ApiHttpError;

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub filename: String,
}

pub async fn handle(
    State(ctx): State<DaemonContext>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<Json<reelforge_wire::UploadAccepted>, ApiHttpError> {
    if query.filename.is_empty() || query.filename.contains('/') || query.filename.contains("..") {
        return Err(ApiHttpError::bad_request("filename must be a bare name with no path separators"));
    }

    let path = ctx.config.inbox_dir.join(&query.filename);
    reelforge_adapters::write_atomic(&path, &body).await?;

    Ok(Json(reelforge_wire::UploadAccepted { filename: query.filename, bytes: body.len() as u64 }))
}

#[cfg(test)]
#[path = "upload_tests.rs"]
mod tests;
