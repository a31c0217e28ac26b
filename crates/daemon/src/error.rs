// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Maps domain errors onto HTTP status codes for the ControlAPI. Kept
//! separate from `reelforge_wire::ApiError` (the wire body) so the wire
//! crate itself never depends on axum.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use reelforge_core::JobError;
use reelforge_store::StoreError;
use reelforge_wire::ApiError;

/// An error that has already been assigned the HTTP status it should be
/// returned with.
#[derive(Debug)]
pub struct ApiHttpError {
    status: StatusCode,
    message: String,
}

impl ApiHttpError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }
}

impl IntoResponse for ApiHttpError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiError::new(self.message))).into_response()
    }
}

impl From<StoreError> for ApiHttpError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Job(job_err) => job_err.into(),
            other => ApiHttpError::new(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        }
    }
}

impl From<JobError> for ApiHttpError {
    fn from(err: JobError) -> Self {
        match &err {
            JobError::NotFound(_) => ApiHttpError::new(StatusCode::NOT_FOUND, err.to_string()),
            JobError::AlreadyExists(_) => ApiHttpError::new(StatusCode::CONFLICT, err.to_string()),
            JobError::InvalidForStage { .. } => ApiHttpError::new(StatusCode::CONFLICT, err.to_string()),
            JobError::Corrupt { .. } => ApiHttpError::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        }
    }
}

impl From<std::io::Error> for ApiHttpError {
    fn from(err: std::io::Error) -> Self {
        ApiHttpError::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}
