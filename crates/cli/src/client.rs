// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! A thin HTTP client over the ControlAPI (spec.md §4.8) — `reelforge-cli`
//! never touches the Store or the WAL directly, exactly as the daemon is
//! the only process that's allowed to.

use futures_util::{Stream, StreamExt};
use reelforge_wire::{Action, ActionAccepted, ApiError, HealthResponse, JobDetail, JobSummary, JobsQuery, UploadAccepted};
use reqwest::Response;

use crate::error::CliError;

pub struct Client {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl Client {
    pub fn new(base_url: String, token: Option<String>) -> Self {
        Self { http: reqwest::Client::new(), base_url, token }
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, CliError> {
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            let body: ApiError = response.json().await.unwrap_or_else(|_| ApiError::new("request failed"));
            Err(CliError::Api(body))
        }
    }

    pub async fn list_jobs(&self, query: &JobsQuery) -> Result<Vec<JobSummary>, CliError> {
        let request = self.authorize(self.http.get(format!("{}/jobs", self.base_url))).query(query);
        Self::decode(request.send().await?).await
    }

    pub async fn show_job(&self, file_stem: &str) -> Result<JobDetail, CliError> {
        let request = self.authorize(self.http.get(format!("{}/jobs/{file_stem}", self.base_url)));
        Self::decode(request.send().await?).await
    }

    pub async fn health(&self) -> Result<HealthResponse, CliError> {
        let request = self.authorize(self.http.get(format!("{}/health", self.base_url)));
        Self::decode(request.send().await?).await
    }

    pub async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<UploadAccepted, CliError> {
        let request = self
            .authorize(self.http.post(format!("{}/upload", self.base_url)))
            .query(&[("filename", filename)])
            .body(bytes);
        Self::decode(request.send().await?).await
    }

    pub async fn action(&self, action: &Action) -> Result<ActionAccepted, CliError> {
        let request = self.authorize(self.http.post(format!("{}/action", self.base_url))).json(action);
        Self::decode(request.send().await?).await
    }

    /// A live feed of every job-state change, one `JobDetail` per NDJSON
    /// line, for as long as the connection stays open.
    pub async fn stream_jobs(&self) -> Result<impl Stream<Item = Result<JobDetail, CliError>>, CliError> {
        let request = self.authorize(self.http.get(format!("{}/jobs/stream", self.base_url)));
        let response = request.send().await?;
        let byte_stream = response.bytes_stream();

        Ok(byte_stream.flat_map(|chunk| {
            let lines: Vec<Result<JobDetail, CliError>> = match chunk {
                Ok(bytes) => String::from_utf8_lossy(&bytes)
                    .lines()
                    .filter(|line| !line.is_empty())
                    .map(|line| {
                        serde_json::from_str(line)
                            .map_err(|e| CliError::Api(ApiError::new(format!("malformed stream line: {e}"))))
                    })
                    .collect(),
                Err(e) => vec![Err(CliError::Transport(e))],
            };
            futures_util::stream::iter(lines)
        }))
    }
}
