// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! `reelforge`: a thin CLI over the daemon's ControlAPI. Never touches
//! the Store directly — every subcommand is one HTTP call.

mod client;
mod error;
mod output;

use clap::{Parser, Subcommand};
use futures_util::StreamExt;
use reelforge_core::Stage;
use reelforge_wire::{Action, JobsQuery};

use client::Client;
use error::CliError;

#[derive(Parser)]
#[command(name = "reelforge", about = "Operate a reelforge daemon over its ControlAPI")]
struct Cli {
    /// Base URL of the daemon's ControlAPI.
    #[arg(long, env = "REELFORGE_API_URL", default_value = "http://127.0.0.1:7620")]
    api_url: String,

    /// Bearer token for mutating endpoints, when the daemon requires one.
    #[arg(long, env = "REELFORGE_ADMIN_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List jobs, optionally filtered.
    List {
        /// e.g. "transcribing", "cloud_translating", "completed".
        #[arg(long, value_parser = parse_stage)]
        stage: Option<Stage>,
        #[arg(long)]
        status_contains: Option<String>,
        #[arg(long)]
        updated_after_ms: Option<u64>,
    },
    /// Show one job's full detail.
    Show { file_stem: String },
    /// Upload a local file into the daemon's inbox.
    Upload {
        path: std::path::PathBuf,
        /// Name to give the file in the inbox; defaults to its basename.
        #[arg(long)]
        filename: Option<String>,
    },
    /// Reset the current stage's retry counter and re-enter it.
    Retry { file_stem: String },
    /// Cancel in-flight work for a job without changing its stage.
    Cancel { file_stem: String },
    /// Halt a job, preserving its stage for a later resume.
    Halt { file_stem: String },
    /// Resume a halted job.
    Resume { file_stem: String },
    /// Re-invoke the burn step even though a delivery file already exists.
    ReBurn { file_stem: String },
    /// Mark a completed job as delivered without re-running anything.
    MarkDelivered { file_stem: String },
    /// Permanently remove a job record.
    Delete { file_stem: String },
    /// Force a job's stage pointer directly, bypassing the normal edges.
    ForceStage {
        file_stem: String,
        #[arg(value_parser = parse_stage)]
        stage: Stage,
    },
    /// Report daemon liveness and capacity.
    Health,
    /// Stream every job-state change as it happens.
    Watch,
}

fn parse_stage(raw: &str) -> Result<Stage, String> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| format!("unknown stage '{raw}'"))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let client = Client::new(cli.api_url, cli.token);

    if let Err(e) = run(&client, cli.command).await {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}

async fn run(client: &Client, command: Command) -> Result<(), CliError> {
    match command {
        Command::List { stage, status_contains, updated_after_ms } => {
            let query = JobsQuery { stage, status_contains, updated_after_ms };
            let jobs = client.list_jobs(&query).await?;
            output::jobs_table(&jobs);
        }
        Command::Show { file_stem } => {
            let detail = client.show_job(&file_stem).await?;
            output::job_detail(&detail);
        }
        Command::Upload { path, filename } => {
            let filename = filename.unwrap_or_else(|| {
                path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| "upload".to_string())
            });
            let bytes = tokio::fs::read(&path).await.map_err(|e| {
                CliError::Api(reelforge_wire::ApiError::new(format!("failed to read {}: {e}", path.display())))
            })?;
            let accepted = client.upload(&filename, bytes).await?;
            output::upload_accepted(&accepted);
        }
        Command::Retry { file_stem } => {
            let accepted = client.action(&Action::Retry { file_stem }).await?;
            output::action_accepted(&accepted);
        }
        Command::Cancel { file_stem } => {
            let accepted = client.action(&Action::Cancel { file_stem }).await?;
            output::action_accepted(&accepted);
        }
        Command::Halt { file_stem } => {
            let accepted = client.action(&Action::Halt { file_stem }).await?;
            output::action_accepted(&accepted);
        }
        Command::Resume { file_stem } => {
            let accepted = client.action(&Action::Resume { file_stem }).await?;
            output::action_accepted(&accepted);
        }
        Command::ReBurn { file_stem } => {
            let accepted = client.action(&Action::ReBurn { file_stem }).await?;
            output::action_accepted(&accepted);
        }
        Command::MarkDelivered { file_stem } => {
            let accepted = client.action(&Action::MarkDelivered { file_stem }).await?;
            output::action_accepted(&accepted);
        }
        Command::Delete { file_stem } => {
            let accepted = client.action(&Action::Delete { file_stem }).await?;
            output::action_accepted(&accepted);
        }
        Command::ForceStage { file_stem, stage } => {
            let accepted = client.action(&Action::ForceStage { file_stem, stage }).await?;
            output::action_accepted(&accepted);
        }
        Command::Health => {
            let health = client.health().await?;
            output::health(&health);
        }
        Command::Watch => {
            let mut stream = Box::pin(client.stream_jobs().await?);
            while let Some(detail) = stream.next().await {
                match detail {
                    Ok(detail) => println!(
                        "{}\t{}\t{}%\t{}",
                        detail.file_stem, detail.stage, detail.progress, detail.status
                    ),
                    Err(e) => eprintln!("stream error: {e}"),
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_stage_accepts_the_wire_snake_case_name() {
        assert_eq!(parse_stage("transcribing").unwrap(), Stage::Transcribing);
        assert_eq!(parse_stage("cloud_translating").unwrap(), Stage::CloudTranslating);
        assert_eq!(parse_stage("completed").unwrap(), Stage::Completed);
    }

    #[test]
    fn parse_stage_rejects_an_unknown_name() {
        assert!(parse_stage("not-a-stage").is_err());
    }
}
