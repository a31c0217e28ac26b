// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

//! Plain-text rendering for everything the CLI prints, kept separate from
//! `main.rs`'s command dispatch.

use reelforge_core::format_elapsed_ms;
use reelforge_wire::{ActionAccepted, HealthResponse, JobDetail, JobSummary, UploadAccepted};

pub fn jobs_table(jobs: &[JobSummary]) {
    println!("{:<28} {:<26} {:>3}  {:<10} {:<8} {}", "FILE_STEM", "STAGE", "PCT", "LANG", "REVIEW", "STATUS");
    for job in jobs {
        println!(
            "{:<28} {:<26} {:>3}  {:<10} {:<8} {}",
            job.file_stem,
            job.stage.to_string(),
            job.progress,
            job.target_language,
            if job.review_required { "yes" } else { "no" },
            job.status,
        );
    }
    println!("{} job(s)", jobs.len());
}

pub fn job_detail(detail: &JobDetail) {
    println!("file_stem:       {}", detail.file_stem);
    println!("stage:           {}", detail.stage);
    println!("status:          {}", detail.status);
    println!("progress:        {}%", detail.progress);
    println!("target_language: {}", detail.config.target_language);
    println!("review_required: {}", detail.review_required);
    println!("updated_at_ms:   {}", detail.updated_at_ms);
    println!();
    println!("usage:");
    let mut stages: Vec<_> = detail.usage.stage_wall_ms.iter().collect();
    stages.sort_by_key(|(stage, _)| stage.to_string());
    for (stage, wall_ms) in stages {
        let retries = detail.usage.retry_counts.get(stage).copied().unwrap_or(0);
        let stalls = detail.usage.stall_counts.get(stage).copied().unwrap_or(0);
        println!("  {stage:<26} {:>8}  retries={retries} stalls={stalls}", format_elapsed_ms(*wall_ms));
    }
}

pub fn health(health: &HealthResponse) {
    println!("storage_ready:      {}", health.storage_ready);
    println!("active_job_count:   {}", health.active_job_count);
    println!("cloud_enabled:      {}", health.cloud_enabled);
    println!(
        "orchestrator_tick:  {}",
        health.orchestrator_heartbeat_age_ms.map(format_elapsed_ms).unwrap_or_else(|| "never".to_string())
    );
    println!(
        "control_api_tick:   {}",
        health.control_api_heartbeat_age_ms.map(format_elapsed_ms).unwrap_or_else(|| "never".to_string())
    );
    println!(
        "free_disk_bytes:    {}",
        health.free_disk_bytes.map(|b| b.to_string()).unwrap_or_else(|| "unknown".to_string())
    );
}

pub fn action_accepted(accepted: &ActionAccepted) {
    println!("ok: {}", accepted.file_stem);
}

pub fn upload_accepted(accepted: &UploadAccepted) {
    println!("uploaded {} ({} bytes)", accepted.filename, accepted.bytes);
}
