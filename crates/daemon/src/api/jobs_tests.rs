use reelforge_core::{FileStem, Job, JobConfig};
use reelforge_wire::{JobDetail, JobSummary};

use super::test_support::spawn;

fn job_config() -> JobConfig {
    JobConfig {
        target_language: "en".to_string(),
        program_profile: "default".to_string(),
        subtitle_style: "default".to_string(),
    }
}

#[tokio::test]
async fn list_returns_every_job_as_a_summary() {
    let server = spawn(None).await;
    let stem = FileStem::from("episode-001");
    let job = Job::new(stem, "inbox/episode-001.mp4".into(), job_config(), 1_000);
    server.context.store.create(job).await.expect("create job");

    let client = reqwest::Client::new();
    let body: Vec<JobSummary> =
        client.get(format!("{}/jobs", server.base_url)).send().await.expect("request").json().await.expect("json");

    assert_eq!(body.len(), 1);
    assert_eq!(body[0].file_stem, "episode-001");
}

#[tokio::test]
async fn show_returns_the_job_detail_by_file_stem() {
    let server = spawn(None).await;
    let stem = FileStem::from("episode-002");
    let job = Job::new(stem, "inbox/episode-002.mp4".into(), job_config(), 1_000);
    server.context.store.create(job).await.expect("create job");

    let client = reqwest::Client::new();
    let response =
        client.get(format!("{}/jobs/episode-002", server.base_url)).send().await.expect("request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let detail: JobDetail = response.json().await.expect("json");
    assert_eq!(detail.file_stem, "episode-002");
}

#[tokio::test]
async fn show_returns_404_for_an_unknown_file_stem() {
    let server = spawn(None).await;
    let client = reqwest::Client::new();
    let response =
        client.get(format!("{}/jobs/does-not-exist", server.base_url)).send().await.expect("request");
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}
