use reelforge_core::{FileStem, Job, JobConfig, Stage};
use reelforge_wire::Action;

use super::test_support::spawn;

fn job_config() -> JobConfig {
    JobConfig {
        target_language: "en".to_string(),
        program_profile: "default".to_string(),
        subtitle_style: "default".to_string(),
    }
}

#[tokio::test]
async fn halt_then_resume_round_trips_through_the_preserved_stage() {
    let server = spawn(None).await;
    let stem = FileStem::from("halt-me");
    let mut job = Job::new(stem.clone(), "inbox/halt-me.mp4".into(), job_config(), 1_000);
    job.transition(Stage::Transcribing, "started".to_string(), 1_100);
    server.context.store.create(job).await.expect("create job");

    let client = reqwest::Client::new();
    let halt = client
        .post(format!("{}/action", server.base_url))
        .json(&Action::Halt { file_stem: "halt-me".to_string() })
        .send()
        .await
        .expect("halt request");
    assert_eq!(halt.status(), reqwest::StatusCode::OK);

    let halted = server.context.store.get(&stem).expect("job still exists");
    assert_eq!(halted.stage, Stage::Halted);

    let resume = client
        .post(format!("{}/action", server.base_url))
        .json(&Action::Resume { file_stem: "halt-me".to_string() })
        .send()
        .await
        .expect("resume request");
    assert_eq!(resume.status(), reqwest::StatusCode::OK);

    let resumed = server.context.store.get(&stem).expect("job still exists");
    assert_eq!(resumed.stage, Stage::Transcribing);
}

#[tokio::test]
async fn retry_on_a_dead_job_re_enters_the_stage_it_died_in() {
    let server = spawn(None).await;
    let stem = FileStem::from("dead-job");
    let mut job = Job::new(stem.clone(), "inbox/dead-job.mp4".into(), job_config(), 1_000);
    job.transition(Stage::Transcribing, "started".to_string(), 1_100);
    job.to_dead("asr crashed repeatedly".to_string(), 1_200);
    server.context.store.create(job).await.expect("create job");

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/action", server.base_url))
        .json(&Action::Retry { file_stem: "dead-job".to_string() })
        .send()
        .await
        .expect("retry request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let retried = server.context.store.get(&stem).expect("job still exists");
    assert_eq!(retried.stage, Stage::Transcribing);
}

#[tokio::test]
async fn delete_removes_the_job_record() {
    let server = spawn(None).await;
    let stem = FileStem::from("to-delete");
    let job = Job::new(stem.clone(), "inbox/to-delete.mp4".into(), job_config(), 1_000);
    server.context.store.create(job).await.expect("create job");

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/action", server.base_url))
        .json(&Action::Delete { file_stem: "to-delete".to_string() })
        .send()
        .await
        .expect("delete request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert!(server.context.store.get(&stem).is_none());
}

#[tokio::test]
async fn force_stage_out_of_reviewing_clears_review_required() {
    let server = spawn(None).await;
    let stem = FileStem::from("under-review");
    let mut job = Job::new(stem.clone(), "inbox/under-review.mp4".into(), job_config(), 1_000);
    job.meta.review_required = true;
    job.transition(Stage::Reviewing, "awaiting human review".to_string(), 1_100);
    server.context.store.create(job).await.expect("create job");

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/action", server.base_url))
        .json(&Action::ForceStage { file_stem: "under-review".to_string(), stage: Stage::Reviewed })
        .send()
        .await
        .expect("force-stage request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let forced = server.context.store.get(&stem).expect("job still exists");
    assert_eq!(forced.stage, Stage::Reviewed);
    assert!(!forced.meta.review_required);
    assert!(forced.meta.review_locked_by_operator);
}

#[tokio::test]
async fn action_against_an_unknown_job_is_404() {
    let server = spawn(None).await;
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/action", server.base_url))
        .json(&Action::Cancel { file_stem: "never-existed".to_string() })
        .send()
        .await
        .expect("cancel request");
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}
