// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

use super::*;
use reelforge_core::{FakeClock, Job, JobConfig, Stage};
use std::path::PathBuf;
use tempfile::tempdir;

async fn open_store(dir: &std::path::Path) -> Store<FakeClock> {
    Store::open(dir.join("snap.zst"), dir.join("jobs.wal"), FakeClock::new()).await.unwrap()
}

fn new_job(stem: &str, now_ms: u64) -> Job {
    Job::new(reelforge_core::FileStem::from(stem), PathBuf::from("inbox/x.mp4"), JobConfig::builder().build(), now_ms)
}

#[tokio::test]
async fn create_then_get_round_trips() {
    let dir = tempdir().unwrap();
    let store = open_store(dir.path()).await;

    let job = new_job("sermon_01", 0);
    store.create(job).await.unwrap();

    let fetched = store.get(&reelforge_core::FileStem::from("sermon_01")).unwrap();
    assert_eq!(fetched.stage, Stage::Ingest);
}

#[tokio::test]
async fn create_rejects_duplicate_file_stem() {
    let dir = tempdir().unwrap();
    let store = open_store(dir.path()).await;

    store.create(new_job("sermon_01", 0)).await.unwrap();
    let err = store.create(new_job("sermon_01", 0)).await.unwrap_err();
    assert!(matches!(err, StoreError::Job(JobError::AlreadyExists(_))));
}

#[tokio::test]
async fn update_applies_closure_and_bumps_updated_at() {
    let dir = tempdir().unwrap();
    let store = open_store(dir.path()).await;
    let stem = reelforge_core::FileStem::from("sermon_01");
    store.create(new_job("sermon_01", 0)).await.unwrap();

    let job = store
        .update(&stem, ChangeSource::Engine, |_job, _now| {
            Some(JobEventKind::Transitioned { next: Stage::Transcribing, status: "extracting audio".into() })
        })
        .await
        .unwrap();

    assert_eq!(job.stage, Stage::Transcribing);
}

#[tokio::test]
async fn update_on_missing_job_errors() {
    let dir = tempdir().unwrap();
    let store = open_store(dir.path()).await;
    let stem = reelforge_core::FileStem::from("ghost");

    let err = store
        .update(&stem, ChangeSource::Engine, |_, _| {
            Some(JobEventKind::StatusUpdated { status: "x".into() })
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Job(JobError::NotFound(_))));
}

#[tokio::test]
async fn list_filters_by_stage() {
    let dir = tempdir().unwrap();
    let store = open_store(dir.path()).await;
    store.create(new_job("a", 0)).await.unwrap();
    store.create(new_job("b", 0)).await.unwrap();
    store
        .update(&reelforge_core::FileStem::from("a"), ChangeSource::Engine, |_, _| {
            Some(JobEventKind::Transitioned { next: Stage::Transcribing, status: "x".into() })
        })
        .await
        .unwrap();

    let filter = JobFilter { stage: Some(Stage::Transcribing), ..Default::default() };
    let results = store.list(&filter);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].file_stem.as_str(), "a");
}

#[tokio::test]
async fn delete_removes_row() {
    let dir = tempdir().unwrap();
    let store = open_store(dir.path()).await;
    let stem = reelforge_core::FileStem::from("sermon_01");
    store.create(new_job("sermon_01", 0)).await.unwrap();
    store.delete(&stem).await.unwrap();
    assert!(store.get(&stem).is_none());
}

#[tokio::test]
async fn checkpoint_then_reopen_preserves_state() {
    let dir = tempdir().unwrap();
    {
        let store = open_store(dir.path()).await;
        store.create(new_job("sermon_01", 0)).await.unwrap();
        store.checkpoint().await.unwrap();
    }

    let reopened = open_store(dir.path()).await;
    assert!(reopened.get(&reelforge_core::FileStem::from("sermon_01")).is_some());
}

#[tokio::test]
async fn subscriber_observes_create_and_update() {
    let dir = tempdir().unwrap();
    let store = open_store(dir.path()).await;
    let mut sub = store.subscribe(8);

    store.create(new_job("sermon_01", 0)).await.unwrap();
    let n = tokio::time::timeout(std::time::Duration::from_secs(1), sub.recv()).await.unwrap().unwrap();
    assert_eq!(n.job.stage, Stage::Ingest);
}
