// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

use super::*;
use reelforge_core::{FileStem, Job, JobConfig};
use std::path::PathBuf;
use std::time::Duration;

fn notification(stem: &str, at_ms: u64) -> ChangeNotification {
    let job = Job::new(FileStem::from(stem), PathBuf::from("x"), JobConfig::builder().build(), at_ms);
    ChangeNotification { file_stem: FileStem::from(stem), at_ms, job }
}

#[tokio::test]
async fn subscriber_receives_published_update() {
    let feed = ChangeFeed::new(16);
    let mut sub = feed.subscribe(8);

    feed.publish(notification("sermon_01", 10));

    let received = tokio::time::timeout(Duration::from_secs(1), sub.recv()).await.unwrap().unwrap();
    assert_eq!(received.file_stem, FileStem::from("sermon_01"));
    assert_eq!(received.at_ms, 10);
}

#[tokio::test]
async fn per_job_ordering_is_monotonic() {
    let feed = ChangeFeed::new(16);
    let mut sub = feed.subscribe(8);

    for at_ms in [10, 20, 30] {
        feed.publish(notification("sermon_01", at_ms));
    }

    let mut last = 0;
    for _ in 0..3 {
        let n = tokio::time::timeout(Duration::from_secs(1), sub.recv()).await.unwrap().unwrap();
        assert!(n.at_ms > last);
        last = n.at_ms;
    }
}

#[tokio::test]
async fn multiple_subscribers_each_get_the_update() {
    let feed = ChangeFeed::new(16);
    let mut sub_a = feed.subscribe(8);
    let mut sub_b = feed.subscribe(8);

    feed.publish(notification("sermon_01", 10));

    assert!(tokio::time::timeout(Duration::from_secs(1), sub_a.recv()).await.unwrap().is_some());
    assert!(tokio::time::timeout(Duration::from_secs(1), sub_b.recv()).await.unwrap().is_some());
}
