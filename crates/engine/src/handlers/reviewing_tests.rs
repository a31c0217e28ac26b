use super::*;
use crate::cloud_link::{self, CloudLink};
use crate::handlers::test_support::test_ctx;
use reelforge_adapters::ObjectStore;
use reelforge_core::{FileStem, JobBuilder, MetaPatch};

async fn link_for(ctx: &HandlerCtx<reelforge_core::FakeClock>, job: &Job) -> CloudLink {
    let link = CloudLink { bucket: "bucket".to_string(), prefix: "jobs".to_string(), cloud_job_id: job.file_stem.to_string() };
    let link_path = crate::paths::cloud_link_path(&ctx.config, &job.file_stem);
    cloud_link::write(&link_path, &link).await.expect("write link");
    link
}

#[tokio::test]
async fn transitions_immediately_when_review_is_not_required() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(dir.path().to_path_buf());
    let job = JobBuilder::default().file_stem(FileStem::from("clip")).stage(Stage::Reviewing).build();

    assert_eq!(handle(&job, &ctx).await, StageOutcome::transition(Stage::Reviewed, "review submitted"));
}

#[tokio::test]
async fn waits_while_review_required_and_no_remote_verdict_exists() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(dir.path().to_path_buf());
    let mut job = JobBuilder::default().file_stem(FileStem::from("clip")).stage(Stage::Reviewing).build();
    job.meta.review_required = true;

    assert_eq!(handle(&job, &ctx).await, StageOutcome::Wait);
}

#[tokio::test]
async fn waits_while_the_remote_reviewer_has_not_approved_yet() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(dir.path().to_path_buf());
    let mut job = JobBuilder::default().file_stem(FileStem::from("clip")).stage(Stage::Reviewing).build();
    job.meta.review_required = true;
    let link = link_for(&ctx, &job).await;
    ctx.objects.put(&link.object_key("review.json"), br#"{"approved":false}"#.to_vec()).await.expect("put review");

    assert_eq!(handle(&job, &ctx).await, StageOutcome::Wait);
}

#[tokio::test]
async fn transitions_once_the_remote_reviewer_approves() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(dir.path().to_path_buf());
    let mut job = JobBuilder::default().file_stem(FileStem::from("clip")).stage(Stage::Reviewing).build();
    job.meta.review_required = true;
    let link = link_for(&ctx, &job).await;
    ctx.objects.put(&link.object_key("review.json"), br#"{"approved":true}"#.to_vec()).await.expect("put review");

    let outcome = handle(&job, &ctx).await;

    let expected_meta = MetaPatch { review_required: Some(false), ..MetaPatch::default() };
    assert_eq!(outcome, StageOutcome::transition_with_meta(Stage::Reviewed, "review submitted", expected_meta));
}
