use tokio_util::sync::CancellationToken;
use super::*;
use crate::handlers::test_support::test_ctx;
use reelforge_adapters::ObjectStore;
use reelforge_core::{FileStem, JobBuilder};
use std::sync::Arc;

#[tokio::test]
async fn submitting_from_transcribed_records_a_cloud_link_and_transitions() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(dir.path().to_path_buf());
    let job = JobBuilder::default().file_stem(FileStem::from("clip")).stage(Stage::Transcribed).build();

    let outcome = handle_transcribed(&job, &ctx, &CancellationToken::new()).await;

    assert_eq!(outcome, StageOutcome::transition(Stage::TranslatingCloudSubmitted, "submitted to cloud"));
    let link_path = crate::paths::cloud_link_path(&ctx.config, &job.file_stem);
    assert!(tokio::fs::try_exists(&link_path).await.unwrap_or(false));
}

#[tokio::test]
async fn local_translation_path_is_used_when_cloud_pipeline_is_off() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut ctx = test_ctx(dir.path().to_path_buf());
    {
        let config = Arc::get_mut(&mut ctx.config).expect("sole owner");
        config.cloud_pipeline = false;
        config.commands.translator = reelforge_core::CollaboratorCommand {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), "echo '{}' > {output}".to_string()],
        };
    }
    let job = JobBuilder::default().file_stem(FileStem::from("clip")).stage(Stage::Transcribed).build();

    let outcome = handle_transcribed(&job, &ctx, &CancellationToken::new()).await;

    assert_eq!(outcome, StageOutcome::transition(Stage::CloudDone, "local translation complete"));
    let approved = crate::paths::approved_path(&ctx.config, &job.file_stem);
    assert!(tokio::fs::try_exists(&approved).await.unwrap_or(false));
}

async fn link_for(ctx: &super::HandlerCtx<reelforge_core::FakeClock>, job: &reelforge_core::Job) -> CloudLink {
    let link = CloudLink {
        bucket: "bucket".to_string(),
        prefix: "jobs".to_string(),
        cloud_job_id: job.file_stem.to_string(),
    };
    let link_path = crate::paths::cloud_link_path(&ctx.config, &job.file_stem);
    cloud_link::write(&link_path, &link).await.expect("write link");
    link
}

#[tokio::test]
async fn poll_mirrors_a_cloud_stage_transition() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(dir.path().to_path_buf());
    let job = JobBuilder::default()
        .file_stem(FileStem::from("clip"))
        .stage(Stage::TranslatingCloudSubmitted)
        .build();
    let link = link_for(&ctx, &job).await;

    let key = link.object_key("progress.json");
    ctx.objects.put(&key, br#"{"stage":"translating","progress":40}"#.to_vec()).await.expect("put progress");

    let outcome = handle_poll(&job, &ctx).await;

    assert_eq!(outcome, StageOutcome::transition(Stage::CloudTranslating, "cloud: translating"));
}

#[tokio::test]
async fn poll_reports_progress_without_changing_stage() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(dir.path().to_path_buf());
    let job =
        JobBuilder::default().file_stem(FileStem::from("clip")).stage(Stage::CloudTranslating).build();
    let link = link_for(&ctx, &job).await;

    let key = link.object_key("progress.json");
    ctx.objects.put(&key, br#"{"stage":"translating","progress":65}"#.to_vec()).await.expect("put progress");

    let outcome = handle_poll(&job, &ctx).await;

    assert_eq!(outcome, StageOutcome::progress(65, "cloud: translating"));
}

#[tokio::test]
async fn poll_transitions_to_cloud_done_once_approved() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(dir.path().to_path_buf());
    let job =
        JobBuilder::default().file_stem(FileStem::from("clip")).stage(Stage::CloudPolishing).build();
    let link = link_for(&ctx, &job).await;

    let key = link.object_key("approved.json");
    ctx.objects.put(&key, b"{}".to_vec()).await.expect("put approved");

    let outcome = handle_poll(&job, &ctx).await;

    assert_eq!(outcome, StageOutcome::transition(Stage::CloudDone, "cloud worker signaled done"));
}

#[tokio::test]
async fn poll_without_a_recorded_link_retries() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(dir.path().to_path_buf());
    let job =
        JobBuilder::default().file_stem(FileStem::from("clip")).stage(Stage::TranslatingCloudSubmitted).build();

    let outcome = handle_poll(&job, &ctx).await;

    assert!(matches!(outcome, StageOutcome::Retry { .. }));
}

#[tokio::test]
async fn done_fetches_the_approved_artifact_and_routes_to_finalizing_without_review() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(dir.path().to_path_buf());
    let mut job =
        JobBuilder::default().file_stem(FileStem::from("clip")).stage(Stage::CloudDone).build();
    job.meta.review_required = false;
    let link = link_for(&ctx, &job).await;

    let key = link.object_key("approved.json");
    ctx.objects.put(&key, br#"{"segments":[]}"#.to_vec()).await.expect("put approved");

    let outcome = handle_done(&job, &ctx).await;

    assert_eq!(outcome, StageOutcome::transition(Stage::Finalizing, "entering finalizer"));
    let approved_path = crate::paths::approved_path(&ctx.config, &job.file_stem);
    assert!(tokio::fs::try_exists(&approved_path).await.unwrap_or(false));
}

#[tokio::test]
async fn done_fetches_the_editor_report_when_the_worker_wrote_one() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(dir.path().to_path_buf());
    let mut job = JobBuilder::default().file_stem(FileStem::from("clip")).stage(Stage::CloudDone).build();
    job.meta.review_required = false;
    let link = link_for(&ctx, &job).await;

    ctx.objects.put(&link.object_key("approved.json"), br#"{"segments":[]}"#.to_vec()).await.expect("put approved");
    ctx.objects
        .put(&link.object_key("editor_report.json"), br#"{"quality_score":0.95}"#.to_vec())
        .await
        .expect("put editor report");

    let outcome = handle_done(&job, &ctx).await;

    let expected_meta = reelforge_core::MetaPatch {
        editor_report: Some(serde_json::json!({"quality_score": 0.95})),
        review_required: None,
    };
    assert_eq!(
        outcome,
        StageOutcome::transition_with_meta(Stage::Finalizing, "entering finalizer", expected_meta)
    );
}

#[tokio::test]
async fn done_routes_to_reviewing_when_review_is_required() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(dir.path().to_path_buf());
    let mut job =
        JobBuilder::default().file_stem(FileStem::from("clip")).stage(Stage::CloudDone).build();
    job.meta.review_required = true;
    let link = link_for(&ctx, &job).await;

    let key = link.object_key("approved.json");
    ctx.objects.put(&key, br#"{"segments":[]}"#.to_vec()).await.expect("put approved");

    let outcome = handle_done(&job, &ctx).await;

    assert_eq!(outcome, StageOutcome::transition(Stage::Reviewing, "awaiting human review"));
}
