use tokio_util::sync::CancellationToken;
use super::*;
use crate::handlers::test_support::test_ctx;
use reelforge_core::{FileStem, JobBuilder};
use std::sync::Arc;

#[tokio::test]
async fn moves_source_into_vault_and_extracts_audio() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = dir.path().join("incoming.mp4");
    tokio::fs::write(&source, b"fake media bytes").await.expect("write source");

    let mut ctx = test_ctx(dir.path().to_path_buf());
    Arc::get_mut(&mut ctx.config).expect("sole owner").commands.audio_extract =
        reelforge_core::CollaboratorCommand {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), "cp {input} {output}".to_string()],
        };

    let job = JobBuilder::default()
        .file_stem(FileStem::from("incoming"))
        .build();
    let mut job = job;
    job.meta.source_path = Some(source.clone());

    let outcome = handle(&job, &ctx, &CancellationToken::new()).await;

    assert_eq!(outcome, StageOutcome::transition(Stage::Transcribing, "audio extracted"));
    assert!(!tokio::fs::try_exists(&source).await.unwrap_or(true));
    let vaulted = crate::paths::source_path(&ctx.config, &job.file_stem, "mp4");
    assert!(tokio::fs::try_exists(&vaulted).await.unwrap_or(false));
    let audio_out = crate::paths::audio_path(&ctx.config, &job.file_stem);
    assert!(tokio::fs::try_exists(&audio_out).await.unwrap_or(false));
}

#[tokio::test]
async fn missing_source_path_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(dir.path().to_path_buf());
    let job = JobBuilder::default().file_stem(FileStem::from("no_source")).build();

    let outcome = handle(&job, &ctx, &CancellationToken::new()).await;

    assert!(matches!(outcome, StageOutcome::Fatal { .. }));
}

#[tokio::test]
async fn failing_extractor_is_retried_not_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = dir.path().join("incoming.mp4");
    tokio::fs::write(&source, b"fake media bytes").await.expect("write source");

    let mut ctx = test_ctx(dir.path().to_path_buf());
    Arc::get_mut(&mut ctx.config).expect("sole owner").commands.audio_extract =
        reelforge_core::CollaboratorCommand { program: "false".to_string(), args: vec![] };

    let mut job = JobBuilder::default().file_stem(FileStem::from("incoming")).build();
    job.meta.source_path = Some(source);

    let outcome = handle(&job, &ctx, &CancellationToken::new()).await;

    assert!(matches!(outcome, StageOutcome::Retry { .. }));
}
