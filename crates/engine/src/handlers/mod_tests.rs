use tokio_util::sync::CancellationToken;
use super::*;
use crate::handlers::test_support::test_ctx;
use reelforge_core::{FileStem, JobBuilder};

#[tokio::test]
async fn terminal_and_halted_stages_wait_rather_than_dispatch() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(dir.path().to_path_buf());

    for stage in [Stage::Completed, Stage::Delivered, Stage::Dead, Stage::Halted] {
        let job = JobBuilder::default().file_stem(FileStem::from("clip")).stage(stage).build();
        assert_eq!(dispatch(&job, &ctx, &CancellationToken::new()).await, StageOutcome::Wait, "stage {stage} should not dispatch");
    }
}

#[tokio::test]
async fn reviewed_advances_straight_into_finalizing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(dir.path().to_path_buf());
    let job = JobBuilder::default().file_stem(FileStem::from("clip")).stage(Stage::Reviewed).build();

    assert_eq!(dispatch(&job, &ctx, &CancellationToken::new()).await, StageOutcome::transition(Stage::Finalizing, "entering finalizer"));
}

#[tokio::test]
async fn finalized_advances_straight_into_burning() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(dir.path().to_path_buf());
    let job = JobBuilder::default().file_stem(FileStem::from("clip")).stage(Stage::Finalized).build();

    assert_eq!(dispatch(&job, &ctx, &CancellationToken::new()).await, StageOutcome::transition(Stage::Burning, "entering burner"));
}
