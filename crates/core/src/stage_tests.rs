// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

use super::*;

#[test]
fn happy_path_chain_matches_scenario_a() {
    let mut stage = Stage::Ingest;
    let mut seen = vec![stage];
    while let Some(next) = stage.next() {
        stage = next;
        seen.push(stage);
        if seen.len() > 20 {
            panic!("stage graph did not terminate");
        }
    }
    assert_eq!(
        seen,
        vec![
            Stage::Ingest,
            Stage::Transcribing,
            Stage::Transcribed,
            Stage::TranslatingCloudSubmitted,
            Stage::CloudTranslating,
            Stage::CloudReviewing,
            Stage::CloudPolishing,
            Stage::CloudDone,
            Stage::Finalizing,
            Stage::Finalized,
            Stage::Burning,
            Stage::Completed,
        ]
    );
}

#[test]
fn terminal_stages_have_no_next() {
    for s in [Stage::Completed, Stage::Delivered, Stage::Dead, Stage::Halted] {
        assert_eq!(s.next(), None);
        assert!(s.is_terminal());
    }
}

#[test]
fn non_terminal_stages_are_not_terminal() {
    assert!(!Stage::Ingest.is_terminal());
    assert!(!Stage::Burning.is_terminal());
}

#[test]
fn cloud_stages_are_flagged() {
    assert!(Stage::CloudTranslating.is_cloud());
    assert!(Stage::TranslatingCloudSubmitted.is_cloud());
    assert!(!Stage::Ingest.is_cloud());
    assert!(!Stage::CloudDone.is_cloud());
}

#[test]
fn mirror_cloud_maps_known_names_and_rejects_unknown() {
    assert_eq!(Stage::mirror_cloud("cloud_translating"), Some(Stage::CloudTranslating));
    assert_eq!(Stage::mirror_cloud("polishing"), Some(Stage::CloudPolishing));
    assert_eq!(Stage::mirror_cloud("bogus"), None);
}

#[test]
fn display_uses_snake_case_names() {
    assert_eq!(Stage::TranslatingCloudSubmitted.to_string(), "translating_cloud_submitted");
    assert_eq!(Stage::Dead.to_string(), "dead");
}

#[test]
fn serializes_to_snake_case_json() {
    let json = serde_json::to_string(&Stage::CloudReviewing).unwrap();
    assert_eq!(json, "\"cloud_reviewing\"");
}
