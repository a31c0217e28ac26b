// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

use super::*;
use crate::handlers::test_support::test_config;
use reelforge_core::FileStem;

#[test]
fn vault_data_owner_stem_strips_the_skeleton_suffix() {
    assert_eq!(vault_data_owner_stem("sermon_01_skeleton.json").as_str(), "sermon_01");
}

#[test]
fn vault_data_owner_stem_strips_the_cloud_link_suffix() {
    assert_eq!(vault_data_owner_stem("sermon_01_cloud_link.json").as_str(), "sermon_01");
}

#[test]
fn vault_data_owner_stem_strips_the_finalized_suffix() {
    assert_eq!(vault_data_owner_stem("sermon_01_finalized.json").as_str(), "sermon_01");
}

#[test]
fn vault_data_owner_stem_leaves_an_unsuffixed_name_alone() {
    assert_eq!(vault_data_owner_stem("sermon_01.json").as_str(), "sermon_01");
}

#[test]
fn finalized_path_matches_the_suffix_vault_data_owner_stem_expects() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(dir.path().to_path_buf());
    let stem = FileStem::from("sermon_01");
    let path = finalized_path(&config, &stem);
    let name = path.file_name().unwrap().to_str().unwrap();
    assert_eq!(vault_data_owner_stem(name), stem);
}
