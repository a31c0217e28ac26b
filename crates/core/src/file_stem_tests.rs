// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

use super::*;

#[test]
fn strips_extension() {
    assert_eq!(FileStem::from_filename("sermon_01.mp4").as_str(), "sermon_01");
}

#[test]
fn normalizes_unsafe_characters() {
    assert_eq!(FileStem::from_filename("My Sermon (final)!!.mov").as_str(), "My_Sermon__final___");
}

#[test]
fn no_extension_keeps_whole_name() {
    assert_eq!(FileStem::from_filename("sermon_01").as_str(), "sermon_01");
}

#[test]
fn empty_stem_falls_back_to_placeholder() {
    assert_eq!(FileStem::from_filename(".mp4").as_str(), "_");
}

#[test]
fn hash_map_lookup_by_borrowed_str() {
    use std::collections::HashMap;
    let mut map: HashMap<FileStem, i32> = HashMap::new();
    map.insert(FileStem::from("sermon_01"), 1);
    assert_eq!(map.get("sermon_01"), Some(&1));
}
