// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Reelforge Contributors

use super::*;

#[test]
fn action_id_carries_its_prefix() {
    let id = ActionId::new();
    assert!(id.as_str().starts_with("act-"));
}

#[test]
fn wal_entry_id_carries_its_prefix() {
    let id = WalEntryId::new();
    assert!(id.as_str().starts_with("wal-"));
}

#[test]
fn action_id_parses_from_string() {
    let id = ActionId::from_string("act-deadbeef");
    assert_eq!(id.suffix(), "deadbeef");
}
