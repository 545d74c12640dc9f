// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use crate::pattern::Expr;
use proptest::prelude::*;

fn program() -> Program {
    Program::build(Expr::Any, &[], ".")
}

#[test]
fn ids_are_positive_and_distinct() {
    let mut table = PatternTable::new();
    let a = table.insert(program()).unwrap();
    let b = table.insert(program()).unwrap();
    assert!(a > 0 && b > 0);
    assert_ne!(a, b);
    assert_eq!(table.len(), 2);
}

#[test]
fn removed_id_is_invalid_even_after_slot_reuse() {
    let mut table = PatternTable::new();
    let a = table.insert(program()).unwrap();
    assert!(table.remove(a).is_some());
    assert!(table.get(a).is_none());
    assert!(table.remove(a).is_none());

    let b = table.insert(program()).unwrap();
    assert_ne!(a, b);
    assert!(table.get(a).is_none());
    assert!(table.get(b).is_some());
}

#[yare::parameterized(
    zero = { 0 },
    negative = { -5 },
    unknown_slot = { 42 },
    zero_index = { 1 << 16 },
)]
fn invalid_ids_are_rejected(id: PatternId) {
    let mut table = PatternTable::new();
    table.insert(program()).unwrap();
    assert!(table.get(id).is_none());
}

#[test]
fn clear_releases_everything() {
    let mut table = PatternTable::new();
    let ids: Vec<_> = (0..3).map(|_| table.insert(program()).unwrap()).collect();
    assert_eq!(table.clear(), 3);
    assert!(table.is_empty());
    assert!(ids.iter().all(|id| table.get(*id).is_none()));
    assert_eq!(table.footprint(), 0);
}

proptest! {
    #[test]
    fn live_count_tracks_inserts_and_removes(ops in proptest::collection::vec(any::<bool>(), 1..64)) {
        let mut table = PatternTable::new();
        let mut live = Vec::new();
        for insert in ops {
            if insert || live.is_empty() {
                live.push(table.insert(program()).unwrap());
            } else {
                let id = live.remove(0);
                prop_assert!(table.remove(id).is_some());
            }
            prop_assert_eq!(table.len(), live.len());
        }
        for id in &live {
            prop_assert!(table.get(*id).is_some());
        }
    }
}
