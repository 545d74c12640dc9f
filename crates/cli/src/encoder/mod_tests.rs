// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::tree::BinaryNode;
use super::*;

const INPUT: &[u8] = b"42 apples";

fn capture() -> Capture<'static> {
    Capture {
        name: "item",
        start: 0,
        end: 9,
        subs: vec![
            Capture {
                name: "num.int",
                start: 0,
                end: 2,
                subs: vec![],
            },
            Capture {
                name: "word",
                start: 3,
                end: 9,
                subs: vec![],
            },
        ],
    }
}

fn encode(name: &str) -> Encoded {
    let registry = Registry::builtin();
    let capture = capture();
    let palette = Palette::default();
    let m = Encoding {
        input: INPUT,
        capture: &capture,
        palette: &palette,
    };
    registry.get(name).unwrap().encode(&m).unwrap()
}

fn bytes(encoded: Encoded) -> Vec<u8> {
    match encoded {
        Encoded::Bytes(b) => b,
        Encoded::Boolean => panic!("expected bytes"),
    }
}

#[test]
fn registry_lists_builtin_encoders() {
    let names: Vec<_> = Registry::builtin().names().collect();
    assert_eq!(
        names,
        vec!["json", "bool", "line", "matches", "subs", "color", "byte"]
    );
    assert!(Registry::builtin().get("bogus").is_none());
}

#[test]
fn json_uses_one_based_positions() {
    let value: serde_json::Value = serde_json::from_slice(&bytes(encode("json"))).unwrap();
    assert_eq!(value["type"], "item");
    assert_eq!(value["s"], 1);
    assert_eq!(value["e"], 10);
    assert_eq!(value["data"], "42 apples");
    assert_eq!(value["subs"][1]["type"], "word");
    assert_eq!(value["subs"][1]["s"], 4);
}

#[test]
fn json_omits_empty_subs() {
    let value: serde_json::Value = serde_json::from_slice(&bytes(encode("json"))).unwrap();
    assert!(value["subs"][0].get("subs").is_none());
}

#[test]
fn bool_produces_no_data() {
    assert_eq!(encode("bool"), Encoded::Boolean);
}

#[yare::parameterized(
    line = { "line", b"42 apples" },
    matches = { "matches", b"42 apples" },
    subs = { "subs", b"42\napples" },
)]
fn text_encoders(name: &str, expected: &[u8]) {
    assert_eq!(bytes(encode(name)), expected);
}

#[test]
fn byte_encoder_decodes_with_postcard() {
    let encoded = bytes(encode("byte"));
    let node: BinaryNode<'_> = postcard::from_bytes(&encoded).unwrap();
    assert_eq!(node.kind, "item");
    assert_eq!(node.subs.len(), 2);
    assert_eq!(node.subs[0].data, "42");
    assert!(node.subs[0].subs.is_empty());
}

#[test]
fn byte_encoder_decodes_a_leaf_capture() {
    let leaf = Capture {
        name: "*",
        start: 0,
        end: 2,
        subs: vec![],
    };
    let palette = Palette::default();
    let m = Encoding {
        input: b"42",
        capture: &leaf,
        palette: &palette,
    };
    let encoded = bytes(Registry::builtin().get("byte").unwrap().encode(&m).unwrap());
    let node: BinaryNode<'_> = postcard::from_bytes(&encoded).unwrap();
    assert_eq!((node.s, node.e), (1, 3));
    assert_eq!(node.data, "42");
    assert!(node.subs.is_empty());
}
