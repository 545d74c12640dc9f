// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Structured encoders: the whole capture tree as JSON or postcard.
//!
//! Positions are 1-based; `e` is one past the last matched byte.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::{EncodeError, Encoded, Encoder, Encoding};
use crate::pattern::Capture;

/// Serialized form of one capture, as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node<'a> {
    #[serde(rename = "type")]
    pub kind: Cow<'a, str>,
    pub s: usize,
    pub e: usize,
    pub data: Cow<'a, str>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subs: Vec<Node<'a>>,
}

impl<'a> Node<'a> {
    pub fn from_capture(capture: &'a Capture<'_>, input: &'a [u8]) -> Self {
        Self {
            kind: Cow::Borrowed(capture.name),
            s: capture.start + 1,
            e: capture.end + 1,
            data: String::from_utf8_lossy(capture.text(input)),
            subs: capture
                .subs
                .iter()
                .map(|sub| Node::from_capture(sub, input))
                .collect(),
        }
    }
}

/// Binary form of one capture. Every field is written, since postcard
/// carries no field names or lengths for skipped values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryNode<'a> {
    pub kind: Cow<'a, str>,
    pub s: usize,
    pub e: usize,
    pub data: Cow<'a, str>,
    pub subs: Vec<BinaryNode<'a>>,
}

impl<'a> From<Node<'a>> for BinaryNode<'a> {
    fn from(node: Node<'a>) -> Self {
        Self {
            kind: node.kind,
            s: node.s,
            e: node.e,
            data: node.data,
            subs: node.subs.into_iter().map(BinaryNode::from).collect(),
        }
    }
}

pub(super) struct Json;

impl Encoder for Json {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode(&self, m: &Encoding<'_, '_>) -> Result<Encoded, EncodeError> {
        let node = Node::from_capture(m.capture, m.input);
        Ok(Encoded::Bytes(serde_json::to_vec(&node)?))
    }
}

pub(super) struct Byte;

impl Encoder for Byte {
    fn name(&self) -> &'static str {
        "byte"
    }

    fn encode(&self, m: &Encoding<'_, '_>) -> Result<Encoded, EncodeError> {
        let node = BinaryNode::from(Node::from_capture(m.capture, m.input));
        Ok(Encoded::Bytes(postcard::to_allocvec(&node)?))
    }
}
