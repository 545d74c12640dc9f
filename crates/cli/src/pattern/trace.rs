// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Match tracing.
//!
//! A [`Tracer`] observes the interpreter and records one event per step in
//! pre-order; each event's result is filled in when the step exits.

use std::fmt::Write as _;

use serde::Serialize;

use super::program::ANONYMOUS;
use super::vm::{Abend, Observer, Step};

/// Events recorded before a trace is cut short.
pub const MAX_EVENTS: usize = 100_000;

/// Longest expression label printed in a trace line.
const MAX_LABEL: usize = 60;

/// How a trace is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceStyle {
    /// Rule calls only, as indented text.
    Condensed,
    /// Every expression node, as indented text.
    Full,
    /// Every expression node, as a JSON document.
    Json,
}

impl TraceStyle {
    pub const ALL: [TraceStyle; 3] = [TraceStyle::Condensed, TraceStyle::Full, TraceStyle::Json];

    pub fn name(self) -> &'static str {
        match self {
            TraceStyle::Condensed => "condensed",
            TraceStyle::Full => "full",
            TraceStyle::Json => "json",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }
}

#[derive(Debug, Clone, Serialize)]
struct Event {
    depth: usize,
    kind: &'static str,
    node: String,
    /// 1-based start position.
    pos: usize,
    /// 1-based position after the match, when the step matched.
    end: Option<usize>,
}

#[derive(Serialize)]
struct JsonTrace<'a> {
    matched: bool,
    abend: Option<&'static str>,
    truncated: bool,
    events: &'a [Event],
}

/// Records interpreter steps for one traced match.
#[derive(Debug)]
pub struct Tracer {
    style: TraceStyle,
    events: Vec<Event>,
    open: Vec<Option<usize>>,
    truncated: bool,
}

impl Tracer {
    pub fn new(style: TraceStyle) -> Self {
        Self {
            style,
            events: Vec::new(),
            open: Vec::new(),
            truncated: false,
        }
    }

    fn wants(&self, step: &Step<'_>) -> bool {
        matches!(step, Step::Rule(_)) || self.style != TraceStyle::Condensed
    }

    /// Render the recorded trace.
    pub fn finish(self, input: &[u8], end: Option<usize>, abend: Option<Abend>) -> Vec<u8> {
        match self.style {
            TraceStyle::Json => {
                let doc = JsonTrace {
                    matched: end.is_some(),
                    abend: abend.map(abend_name),
                    truncated: self.truncated,
                    events: &self.events,
                };
                serde_json::to_vec_pretty(&doc).unwrap_or_default()
            }
            TraceStyle::Condensed | TraceStyle::Full => self.render_text(input, end, abend),
        }
    }

    fn render_text(&self, input: &[u8], end: Option<usize>, abend: Option<Abend>) -> Vec<u8> {
        let mut out = String::new();
        for event in &self.events {
            let indent = "  ".repeat(event.depth);
            let _ = match event.end {
                Some(stop) => {
                    let text = input.get(event.pos - 1..stop - 1).unwrap_or_default();
                    writeln!(
                        out,
                        "{indent}{} @{}: matched {:?}",
                        event.node,
                        event.pos,
                        String::from_utf8_lossy(text)
                    )
                }
                None => writeln!(out, "{indent}{} @{}: no match", event.node, event.pos),
            };
        }
        if self.truncated {
            out.push_str("... trace truncated\n");
        }
        let _ = match (abend, end) {
            (Some(abend), _) => writeln!(out, "Match abandoned: {}", abend_name(abend)),
            (None, Some(stop)) => writeln!(out, "Matched through position {}", stop + 1),
            (None, None) => writeln!(out, "No match"),
        };
        out.into_bytes()
    }
}

impl<'p> Observer<'p> for Tracer {
    fn enter(&mut self, step: Step<'p>, pos: usize) {
        if !self.wants(&step) {
            return;
        }
        if self.events.len() >= MAX_EVENTS {
            self.truncated = true;
            self.open.push(None);
            return;
        }
        let (kind, node) = match step {
            Step::Rule(rule) if rule.name == ANONYMOUS => ("rule", "<expression>".to_string()),
            Step::Rule(rule) => ("rule", rule.name.clone()),
            Step::Expr(expr) => ("expr", label(&expr.to_string())),
        };
        self.open.push(Some(self.events.len()));
        self.events.push(Event {
            depth: self.open.len() - 1,
            kind,
            node,
            pos: pos + 1,
            end: None,
        });
    }

    fn exit(&mut self, step: Step<'p>, _pos: usize, end: Option<usize>) {
        if !self.wants(&step) {
            return;
        }
        if let Some(Some(idx)) = self.open.pop()
            && let Some(event) = self.events.get_mut(idx)
        {
            event.end = end.map(|e| e + 1);
        }
    }
}

fn abend_name(abend: Abend) -> &'static str {
    match abend {
        Abend::CallDepth => "call depth limit",
        Abend::AllocLimit => "allocation limit",
    }
}

fn label(text: &str) -> String {
    if text.chars().count() <= MAX_LABEL {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(MAX_LABEL).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
#[path = "trace_tests.rs"]
mod tests;
