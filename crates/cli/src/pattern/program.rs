// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Compiled programs: a root expression plus a private copy of every rule it
//! can reach.

use std::collections::HashMap;

use super::expr::{Expr, Rule, RuleId};

/// Capture name given to compiled expressions that are not a bare reference
/// to a capturing rule.
pub const ANONYMOUS: &str = "*";

/// A self-contained compiled pattern.
///
/// Rule ids inside a program index its own table, so a program is unaffected
/// by later changes to the namespace it was compiled against.
#[derive(Debug, Clone)]
pub struct Program {
    rules: Vec<Rule>,
    root: RuleId,
    source: String,
}

impl Program {
    /// Snapshot `root` and every rule reachable from it out of `store`.
    ///
    /// When `root` is a bare call to a capturing rule it becomes the program
    /// entry directly; otherwise it is wrapped in an anonymous capture.
    pub fn build(root: Expr, store: &[Rule], source: impl Into<String>) -> Self {
        let mut local: HashMap<RuleId, RuleId> = HashMap::new();
        let mut order: Vec<RuleId> = Vec::new();
        let mut pending = calls_of(&root);
        while let Some(id) = pending.pop() {
            if local.contains_key(&id) {
                continue;
            }
            local.insert(id, order.len());
            order.push(id);
            if let Some(rule) = store.get(id) {
                pending.extend(calls_of(&rule.body));
            }
        }

        let map = |id: RuleId| local.get(&id).copied().unwrap_or(id);
        let mut rules: Vec<Rule> = order
            .iter()
            .filter_map(|id| store.get(*id))
            .map(|rule| Rule {
                name: rule.name.clone(),
                capture: rule.capture,
                body: rule.body.remap(&map),
            })
            .collect();

        let entry = match root {
            Expr::Call(id) if store.get(id).is_some_and(|r| r.capture) => map(id),
            other => {
                rules.push(Rule {
                    name: ANONYMOUS.to_string(),
                    capture: true,
                    body: other.remap(&map),
                });
                rules.len() - 1
            }
        };

        Self {
            rules,
            root: entry,
            source: source.into(),
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(id)
    }

    /// Entry rule.
    pub fn root(&self) -> RuleId {
        self.root
    }

    /// The expression text this program was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Rough heap footprint, for allocation accounting.
    pub fn footprint(&self) -> usize {
        self.source.len()
            + self
                .rules
                .iter()
                .map(|r| std::mem::size_of::<Rule>() + r.name.len() + r.body.footprint())
                .sum::<usize>()
    }
}

fn calls_of(expr: &Expr) -> Vec<RuleId> {
    let mut calls = Vec::new();
    expr.for_each_call(&mut |id| calls.push(id));
    calls
}

#[cfg(test)]
#[path = "program_tests.rs"]
mod tests;
