// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Name bindings, packages, and the rule store of one engine.

use std::collections::HashMap;

use crate::pattern::{Rule, RuleId};

/// Index into [`Namespace::packages`].
pub type PackageId = usize;

/// What a name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Rule { id: RuleId, local: bool },
    Package(PackageId),
}

/// A set of bindings: the top level, or the inside of one package.
#[derive(Debug, Clone, Default)]
pub struct Env {
    bindings: HashMap<String, Binding>,
}

impl Env {
    pub fn get(&self, name: &str) -> Option<Binding> {
        self.bindings.get(name).copied()
    }

    pub fn bind(&mut self, name: impl Into<String>, binding: Binding) {
        self.bindings.insert(name.into(), binding);
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bound names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.bindings.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// A loaded package.
#[derive(Debug, Clone)]
pub struct Package {
    /// Name from the package declaration.
    pub name: String,
    /// Where the source came from; `None` for inline loads.
    pub origin: Option<String>,
    pub env: Env,
}

/// State restored when a load fails.
#[derive(Debug)]
pub struct Checkpoint {
    rules: usize,
    packages: usize,
    top: Env,
}

/// All definitions visible to one engine.
#[derive(Debug, Default)]
pub struct Namespace {
    pub top: Env,
    pub(crate) packages: Vec<Package>,
    /// Imported packages by origin.
    pub(crate) cache: HashMap<String, PackageId>,
    pub(crate) rules: Vec<Rule>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn package(&self, id: PackageId) -> Option<&Package> {
        self.packages.get(id)
    }

    /// Package bound at top level under `name`.
    pub fn package_named(&self, name: &str) -> Option<&Package> {
        match self.top.get(name)? {
            Binding::Package(id) => self.packages.get(id),
            Binding::Rule { .. } => None,
        }
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            rules: self.rules.len(),
            packages: self.packages.len(),
            top: self.top.clone(),
        }
    }

    /// Undo everything added since `checkpoint`.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.rules.truncate(checkpoint.rules);
        self.packages.truncate(checkpoint.packages);
        self.cache.retain(|_, id| *id < checkpoint.packages);
        self.top = checkpoint.top;
    }

    /// Rough heap footprint of the rule store, for allocation accounting.
    pub fn footprint(&self) -> usize {
        self.rules
            .iter()
            .map(|r| std::mem::size_of::<Rule>() + r.name.len() + r.body.footprint())
            .sum()
    }
}

#[cfg(test)]
#[path = "namespace_tests.rs"]
mod tests;
