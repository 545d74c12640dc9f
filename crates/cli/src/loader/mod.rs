// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Module loading: inline sources, files, and package imports.
//!
//! Every top-level operation is a transaction. A failed load, file load, or
//! import leaves the namespace exactly as it was.

pub mod library;
pub mod namespace;
pub mod resolve;

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use crate::diagnostic::Diagnostic;
use crate::pattern::{Expr, Program, Rule};
use crate::syntax::{Unit, parse_expression, parse_unit};

pub use library::Library;
pub use namespace::{Binding, Env, Namespace, Package, PackageId};
pub use resolve::{Scope, resolve};

/// File extension of pattern sources on the libpath.
pub const SOURCE_EXT: &str = "rpl";

/// Result of a load, file load, or import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub ok: bool,
    /// Package declared by the source, or the actual name of an import.
    pub package: Option<String>,
    pub messages: Vec<Diagnostic>,
}

impl LoadReport {
    fn success(package: Option<String>) -> Self {
        Self {
            ok: true,
            package,
            messages: Vec::new(),
        }
    }

    fn failure(messages: Vec<Diagnostic>) -> Self {
        Self {
            ok: false,
            package: None,
            messages,
        }
    }
}

/// Where imports and relative file loads are looked up.
#[derive(Debug, Clone, Copy)]
pub struct Search<'a> {
    pub libpath: &'a [PathBuf],
    pub library: &'a Library,
}

type Loaded<T> = Result<T, Vec<Diagnostic>>;

impl Namespace {
    /// Load inline source into the namespace.
    pub fn load(&mut self, source: &str, search: Search<'_>) -> LoadReport {
        self.transact("load", |ns| {
            let unit = parse_unit(source).map_err(|d| vec![d])?;
            ns.load_unit(&unit, None, search)
        })
    }

    /// Load a source file. Relative paths that do not exist as given are
    /// looked up in the libpath directories.
    pub fn load_file(&mut self, path: &Path, search: Search<'_>) -> LoadReport {
        let resolved = if path.is_absolute() || path.exists() {
            path.to_path_buf()
        } else {
            search
                .libpath
                .iter()
                .map(|dir| dir.join(path))
                .find(|candidate| candidate.is_file())
                .unwrap_or_else(|| path.to_path_buf())
        };
        let label = resolved.display().to_string();
        let source = match std::fs::read_to_string(&resolved) {
            Ok(source) => source,
            Err(err) => {
                return LoadReport::failure(vec![Diagnostic::new(format!(
                    "cannot read {label}: {err}"
                ))]);
            }
        };
        self.transact("load_file", |ns| {
            let unit = parse_unit(&source).map_err(|d| vec![d.with_source(label.clone())])?;
            ns.load_unit(&unit, Some(&label), search)
        })
    }

    /// Import the package at `path` and bind it at top level under `alias`
    /// or its declared name.
    pub fn import(&mut self, path: &str, alias: Option<&str>, search: Search<'_>) -> LoadReport {
        self.transact("import", |ns| {
            let id = ns.import_package(path, search, &mut Vec::new())?;
            let name = ns
                .packages
                .get(id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| path.to_string());
            ns.top
                .bind(alias.unwrap_or(&name), Binding::Package(id));
            Ok(Some(name))
        })
    }

    /// Compile a standalone expression against the top-level bindings.
    pub fn compile(&self, source: &str) -> Loaded<Program> {
        let ast = parse_expression(source).map_err(|d| vec![d])?;
        let scope = Scope {
            env: &self.top,
            packages: &self.packages,
        };
        let root = resolve(&ast, scope).map_err(|d| vec![d])?;
        Ok(Program::build(root, &self.rules, source))
    }

    fn transact(&mut self, op: &str, f: impl FnOnce(&mut Self) -> Loaded<Option<String>>) -> LoadReport {
        let checkpoint = self.checkpoint();
        match f(self) {
            Ok(package) => {
                tracing::debug!(op, package = package.as_deref(), rules = self.rules.len(), "loaded");
                LoadReport::success(package)
            }
            Err(messages) => {
                self.rollback(checkpoint);
                tracing::warn!(op, errors = messages.len(), "load failed; namespace unchanged");
                LoadReport::failure(messages)
            }
        }
    }

    fn load_unit(&mut self, unit: &Unit, label: Option<&str>, search: Search<'_>) -> Loaded<Option<String>> {
        let mut stack = Vec::new();
        match &unit.package {
            Some(name) => {
                let env = self.define(unit, Env::default(), Some(name), label, search, &mut stack)?;
                let id = self.packages.len();
                self.packages.push(Package {
                    name: name.clone(),
                    origin: label.map(str::to_string),
                    env,
                });
                self.top.bind(name.clone(), Binding::Package(id));
                Ok(Some(name.clone()))
            }
            None => {
                let top = std::mem::take(&mut self.top);
                self.top = self.define(unit, top, None, label, search, &mut stack)?;
                Ok(None)
            }
        }
    }

    /// Bind a unit's imports and definitions into `env`.
    ///
    /// Every definition is declared before any body is resolved, so
    /// definitions may refer to later ones and to themselves.
    fn define(
        &mut self,
        unit: &Unit,
        mut env: Env,
        package: Option<&str>,
        label: Option<&str>,
        search: Search<'_>,
        stack: &mut Vec<String>,
    ) -> Loaded<Env> {
        let sourced = |d: Diagnostic| match label {
            Some(label) => d.with_source(label),
            None => d,
        };

        for decl in &unit.imports {
            let id = self
                .import_package(&decl.path, search, stack)
                .map_err(|errs| {
                    errs.into_iter()
                        .map(|d| match d.source {
                            None if d.line == 0 => Diagnostic::at(d.message, decl.pos),
                            _ => d,
                        })
                        .map(&sourced)
                        .collect::<Vec<_>>()
                })?;
            let name = match &decl.alias {
                Some(alias) => alias.clone(),
                None => self.packages.get(id).map(|p| p.name.clone()).unwrap_or_default(),
            };
            env.bind(name, Binding::Package(id));
        }

        let mut errors = Vec::new();
        let mut seen = HashSet::new();
        let mut declared = Vec::new();
        for stmt in &unit.statements {
            if !seen.insert(stmt.name.as_str()) {
                errors.push(sourced(Diagnostic::at(
                    format!("'{}' is defined more than once", stmt.name),
                    stmt.pos,
                )));
                continue;
            }
            let id = self.rules.len();
            self.rules.push(Rule {
                name: match package {
                    Some(pkg) => format!("{pkg}.{}", stmt.name),
                    None => stmt.name.clone(),
                },
                capture: !stmt.alias,
                body: Expr::empty(),
            });
            env.bind(
                stmt.name.clone(),
                Binding::Rule {
                    id,
                    local: stmt.local,
                },
            );
            declared.push((id, stmt));
        }

        let mut bodies = Vec::with_capacity(declared.len());
        {
            let scope = Scope {
                env: &env,
                packages: &self.packages,
            };
            for (id, stmt) in declared {
                match resolve(&stmt.body, scope) {
                    Ok(body) => bodies.push((id, body)),
                    Err(d) => errors.push(sourced(d)),
                }
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        for (id, body) in bodies {
            if let Some(rule) = self.rules.get_mut(id) {
                rule.body = body;
            }
        }
        Ok(env)
    }

    /// Load (or reuse) the package at import path `path`.
    fn import_package(&mut self, path: &str, search: Search<'_>, stack: &mut Vec<String>) -> Loaded<PackageId> {
        let (origin, source) = locate(path, search).map_err(|d| vec![d])?;
        if let Some(&id) = self.cache.get(&origin) {
            tracing::debug!(path, %origin, "import cache hit");
            return Ok(id);
        }
        if stack.contains(&origin) {
            let mut cycle = stack.clone();
            cycle.push(origin);
            return Err(vec![Diagnostic::new(format!(
                "import cycle: {}",
                cycle.join(" -> ")
            ))]);
        }
        let unit = parse_unit(&source).map_err(|d| vec![d.with_source(origin.clone())])?;
        let Some(name) = unit.package.clone() else {
            return Err(vec![Diagnostic::new(format!(
                "{origin}: imported file has no package declaration"
            ))]);
        };

        stack.push(origin.clone());
        let env = self.define(&unit, Env::default(), Some(&name), Some(&origin), search, stack);
        stack.pop();
        let env = env?;

        let id = self.packages.len();
        self.packages.push(Package {
            name: name.clone(),
            origin: Some(origin.clone()),
            env,
        });
        self.cache.insert(origin.clone(), id);
        tracing::debug!(package = %name, %origin, "imported package");
        Ok(id)
    }
}

/// Find the source for import path `path`: first in the libpath, then in
/// the built-in library. Returns `(origin, source)`.
fn locate(path: &str, search: Search<'_>) -> Result<(String, String), Diagnostic> {
    let relative = Path::new(path);
    let valid = !path.is_empty()
        && relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if !valid {
        return Err(Diagnostic::new(format!("invalid import path '{path}'")));
    }
    for dir in search.libpath {
        let file = dir.join(format!("{path}.{SOURCE_EXT}"));
        if file.is_file() {
            let origin = file.display().to_string();
            return std::fs::read_to_string(&file)
                .map(|source| (origin.clone(), source))
                .map_err(|err| Diagnostic::new(format!("cannot read {origin}: {err}")));
        }
    }
    if let Some(source) = search.library.get(path) {
        return Ok((format!("builtin:{path}"), source.to_string()));
    }
    let dirs: Vec<String> = search.libpath.iter().map(|d| d.display().to_string()).collect();
    Err(Diagnostic::new(format!(
        "cannot find package '{path}' (libpath: {}; built-in: {})",
        if dirs.is_empty() { "empty".to_string() } else { dirs.join(":") },
        search.library.names().collect::<Vec<_>>().join(", ")
    )))
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
