//! Dependency graph resolution.
//!
//! [`Resolver::resolve`] walks build declarations depth first from a single
//! `path:target` request. Each target is resolved at most once: identifiers
//! already in the memo are reused, identifiers still on the visiting path
//! close a cycle and abort the run. Rules are appended to the script after a
//! node's dependencies, so the assembled Makefile lists prerequisites before
//! the rules that need them.
//!
//! The request is named [`GOAL`]; the dependency at position `i` of a node
//! named `P` is named `P_i` when first discovered.

mod error;
mod state;

pub use error::ResolveError;
pub use state::DependencyRecord;

use crate::config::GenConfig;
use crate::make_gen::{self, Prerequisite};
use crate::manifest::ManifestLoader;
use crate::target::TargetId;
use camino::Utf8Path;
use indexmap::IndexMap;
use state::WalkState;
use std::fmt::Write as _;
use tracing::debug;

/// Rule name of the top-level request.
pub const GOAL: &str = "goal";

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedGraph {
    script: String,
    records: IndexMap<String, DependencyRecord>,
}

impl ResolvedGraph {
    /// Assembled Makefile text, dependencies before dependents.
    #[must_use]
    pub fn script(&self) -> &str {
        &self.script
    }

    /// Consume the graph, returning the Makefile text.
    #[must_use]
    pub fn into_script(self) -> String {
        self.script
    }

    /// Records in discovery order.
    pub fn records(&self) -> impl Iterator<Item = &DependencyRecord> {
        self.records.values()
    }

    /// Record for the identifier `id`, if it was reached.
    #[must_use]
    pub fn record(&self, id: &str) -> Option<&DependencyRecord> {
        self.records.get(id)
    }
}

/// Walks manifests reachable from a request and synthesizes its Makefile.
#[derive(Debug)]
pub struct Resolver<'a, L> {
    loader: &'a L,
    config: &'a GenConfig,
}

impl<'a, L: ManifestLoader> Resolver<'a, L> {
    /// Create a resolver reading manifests through `loader`.
    #[must_use]
    pub const fn new(loader: &'a L, config: &'a GenConfig) -> Self {
        Self { loader, config }
    }

    /// Resolve `request` and everything it depends on.
    ///
    /// # Errors
    ///
    /// Returns the first [`ResolveError`] encountered; no partial script is
    /// produced.
    pub fn resolve(&self, request: &str) -> Result<ResolvedGraph, ResolveError> {
        let mut state = WalkState::new();
        self.visit(&mut state, request, None, GOAL.to_owned())?;
        Ok(ResolvedGraph {
            script: state.script,
            records: state.memo,
        })
    }

    /// Resolve `target` and return it as a prerequisite of its dependent.
    fn visit(
        &self,
        state: &mut WalkState,
        target: &str,
        referenced_from: Option<&Utf8Path>,
        rule_name: String,
    ) -> Result<Prerequisite, ResolveError> {
        let id = TargetId::parse(target).ok_or_else(|| ResolveError::InvalidTarget {
            target: target.to_owned(),
            manifest: referenced_from.map(Utf8Path::to_path_buf),
        })?;
        let mut node = DependencyRecord::new(id.clone(), rule_name);
        state.memo.insert(target.to_owned(), node.clone());
        let mut guard = state.enter(target);

        let manifest = self.loader.load(id.dir())?;
        let manifest_path = self.loader.manifest_path(id.dir());
        let decl = manifest
            .find(id.name())
            .ok_or_else(|| ResolveError::TargetNotFound {
                target: id.name().to_owned(),
                manifest: manifest_path.clone(),
            })?;
        if decl.src.is_empty() {
            return Err(ResolveError::EmptySources {
                target: target.to_owned(),
            });
        }
        node.set_sources(decl.src.clone());

        let mut deps = Vec::with_capacity(decl.dep.len());
        for (i, dep) in decl.dep.iter().enumerate() {
            if guard.is_visiting(dep) {
                return Err(ResolveError::Cycle {
                    trace: guard.trace_to(dep),
                });
            }
            let finished = guard
                .memo
                .get(dep.as_str())
                .and_then(DependencyRecord::prerequisite);
            let prerequisite = match finished {
                Some(found) => {
                    debug!(target = %id, dependency = %dep, "reusing resolved dependency");
                    found
                }
                None => self.visit(
                    &mut guard,
                    dep,
                    Some(&manifest_path),
                    format!("{}_{i}", node.rule_name()),
                )?,
            };
            deps.push(prerequisite);
        }

        let rule = make_gen::synthesize(&node, &deps, self.config);
        debug!(target = %id, rule = node.rule_name(), "synthesized rule");
        guard
            .script
            .write_str(&rule.text)
            .map_err(ResolveError::BufferWrite)?;
        let prerequisite = Prerequisite {
            rule_name: node.rule_name().to_owned(),
            output_mapping: rule.output_mapping.clone(),
        };
        node.set_output_mapping(rule.output_mapping);
        guard.memo.insert(target.to_owned(), node);
        Ok(prerequisite)
    }
}
