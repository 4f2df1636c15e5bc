//! Mutable state threaded through one resolution run.
//!
//! [`WalkState`] owns the memo table, the set of targets currently being
//! resolved, the ordered path from the request to the current node, and the
//! script buffer. Visiting membership is held by a [`VisitGuard`] so it is
//! released on every exit path, including early returns via `?`.

use std::collections::HashSet;
use std::ops::{Deref, DerefMut};

use indexmap::IndexMap;

use crate::make_gen::Prerequisite;
use crate::target::TargetId;

/// Per-node record tracked for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRecord {
    id: TargetId,
    rule_name: String,
    sources: Vec<String>,
    output_mapping: Option<String>,
}

impl DependencyRecord {
    pub(crate) const fn new(id: TargetId, rule_name: String) -> Self {
        Self {
            id,
            rule_name,
            sources: Vec::new(),
            output_mapping: None,
        }
    }

    /// Identifier of the declaration this record resolves.
    #[must_use]
    pub const fn id(&self) -> &TargetId {
        &self.id
    }

    /// Synthetic Makefile rule name.
    #[must_use]
    pub fn rule_name(&self) -> &str {
        &self.rule_name
    }

    /// Source files declared for the target, relative to its directory.
    #[must_use]
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Compiler import mapping for the generated package, set once the
    /// node's rule has been synthesized.
    #[must_use]
    pub fn output_mapping(&self) -> Option<&str> {
        self.output_mapping.as_deref()
    }

    /// Rule name and mapping for a dependent, once this record is finished.
    pub(crate) fn prerequisite(&self) -> Option<Prerequisite> {
        self.output_mapping.as_ref().map(|mapping| Prerequisite {
            rule_name: self.rule_name.clone(),
            output_mapping: mapping.clone(),
        })
    }

    pub(crate) fn set_sources(&mut self, sources: Vec<String>) {
        self.sources = sources;
    }

    pub(crate) fn set_output_mapping(&mut self, mapping: String) {
        self.output_mapping = Some(mapping);
    }
}

#[derive(Debug, Default)]
pub(crate) struct WalkState {
    pub(crate) memo: IndexMap<String, DependencyRecord>,
    visiting: HashSet<String>,
    path: Vec<String>,
    pub(crate) script: String,
}

impl WalkState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_visiting(&self, key: &str) -> bool {
        self.visiting.contains(key)
    }

    /// Path from the request to `repeated`, joined with ` -> `.
    pub(crate) fn trace_to(&self, repeated: &str) -> String {
        let mut trace = self.path.join(" -> ");
        trace.push_str(" -> ");
        trace.push_str(repeated);
        trace
    }

    /// Mark `key` as being resolved until the returned guard drops.
    pub(crate) fn enter(&mut self, key: &str) -> VisitGuard<'_> {
        self.visiting.insert(key.to_owned());
        self.path.push(key.to_owned());
        VisitGuard { state: self }
    }

    #[cfg(test)]
    pub(crate) fn is_idle(&self) -> bool {
        self.visiting.is_empty() && self.path.is_empty()
    }
}

/// Scoped visiting membership; pops the path and clears the visiting entry on
/// drop.
pub(crate) struct VisitGuard<'s> {
    state: &'s mut WalkState,
}

impl Deref for VisitGuard<'_> {
    type Target = WalkState;

    fn deref(&self) -> &Self::Target {
        self.state
    }
}

impl DerefMut for VisitGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.state
    }
}

impl Drop for VisitGuard<'_> {
    fn drop(&mut self) {
        if let Some(key) = self.state.path.pop() {
            self.state.visiting.remove(&key);
        }
    }
}
