//! Error types for graph resolution.

// Scoped suppression for version-dependent lint false positives from
// miette/thiserror derive macros. The unused_assignments lint fires in some
// Rust versions but not others, so `#[expect]` cannot be used here.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use crate::manifest::ManifestError;
use camino::Utf8PathBuf;
use miette::Diagnostic;
use std::fmt;
use thiserror::Error;

/// Errors raised while walking the dependency graph.
///
/// Every variant is fatal: resolution stops at the first failure.
#[derive(Debug, Error, Diagnostic)]
pub enum ResolveError {
    /// The identifier does not split into a non-empty `path:target` pair.
    #[error(
        "{}invalid target '{target}', must be in the form of 'path:target'",
        referenced_from(.manifest.as_ref())
    )]
    #[diagnostic(code(protomake::resolve::invalid_target))]
    InvalidTarget {
        /// The offending identifier.
        target: String,
        /// Manifest that listed the identifier as a dependency, if any.
        manifest: Option<Utf8PathBuf>,
    },

    /// The directory's manifest could not be read or parsed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Manifest(#[from] ManifestError),

    /// No declaration in the manifest carries the requested name.
    #[error("cannot find target '{target}' in '{manifest}'")]
    #[diagnostic(code(protomake::resolve::target_not_found))]
    TargetNotFound {
        /// Local target name that was requested.
        target: String,
        /// Manifest that was searched.
        manifest: Utf8PathBuf,
    },

    /// The declaration lists no sources.
    #[error("{target} must have at least one src")]
    #[diagnostic(code(protomake::resolve::empty_sources))]
    EmptySources {
        /// Full identifier of the declaration.
        target: String,
    },

    /// A dependency leads back to a target still being resolved.
    #[error("circular dependency: {trace}")]
    #[diagnostic(
        code(protomake::resolve::cycle),
        help("break the cycle by moving shared messages into a separate target")
    )]
    Cycle {
        /// The current path followed by the repeated identifier, joined with
        /// ` -> `.
        trace: String,
    },

    /// Appending rule text to the script buffer failed.
    #[error("failed to append rule text")]
    #[diagnostic(code(protomake::resolve::buffer_write))]
    BufferWrite(#[source] fmt::Error),
}

fn referenced_from(manifest: Option<&Utf8PathBuf>) -> String {
    manifest.map(|path| format!("{path}: ")).unwrap_or_default()
}
