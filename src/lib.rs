//! Protomake core library.
//!
//! Resolves per-directory `dep.yml` manifests of proto generation targets
//! into a single Makefile. The pipeline is:
//!
//! 1. [`cli`] and [`config`] turn flags and environment fallbacks into a
//!    [`config::GenConfig`].
//! 2. [`manifest`] loads and parses each directory's declarations ([`ast`]).
//! 3. [`graph`] walks the declarations depth first from the requested
//!    [`target`], deduplicating shared dependencies and rejecting cycles.
//! 4. [`make_gen`] renders one rule per resolved node.
//! 5. [`runner`] prints the Makefile or runs `make` against it.

pub mod ast;
pub mod cli;
pub mod config;
pub mod graph;
pub mod make_gen;
pub mod manifest;
pub mod runner;
pub mod target;
