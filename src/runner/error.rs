//! Error types for the runner module.
//!
//! This submodule isolates derive-macro-affected code to scope lint
//! suppressions narrowly.

// Scoped suppression for version-dependent lint false positives from
// miette/thiserror derive macros. The unused_assignments lint fires in some
// Rust versions but not others, so `#[expect]` cannot be used here.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use miette::Diagnostic;
use std::io;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors raised while driving the `make` subprocess.
#[derive(Debug, Error, Diagnostic)]
pub enum RunnerError {
    /// The executable could not be started.
    #[error("failed to start '{program}'")]
    #[diagnostic(
        code(protomake::runner::spawn),
        help("install make or point PROTOMAKE_MAKE at a compatible executable")
    )]
    Spawn {
        /// Program that was invoked.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Waiting for the child to finish failed.
    #[error("failed waiting for '{program}'")]
    #[diagnostic(code(protomake::runner::wait))]
    Wait {
        /// Program that was invoked.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The executable finished with a non-zero status.
    #[error("'{program}' exited with {status}")]
    #[diagnostic(code(protomake::runner::exit_status))]
    Failed {
        /// Program that was invoked.
        program: String,
        /// Exit status reported by the child.
        status: ExitStatus,
    },
}
