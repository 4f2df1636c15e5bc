//! Command line interface definition using clap.
//!
//! The tool takes a single `path:target` request plus options selecting
//! inspection mode and overriding where protos live and where generated code
//! lands. Options left unset fall back to environment variables when the
//! [`GenConfig`](crate::config::GenConfig) is built.

use clap::Parser;
use std::path::PathBuf;

use crate::manifest::DEFAULT_MANIFEST_NAME;

/// Maximum number of jobs accepted by the CLI.
const MAX_JOBS: usize = 64;

fn parse_jobs(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("{s} is not a valid number"))?;
    if (1..=MAX_JOBS).contains(&value) {
        Ok(value)
    } else {
        Err(format!("jobs must be between 1 and {MAX_JOBS}"))
    }
}

/// Resolve proto build manifests into a Makefile and run it with `make`.
#[derive(Debug, Parser, Clone, PartialEq, Eq)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Target to build, in the form `path:target`.
    #[arg(value_name = "PATH:TARGET")]
    pub target: String,

    /// Print the generated Makefile instead of running make.
    #[arg(long)]
    pub dry_run: bool,

    /// Write the generated Makefile to this path and keep it.
    #[arg(long, value_name = "FILE")]
    pub emit: Option<PathBuf>,

    /// Root of the proto tree. Defaults to `$PROTOROOT`.
    #[arg(long, value_name = "DIR")]
    pub proto_root: Option<PathBuf>,

    /// Root directory for generated code. Defaults to `$GOPATH/src/gen/pb`.
    #[arg(long, value_name = "DIR")]
    pub gen_root: Option<PathBuf>,

    /// Import path prefix used when mapping protos to generated packages.
    #[arg(long, value_name = "PATH", default_value = "gen/pb")]
    pub import_prefix: String,

    /// Manifest file name looked up in each directory.
    #[arg(long, value_name = "NAME", default_value = DEFAULT_MANIFEST_NAME)]
    pub manifest_name: String,

    /// Proto compiler invoked by each generated rule.
    #[arg(long, value_name = "PROGRAM", default_value = "protoc")]
    pub protoc: String,

    /// Output plugin; rules pass `--<NAME>_out` to the compiler.
    #[arg(long, value_name = "NAME", default_value = "go")]
    pub plugin: String,

    /// Set the number of parallel make jobs.
    #[arg(short, long, value_name = "N", value_parser = parse_jobs)]
    pub jobs: Option<usize>,

    /// Enable verbose logging output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse the provided arguments.
    ///
    /// # Panics
    ///
    /// Panics if argument parsing fails.
    #[must_use]
    pub fn parse_from_or_panic<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args).unwrap_or_else(|e| panic!("CLI parsing failed: {e}"))
    }
}
