//! CLI execution and build orchestration.
//!
//! This module keeps `main` minimal by providing a single entry point that
//! resolves the requested target into a Makefile and then either prints it
//! (`--dry-run`) or hands it to a `make` subprocess that writes to the user's
//! terminal directly.

mod error;
mod process;

pub use error::RunnerError;
pub use process::{
    create_temp_makefile, resolve_make_program, run_make, write_makefile, write_makefile_stdout,
    write_makefile_to,
};

/// Environment variable override for the `make` executable.
pub use make_env::MAKE_ENV;

use crate::cli::Cli;
use crate::config::GenConfig;
use crate::graph::Resolver;
use crate::manifest::FsManifestLoader;
use anyhow::{Context, Result};
use mockable::Env;
use std::borrow::Cow;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Default `make` executable to invoke.
pub const MAKE_PROGRAM: &str = "make";

/// Wrapper around generated Makefile text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakefileContent(String);

impl MakefileContent {
    /// Store the provided Makefile text.
    #[must_use]
    pub const fn new(content: String) -> Self {
        Self(content)
    }

    /// Borrow the underlying Makefile text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Execute the parsed [`Cli`], reading environment fallbacks through `env`.
///
/// # Errors
///
/// Returns an error if configuration is incomplete, resolution fails, the
/// Makefile cannot be written, or `make` fails.
pub fn run(cli: &Cli, env: &impl Env) -> Result<()> {
    let config = GenConfig::from_cli(cli, env).context("invalid configuration")?;
    debug!(?config, "resolved configuration");
    let makefile = generate_makefile(&cli.target, &config)?;

    if cli.dry_run {
        return process::write_makefile_stdout(&makefile);
    }

    // Keep the temporary file alive for the duration of the make invocation.
    let build_path: Cow<Path>;
    let _tmp_file_guard: Option<NamedTempFile>;
    if let Some(path) = &cli.emit {
        process::write_makefile(path, &makefile)?;
        build_path = Cow::Borrowed(path.as_path());
        _tmp_file_guard = None;
    } else {
        let tmp = process::create_temp_makefile(&makefile)?;
        build_path = Cow::Owned(tmp.path().to_path_buf());
        _tmp_file_guard = Some(tmp);
    }

    let program = resolve_make_program(env);
    run_make(program.as_std_path(), build_path.as_ref(), cli.jobs).with_context(|| {
        format!(
            "running {program} with build file {}",
            build_path.display()
        )
    })
}

/// Resolve `target` against the manifests under the configured proto root.
///
/// # Errors
///
/// Returns an error if any manifest cannot be loaded or the graph is invalid.
pub fn generate_makefile(target: &str, config: &GenConfig) -> Result<MakefileContent> {
    let loader = FsManifestLoader::new(config.proto_root.clone(), config.manifest_name.clone());
    let graph = Resolver::new(&loader, config)
        .resolve(target)
        .with_context(|| format!("resolving {target}"))?;
    Ok(MakefileContent::new(graph.into_script()))
}

#[cfg(test)]
mod tests;
