//! Process helpers for the Makefile lifecycle and the `make` subprocess.
//! Internal to `runner`; the public API is re-exported from there.

use super::{MAKE_PROGRAM, RunnerError};
use crate::graph::GOAL;
use camino::Utf8PathBuf;
use make_env::MAKE_ENV;
use mockable::Env;
use std::{
    path::Path,
    process::{Command, ExitStatus, Stdio},
};
use tracing::info;

mod file_io;

pub use file_io::*;

fn resolve_make_program_with<F>(mut read_env: F) -> Utf8PathBuf
where
    F: FnMut(&str) -> Option<String>,
{
    read_env(MAKE_ENV)
        .filter(|value| !value.is_empty())
        .map_or_else(|| Utf8PathBuf::from(MAKE_PROGRAM), Utf8PathBuf::from)
}

/// Determine which `make` executable to invoke, honouring `PROTOMAKE_MAKE`.
#[must_use]
pub fn resolve_make_program(env: &impl Env) -> Utf8PathBuf {
    resolve_make_program_with(|key| env.raw(key).ok())
}

fn configure_make_command(cmd: &mut Command, build_file: &Path, jobs: Option<usize>) {
    cmd.arg("-f").arg(build_file);
    if let Some(count) = jobs {
        cmd.arg("-j").arg(count.to_string());
    }
    cmd.arg(GOAL);
    cmd.stdout(Stdio::inherit());
    cmd.stderr(Stdio::inherit());
}

fn log_command_execution(cmd: &Command) {
    let args: Vec<String> = cmd
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    info!(
        "Running command: {} {}",
        Path::new(cmd.get_program()).display(),
        args.join(" ")
    );
}

/// Run `make -f <build_file> [-j N] goal` with the caller's standard output
/// and error.
///
/// # Errors
///
/// Returns [`RunnerError`] when the program cannot be started or waited on,
/// or exits with a non-zero status.
pub fn run_make(program: &Path, build_file: &Path, jobs: Option<usize>) -> Result<(), RunnerError> {
    let program_name = program.display().to_string();
    let mut cmd = Command::new(program);
    configure_make_command(&mut cmd, build_file, jobs);
    log_command_execution(&cmd);
    let mut child = cmd.spawn().map_err(|source| RunnerError::Spawn {
        program: program_name.clone(),
        source,
    })?;
    let status = child.wait().map_err(|source| RunnerError::Wait {
        program: program_name.clone(),
        source,
    })?;
    check_exit_status(&program_name, status)
}

fn check_exit_status(program: &str, status: ExitStatus) -> Result<(), RunnerError> {
    if status.success() {
        Ok(())
    } else {
        Err(RunnerError::Failed {
            program: program.to_owned(),
            status,
        })
    }
}
