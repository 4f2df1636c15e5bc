//! File creation helpers for the make runner.
//! Handles temporary Makefiles, emitted Makefiles and dry-run output.

use crate::runner::MakefileContent;
use anyhow::{Context, Result as AnyResult};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::{Builder, NamedTempFile};
use tracing::info;

/// Write `content` to a fresh `protomake.*.mk` file that is removed when the
/// returned handle drops.
///
/// # Errors
///
/// Returns an error if the file cannot be created, written or synced.
pub fn create_temp_makefile(content: &MakefileContent) -> AnyResult<NamedTempFile> {
    let mut tmp = Builder::new()
        .prefix("protomake.")
        .suffix(".mk")
        .tempfile()
        .context("create temporary Makefile")?;
    {
        let handle = tmp.as_file_mut();
        handle
            .write_all(content.as_str().as_bytes())
            .context("write temporary Makefile")?;
        handle.flush().context("flush temporary Makefile")?;
        handle.sync_all().context("sync temporary Makefile")?;
    }
    info!("Wrote temporary Makefile to {}", tmp.path().display());
    Ok(tmp)
}

/// Write `content` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if a directory or the file cannot be written.
pub fn write_makefile(path: &Path, content: &MakefileContent) -> AnyResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create parent directory {}", parent.display()))?;
    }
    fs::write(path, content.as_str())
        .with_context(|| format!("failed to write Makefile to {}", path.display()))?;
    info!("Wrote Makefile to {}", path.display());
    Ok(())
}

fn is_broken_pipe(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::BrokenPipe
}

fn write_all_ignoring_broken_pipe(writer: &mut impl Write, buf: &[u8]) -> io::Result<()> {
    match writer.write_all(buf) {
        Err(err) if is_broken_pipe(&err) => Ok(()),
        other => other,
    }
}

fn flush_ignoring_broken_pipe(writer: &mut impl Write) -> io::Result<()> {
    match writer.flush() {
        Err(err) if is_broken_pipe(&err) => Ok(()),
        other => other,
    }
}

/// Write `content` to `writer`, treating a closed reader as success.
///
/// # Errors
///
/// Returns an error for any write failure other than a broken pipe.
pub fn write_makefile_to(writer: &mut impl Write, content: &MakefileContent) -> AnyResult<()> {
    write_all_ignoring_broken_pipe(writer, content.as_str().as_bytes())
        .context("write Makefile to stdout")?;
    flush_ignoring_broken_pipe(writer).context("flush stdout")?;
    Ok(())
}

/// Print `content` on standard output.
///
/// # Errors
///
/// Returns an error for any write failure other than a broken pipe.
pub fn write_makefile_stdout(content: &MakefileContent) -> AnyResult<()> {
    let mut stdout = io::stdout().lock();
    write_makefile_to(&mut stdout, content)
}
