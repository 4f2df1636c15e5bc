//! Fake `make` executables for runner and binary tests.
//!
//! The scripts are POSIX shell, so these helpers are only meaningful on Unix.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Make a script file executable on Unix platforms.
#[cfg(unix)]
fn make_script_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path)
        .with_context(|| format!("read metadata {}", path.display()))?
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)
        .with_context(|| format!("set permissions {}", path.display()))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_script_executable(_path: &Path) -> Result<()> {
    Ok(())
}

fn write_script(dir: &Path, body: &str) -> Result<PathBuf> {
    let path = dir.join("make");
    let mut file =
        File::create(&path).with_context(|| format!("create script {}", path.display()))?;
    write!(file, "#!/bin/sh\n{body}")
        .with_context(|| format!("write script {}", path.display()))?;
    drop(file);
    make_script_executable(&path)?;
    Ok(path)
}

/// Create a fake `make` that prints one line to each stream and exits with
/// `exit_code`.
///
/// Returns the temporary directory and the path to the executable.
pub fn fake_make(exit_code: i32) -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new().context("fake_make: create temp dir")?;
    let path = write_script(
        dir.path(),
        &format!(
            "echo 'fake make stdout'\necho 'fake make stderr' >&2\nexit {exit_code}\n"
        ),
    )?;
    Ok((dir, path))
}

/// Fake `make` that records its arguments, a copy of the file passed via
/// `-f`, and where its standard output and error streams lead.
#[derive(Debug)]
pub struct RecordingMake {
    dir: TempDir,
    program: PathBuf,
}

impl RecordingMake {
    /// Create a recorder that exits with `exit_code`.
    pub fn new(exit_code: i32) -> Result<Self> {
        let dir = TempDir::new().context("RecordingMake: create temp dir")?;
        let record_dir = dir.path().display().to_string();
        let body = format!(
            concat!(
                "printf '%s\\n' \"$@\" > '{record}/args'\n",
                "readlink /proc/$$/fd/1 > '{record}/fd1' 2>/dev/null\n",
                "readlink /proc/$$/fd/2 > '{record}/fd2' 2>/dev/null\n",
                "prev=''\n",
                "for arg in \"$@\"; do\n",
                "  if [ \"$prev\" = '-f' ]; then\n",
                "    cp \"$arg\" '{record}/makefile' || exit 97\n",
                "  fi\n",
                "  prev=\"$arg\"\n",
                "done\n",
                "exit {code}\n",
            ),
            record = record_dir,
            code = exit_code,
        );
        let program = write_script(dir.path(), &body)?;
        Ok(Self { dir, program })
    }

    /// Path of the fake executable.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments of the last invocation, one per element.
    pub fn args(&self) -> Result<Vec<String>> {
        let path = self.dir.path().join("args");
        let text =
            fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        Ok(text.lines().map(ToOwned::to_owned).collect())
    }

    /// Content of the Makefile passed via `-f` in the last invocation.
    pub fn makefile(&self) -> Result<String> {
        let path = self.dir.path().join("makefile");
        fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))
    }

    /// Link target of descriptor `fd` (1 or 2) as seen by the last
    /// invocation, or `None` where `/proc` is unavailable.
    pub fn stream_target(&self, fd: u8) -> Result<Option<String>> {
        let path = self.dir.path().join(format!("fd{fd}"));
        let text =
            fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        let target = text.trim_end();
        Ok((!target.is_empty()).then(|| target.to_owned()))
    }

    /// Whether the fake was invoked at all.
    pub fn was_invoked(&self) -> bool {
        self.dir.path().join("args").exists()
    }
}
