//! Integration tests for driving `make`.
//!
//! The fake executables from `test_support` stand in for `make`, so these
//! tests rely on a POSIX shell and run on Unix only.
#![cfg(unix)]

use anyhow::{Context, Result, ensure};
use mockable::{DefaultEnv, MockEnv};
use protomake::cli::Cli;
use protomake::runner::{self, MAKE_ENV, MAKE_PROGRAM, RunnerError};
use rstest::rstest;
use serial_test::serial;
use std::collections::HashMap;
use std::env::VarError;
use std::path::{Path, PathBuf};
use test_support::env_lock::EnvLock;
use test_support::env_var_guard::EnvVarGuard;
use test_support::manifest::decl;
use test_support::{ManifestTree, RecordingMake, fake_make};

fn env_with(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_raw()
        .returning(move |key| vars.get(key).cloned().ok_or(VarError::NotPresent));
    env
}

fn cli(tree: &ManifestTree, extra: &[&str]) -> Cli {
    let mut args = vec![
        "protomake".to_owned(),
        "--proto-root".to_owned(),
        tree.root().to_string(),
        "--gen-root".to_owned(),
        "/gen".to_owned(),
    ];
    args.extend(extra.iter().map(|arg| (*arg).to_owned()));
    args.push("foo:bar".to_owned());
    Cli::parse_from_or_panic(args)
}

fn two_node_tree() -> Result<ManifestTree> {
    let tree = ManifestTree::new()?;
    tree.declare("foo", &[decl("bar", &["a.proto"], &["baz:qux"])])?
        .declare("baz", &[decl("qux", &["q.proto"], &[])])?;
    Ok(tree)
}

fn env_for(make: &RecordingMake) -> MockEnv {
    env_with(HashMap::from([(
        MAKE_ENV,
        make.program().display().to_string(),
    )]))
}

#[rstest]
#[case(0, true)]
#[case(1, false)]
fn run_make_reports_exit_status(#[case] code: i32, #[case] succeeds: bool) -> Result<()> {
    let (_dir, program) = fake_make(code)?;
    let build_file = tempfile::NamedTempFile::new()?;
    let result = runner::run_make(&program, build_file.path(), None);
    ensure!(result.is_ok() == succeeds, "got {result:?}");
    if let Err(err) = result {
        ensure!(
            matches!(err, RunnerError::Failed { .. }),
            "expected Failed, got {err:?}"
        );
    }
    Ok(())
}

#[rstest]
fn run_make_reports_missing_program() -> Result<()> {
    let build_file = tempfile::NamedTempFile::new()?;
    let err = runner::run_make(Path::new("does-not-exist"), build_file.path(), None)
        .expect_err("spawn should fail");
    let RunnerError::Spawn { program, source } = &err else {
        anyhow::bail!("expected Spawn, got {err:?}");
    };
    ensure!(program == "does-not-exist");
    ensure!(source.kind() == std::io::ErrorKind::NotFound);
    Ok(())
}

#[rstest]
#[case(None, &[])]
#[case(Some(4), &["-j", "4"])]
fn run_make_passes_build_file_jobs_and_goal(
    #[case] jobs: Option<usize>,
    #[case] job_args: &[&str],
) -> Result<()> {
    let make = RecordingMake::new(0)?;
    let build_file = tempfile::NamedTempFile::new()?;
    runner::run_make(make.program(), build_file.path(), jobs)?;

    let mut expected = vec!["-f".to_owned(), build_file.path().display().to_string()];
    expected.extend(job_args.iter().map(|arg| (*arg).to_owned()));
    expected.push("goal".to_owned());
    ensure!(make.args()? == expected, "got {:?}", make.args()?);
    Ok(())
}

#[rstest]
fn run_hands_generated_makefile_to_make() -> Result<()> {
    let tree = two_node_tree()?;
    let make = RecordingMake::new(0)?;
    runner::run(&cli(&tree, &["-j", "2"]), &env_for(&make))?;

    let args = make.args()?;
    ensure!(args.len() == 5, "got {args:?}");
    ensure!(args.first().map(String::as_str) == Some("-f"));
    ensure!(args.get(2..) == Some(&["-j".to_owned(), "2".to_owned(), "goal".to_owned()][..]));

    let build_file = PathBuf::from(args.get(1).context("build file argument")?);
    let name = build_file
        .file_name()
        .and_then(|n| n.to_str())
        .context("build file name")?;
    ensure!(
        name.starts_with("protomake.") && name.ends_with(".mk"),
        "got {name}"
    );
    ensure!(
        !build_file.exists(),
        "temporary Makefile should be removed after make finishes"
    );

    let config = protomake::config::GenConfig::new(tree.root(), "/gen");
    let expected = runner::generate_makefile("foo:bar", &config)?;
    ensure!(make.makefile()? == expected.as_str());
    Ok(())
}

#[rstest]
fn run_keeps_emitted_makefile() -> Result<()> {
    let tree = two_node_tree()?;
    let make = RecordingMake::new(0)?;
    let out = tempfile::tempdir()?;
    let emit = out.path().join("nested").join("protos.mk");
    let emit_arg = emit.display().to_string();
    runner::run(&cli(&tree, &["--emit", &emit_arg]), &env_for(&make))?;

    ensure!(emit.exists(), "emitted Makefile should be kept");
    ensure!(make.args()? == ["-f", emit_arg.as_str(), "goal"]);
    ensure!(std::fs::read_to_string(&emit)? == make.makefile()?);
    Ok(())
}

#[rstest]
fn dry_run_does_not_invoke_make() -> Result<()> {
    let tree = two_node_tree()?;
    let make = RecordingMake::new(0)?;
    runner::run(&cli(&tree, &["--dry-run"]), &env_for(&make))?;
    ensure!(!make.was_invoked(), "dry run must not start make");
    Ok(())
}

#[rstest]
fn resolution_failure_does_not_invoke_make() -> Result<()> {
    let tree = ManifestTree::new()?;
    tree.declare("foo", &[decl("bar", &["a.proto"], &["foo:bar"])])?;
    let make = RecordingMake::new(0)?;
    let err = runner::run(&cli(&tree, &[]), &env_for(&make)).expect_err("cycle");
    let chain = format!("{err:#}");
    ensure!(
        chain.contains("circular dependency: foo:bar -> foo:bar"),
        "got {chain}"
    );
    ensure!(!make.was_invoked());
    Ok(())
}

#[rstest]
fn make_failure_names_program_and_build_file() -> Result<()> {
    let tree = two_node_tree()?;
    let make = RecordingMake::new(2)?;
    let err = runner::run(&cli(&tree, &[]), &env_for(&make)).expect_err("make fails");
    let chain = format!("{err:#}");
    let program = make.program().display().to_string();
    ensure!(
        chain.starts_with(&format!("running {program} with build file ")),
        "got {chain}"
    );
    ensure!(chain.contains("exited with"), "got {chain}");
    Ok(())
}

#[rstest]
#[serial]
fn make_program_override_is_read_from_process_environment() {
    let _lock = EnvLock::acquire();
    {
        let _guard = EnvVarGuard::set(MAKE_ENV, "/opt/bin/gmake");
        assert_eq!(
            runner::resolve_make_program(&DefaultEnv::new()).as_str(),
            "/opt/bin/gmake"
        );
    }
    let _guard = EnvVarGuard::remove(MAKE_ENV);
    assert_eq!(
        runner::resolve_make_program(&DefaultEnv::new()).as_str(),
        MAKE_PROGRAM
    );
}

#[rstest]
#[case(1)]
#[case(2)]
fn make_writes_to_the_callers_streams(#[case] fd: u8) -> Result<()> {
    // Without procfs there is nothing to compare.
    let Ok(ours) = std::fs::read_link(format!("/proc/self/fd/{fd}")) else {
        return Ok(());
    };
    let make = RecordingMake::new(0)?;
    let build_file = tempfile::NamedTempFile::new()?;
    runner::run_make(make.program(), build_file.path(), None)?;
    let Some(theirs) = make.stream_target(fd)? else {
        return Ok(());
    };
    ensure!(
        theirs == ours.display().to_string(),
        "make fd {fd} leads to {theirs}, ours to {}",
        ours.display()
    );
    Ok(())
}
