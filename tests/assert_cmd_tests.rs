//! End-to-end tests of the `protomake` binary using `assert_cmd`.
//!
//! Each test lays out a proto tree in a temporary directory and points the
//! binary at it through `PROTOROOT`, with `PROTOMAKE_MAKE` naming a fake
//! `make` where a run would otherwise start the real one.
#![cfg(unix)]

use anyhow::{Context, Result, ensure};
use assert_cmd::Command;
use predicates::prelude::*;
use test_support::makefile::{rule_headers, unquote_recipes};
use test_support::manifest::decl;
use test_support::{ManifestTree, fake_make};

fn protomake(tree: &ManifestTree) -> Result<Command> {
    let mut cmd = Command::cargo_bin("protomake").context("locate protomake binary")?;
    cmd.env("PROTOROOT", tree.root().as_str())
        .env("GOPATH", "/go")
        .env_remove("PROTOMAKE_MAKE");
    Ok(cmd)
}

fn service_tree() -> Result<ManifestTree> {
    let tree = ManifestTree::new()?;
    tree.declare(
        "svc",
        &[decl("api", &["api.proto"], &["common:types"])],
    )?
    .declare("common", &[decl("types", &["types.proto"], &[])])?;
    Ok(tree)
}

#[test]
fn dry_run_prints_makefile_without_running_make() -> Result<()> {
    let tree = service_tree()?;
    let output = protomake(&tree)?
        .env("PROTOMAKE_MAKE", "/nonexistent/make")
        .args(["--dry-run", "svc:api"])
        .output()
        .context("run protomake --dry-run")?;
    ensure!(output.status.success(), "dry run should succeed");

    let stdout = String::from_utf8(output.stdout).context("stdout utf8")?;
    ensure!(rule_headers(&stdout) == ["goal_0:", "goal: goal_0"], "got {stdout}");
    let text = unquote_recipes(&stdout)?;
    ensure!(
        text.contains("mkdir -p /go/src/gen/pb/svc/api && protoc"),
        "got {text}"
    );
    ensure!(
        text.contains("--go_out=Mcommon/types.proto=gen/pb/common/types:/go/src/gen/pb/svc/api api.proto"),
        "got {text}"
    );
    Ok(())
}

#[test]
fn build_runs_make_and_forwards_its_output() -> Result<()> {
    let tree = service_tree()?;
    let (_dir, make) = fake_make(0)?;
    protomake(&tree)?
        .env("PROTOMAKE_MAKE", &make)
        .arg("svc:api")
        .assert()
        .success()
        .stdout(predicate::str::contains("fake make stdout"))
        .stderr(predicate::str::contains("fake make stderr"));
    Ok(())
}

#[test]
fn failing_make_fails_the_run() -> Result<()> {
    let tree = service_tree()?;
    let (_dir, make) = fake_make(1)?;
    protomake(&tree)?
        .env("PROTOMAKE_MAKE", &make)
        .arg("svc:api")
        .assert()
        .failure()
        .stderr(predicate::str::contains("exited with"));
    Ok(())
}

#[test]
fn cycle_is_reported_on_stderr() -> Result<()> {
    let tree = ManifestTree::new()?;
    tree.declare("a", &[decl("x", &["x.proto"], &["b:y"])])?
        .declare("b", &[decl("y", &["y.proto"], &["a:x"])])?;
    protomake(&tree)?
        .arg("a:x")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("circular dependency: a:x -> b:y -> a:x"));
    Ok(())
}

#[test]
fn unknown_target_names_manifest() -> Result<()> {
    let tree = service_tree()?;
    protomake(&tree)?
        .arg("svc:missing")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot find target 'missing'"));
    Ok(())
}

#[test]
fn malformed_request_is_rejected() -> Result<()> {
    let tree = service_tree()?;
    protomake(&tree)?
        .arg("badtarget")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "invalid target 'badtarget', must be in the form of 'path:target'",
        ));
    Ok(())
}

#[test]
fn missing_proto_root_is_a_configuration_error() -> Result<()> {
    let tree = service_tree()?;
    protomake(&tree)?
        .env_remove("PROTOROOT")
        .arg("svc:api")
        .assert()
        .failure()
        .stderr(predicate::str::contains("proto root not set"));
    Ok(())
}

#[test]
fn proto_root_flag_overrides_environment() -> Result<()> {
    let tree = service_tree()?;
    protomake(&tree)?
        .env("PROTOROOT", "/nonexistent")
        .args(["--proto-root", tree.root().as_str(), "--dry-run", "common:types"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("goal:\n\t"));
    Ok(())
}

#[test]
fn missing_target_argument_is_a_usage_error() -> Result<()> {
    let tree = service_tree()?;
    protomake(&tree)?
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
    Ok(())
}
