//! Unit tests for Makefile generation from an on-disk proto tree.

use super::*;
use anyhow::{Result, ensure};
use camino::Utf8PathBuf;
use std::fs;

fn proto_tree(files: &[(&str, &str)]) -> Result<(tempfile::TempDir, GenConfig)> {
    let dir = tempfile::tempdir()?;
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
        .map_err(|p| anyhow::anyhow!("non UTF-8 temp dir {}", p.display()))?;
    for (rel, body) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, body)?;
    }
    let config = GenConfig::new(root, "/gen");
    Ok((dir, config))
}

#[test]
fn generate_makefile_reads_manifests_from_proto_root() -> Result<()> {
    let (_dir, config) = proto_tree(&[
        (
            "foo/dep.yml",
            "build:\n  - target: bar\n    src: [a.proto]\n    dep: [\"baz:qux\"]\n",
        ),
        ("baz/dep.yml", "build:\n  - target: qux\n    src: [b.proto]\n"),
    ])?;
    let makefile = generate_makefile("foo:bar", &config)?;
    let headers: Vec<&str> = makefile
        .as_str()
        .lines()
        .filter(|line| !line.starts_with('\t'))
        .collect();
    ensure!(headers == ["goal_0:", "goal: goal_0"], "got {headers:?}");
    Ok(())
}

#[test]
fn generate_makefile_honours_manifest_name() -> Result<()> {
    let (_dir, mut config) = proto_tree(&[(
        "foo/deps.yaml",
        "build:\n  - target: bar\n    src: [a.proto]\n",
    )])?;
    config.manifest_name = "deps.yaml".to_owned();
    let makefile = generate_makefile("foo:bar", &config)?;
    ensure!(makefile.as_str().starts_with("goal:\n"));
    Ok(())
}

#[test]
fn generate_makefile_adds_request_context() -> Result<()> {
    let (_dir, config) = proto_tree(&[])?;
    let err = generate_makefile("foo:bar", &config).expect_err("missing manifest");
    let chain = format!("{err:#}");
    ensure!(chain.starts_with("resolving foo:bar: failed to read '"), "got {chain}");
    ensure!(chain.contains("foo/dep.yml"), "got {chain}");
    Ok(())
}
