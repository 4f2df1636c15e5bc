//! Helpers for constructing manifest fixtures in tests.
//!
//! [`ManifestTree`] lays out a proto tree on disk, one manifest per
//! directory, while [`decl`] and [`manifest_yaml`] render manifest text
//! without hand-writing YAML in every test.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// Render one build declaration as a YAML list entry.
///
/// # Examples
///
/// ```
/// use test_support::manifest::decl;
///
/// assert_eq!(
///     decl("bar", &["a.proto"], &["baz:qux"]),
///     "  - target: \"bar\"\n    src: [\"a.proto\"]\n    dep: [\"baz:qux\"]\n"
/// );
/// ```
pub fn decl(target: &str, src: &[&str], dep: &[&str]) -> String {
    format!(
        "  - target: \"{target}\"\n    src: [{}]\n    dep: [{}]\n",
        quoted_list(src),
        quoted_list(dep)
    )
}

fn quoted_list(items: &[&str]) -> String {
    items
        .iter()
        .map(|item| format!("\"{item}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Wrap rendered declarations into a complete manifest document.
pub fn manifest_yaml(decls: &[String]) -> String {
    let mut yaml = String::from("build:\n");
    for entry in decls {
        yaml.push_str(entry);
    }
    yaml
}

/// Temporary proto tree with one manifest per directory.
#[derive(Debug)]
pub struct ManifestTree {
    _dir: TempDir,
    root: Utf8PathBuf,
    file_name: String,
}

impl ManifestTree {
    /// Create an empty tree using the default `dep.yml` manifest name.
    pub fn new() -> Result<Self> {
        Self::with_file_name("dep.yml")
    }

    /// Create an empty tree whose manifests are named `file_name`.
    pub fn with_file_name(file_name: &str) -> Result<Self> {
        let dir = TempDir::new().context("create proto tree")?;
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .map_err(|p| anyhow::anyhow!("temp dir {} is not UTF-8", p.display()))?;
        Ok(Self {
            _dir: dir,
            root,
            file_name: file_name.to_owned(),
        })
    }

    /// Root of the tree, suitable for `--proto-root`.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Write `yaml` as the manifest of `dir`.
    pub fn manifest(&self, dir: &str, yaml: &str) -> Result<&Self> {
        let rel = Utf8PathBuf::from(dir).join(&self.file_name);
        self.write(rel.as_str(), yaml)
    }

    /// Write `decls` as the manifest of `dir`.
    pub fn declare(&self, dir: &str, decls: &[String]) -> Result<&Self> {
        self.manifest(dir, &manifest_yaml(decls))
    }

    /// Write an arbitrary file below the root.
    pub fn write(&self, rel: &str, body: &str) -> Result<&Self> {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
        }
        fs::write(&path, body).with_context(|| format!("write {path}"))?;
        Ok(self)
    }
}
