//! Generation settings handed to the resolver.
//!
//! [`GenConfig`] is built once from the parsed [`Cli`] and an injected
//! environment, so nothing below the binary reads process environment
//! variables directly.

// Scoped suppression for version-dependent lint false positives from
// miette/thiserror derive macros.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use crate::cli::Cli;
use crate::manifest::DEFAULT_MANIFEST_NAME;
use crate::target::TargetId;
use camino::{Utf8Path, Utf8PathBuf};
use make_env::{GOPATH_ENV, PROTO_ROOT_ENV};
use miette::Diagnostic;
use mockable::Env;
use std::path::Path;
use thiserror::Error;

/// Errors raised while assembling [`GenConfig`].
#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum ConfigError {
    /// Neither `--proto-root` nor `PROTOROOT` was provided.
    #[error("proto root not set; pass --proto-root or set {PROTO_ROOT_ENV}")]
    #[diagnostic(code(protomake::config::proto_root))]
    MissingProtoRoot,

    /// Neither `--gen-root` nor `GOPATH` was provided.
    #[error("generation root not set; pass --gen-root or set {GOPATH_ENV}")]
    #[diagnostic(code(protomake::config::gen_root))]
    MissingGenRoot,

    /// A configured path is not valid UTF-8.
    #[error("{what} path {path} is not valid UTF-8")]
    #[diagnostic(code(protomake::config::utf8))]
    NonUtf8Path {
        /// Which setting carried the path.
        what: &'static str,
        /// Lossy rendering of the offending path.
        path: String,
    },
}

/// Paths and programs used when synthesizing generation rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenConfig {
    /// Root of the proto tree; target directories are relative to it.
    pub proto_root: Utf8PathBuf,
    /// Root under which each node's generated code lands.
    pub gen_root: Utf8PathBuf,
    /// Import path prefix for generated packages in output mappings.
    pub import_prefix: Utf8PathBuf,
    /// Manifest file name looked up in each directory.
    pub manifest_name: String,
    /// Proto compiler program.
    pub protoc: String,
    /// Output plugin name, emitted as `--<plugin>_out`.
    pub plugin: String,
}

impl GenConfig {
    /// Settings with the stock compiler, plugin and import prefix.
    #[must_use]
    pub fn new(proto_root: impl Into<Utf8PathBuf>, gen_root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            proto_root: proto_root.into(),
            gen_root: gen_root.into(),
            import_prefix: Utf8PathBuf::from("gen/pb"),
            manifest_name: DEFAULT_MANIFEST_NAME.to_owned(),
            protoc: "protoc".to_owned(),
            plugin: "go".to_owned(),
        }
    }

    /// Build settings from CLI flags, falling back to `PROTOROOT` and
    /// `GOPATH` read through `env`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a root is neither passed nor present in
    /// the environment, or a path is not valid UTF-8.
    pub fn from_cli(cli: &Cli, env: &impl Env) -> Result<Self, ConfigError> {
        let proto_root = match &cli.proto_root {
            Some(path) => utf8("proto root", path)?,
            None => env
                .raw(PROTO_ROOT_ENV)
                .ok()
                .filter(|v| !v.is_empty())
                .map(Utf8PathBuf::from)
                .ok_or(ConfigError::MissingProtoRoot)?,
        };
        let gen_root = match &cli.gen_root {
            Some(path) => utf8("generation root", path)?,
            None => env
                .raw(GOPATH_ENV)
                .ok()
                .filter(|v| !v.is_empty())
                .map(|gopath| Utf8PathBuf::from(gopath).join("src").join(&cli.import_prefix))
                .ok_or(ConfigError::MissingGenRoot)?,
        };
        Ok(Self {
            proto_root,
            gen_root,
            import_prefix: Utf8PathBuf::from(&cli.import_prefix),
            manifest_name: cli.manifest_name.clone(),
            protoc: cli.protoc.clone(),
            plugin: cli.plugin.clone(),
        })
    }

    /// Directory holding `id`'s sources; generation commands run here.
    #[must_use]
    pub fn source_dir(&self, id: &TargetId) -> Utf8PathBuf {
        self.proto_root.join(id.dir())
    }

    /// Directory receiving `id`'s generated code.
    #[must_use]
    pub fn gen_dir(&self, id: &TargetId) -> Utf8PathBuf {
        self.gen_root.join(id.dir()).join(id.name())
    }

    /// Import path of `id`'s generated package.
    #[must_use]
    pub fn import_path(&self, id: &TargetId) -> Utf8PathBuf {
        self.import_prefix.join(id.dir()).join(id.name())
    }

    /// Proto root as used in `--proto_path`.
    #[must_use]
    pub fn proto_root(&self) -> &Utf8Path {
        &self.proto_root
    }
}

fn utf8(what: &'static str, path: &Path) -> Result<Utf8PathBuf, ConfigError> {
    Utf8PathBuf::from_path_buf(path.to_path_buf()).map_err(|p| ConfigError::NonUtf8Path {
        what,
        path: p.display().to_string(),
    })
}
