//! Manifest loading helpers.
//!
//! Every directory in the proto tree carries a manifest naming the build
//! declarations defined there. The resolver reaches manifests through the
//! [`ManifestLoader`] trait so the graph walk can run against the filesystem
//! ([`FsManifestLoader`]) or an in-memory fixture.
//!
//! Manifests are read fresh on every call; nothing is cached between runs.

use crate::ast::DepManifest;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tracing::debug;

mod diagnostics;
mod hints;

pub use diagnostics::{ManifestError, ManifestName, ManifestSource, map_yaml_error};

/// Default manifest file name looked up in each directory.
pub const DEFAULT_MANIFEST_NAME: &str = "dep.yml";

/// Source of per-directory manifests.
pub trait ManifestLoader {
    /// Location of the manifest for `dir`, used in diagnostics and as the
    /// causing manifest of dependency errors.
    fn manifest_path(&self, dir: &Utf8Path) -> Utf8PathBuf;

    /// Load and parse the manifest for `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Read`] when the manifest cannot be read and
    /// [`ManifestError::Parse`] when its content is malformed.
    fn load(&self, dir: &Utf8Path) -> Result<DepManifest, ManifestError>;
}

/// Loads manifests from `<root>/<dir>/<file_name>` on disk.
#[derive(Debug, Clone)]
pub struct FsManifestLoader {
    root: Utf8PathBuf,
    file_name: String,
}

impl FsManifestLoader {
    /// Create a loader rooted at the proto tree `root`.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            file_name: file_name.into(),
        }
    }
}

impl ManifestLoader for FsManifestLoader {
    fn manifest_path(&self, dir: &Utf8Path) -> Utf8PathBuf {
        self.root.join(dir).join(&self.file_name)
    }

    fn load(&self, dir: &Utf8Path) -> Result<DepManifest, ManifestError> {
        let path = self.manifest_path(dir);
        debug!(manifest = %path, "loading manifest");
        let data = fs::read_to_string(&path).map_err(|source| ManifestError::Read {
            path: path.clone(),
            source,
        })?;
        from_str_named(&data, &path)
    }
}

/// Parse manifest text, labelling diagnostics with `path`.
///
/// # Errors
///
/// Returns [`ManifestError::Parse`] if the YAML is malformed or does not match
/// the manifest schema.
pub fn from_str_named(yaml: &str, path: &Utf8Path) -> Result<DepManifest, ManifestError> {
    let manifest: DepManifest =
        serde_saphyr::from_str(yaml).map_err(|e| ManifestError::Parse {
            path: path.to_owned(),
            source: map_yaml_error(
                e,
                &ManifestSource::from(yaml),
                &ManifestName::new(path.as_str()),
            ),
        })?;
    if tracing::enabled!(tracing::Level::DEBUG) {
        match serde_json::to_string(&manifest) {
            Ok(json) => debug!(manifest = %path, "parsed {json}"),
            Err(err) => debug!(manifest = %path, "could not serialise manifest: {err}"),
        }
    }
    Ok(manifest)
}

/// Parse manifest text labelled with the default manifest name.
///
/// # Errors
///
/// Returns [`ManifestError::Parse`] if the YAML is malformed.
pub fn from_str(yaml: &str) -> Result<DepManifest, ManifestError> {
    from_str_named(yaml, Utf8Path::new(DEFAULT_MANIFEST_NAME))
}
