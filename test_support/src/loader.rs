//! In-memory manifest loader that counts loads per directory.

use camino::{Utf8Path, Utf8PathBuf};
use protomake::ast::DepManifest;
use protomake::manifest::{self, ManifestError, ManifestLoader};
use std::collections::HashMap;
use std::io;
use std::sync::Mutex;

/// Serves manifests from memory, labelled as if they lived under `proto/`.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    manifests: HashMap<Utf8PathBuf, String>,
    loads: Mutex<HashMap<Utf8PathBuf, usize>>,
}

impl MemoryLoader {
    /// Create a loader with no manifests.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `yaml` as the manifest of `dir`.
    #[must_use]
    pub fn with(mut self, dir: &str, yaml: impl Into<String>) -> Self {
        self.manifests.insert(Utf8PathBuf::from(dir), yaml.into());
        self
    }

    /// Number of times the manifest of `dir` has been loaded.
    pub fn loads(&self, dir: &str) -> usize {
        self.loads
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(Utf8Path::new(dir))
            .copied()
            .unwrap_or_default()
    }
}

impl ManifestLoader for MemoryLoader {
    fn manifest_path(&self, dir: &Utf8Path) -> Utf8PathBuf {
        Utf8PathBuf::from("proto").join(dir).join("dep.yml")
    }

    fn load(&self, dir: &Utf8Path) -> Result<DepManifest, ManifestError> {
        *self
            .loads
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entry(dir.to_owned())
            .or_default() += 1;
        let path = self.manifest_path(dir);
        let Some(yaml) = self.manifests.get(dir) else {
            return Err(ManifestError::Read {
                path,
                source: io::Error::from(io::ErrorKind::NotFound),
            });
        };
        manifest::from_str_named(yaml, &path)
    }
}
