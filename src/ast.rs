//! Dependency manifest structures.
//!
//! Each proto directory carries one manifest (by default `dep.yml`) listing
//! the build declarations defined there. The structures mirror the YAML
//! schema and are deserialised with `serde_saphyr`.
//!
//! ```rust
//! use protomake::ast::DepManifest;
//!
//! let yaml = "build:\n  - target: api\n    src: [api.proto]\n    dep: [\"common:types\"]\n";
//! let manifest: DepManifest = serde_saphyr::from_str(yaml).expect("parse");
//! assert_eq!(manifest.build[0].target, "api");
//! assert_eq!(manifest.build[0].dep, vec!["common:types".to_owned()]);
//! ```

use serde::{Deserialize, Serialize};

/// Top-level manifest structure parsed from one directory's manifest file.
///
/// ```yaml
/// build:
///   - target: bar
///     src: [a.proto, b.proto]
///     dep: ["baz:qux"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DepManifest {
    /// Build declarations in manifest order.
    #[serde(default)]
    pub build: Vec<BuildDecl>,
}

impl DepManifest {
    /// Find the declaration whose local name is `target`.
    #[must_use]
    pub fn find(&self, target: &str) -> Option<&BuildDecl> {
        self.build.iter().find(|decl| decl.target == target)
    }
}

/// One generation target within a manifest.
///
/// Sources are proto file names relative to the manifest's directory.
/// Dependencies are `directory:name` identifiers and may point at other
/// directories. Empty source lists parse successfully so the resolver can
/// report them with target context.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BuildDecl {
    /// Local target name, unique within the manifest.
    pub target: String,
    /// Proto sources compiled together for this target.
    #[serde(default)]
    pub src: Vec<String>,
    /// Targets whose generated code this target imports.
    #[serde(default)]
    pub dep: Vec<String>,
}
