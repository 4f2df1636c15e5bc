//! Target identifiers of the form `directory:name`.
//!
//! An identifier names one build declaration: the directory component locates
//! the manifest under the proto root and the name selects a declaration
//! within it. Both components are joined beneath configured roots, so the
//! directory must be relative without `..` and the name a single path
//! component.
//!
//! ```rust
//! use protomake::target::TargetId;
//!
//! let id = TargetId::parse("foo/bar:api").expect("valid identifier");
//! assert_eq!(id.dir().as_str(), "foo/bar");
//! assert_eq!(id.name(), "api");
//! assert_eq!(id.to_string(), "foo/bar:api");
//! ```

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use std::fmt;

/// Separator between the directory and the local target name.
pub const DELIMITER: char = ':';

/// A validated `directory:name` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetId {
    dir: Utf8PathBuf,
    name: String,
}

impl TargetId {
    /// Split `raw` into its directory and name components.
    ///
    /// Returns `None` unless `raw` contains exactly one delimiter with a
    /// non-empty component on each side, the directory stays beneath the
    /// root it is joined to, and the name is one plain path component.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let (dir, name) = raw.split_once(DELIMITER)?;
        if name.contains(DELIMITER) || !is_nested(dir) || !is_single_component(name) {
            return None;
        }
        Some(Self {
            dir: Utf8PathBuf::from(dir),
            name: name.to_owned(),
        })
    }

    /// Directory holding the declaring manifest, relative to the proto root.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Local target name within the directory's manifest.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Non-empty, relative, and free of `..`.
fn is_nested(dir: &str) -> bool {
    let path = Utf8Path::new(dir);
    !dir.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Utf8Component::Normal(_) | Utf8Component::CurDir))
        && path
            .components()
            .any(|c| matches!(c, Utf8Component::Normal(_)))
}

fn is_single_component(name: &str) -> bool {
    let mut components = Utf8Path::new(name).components();
    matches!(components.next(), Some(Utf8Component::Normal(part)) if part == name)
        && components.next().is_none()
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{DELIMITER}{}", self.dir, self.name)
    }
}
