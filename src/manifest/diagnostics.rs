//! Translates manifest loading failures into actionable diagnostics.
//!
//! [`ManifestSource`] retains the YAML content and [`ManifestName`] labels its
//! origin. [`map_yaml_error`] converts `serde_saphyr` failures into
//! [`miette`] diagnostics with a source span, a hint for common mistakes and a
//! stable diagnostic code.

// Module-level suppression for version-dependent lint false positives from
// miette/thiserror derive macros. The unused_assignments lint fires in some
// Rust versions but not others, so `#[expect]` cannot be used here.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use super::hints::YAML_HINTS;
use camino::Utf8PathBuf;
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde_saphyr::{Error as YamlError, Location};
use std::{fmt, io};
use thiserror::Error;

/// YAML source content for a manifest.
///
/// # Examples
/// ```rust
/// use protomake::manifest::ManifestSource;
/// let source = ManifestSource::from("build: []");
/// assert_eq!(source.as_str(), "build: []");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestSource(String);

impl ManifestSource {
    /// Wrap the manifest text.
    #[must_use]
    pub fn new(src: impl Into<String>) -> Self {
        Self(src.into())
    }

    /// View the stored source contents.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for ManifestSource {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for ManifestSource {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Display name for a manifest used in diagnostics, usually its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestName(String);

impl ManifestName {
    /// Wrap a manifest label.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// View the label.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for ManifestName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for ManifestName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ManifestName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error raised when a directory's manifest cannot be loaded.
///
/// # Examples
/// ```rust
/// use camino::Utf8PathBuf;
/// use protomake::manifest::ManifestError;
/// use std::io;
///
/// let err = ManifestError::Read {
///     path: Utf8PathBuf::from("root/foo/dep.yml"),
///     source: io::Error::from(io::ErrorKind::NotFound),
/// };
/// assert_eq!(err.to_string(), "failed to read 'root/foo/dep.yml'");
/// ```
#[derive(Debug, Error, Diagnostic)]
pub enum ManifestError {
    /// The manifest file is missing or unreadable.
    #[error("failed to read '{path}'")]
    #[diagnostic(
        code(protomake::manifest::read),
        help("each directory referenced by a target needs a manifest file")
    )]
    Read {
        /// Manifest location that was attempted.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The manifest content is not a valid declaration list.
    #[error("failed to parse '{path}'")]
    #[diagnostic(code(protomake::manifest::parse))]
    Parse {
        /// Manifest location that failed to parse.
        path: Utf8PathBuf,
        /// Diagnostic describing the parse failure.
        #[source]
        #[diagnostic_source]
        source: Box<dyn Diagnostic + Send + Sync + 'static>,
    },
}

#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(protomake::yaml::parse))]
struct YamlDiagnostic {
    #[source_code]
    src: NamedSource<String>,
    #[label("parse error here")]
    span: Option<SourceSpan>,
    #[help]
    help: Option<String>,
    #[source]
    source: YamlError,
    message: String,
}

/// Reconstruct the byte offset for a one-based line and column.
///
/// Offsets past the end of a line clamp to the line end; both `\n` and
/// `\r\n` line endings are accepted.
fn byte_index_components(src: &str, line: u64, column: u64) -> usize {
    let target_line = usize::try_from(line.saturating_sub(1)).unwrap_or(usize::MAX);
    let target_column = usize::try_from(column.saturating_sub(1)).unwrap_or(usize::MAX);
    let mut offset = 0usize;
    for (idx, segment) in src.split_inclusive('\n').enumerate() {
        if idx == target_line {
            let without_newline = segment.strip_suffix('\n').unwrap_or(segment);
            let cleaned_line = without_newline
                .strip_suffix('\r')
                .unwrap_or(without_newline);
            let column_offset = cleaned_line
                .char_indices()
                .nth(target_column)
                .map_or(cleaned_line.len(), |(byte_idx, _)| byte_idx);
            return offset + column_offset;
        }
        offset += segment.len();
    }
    src.len()
}

fn to_span(src: &ManifestSource, loc: Location) -> SourceSpan {
    let at = byte_index_components(src.as_ref(), loc.line(), loc.column());
    let bytes = src.as_ref().as_bytes();
    let is_line_break = |b: u8| b == b'\n' || b == b'\r';
    let (start, end) = match bytes.get(at) {
        Some(&b) if !is_line_break(b) => (at, at + 1),
        _ => {
            let start = if at > 0 && bytes.get(at - 1).is_some_and(|p| !is_line_break(*p)) {
                at - 1
            } else {
                at
            };
            (start, at)
        }
    };
    SourceSpan::new(start.into(), end.saturating_sub(start))
}

fn has_tab_indent(src: &ManifestSource, location: Option<Location>) -> bool {
    let Some(loc) = location else {
        return false;
    };
    let line_idx = usize::try_from(loc.line().saturating_sub(1)).unwrap_or(usize::MAX);
    let line = src.as_ref().lines().nth(line_idx).unwrap_or("");
    line.chars()
        .take_while(|c| c.is_whitespace())
        .any(|c| c == '\t')
}

fn hint_for(err_str: &str, src: &ManifestSource, loc: Option<Location>) -> Option<String> {
    if has_tab_indent(src, loc) {
        return Some("Use spaces for indentation; tabs are invalid in YAML.".into());
    }
    let lower = err_str.to_lowercase();
    YAML_HINTS
        .iter()
        .find(|(needle, _)| lower.contains(*needle))
        .map(|(_, hint)| (*hint).into())
}

/// Map a `serde_saphyr` error into a [`miette`] diagnostic.
///
/// The diagnostic labels the offending span when a location is known and
/// attaches a hint for common mistakes such as tab indentation or unknown
/// keys.
#[must_use]
pub fn map_yaml_error(
    err: YamlError,
    src: &ManifestSource,
    name: &ManifestName,
) -> Box<dyn Diagnostic + Send + Sync + 'static> {
    let loc = err.location();
    let (line, col, span) = loc.map_or((1, 1, None), |l| {
        (l.line(), l.column(), Some(to_span(src, l)))
    });
    let err_str = err.to_string();
    let hint = hint_for(&err_str, src, loc);
    let mut message = format!("YAML parse error at line {line}, column {col}: {err_str}");
    if let Some(ref h) = hint {
        message.push_str(" (help: ");
        message.push_str(h);
        message.push(')');
    }

    Box::new(YamlDiagnostic {
        src: NamedSource::new(name.as_ref(), src.as_ref().to_owned()),
        span,
        help: hint,
        source: err,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::DepManifest;
    use anyhow::{Result, anyhow, ensure};

    fn parse_failure(src: &ManifestSource) -> Result<YamlError> {
        match serde_saphyr::from_str::<DepManifest>(src.as_ref()) {
            Ok(_) => Err(anyhow!("expected parse error for {:?}", src.as_str())),
            Err(err) => Ok(err),
        }
    }

    #[test]
    fn map_yaml_error_includes_tab_hint() -> Result<()> {
        let src = ManifestSource::from("\tbuild: \"unterminated");
        let err = parse_failure(&src)?;
        let diag = map_yaml_error(err, &src, &ManifestName::from("test"));
        let msg = diag.to_string();
        ensure!(
            msg.contains("Use spaces for indentation"),
            "message missing tab hint: {msg}"
        );
        Ok(())
    }

    #[test]
    fn map_yaml_error_defaults_location_when_missing() -> Result<()> {
        let src = ManifestSource::from("build: [1");
        let err = serde_saphyr::Error::Eof {
            location: serde_saphyr::Location::UNKNOWN,
        };
        let diag = map_yaml_error(err, &src, &ManifestName::from("test"));
        ensure!(
            diag.to_string().contains("line 1, column 1"),
            "diagnostic should default to line 1 column 1"
        );
        Ok(())
    }

    #[test]
    fn map_yaml_error_reports_unknown_keys() -> Result<()> {
        let src = ManifestSource::from("build:\n  - target: a\n    srcs: [a.proto]\n");
        let err = parse_failure(&src)?;
        let diag = map_yaml_error(err, &src, &ManifestName::from("test"));
        let msg = diag.to_string();
        ensure!(msg.contains("srcs"), "message should name the key: {msg}");
        Ok(())
    }

    #[test]
    fn byte_index_advances_over_previous_lines() {
        let src = "one\ntwo\nthree";
        assert_eq!(byte_index_components(src, 3, 3), "one\ntwo\n".len() + 2);
    }

    #[test]
    fn byte_index_clamps_past_line_end() {
        assert_eq!(byte_index_components("short", 1, 42), "short".len());
    }

    #[test]
    fn byte_index_handles_crlf_lines() {
        let src = "one\r\ntwo\r\nthree";
        assert_eq!(byte_index_components(src, 2, 2), "one\r\n".len() + 1);
    }
}
