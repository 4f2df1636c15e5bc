//! Makefile rule synthesis.
//!
//! Each resolved node becomes one rule whose recipe changes into the node's
//! source directory, creates its generation directory and invokes the proto
//! compiler. The rule's prerequisites are the synthetic names of the node's
//! dependencies, and their output mappings are passed to the compiler so
//! generated imports resolve to the dependencies' packages.

use crate::config::GenConfig;
use crate::graph::DependencyRecord;
use itertools::Itertools;
use shell_quote::{QuoteRefExt, Sh};
use std::fmt::{self, Display, Formatter};

/// Rule text and the node's own output mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedRule {
    /// Complete rule, header and recipe, ending with a newline.
    pub text: String,
    /// Comma-joined `M<dir>/<src>=<import path>` entries for the node.
    pub output_mapping: String,
}

/// A finished dependency as seen by the rule that lists it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prerequisite {
    /// Synthetic rule name of the dependency.
    pub rule_name: String,
    /// Output mapping of the dependency's generated package.
    pub output_mapping: String,
}

/// Build the rule for `node` given its dependencies in declaration order.
///
/// Duplicated dependencies appear once per listing.
#[must_use]
pub fn synthesize(
    node: &DependencyRecord,
    deps: &[Prerequisite],
    config: &GenConfig,
) -> SynthesizedRule {
    let output_mapping = output_mapping(node, config);
    let rule = MakeRule { node, deps, config };
    SynthesizedRule {
        text: rule.to_string(),
        output_mapping,
    }
}

/// Compiler import mapping for `node`'s sources.
#[must_use]
pub fn output_mapping(node: &DependencyRecord, config: &GenConfig) -> String {
    let import = config.import_path(node.id());
    node.sources()
        .iter()
        .map(|src| format!("M{}={import}", node.id().dir().join(src)))
        .join(",")
}

/// Quote `word` for a POSIX shell and escape `$` for `make`.
#[must_use]
pub fn shell_word(word: &str) -> String {
    let bytes: Vec<u8> = word.quoted(Sh);
    let quoted = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            debug_assert!(false, "shell quoting produced non UTF-8 bytes: {err}");
            String::from_utf8_lossy(&err.into_bytes()).into_owned()
        }
    };
    quoted.replace('$', "$$")
}

struct MakeRule<'a> {
    node: &'a DependencyRecord,
    deps: &'a [Prerequisite],
    config: &'a GenConfig,
}

impl Display for MakeRule<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let id = self.node.id();
        write!(f, "{}:", self.node.rule_name())?;
        for dep in self.deps {
            write!(f, " {}", dep.rule_name)?;
        }
        writeln!(f)?;

        let gen_dir = self.config.gen_dir(id);
        let dep_mappings = self.deps.iter().map(|dep| &dep.output_mapping).join(",");
        let proto_path = format!("--proto_path={}/", self.config.proto_root());
        let out_flag = format!("--{}_out={dep_mappings}:{gen_dir}", self.config.plugin);
        writeln!(
            f,
            "\tcd {} && mkdir -p {} && {} {} --proto_path=./ {} {}",
            shell_word(self.config.source_dir(id).as_str()),
            shell_word(gen_dir.as_str()),
            shell_word(&self.config.protoc),
            shell_word(&proto_path),
            shell_word(&out_flag),
            self.node.sources().iter().map(|s| shell_word(s)).join(" "),
        )
    }
}
