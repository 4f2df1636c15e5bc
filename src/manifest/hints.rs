//! Hints attached to YAML parse diagnostics for common manifest mistakes.

pub(crate) const YAML_HINTS: [(&str, &str); 6] = [
    (
        "did not find expected '-'",
        "Start list items with '-' and ensure proper indentation.",
    ),
    (
        "expected ':'",
        "Ensure each key is followed by ':' separating key and value.",
    ),
    (
        "mapping values are not allowed",
        "Check for a stray ':' or add quotes around values where needed.",
    ),
    (
        "found character that cannot start any token",
        "Remove stray characters and ensure indentation uses spaces (no tabs).",
    ),
    (
        "unknown field",
        "Declarations accept only 'target', 'src' and 'dep'; the document accepts only 'build'.",
    ),
    (
        "missing field `target`",
        "Every entry under 'build' needs a 'target' name.",
    ),
];
