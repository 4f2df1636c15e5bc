//! Quote-insensitive views of generated Makefiles.
//!
//! Recipe words are shell-quoted, and which characters trigger quoting is an
//! implementation detail of the quoting crate. Tests compare the unquoted
//! words instead so assertions stay stable.

use anyhow::{Context, Result};

/// Rewrite every recipe line of `makefile` as its shell words joined by single
/// spaces. Rule headers and blank lines pass through unchanged, and make's
/// `$$` escape is folded back to `$` before splitting.
///
/// # Examples
///
/// ```
/// use test_support::makefile::unquote_recipes;
///
/// let text = "goal:\n\tcd '/a b' && protoc x.proto\n";
/// assert_eq!(
///     unquote_recipes(text).expect("valid quoting"),
///     "goal:\n\tcd /a b && protoc x.proto\n"
/// );
/// ```
pub fn unquote_recipes(makefile: &str) -> Result<String> {
    let mut out = String::with_capacity(makefile.len());
    for line in makefile.lines() {
        if let Some(recipe) = line.strip_prefix('\t') {
            let words = shlex::split(&recipe.replace("$$", "$"))
                .with_context(|| format!("unbalanced quoting in recipe: {recipe}"))?;
            out.push('\t');
            out.push_str(&words.join(" "));
        } else {
            out.push_str(line);
        }
        out.push('\n');
    }
    Ok(out)
}

/// Rule headers of `makefile`, in order.
pub fn rule_headers(makefile: &str) -> Vec<&str> {
    makefile
        .lines()
        .filter(|line| !line.starts_with('\t') && !line.is_empty())
        .collect()
}
