//! Comment and docstring stripping.
//!
//! Normalization is lexical: two regular expressions run in sequence over the
//! text. It does not know about Python grammar, so a `#` inside a string
//! literal is stripped like any other comment. That is a known limitation
//! and is kept as-is.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// `#` through end of line, applied per line.
static LINE_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)#.*$").unwrap());

/// Triple-quoted blocks in group 1, ordinary string literals in group 2.
///
/// Ordinary literals are matched so that a quote character inside them can't
/// start a triple-quoted match.
static STRING_LITERAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)(""".*?"""|'''.*?''')|(".*?"|'.*?')"#).unwrap()
});

/// Strip line comments and triple-quoted string blocks from source text.
///
/// Single- and double-quoted literals are passed through unchanged.
///
/// # Examples
///
/// ```
/// use nbharvest::normalize::normalize;
///
/// let code = "def f():\n    \"\"\"Doc.\"\"\"\n    return 'x'  # note\n";
/// assert_eq!(normalize(code), "def f():\n    \n    return 'x'  \n");
/// ```
pub fn normalize(source: &str) -> String {
    let without_comments = strip_line_comments(source);
    strip_docstrings(&without_comments)
}

/// Remove `#` comments to the end of each line.
pub fn strip_line_comments(source: &str) -> String {
    LINE_COMMENT_RE.replace_all(source, "").into_owned()
}

/// Remove triple-quoted blocks, keeping ordinary string literals.
pub fn strip_docstrings(source: &str) -> String {
    STRING_LITERAL_RE
        .replace_all(source, |caps: &Captures| {
            if caps.get(1).is_some() {
                String::new()
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}
