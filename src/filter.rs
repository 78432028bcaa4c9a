//! Source file selection.
//!
//! A file is a source file when its name ends with one of the configured
//! extensions. Exclude globs are matched against the path relative to the
//! walk root.

use std::path::Path;

use glob::Pattern;
use thiserror::Error;

/// Extension used when none is configured.
pub const DEFAULT_EXTENSION: &str = "py";

/// Errors building a filter.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid exclude pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("empty extension")]
    EmptyExtension,
}

/// Decides which walked files get extracted.
#[derive(Debug, Clone)]
pub struct SourceFilter {
    /// Name suffixes, each including the leading dot.
    suffixes: Vec<String>,
    excludes: Vec<Pattern>,
}

impl Default for SourceFilter {
    fn default() -> Self {
        Self {
            suffixes: vec![format!(".{DEFAULT_EXTENSION}")],
            excludes: Vec::new(),
        }
    }
}

impl SourceFilter {
    /// Build a filter from extensions (with or without a leading dot) and
    /// exclude globs. An empty extension list falls back to `py`.
    pub fn new<E, X>(extensions: E, excludes: X) -> Result<Self, FilterError>
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        X: IntoIterator,
        X::Item: AsRef<str>,
    {
        let mut suffixes = Vec::new();
        for ext in extensions {
            let ext = ext.as_ref().trim_start_matches('.');
            if ext.is_empty() {
                return Err(FilterError::EmptyExtension);
            }
            suffixes.push(format!(".{ext}"));
        }
        if suffixes.is_empty() {
            suffixes.push(format!(".{DEFAULT_EXTENSION}"));
        }

        let excludes = excludes
            .into_iter()
            .map(|p| {
                let p = p.as_ref();
                Pattern::new(p).map_err(|source| FilterError::InvalidPattern {
                    pattern: p.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { suffixes, excludes })
    }

    /// Whether the file name carries a source extension. Case-sensitive.
    pub fn is_source_file(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        let name = name.as_encoded_bytes();
        self.suffixes.iter().any(|s| name.ends_with(s.as_bytes()))
    }

    /// Whether `relative` (path below the walk root) matches an exclude glob.
    pub fn is_excluded(&self, relative: &Path) -> bool {
        let relative = relative.to_string_lossy();
        self.excludes.iter().any(|p| p.matches(&relative))
    }

    /// Full check: source extension and not excluded.
    pub fn accepts(&self, path: &Path, root: &Path) -> bool {
        if !self.is_source_file(path) {
            return false;
        }
        let relative = path.strip_prefix(root).unwrap_or(path);
        if self.is_excluded(relative) {
            tracing::debug!(path = %path.display(), "excluded by pattern");
            return false;
        }
        true
    }

    /// Configured extensions without the leading dot.
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.suffixes.iter().map(|s| &s[1..])
    }
}
