//! Fragment extraction from Python source files.
//!
//! Two modes share one entry point: [`ExtractMode::Declarations`] parses the
//! file with tree-sitter and keeps its top-level functions and classes,
//! [`ExtractMode::Content`] keeps the whole file. Every fragment is passed
//! through [`normalize`](crate::normalize::normalize).

mod content;
mod declarations;

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use smallvec::SmallVec;
use thiserror::Error;
use tree_sitter::Parser;

// Parser is cached per thread; init failure is reported, never panicked on.
thread_local! {
    static PYTHON_PARSER: RefCell<Option<Parser>> = const { RefCell::new(None) };
}

fn init_python_parser() -> Result<Parser, ()> {
    let mut p = Parser::new();
    p.set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|_| ())?;
    Ok(p)
}

/// Execute a function with the cached Python parser.
pub(crate) fn with_python_parser<F, R>(f: F) -> Result<R, ExtractError>
where
    F: FnOnce(&mut Parser) -> R,
{
    PYTHON_PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            *slot = Some(init_python_parser().map_err(|()| ExtractError::ParserInit)?);
        }

        let parser = slot.as_mut().ok_or(ExtractError::ParserInit)?;
        Ok(f(parser))
    })
}

/// Errors during extraction. All of them abort a run.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to initialize python parser")]
    ParserInit,

    #[error("syntax error in {path} at line {line}, column {column}")]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
    },

    #[error("failed to read file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One normalized piece of source text: a declaration or a whole file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    text: String,
}

impl Fragment {
    pub(crate) fn new(text: String) -> Self {
        Self { text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl AsRef<str> for Fragment {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// What gets pulled out of each source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractMode {
    /// Top-level function, async function and class declarations.
    #[default]
    Declarations,
    /// The whole file as a single fragment.
    Content,
}

impl ExtractMode {
    /// Markdown heading placed before the fragments of a file.
    pub fn heading(&self, file_name: &str, path: &Path) -> String {
        match self {
            ExtractMode::Declarations => format!("# Functions and Classes from {file_name}"),
            ExtractMode::Content => format!("# {file_name}\n\nPath: {}", path.display()),
        }
    }

    /// Progress line for a file that produced `count` fragments.
    pub fn found_message(&self, file_name: &str, count: usize) -> String {
        match self {
            ExtractMode::Declarations => {
                format!("Extracted {count} functions/classes from {file_name}")
            }
            ExtractMode::Content => format!("Processing content from {file_name}"),
        }
    }

    /// Progress line for a file that produced nothing.
    pub fn empty_message(&self, file_name: &str) -> String {
        match self {
            ExtractMode::Declarations => format!("No functions or classes found in {file_name}"),
            ExtractMode::Content => format!("No content found in {file_name}"),
        }
    }

    /// Notebook file name written into the root when none is given.
    pub fn default_output(&self) -> &'static str {
        match self {
            ExtractMode::Declarations => "extracted_functions_and_classes.ipynb",
            ExtractMode::Content => "extracted_content.ipynb",
        }
    }
}

impl std::fmt::Display for ExtractMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractMode::Declarations => write!(f, "declarations"),
            ExtractMode::Content => write!(f, "content"),
        }
    }
}

/// Fragments pulled from one file, in source order.
pub type Fragments = SmallVec<[Fragment; 8]>;

/// Extract fragments from already-loaded file content.
///
/// An empty result means the file had nothing usable for `mode`.
///
/// # Examples
///
/// ```
/// use nbharvest::extract::{extract, ExtractMode};
/// use std::path::Path;
///
/// let code = "def hello():\n    return 1\n\nclass A:\n    pass\n";
/// let fragments = extract(Path::new("a.py"), code, ExtractMode::Declarations).unwrap();
/// assert_eq!(fragments.len(), 2);
/// ```
pub fn extract(path: &Path, content: &str, mode: ExtractMode) -> Result<Fragments, ExtractError> {
    match mode {
        ExtractMode::Declarations => declarations::extract(path, content),
        ExtractMode::Content => Ok(content::extract(content)),
    }
}

/// Read a file and extract fragments from it.
///
/// Line endings are translated to `\n` before extraction.
pub fn extract_file(path: &Path, mode: ExtractMode) -> Result<Fragments, ExtractError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ExtractError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let content = translate_newlines(&raw);
    extract(path, &content, mode)
}

fn translate_newlines(text: &str) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_mode_presentation() {
        let path = Path::new("root/pkg/a.py");
        assert_eq!(
            ExtractMode::Declarations.heading("a.py", path),
            "# Functions and Classes from a.py"
        );
        assert_eq!(
            ExtractMode::Content.heading("a.py", path),
            format!("# a.py\n\nPath: {}", path.display())
        );
        assert_eq!(
            ExtractMode::Declarations.found_message("a.py", 3),
            "Extracted 3 functions/classes from a.py"
        );
        assert_eq!(
            ExtractMode::Content.empty_message("a.py"),
            "No content found in a.py"
        );
        assert_eq!(
            ExtractMode::Declarations.default_output(),
            "extracted_functions_and_classes.ipynb"
        );
        assert_eq!(ExtractMode::Content.default_output(), "extracted_content.ipynb");
    }

    #[test]
    fn test_extract_file_translates_newlines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("crlf.py");
        fs::write(&path, "x = 1\r\ny = 2\r\n").unwrap();

        let fragments = extract_file(&path, ExtractMode::Content).unwrap();
        assert_eq!(fragments[0].as_str(), "x = 1\ny = 2\n");
    }

    #[test]
    fn test_extract_file_missing() {
        let result = extract_file(Path::new("/nonexistent/file.py"), ExtractMode::Content);
        assert!(matches!(result, Err(ExtractError::Read { .. })));
    }

    #[test]
    fn test_extract_file_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.py");
        fs::write(&path, [0x66, 0xff, 0xfe, 0x0a]).unwrap();

        let result = extract_file(&path, ExtractMode::Declarations);
        assert!(matches!(result, Err(ExtractError::Read { .. })));
    }
}
