//! Notebook document and nbformat v4 serialization.
//!
//! The [`Notebook`] is append-only: cells keep the order they were pushed
//! in, and a running count of code cells is kept alongside them.

use std::fs;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

/// nbformat major version written.
pub const NBFORMAT: u32 = 4;
/// nbformat minor version written. 4.5 is the first with cell ids.
pub const NBFORMAT_MINOR: u32 = 5;

/// Errors that can occur when writing a notebook.
#[derive(Debug, Error)]
pub enum NotebookError {
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One unit of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Markdown heading naming a source file.
    Heading(String),
    /// One normalized fragment.
    Code(String),
}

impl Cell {
    pub fn text(&self) -> &str {
        match self {
            Cell::Heading(text) | Cell::Code(text) => text,
        }
    }

    pub fn is_code(&self) -> bool {
        matches!(self, Cell::Code(_))
    }
}

/// Ordered cells plus the number of code cells among them.
#[derive(Debug, Clone, Default)]
pub struct Notebook {
    cells: Vec<Cell>,
    code_cells: usize,
}

impl Notebook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a heading cell.
    pub fn push_heading(&mut self, text: impl Into<String>) {
        self.cells.push(Cell::Heading(text.into()));
    }

    /// Append a code cell and bump the counter.
    pub fn push_code(&mut self, text: impl Into<String>) {
        self.cells.push(Cell::Code(text.into()));
        self.code_cells += 1;
    }

    /// Append a heading followed by one code cell per fragment.
    ///
    /// Nothing is appended when `fragments` is empty. Returns the number of
    /// code cells added.
    pub fn push_section<I>(&mut self, heading: impl Into<String>, fragments: I) -> usize
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut fragments = fragments.into_iter().peekable();
        if fragments.peek().is_none() {
            return 0;
        }
        self.push_heading(heading);
        let before = self.code_cells;
        for fragment in fragments {
            self.push_code(fragment);
        }
        self.code_cells - before
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn code_cell_count(&self) -> usize {
        self.code_cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Render as nbformat JSON bytes: sorted keys, one-space indent,
    /// trailing newline.
    pub fn to_json_vec(&self) -> Result<Vec<u8>, NotebookError> {
        let document = NotebookJson {
            cells: self.cells.iter().map(CellJson::from_cell).collect(),
            metadata: EmptyMap {},
            nbformat: NBFORMAT,
            nbformat_minor: NBFORMAT_MINOR,
        };

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        document.serialize(&mut ser)?;
        buf.push(b'\n');
        Ok(buf)
    }

    /// Serialize and write to `path`, replacing any existing file.
    pub fn write(&self, path: &Path) -> Result<(), NotebookError> {
        let json = self.to_json_vec()?;
        fs::write(path, json).map_err(|source| NotebookError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

// Field order is alphabetical so the output matches nbformat's sorted keys.

#[derive(Serialize)]
struct NotebookJson {
    cells: Vec<CellJson>,
    metadata: EmptyMap,
    nbformat: u32,
    nbformat_minor: u32,
}

#[derive(Serialize)]
struct EmptyMap {}

#[derive(Serialize)]
#[serde(untagged)]
enum CellJson {
    Code {
        cell_type: &'static str,
        execution_count: Option<u32>,
        id: String,
        metadata: EmptyMap,
        outputs: Vec<()>,
        source: Vec<String>,
    },
    Markdown {
        cell_type: &'static str,
        id: String,
        metadata: EmptyMap,
        source: Vec<String>,
    },
}

impl CellJson {
    fn from_cell(cell: &Cell) -> Self {
        match cell {
            Cell::Code(text) => CellJson::Code {
                cell_type: "code",
                execution_count: None,
                id: cell_id(),
                metadata: EmptyMap {},
                outputs: Vec::new(),
                source: split_lines(text),
            },
            Cell::Heading(text) => CellJson::Markdown {
                cell_type: "markdown",
                id: cell_id(),
                metadata: EmptyMap {},
                source: split_lines(text),
            },
        }
    }
}

/// Eight hex digits from a random UUID, the way nbformat mints cell ids.
fn cell_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

/// Split into lines, keeping each `\n`.
fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_push_section_orders_cells() {
        let mut nb = Notebook::new();
        let added = nb.push_section("# a.py", ["def f(): pass", "class A: pass"]);
        assert_eq!(added, 2);

        nb.push_section("# b.py", ["x = 1"]);

        let cells = nb.cells();
        assert_eq!(cells.len(), 5);
        assert_eq!(cells[0], Cell::Heading("# a.py".into()));
        assert_eq!(cells[1], Cell::Code("def f(): pass".into()));
        assert_eq!(cells[2], Cell::Code("class A: pass".into()));
        assert_eq!(cells[3], Cell::Heading("# b.py".into()));
        assert_eq!(nb.code_cell_count(), 3);
    }

    #[test]
    fn test_empty_section_appends_nothing() {
        let mut nb = Notebook::new();
        let added = nb.push_section("# empty.py", Vec::<String>::new());
        assert_eq!(added, 0);
        assert!(nb.is_empty());
        assert_eq!(nb.code_cell_count(), 0);
    }

    #[test]
    fn test_json_structure() {
        let mut nb = Notebook::new();
        nb.push_section("# a.py\n\nPath: root/a.py", ["x = 1\ny = 2\n"]);

        let bytes = nb.to_json_vec().unwrap();
        let json = std::str::from_utf8(&bytes).unwrap();
        assert!(json.ends_with("}\n"));
        assert!(json.starts_with("{\n \"cells\": ["));

        let v: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(v["nbformat"], 4);
        assert_eq!(v["nbformat_minor"], 5);
        assert!(v["metadata"].as_object().unwrap().is_empty());

        let cells = v["cells"].as_array().unwrap();
        assert_eq!(cells.len(), 2);

        assert_eq!(cells[0]["cell_type"], "markdown");
        assert_eq!(
            cells[0]["source"],
            serde_json::json!(["# a.py\n", "\n", "Path: root/a.py"])
        );
        assert!(cells[0].get("outputs").is_none());

        assert_eq!(cells[1]["cell_type"], "code");
        assert!(cells[1]["execution_count"].is_null());
        assert_eq!(cells[1]["outputs"], serde_json::json!([]));
        assert_eq!(cells[1]["source"], serde_json::json!(["x = 1\n", "y = 2\n"]));
    }

    #[test]
    fn test_cell_ids() {
        let mut nb = Notebook::new();
        nb.push_section("# a.py", ["a", "b"]);

        let v: serde_json::Value = serde_json::from_slice(&nb.to_json_vec().unwrap()).unwrap();
        let ids: Vec<&str> = v["cells"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["id"].as_str().unwrap())
            .collect();

        for id in &ids {
            assert_eq!(id.len(), 8);
            assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        }
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines(""), Vec::<String>::new());
        assert_eq!(split_lines("a"), vec!["a"]);
        assert_eq!(split_lines("a\n\nb\n"), vec!["a\n", "\n", "b\n"]);
    }

    #[test]
    fn test_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.ipynb");

        let mut nb = Notebook::new();
        nb.push_section("# a.py", ["pass"]);
        nb.write(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let v: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(v["cells"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_write_keeps_non_ascii_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.ipynb");

        let mut nb = Notebook::new();
        nb.push_section("# café.py", ["greeting = 'héllo wörld ✓'\n"]);
        nb.write(&path).unwrap();

        let written = fs::read(&path).unwrap();
        let text = std::str::from_utf8(&written).unwrap();
        assert!(text.contains("héllo wörld ✓"));
        assert!(!text.contains('\u{FFFD}'));

        let v: serde_json::Value = serde_json::from_slice(&written).unwrap();
        assert_eq!(v["cells"][0]["source"], serde_json::json!(["# café.py"]));
        assert_eq!(
            v["cells"][1]["source"],
            serde_json::json!(["greeting = 'héllo wörld ✓'\n"])
        );
    }

    #[test]
    fn test_write_failure() {
        let nb = Notebook::new();
        let result = nb.write(Path::new("/nonexistent/dir/out.ipynb"));
        assert!(matches!(result, Err(NotebookError::Write { .. })));
    }
}
