//! Fluent builder API and the directory-walk driver.
//!
//! [`Harvest`] collects configuration, then [`Harvest::run`] walks the tree
//! one directory at a time, asks a [`DecisionSource`] about each, and feeds
//! the fragments of every confirmed file into a single [`Notebook`].

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::HarvestError;
use crate::extract::{extract_file, ExtractMode};
use crate::filter::SourceFilter;
use crate::notebook::Notebook;
use crate::prompt::DecisionSource;
use crate::walker::{list_directories, WalkOptions};

/// Builder for harvesting a directory tree into a notebook.
///
/// # Examples
///
/// ```no_run
/// use nbharvest::builder::Harvest;
/// use nbharvest::extract::ExtractMode;
/// use nbharvest::prompt::AutoConfirm;
///
/// let result = Harvest::new("./project")
///     .mode(ExtractMode::Content)
///     .run(AutoConfirm, &mut std::io::stdout())
///     .unwrap();
/// result.write().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct Harvest {
    root: PathBuf,
    mode: ExtractMode,
    filter: SourceFilter,
    output_name: Option<String>,
    walk_options: WalkOptions,
}

impl Harvest {
    /// Create a new builder for the given root path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mode: ExtractMode::default(),
            filter: SourceFilter::default(),
            output_name: None,
            walk_options: WalkOptions::default(),
        }
    }

    /// Choose what is extracted from each file.
    pub fn mode(mut self, mode: ExtractMode) -> Self {
        self.mode = mode;
        self
    }

    /// Replace the source file filter.
    pub fn filter(mut self, filter: SourceFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Notebook file name inside the root. Defaults per mode.
    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    /// Include hidden files and directories.
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.walk_options.include_hidden = include;
        self
    }

    /// Respect .gitignore rules.
    pub fn respect_gitignore(mut self, respect: bool) -> Self {
        self.walk_options.respect_gitignore = respect;
        self
    }

    /// Set maximum directory depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.walk_options.max_depth = Some(depth);
        self
    }

    /// Follow symbolic links to directories.
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.walk_options.follow_symlinks = follow;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the notebook will be written.
    pub fn output_path(&self) -> PathBuf {
        let name = self
            .output_name
            .as_deref()
            .unwrap_or_else(|| self.mode.default_output());
        self.root.join(name)
    }

    /// Walk the tree and build the notebook.
    ///
    /// Progress lines go to `progress`. The first read, parse or prompt
    /// failure aborts the run. Nothing is written to disk; call
    /// [`HarvestResult::write`] for that.
    pub fn run<D, W>(&self, mut decisions: D, progress: &mut W) -> Result<HarvestResult, HarvestError>
    where
        D: DecisionSource,
        W: Write + ?Sized,
    {
        let listings = list_directories(&self.root, &self.walk_options)?;
        tracing::debug!(
            root = %self.root.display(),
            directories = listings.len(),
            mode = %self.mode,
            "starting harvest"
        );

        let mut notebook = Notebook::new();
        let mut files = Vec::new();
        let mut declined = Vec::new();

        for listing in &listings {
            if !decisions.confirm_directory(&listing.path)? {
                tracing::debug!(dir = %listing.path.display(), "directory declined");
                declined.push(listing.path.clone());
                continue;
            }

            for path in &listing.files {
                if !self.filter.accepts(path, &self.root) {
                    continue;
                }
                let outcome = self.harvest_file(path, &mut notebook, progress)?;
                files.push(outcome);
            }
        }

        writeln!(
            progress,
            "Total number of code cells created: {}",
            notebook.code_cell_count()
        )?;

        Ok(HarvestResult {
            notebook,
            files,
            declined,
            output_path: self.output_path(),
        })
    }

    fn harvest_file<W>(
        &self,
        path: &Path,
        notebook: &mut Notebook,
        progress: &mut W,
    ) -> Result<FileOutcome, HarvestError>
    where
        W: Write + ?Sized,
    {
        writeln!(progress, "Processing file: {}", path.display())?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let fragments = extract_file(path, self.mode)?;
        let code_cells = if fragments.is_empty() {
            writeln!(progress, "{}", self.mode.empty_message(&file_name))?;
            0
        } else {
            writeln!(
                progress,
                "{}",
                self.mode.found_message(&file_name, fragments.len())
            )?;
            notebook.push_section(
                self.mode.heading(&file_name, path),
                fragments.into_iter().map(|f| f.into_string()),
            )
        };

        Ok(FileOutcome {
            path: path.to_path_buf(),
            code_cells,
        })
    }
}

/// What one processed file contributed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    /// Code cells appended; 0 when nothing usable was found.
    pub code_cells: usize,
}

/// Result of a harvest run.
#[derive(Debug)]
pub struct HarvestResult {
    /// The assembled document.
    pub notebook: Notebook,
    /// Every processed file, in processing order.
    pub files: Vec<FileOutcome>,
    /// Directories whose own files were skipped.
    pub declined: Vec<PathBuf>,
    /// Where [`write`](Self::write) puts the notebook.
    pub output_path: PathBuf,
}

impl HarvestResult {
    pub fn code_cell_count(&self) -> usize {
        self.notebook.code_cell_count()
    }

    /// Persist the notebook at `output_path`.
    pub fn write(&self) -> Result<&Path, HarvestError> {
        self.notebook.write(&self.output_path)?;
        Ok(&self.output_path)
    }
}
