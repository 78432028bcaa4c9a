//! Directory traversal.
//!
//! Uses the `ignore` crate to walk the tree and groups files under the
//! directory that directly contains them. Directories come out top-down in
//! pre-order (a directory before anything below it), with entries sorted by
//! file name so runs are reproducible.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use thiserror::Error;

/// Per-root ignore file, gitignore syntax. Honored whenever it exists.
pub const IGNORE_FILE: &str = ".nbharvestignore";

/// Errors that can occur during directory walking.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("path not found: {path}")]
    NotFound { path: PathBuf },

    #[error("not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Options for directory walking.
///
/// The defaults visit everything below the root, hidden entries included,
/// and ignore `.gitignore` rules.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Maximum depth to recurse (None = unlimited).
    pub max_depth: Option<usize>,
    /// Follow symbolic links to directories.
    pub follow_symlinks: bool,
    /// Include hidden files and directories.
    pub include_hidden: bool,
    /// Respect .gitignore patterns.
    pub respect_gitignore: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            follow_symlinks: false,
            include_hidden: true,
            respect_gitignore: false,
        }
    }
}

impl WalkOptions {
    /// Set maximum depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }
}

/// A directory and the files directly inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryListing {
    /// Path of the directory, rooted at the walk root as given.
    pub path: PathBuf,
    /// Depth from root (root = 0).
    pub depth: usize,
    /// Files directly in this directory, sorted by name.
    pub files: Vec<PathBuf>,
}

/// List every directory under `root` with its direct files.
///
/// The root comes first. Unreadable entries are logged and skipped.
///
/// # Examples
///
/// ```no_run
/// use nbharvest::walker::{list_directories, WalkOptions};
/// use std::path::Path;
///
/// for dir in list_directories(Path::new("."), &WalkOptions::default()).unwrap() {
///     println!("{} ({} files)", dir.path.display(), dir.files.len());
/// }
/// ```
pub fn list_directories(
    root: &Path,
    options: &WalkOptions,
) -> Result<Vec<DirectoryListing>, WalkError> {
    let metadata = match root.metadata() {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(WalkError::NotFound {
                path: root.to_path_buf(),
            })
        }
        Err(source) => {
            return Err(WalkError::Io {
                path: root.to_path_buf(),
                source,
            })
        }
    };
    if !metadata.is_dir() {
        return Err(WalkError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .hidden(!options.include_hidden)
        .git_ignore(options.respect_gitignore)
        .git_global(options.respect_gitignore)
        .git_exclude(options.respect_gitignore)
        .require_git(false)
        .follow_links(options.follow_symlinks)
        .max_depth(options.max_depth)
        .sort_by_file_name(|a, b| a.cmp(b));

    let ignore_file = root.join(IGNORE_FILE);
    if ignore_file.exists() {
        if let Some(err) = builder.add_ignore(&ignore_file) {
            tracing::warn!(path = %ignore_file.display(), error = %err, "bad ignore file");
        }
    }

    let mut listings: Vec<DirectoryListing> = Vec::new();
    let mut index: HashMap<PathBuf, usize> = HashMap::new();

    for result in builder.build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };

        let path = entry.path().to_path_buf();
        let Some(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            index.insert(path.clone(), listings.len());
            listings.push(DirectoryListing {
                path,
                depth: entry.depth(),
                files: Vec::new(),
            });
            continue;
        }

        let is_file =
            file_type.is_file() || (file_type.is_symlink() && path.is_file());
        if !is_file {
            tracing::debug!(path = %path.display(), "skipping non-file entry");
            continue;
        }

        let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
        match index.get(&parent) {
            Some(&i) => listings[i].files.push(path),
            None => tracing::debug!(path = %path.display(), "file outside walked directories"),
        }
    }

    Ok(listings)
}
