//! nbharvest - Harvest Python source into a Jupyter notebook.
//!
//! nbharvest walks a directory tree, asks before processing each directory,
//! pulls either the top-level functions and classes or the whole contents out
//! of every Python file, strips comments and docstrings, and writes the
//! result as an nbformat v4 notebook.
//!
//! # Quick Start
//!
//! ```no_run
//! use nbharvest::builder::Harvest;
//! use nbharvest::extract::ExtractMode;
//! use nbharvest::prompt::AutoConfirm;
//!
//! let result = Harvest::new("./my-project")
//!     .mode(ExtractMode::Declarations)
//!     .run(AutoConfirm, &mut std::io::stdout())
//!     .unwrap();
//!
//! println!("{} code cells", result.code_cell_count());
//! result.write().unwrap();
//! ```
//!
//! # Modules
//!
//! - [`normalize`] - Comment and docstring stripping
//! - [`extract`] - Declaration and whole-file extraction
//! - [`filter`] - Source file selection
//! - [`walker`] - Directory traversal
//! - [`prompt`] - Per-directory confirmation
//! - [`notebook`] - Notebook document and serialization
//! - [`builder`] - Fluent API and the walk driver

pub mod normalize;
pub mod extract;
pub mod filter;
pub mod errors;
pub mod walker;
pub mod prompt;
pub mod notebook;
pub mod builder;

// Re-export key types at crate root for convenience
pub use builder::{FileOutcome, Harvest, HarvestResult};
pub use errors::HarvestError;
pub use extract::{ExtractError, ExtractMode, Fragment};
pub use filter::{FilterError, SourceFilter};
pub use normalize::normalize;
pub use notebook::{Cell, Notebook, NotebookError};
pub use prompt::{AutoConfirm, ConsolePrompt, DecisionSource, PromptError, ScriptedDecisions};
pub use walker::{WalkError, WalkOptions};
