//! Error types for nbharvest.

use crate::extract::ExtractError;
use crate::filter::FilterError;
use crate::notebook::NotebookError;
use crate::prompt::PromptError;
use crate::walker::WalkError;

/// Top-level error type for a harvest run.
#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Walk(#[from] WalkError),

    #[error("filter error: {0}")]
    Filter(#[from] FilterError),

    #[error("extract error: {0}")]
    Extract(#[from] ExtractError),

    #[error("notebook error: {0}")]
    Notebook(#[from] NotebookError),

    #[error("prompt error: {0}")]
    Prompt(#[from] PromptError),
}

/// Map an error to its exit code.
pub fn exit_code(error: &HarvestError) -> i32 {
    match error {
        HarvestError::Io(_) => 1,
        HarvestError::Walk(WalkError::NotFound { .. } | WalkError::NotADirectory { .. }) => 3,
        HarvestError::Walk(_) => 2,
        HarvestError::Filter(_) => 1,
        HarvestError::Extract(_) => 1,
        HarvestError::Notebook(_) => 1,
        HarvestError::Prompt(_) => 4,
    }
}
