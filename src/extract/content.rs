//! Whole-file extraction.

use super::{Fragment, Fragments};
use crate::normalize::normalize;

/// Normalize the whole file into one fragment.
///
/// Returns no fragment only when normalization leaves the empty string;
/// whitespace-only output is still content.
pub fn extract(content: &str) -> Fragments {
    let text = normalize(content);
    let mut fragments = Fragments::new();
    if !text.is_empty() {
        fragments.push(Fragment::new(text));
    }
    fragments
}
