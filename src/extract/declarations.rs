//! Top-level declaration extraction using tree-sitter.

use std::path::Path;

use tree_sitter::Node;

use super::{with_python_parser, ExtractError, Fragment, Fragments};
use crate::normalize::normalize;

/// Extract normalized top-level functions and classes, in source order.
///
/// Any syntax error in the file fails the whole extraction.
pub fn extract(path: &Path, content: &str) -> Result<Fragments, ExtractError> {
    let tree = with_python_parser(|parser| parser.parse(content, None))?.ok_or_else(|| {
        ExtractError::Parse {
            path: path.to_path_buf(),
            line: 1,
            column: 1,
        }
    })?;

    let root = tree.root_node();
    let error_position = if root.has_error() {
        Some(first_error_position(root).unwrap_or((1, 1)))
    } else {
        first_rejected_node(root).map(|node| {
            // An empty block is zero-width; point at the header that owns it.
            let node = match node.kind() {
                "block" => node.parent().unwrap_or(node),
                _ => node,
            };
            let pos = node.start_position();
            (pos.row + 1, pos.column + 1)
        })
    };
    if let Some((line, column)) = error_position {
        tracing::debug!(path = %path.display(), line, column, "python syntax error");
        return Err(ExtractError::Parse {
            path: path.to_path_buf(),
            line,
            column,
        });
    }

    let mut fragments = Fragments::new();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if is_declaration(child) {
            let text = &content[child.byte_range()];
            fragments.push(Fragment::new(normalize(text)));
        }
    }

    Ok(fragments)
}

fn is_declaration(node: Node) -> bool {
    match node.kind() {
        "function_definition" | "class_definition" => true,
        "decorated_definition" => node
            .child_by_field_name("definition")
            .is_some_and(|def| matches!(def.kind(), "function_definition" | "class_definition")),
        _ => false,
    }
}

/// First node, in document order, that tree-sitter accepts but Python 3
/// does not.
///
/// The grammar recovers silently from a missing indented body (the header
/// ends up with an empty block and the body lands at module level) and still
/// knows the Python 2 `print`/`exec` statements.
fn first_rejected_node(root: Node) -> Option<Node> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if is_rejected(node) {
            return Some(node);
        }
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

fn is_rejected(node: Node) -> bool {
    match node.kind() {
        "print_statement" | "exec_statement" => true,
        "function_definition" | "class_definition" => node.child_by_field_name("body").is_none(),
        "block" => !is_well_formed_block(node),
        _ => false,
    }
}

/// A block needs at least one statement. When it starts on a line after its
/// header's colon, it must be indented past the header.
fn is_well_formed_block(block: Node) -> bool {
    let mut cursor = block.walk();
    let has_statement = block
        .named_children(&mut cursor)
        .any(|child| child.kind() != "comment");
    if !has_statement {
        return false;
    }

    let (Some(colon), Some(owner)) = (block.prev_sibling(), block.parent()) else {
        return true;
    };
    let start = block.start_position();
    start.row == colon.end_position().row || start.column > owner.start_position().column
}

/// 1-indexed position of the first error or missing node, depth-first.
fn first_error_position(node: Node) -> Option<(usize, usize)> {
    if node.is_error() || node.is_missing() {
        let pos = node.start_position();
        return Some((pos.row + 1, pos.column + 1));
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error_position)
}
