//! Structural nesting rules shared by both trees.
//!
//! - only block-level nodes at the root
//! - `listItem` only inside `list`, and `list` holds nothing else
//! - `list` only at the root or inside a `listItem`
//! - `link` holds text only
//! - `paragraph` and `heading` hold inline content only
//! - `blockquote` and `listItem` hold block content only
//!
//! Violations are reported with a dotted index path from the root, e.g.
//! `root.2.0` is the first child of the third top-level node.

use crate::editor::EditorNode;
use crate::error::FormatError;
use crate::vocabulary::NodeType;
use crate::wire::{WireDocument, WireNode};

trait Structure: Sized {
    fn kind(&self) -> NodeType;
    fn nodes(&self) -> &[Self];
}

impl Structure for EditorNode {
    fn kind(&self) -> NodeType {
        self.node_type()
    }

    fn nodes(&self) -> &[Self] {
        self.children()
    }
}

impl Structure for WireNode {
    fn kind(&self) -> NodeType {
        self.node_type()
    }

    fn nodes(&self) -> &[Self] {
        self.children()
    }
}

/// Checks an editor value against the nesting rules.
pub fn check_editor(value: &[EditorNode]) -> Result<(), FormatError> {
    check_children(NodeType::Root, value, "root")
}

/// Checks a wire document against the nesting rules.
pub fn check_wire(doc: &WireDocument) -> Result<(), FormatError> {
    check_children(NodeType::Root, &doc.document.children, "root")
}

fn check_children<N: Structure>(
    parent: NodeType,
    children: &[N],
    path: &str,
) -> Result<(), FormatError> {
    for (index, child) in children.iter().enumerate() {
        let path = format!("{path}.{index}");
        check_placement(parent, child.kind(), &path)?;
        // Void children are placeholders and never checked.
        if !child.kind().is_void() {
            check_children(child.kind(), child.nodes(), &path)?;
        }
    }
    Ok(())
}

fn check_placement(parent: NodeType, child: NodeType, path: &str) -> Result<(), FormatError> {
    let name = child.wire_name();
    let message = match (parent, child) {
        (NodeType::List, NodeType::ListItem) => return Ok(()),
        (_, NodeType::ListItem) => "'listItem' may only appear inside 'list'".to_string(),
        (NodeType::List, _) => format!("'list' may only contain 'listItem', found '{name}'"),
        (NodeType::Root | NodeType::ListItem, NodeType::List) => return Ok(()),
        (_, NodeType::List) => {
            "'list' may only appear at the root or inside a 'listItem'".to_string()
        }
        (NodeType::Link, NodeType::Text) => return Ok(()),
        (NodeType::Link, _) => format!("'link' may only contain text, found '{name}'"),
        (NodeType::Root, _) if !child.is_block() => {
            format!("only block-level nodes may appear at the root, found '{name}'")
        }
        (NodeType::Paragraph | NodeType::Heading, _) if !child.is_inline() => {
            format!("'{}' may only contain inline content, found '{name}'", parent.wire_name())
        }
        (NodeType::Blockquote | NodeType::ListItem, _) if child.is_inline() => {
            format!("'{}' may only contain block content, found '{name}'", parent.wire_name())
        }
        _ => return Ok(()),
    };
    Err(FormatError::StructuralInvariantViolation {
        path: path.to_string(),
        message,
    })
}
