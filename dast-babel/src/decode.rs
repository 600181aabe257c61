//! Dast wire document to editor tree.
//!
//! The wire path is strict: every node, mark and block reference must be
//! known. Unknown types and marks are already rejected while reading the JSON
//! (see [`crate::wire`]); this module resolves block references and rebuilds
//! the editor conventions the wire format does not carry.
//!
//! # The Algorithm
//!
//! 1. **Validation:** with [`DecodeOptions::validate_structure`] (the default)
//!    the document is checked against the nesting rules.
//! 2. **Side-table index:** records are indexed by id. Two records sharing an
//!    id are a [`FormatError::DuplicateBlockEntry`].
//! 3. **Walking:** spans become leaves, elements become editor elements. An
//!    element without children gets one empty leaf, and void elements always
//!    hold exactly that.
//! 4. **Blocks:** each `block` reference is resolved through the index
//!    ([`FormatError::MissingBlockEntry`] when absent) and its record is handed
//!    to the registered handler, which returns the payload unchanged.
//! 5. **Orphans:** records nobody referenced are reported and ignored.

use crate::blocks::BlockRegistry;
use crate::editor::{BlockNode, EditorNode, Element, ElementKind, Leaf};
use crate::error::FormatError;
use crate::validate;
use crate::walk::{walk_forest, Walked};
use crate::wire::{BlockRecord, StructuredText, WireNode};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Check nesting rules before decoding.
    pub validate_structure: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            validate_structure: true,
        }
    }
}

/// Decodes a wire document and its side-table into an editor value.
pub fn decode(
    doc: &StructuredText,
    blocks: &BlockRegistry,
    options: &DecodeOptions,
) -> Result<Vec<EditorNode>, FormatError> {
    if options.validate_structure {
        validate::check_wire(&doc.value)?;
    }

    let index = index_records(&doc.blocks)?;
    let mut referenced = HashSet::new();
    let value = walk_forest(
        &doc.value.document.children,
        &mut |node: &WireNode, children: Vec<EditorNode>| {
            decode_node(node, children, &index, blocks, &mut referenced)
        },
    )?;

    for record in &doc.blocks {
        if !referenced.contains(&record.id) {
            tracing::warn!(
                id = %record.id,
                model = %record.block_model_id,
                "side-table record is never referenced"
            );
        }
    }

    tracing::debug!(
        nodes = value.len(),
        blocks = referenced.len(),
        "decoded wire document"
    );
    Ok(value)
}

fn index_records(records: &[BlockRecord]) -> Result<HashMap<&str, &BlockRecord>, FormatError> {
    let mut index = HashMap::with_capacity(records.len());
    for record in records {
        if index.insert(record.id.as_str(), record).is_some() {
            return Err(FormatError::DuplicateBlockEntry(record.id.clone()));
        }
    }
    Ok(index)
}

fn decode_node(
    node: &WireNode,
    children: Vec<EditorNode>,
    index: &HashMap<&str, &BlockRecord>,
    blocks: &BlockRegistry,
    referenced: &mut HashSet<String>,
) -> Result<Walked<EditorNode>, FormatError> {
    let kind = match node {
        WireNode::Span { value, marks } => {
            return Ok(Walked::One(EditorNode::Text(Leaf {
                text: value.clone(),
                marks: marks.clone(),
            })))
        }
        WireNode::Paragraph { style, .. } => ElementKind::Paragraph {
            style: style.clone(),
        },
        WireNode::Heading { level, style, .. } => ElementKind::Heading {
            level: *level,
            style: style.clone(),
        },
        WireNode::Blockquote { attribution, .. } => ElementKind::Blockquote {
            attribution: attribution.clone(),
        },
        WireNode::List { style, .. } => ElementKind::List { style: *style },
        WireNode::ListItem { .. } => ElementKind::ListItem,
        WireNode::ThematicBreak => ElementKind::ThematicBreak,
        WireNode::Code {
            code,
            language,
            highlight,
        } => ElementKind::Code {
            code: code.clone(),
            language: language.clone(),
            highlight: highlight.clone(),
        },
        WireNode::Link { url, meta, .. } => ElementKind::Link {
            url: url.clone(),
            meta: meta.clone(),
        },
        WireNode::Block { item } => {
            let record = index
                .get(item.as_str())
                .ok_or_else(|| FormatError::MissingBlockEntry(item.clone()))?;
            let payload = blocks.decode(&record.block_model_id, &record.payload)?;
            referenced.insert(item.clone());
            ElementKind::Block(BlockNode {
                id: Some(item.clone()),
                block_model_id: record.block_model_id.clone(),
                payload,
            })
        }
    };
    Ok(Walked::One(EditorNode::Element(Element::new(kind, children))))
}
