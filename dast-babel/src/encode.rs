//! Editor tree to Dast wire document.
//!
//! # The Algorithm
//!
//! 1. **Optional validation:** when [`EncodeOptions::validate_structure`] is
//!    set, the editor value is checked against the nesting rules first. The
//!    editor runtime is trusted by default.
//!
//! 2. **Walking:** the value is walked post-order. Every element maps to the
//!    wire node of the same type, every leaf to a span whose marks are written
//!    in canonical order. Children of void elements are discarded.
//!
//! 3. **Blocks:** a `block` element hands its payload to the handler
//!    registered for its model. The resulting record goes into the side-table
//!    and the element is replaced by a `{"type": "block", "item": id}`
//!    reference. Blocks without an id receive a synthetic one (see below).
//!
//! 4. **Completion:** the side-table is returned alongside the document. Any
//!    failure aborts the whole call; no partially encoded document escapes.
//!
//! # Synthetic ids
//!
//! The id is derived from the block's content rather than from a counter or a
//! random source, so encoding an unchanged document twice yields byte-identical
//! output. It is the first 22 hex digits of a BLAKE3 hash over the model id,
//! the canonical payload JSON, and the number of earlier blocks in the same
//! document with identical model and payload.

use crate::blocks::BlockRegistry;
use crate::editor::{BlockNode, EditorNode, Element, ElementKind};
use crate::error::FormatError;
use crate::validate;
use crate::walk::{walk_forest, Walked};
use crate::wire::{BlockRecord, StructuredText, WireDocument, WireNode};
use serde_json::Value;
use std::collections::HashMap;

/// Length of a synthetic block id, in hex digits.
pub const SYNTHETIC_ID_LEN: usize = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeOptions {
    /// Check nesting rules before encoding.
    pub validate_structure: bool,
}

/// Encodes an editor value into a wire document and its block side-table.
pub fn encode(
    value: &[EditorNode],
    blocks: &BlockRegistry,
    options: &EncodeOptions,
) -> Result<StructuredText, FormatError> {
    if options.validate_structure {
        validate::check_editor(value)?;
    }

    let mut table = SideTable::new(blocks);
    let children = walk_forest(value, &mut |node: &EditorNode, children: Vec<WireNode>| {
        encode_node(node, children, &mut table)
    })?;
    let records = table.into_records();

    tracing::debug!(
        nodes = children.len(),
        blocks = records.len(),
        "encoded editor value"
    );
    Ok(StructuredText {
        value: WireDocument::new(children),
        blocks: records,
    })
}

fn encode_node(
    node: &EditorNode,
    children: Vec<WireNode>,
    table: &mut SideTable<'_>,
) -> Result<Walked<WireNode>, FormatError> {
    let element = match node {
        EditorNode::Text(leaf) => {
            return Ok(Walked::One(WireNode::Span {
                value: leaf.text.clone(),
                marks: leaf.marks.clone(),
            }))
        }
        EditorNode::Element(element) => element,
    };

    let Element { kind, .. } = element;
    let wire = match kind {
        ElementKind::Paragraph { style } => WireNode::Paragraph {
            style: style.clone(),
            children,
        },
        ElementKind::Heading { level, style } => WireNode::Heading {
            level: *level,
            style: style.clone(),
            children,
        },
        ElementKind::Blockquote { attribution } => WireNode::Blockquote {
            attribution: attribution.clone(),
            children,
        },
        ElementKind::List { style } => WireNode::List {
            style: *style,
            children,
        },
        ElementKind::ListItem => WireNode::ListItem { children },
        ElementKind::ThematicBreak => WireNode::ThematicBreak,
        ElementKind::Code {
            code,
            language,
            highlight,
        } => WireNode::Code {
            code: code.clone(),
            language: language.clone(),
            highlight: highlight.clone(),
        },
        ElementKind::Link { url, meta } => WireNode::Link {
            url: url.clone(),
            meta: meta.clone(),
            children,
        },
        ElementKind::Block(block) => WireNode::Block {
            item: table.insert(block)?,
        },
    };
    Ok(Walked::One(wire))
}

/// Side-table under construction.
struct SideTable<'r> {
    registry: &'r BlockRegistry,
    records: Vec<BlockRecord>,
    by_id: HashMap<String, usize>,
    /// How many blocks with a given content hash have been seen so far.
    ordinals: HashMap<String, usize>,
}

impl<'r> SideTable<'r> {
    fn new(registry: &'r BlockRegistry) -> Self {
        Self {
            registry,
            records: Vec::new(),
            by_id: HashMap::new(),
            ordinals: HashMap::new(),
        }
    }

    /// Adds a block's record and returns the id the tree should reference.
    fn insert(&mut self, block: &BlockNode) -> Result<String, FormatError> {
        let payload = self
            .registry
            .encode(&block.block_model_id, &block.payload)?;

        let id = match &block.id {
            Some(id) if !id.is_empty() => id.clone(),
            _ => self.synthetic_id(&block.block_model_id, &block.payload),
        };

        if let Some(&index) = self.by_id.get(&id) {
            let existing = &self.records[index];
            if existing.block_model_id == block.block_model_id && existing.payload == payload {
                return Ok(id);
            }
            return Err(FormatError::DuplicateBlockEntry(id));
        }

        self.by_id.insert(id.clone(), self.records.len());
        self.records.push(BlockRecord {
            id: id.clone(),
            block_model_id: block.block_model_id.clone(),
            payload,
        });
        Ok(id)
    }

    fn synthetic_id(&mut self, model: &str, payload: &Value) -> String {
        // serde_json keeps object keys sorted, so this rendering is canonical.
        let canonical = payload.to_string();
        let content = blake3::Hasher::new()
            .update(model.as_bytes())
            .update(&[0])
            .update(canonical.as_bytes())
            .finalize()
            .to_hex()
            .to_string();

        let ordinal = self.ordinals.entry(content).or_insert(0);
        let seen = *ordinal as u64;
        *ordinal += 1;

        let id = blake3::Hasher::new()
            .update(model.as_bytes())
            .update(&[0])
            .update(canonical.as_bytes())
            .update(&[0])
            .update(&seen.to_le_bytes())
            .finalize()
            .to_hex();
        id.as_str()[..SYNTHETIC_ID_LEN].to_string()
    }

    fn into_records(self) -> Vec<BlockRecord> {
        self.records
    }
}
