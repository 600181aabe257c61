//! The Dast wire tree.
//!
//! This is the JSON shape DatoCMS stores for structured text fields:
//!
//! ```json
//! {
//!   "value": {
//!     "schema": "dast",
//!     "document": {"type": "root", "children": [...]}
//!   },
//!   "blocks": [{"id": "...", "blockModelId": "ImageRecord", "content": {...}}]
//! }
//! ```
//!
//! `value` is the [`WireDocument`]; `blocks` is the side-table of embedded
//! records referenced from `block` nodes by id. Together they form a
//! [`StructuredText`].
//!
//! Text spans are written with `"type": "span"`. On input, a node without a
//! `type` but with a string `value` is read as a span as well.

use crate::common::attrs::Attrs;
use crate::editor::MetaEntry;
use crate::error::FormatError;
use crate::vocabulary::{HeadingLevel, ListStyle, Mark, NodeType};
use crate::walk::TreeNode;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::BTreeSet;

/// The only schema this crate reads and writes.
pub const SCHEMA: &str = "dast";

/// A node below the document root.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WireNode {
    Paragraph {
        #[serde(skip_serializing_if = "Option::is_none")]
        style: Option<String>,
        children: Vec<WireNode>,
    },
    Heading {
        level: HeadingLevel,
        #[serde(skip_serializing_if = "Option::is_none")]
        style: Option<String>,
        children: Vec<WireNode>,
    },
    Blockquote {
        #[serde(skip_serializing_if = "Option::is_none")]
        attribution: Option<String>,
        children: Vec<WireNode>,
    },
    List {
        style: ListStyle,
        children: Vec<WireNode>,
    },
    ListItem {
        children: Vec<WireNode>,
    },
    ThematicBreak,
    Code {
        code: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        highlight: Vec<u32>,
    },
    Link {
        url: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        meta: Vec<MetaEntry>,
        children: Vec<WireNode>,
    },
    Block {
        item: String,
    },
    Span {
        value: String,
        #[serde(
            skip_serializing_if = "BTreeSet::is_empty",
            serialize_with = "serialize_wire_marks"
        )]
        marks: BTreeSet<Mark>,
    },
}

fn serialize_wire_marks<S: Serializer>(
    marks: &BTreeSet<Mark>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(marks.iter().map(|m| m.wire_name()))
}

impl WireNode {
    pub fn span(value: impl Into<String>, marks: impl IntoIterator<Item = Mark>) -> Self {
        WireNode::Span {
            value: value.into(),
            marks: marks.into_iter().collect(),
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            WireNode::Paragraph { .. } => NodeType::Paragraph,
            WireNode::Heading { .. } => NodeType::Heading,
            WireNode::Blockquote { .. } => NodeType::Blockquote,
            WireNode::List { .. } => NodeType::List,
            WireNode::ListItem { .. } => NodeType::ListItem,
            WireNode::ThematicBreak => NodeType::ThematicBreak,
            WireNode::Code { .. } => NodeType::Code,
            WireNode::Link { .. } => NodeType::Link,
            WireNode::Block { .. } => NodeType::Block,
            WireNode::Span { .. } => NodeType::Text,
        }
    }

    pub fn children(&self) -> &[WireNode] {
        match self {
            WireNode::Paragraph { children, .. }
            | WireNode::Heading { children, .. }
            | WireNode::Blockquote { children, .. }
            | WireNode::List { children, .. }
            | WireNode::ListItem { children }
            | WireNode::Link { children, .. } => children,
            WireNode::ThematicBreak
            | WireNode::Code { .. }
            | WireNode::Block { .. }
            | WireNode::Span { .. } => &[],
        }
    }
}

impl TreeNode for WireNode {
    fn child_nodes(&self) -> Cow<'_, [Self]> {
        Cow::Borrowed(self.children())
    }
}

/// The `root` node of a document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WireRoot {
    pub children: Vec<WireNode>,
}

impl Serialize for WireRoot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut root = serializer.serialize_struct("WireRoot", 2)?;
        root.serialize_field("type", NodeType::Root.wire_name())?;
        root.serialize_field("children", &self.children)?;
        root.end()
    }
}

/// `{"schema": "dast", "document": {...}}`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WireDocument {
    pub document: WireRoot,
}

impl WireDocument {
    pub fn new(children: Vec<WireNode>) -> Self {
        Self {
            document: WireRoot { children },
        }
    }
}

impl Serialize for WireDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut doc = serializer.serialize_struct("WireDocument", 2)?;
        doc.serialize_field("schema", SCHEMA)?;
        doc.serialize_field("document", &self.document)?;
        doc.end()
    }
}

/// One entry of the block side-table.
///
/// The payload fields are flattened into the record, so an image reads
/// `{"id": "...", "blockModelId": "ImageRecord", "content": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    pub id: String,
    pub block_model_id: String,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

/// A wire document together with its block side-table.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StructuredText {
    pub value: WireDocument,
    pub blocks: Vec<BlockRecord>,
}

impl StructuredText {
    /// Finds a side-table record by id.
    pub fn block(&self, id: &str) -> Option<&BlockRecord> {
        self.blocks.iter().find(|record| record.id == id)
    }
}

#[derive(Debug, Deserialize)]
struct RawWireNode {
    #[serde(rename = "type")]
    node_type: Option<String>,
    children: Option<Vec<RawWireNode>>,
    marks: Option<Vec<String>>,
    #[serde(flatten)]
    attrs: Map<String, Value>,
}

impl TryFrom<RawWireNode> for WireNode {
    type Error = FormatError;

    fn try_from(raw: RawWireNode) -> Result<Self, Self::Error> {
        let RawWireNode {
            node_type,
            children,
            marks,
            mut attrs,
        } = raw;

        let node_type = match node_type {
            Some(name) => NodeType::from_wire_name(&name)?,
            None if matches!(attrs.get("value"), Some(Value::String(_))) => NodeType::Text,
            None => {
                return Err(FormatError::invalid_attribute(
                    "node",
                    "type",
                    "node without a type",
                ))
            }
        };

        let name = node_type.wire_name();
        let children = || -> Result<Vec<WireNode>, FormatError> {
            children
                .unwrap_or_default()
                .into_iter()
                .map(WireNode::try_from)
                .collect()
        };

        let mut a = Attrs::new(name, &mut attrs);
        let node = match node_type {
            NodeType::Root => {
                return Err(FormatError::StructuralInvariantViolation {
                    path: "document".to_string(),
                    message: "'root' may only appear as the document node".to_string(),
                })
            }
            NodeType::Text => {
                let mut set = BTreeSet::new();
                for mark in marks.unwrap_or_default() {
                    set.insert(Mark::from_wire_name(&mark)?);
                }
                WireNode::Span {
                    value: a.string("value")?,
                    marks: set,
                }
            }
            NodeType::Paragraph => WireNode::Paragraph {
                style: a.opt_string("style")?,
                children: children()?,
            },
            NodeType::Heading => WireNode::Heading {
                level: HeadingLevel::new(a.u8("level")?)?,
                style: a.opt_string("style")?,
                children: children()?,
            },
            NodeType::Blockquote => WireNode::Blockquote {
                attribution: a.opt_string("attribution")?,
                children: children()?,
            },
            NodeType::List => WireNode::List {
                style: ListStyle::from_name(&a.string("style")?)?,
                children: children()?,
            },
            NodeType::ListItem => WireNode::ListItem {
                children: children()?,
            },
            NodeType::ThematicBreak => WireNode::ThematicBreak,
            NodeType::Code => WireNode::Code {
                code: a.string("code")?,
                language: a.opt_string("language")?,
                highlight: a.u32_list("highlight")?,
            },
            NodeType::Link => WireNode::Link {
                url: a.string("url")?,
                meta: a.parsed("meta")?,
                children: children()?,
            },
            NodeType::Block => WireNode::Block {
                item: a.string("item")?,
            },
        };

        let leftover = a.leftover();
        if !leftover.is_empty() {
            tracing::debug!(node = name, ?leftover, "ignoring unknown wire attributes");
        }
        Ok(node)
    }
}

impl<'de> Deserialize<'de> for WireNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawWireNode::deserialize(deserializer)?;
        WireNode::try_from(raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Deserialize)]
struct RawWireDocument {
    schema: String,
    document: RawWireNode,
}

impl TryFrom<RawWireDocument> for WireDocument {
    type Error = FormatError;

    fn try_from(raw: RawWireDocument) -> Result<Self, Self::Error> {
        if raw.schema != SCHEMA {
            return Err(FormatError::UnsupportedSchema(raw.schema));
        }
        let root = raw.document;
        match root.node_type.as_deref() {
            Some("root") => {}
            Some(other) => {
                NodeType::from_wire_name(other)?;
                return Err(FormatError::StructuralInvariantViolation {
                    path: "document".to_string(),
                    message: format!("expected 'root', found '{other}'"),
                });
            }
            None => {
                return Err(FormatError::invalid_attribute(
                    "document",
                    "type",
                    "document node without a type",
                ))
            }
        }
        let children = root
            .children
            .unwrap_or_default()
            .into_iter()
            .map(WireNode::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(WireDocument::new(children))
    }
}

#[derive(Debug, Deserialize)]
struct RawStructuredText {
    value: RawWireDocument,
    #[serde(default)]
    blocks: Vec<BlockRecord>,
}

impl TryFrom<RawStructuredText> for StructuredText {
    type Error = FormatError;

    fn try_from(raw: RawStructuredText) -> Result<Self, Self::Error> {
        Ok(StructuredText {
            value: WireDocument::try_from(raw.value)?,
            blocks: raw.blocks,
        })
    }
}

impl<'de> Deserialize<'de> for StructuredText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawStructuredText::deserialize(deserializer)?;
        StructuredText::try_from(raw).map_err(serde::de::Error::custom)
    }
}

/// Reads a structured text bundle.
///
/// Accepts either the full `{"value": ..., "blocks": [...]}` bundle or a bare
/// `{"schema": "dast", "document": ...}` document, which then has an empty
/// side-table.
pub fn from_json_str(source: &str) -> Result<StructuredText, FormatError> {
    let value: Value = serde_json::from_str(source)?;
    if value.get("schema").is_some() {
        let raw: RawWireDocument = serde_json::from_value(value)?;
        Ok(StructuredText {
            value: WireDocument::try_from(raw)?,
            blocks: Vec::new(),
        })
    } else {
        let raw: RawStructuredText = serde_json::from_value(value)?;
        StructuredText::try_from(raw)
    }
}

/// Writes a structured text bundle.
pub fn to_json_string(doc: &StructuredText, pretty: bool) -> Result<String, FormatError> {
    crate::format::to_json(doc, pretty)
}
