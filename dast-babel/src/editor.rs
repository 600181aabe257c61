//! The editor-side document tree.
//!
//! An editor value is a forest of [`EditorNode`]s: text leaves carrying marks,
//! and typed elements carrying children. This is the shape the interactive
//! editor works with and the pivot every format converts through.
//!
//! # Void elements
//!
//! `thematicBreak`, `code` and `block` never carry content, but the editor
//! runtime expects every element to have at least one child. Void elements
//! therefore always hold exactly one empty text leaf:
//!
//! ```json
//! {"type": "thematicBreak", "children": [{"text": ""}]}
//! ```
//!
//! The constructors below build them that way and [`from_json_str`] normalises
//! whatever children a void element arrives with.
//!
//! # JSON shape
//!
//! - Leaf: `{"text": "...", "marks": ["strong"]}`, `marks` omitted when empty.
//!   Slate-style boolean flags (`{"text": "x", "strong": true}`) are accepted
//!   on input.
//! - Element: `{"type": "...", ...attributes, "children": [...]}`.

use crate::common::attrs::Attrs;
use crate::error::FormatError;
use crate::vocabulary::{HeadingLevel, ListStyle, Mark, NodeType};
use crate::walk::TreeNode;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::BTreeSet;

/// A run of text with its formatting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Leaf {
    pub text: String,
    pub marks: BTreeSet<Mark>,
}

impl Leaf {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: BTreeSet::new(),
        }
    }

    pub fn with_marks(text: impl Into<String>, marks: impl IntoIterator<Item = Mark>) -> Self {
        Self {
            text: text.into(),
            marks: marks.into_iter().collect(),
        }
    }

    /// The placeholder leaf used to keep elements non-empty.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.marks.is_empty()
    }
}

impl Serialize for Leaf {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.marks.is_empty() { 1 } else { 2 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("text", &self.text)?;
        if !self.marks.is_empty() {
            let names: Vec<&str> = self.marks.iter().map(|m| m.editor_name()).collect();
            map.serialize_entry("marks", &names)?;
        }
        map.end()
    }
}

/// An entry of a link's `meta` list (e.g. `target` / `rel`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaEntry {
    pub id: String,
    pub value: String,
}

/// An embedded block record as the editor holds it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockNode {
    /// Side-table id; assigned by the serializer when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub block_model_id: String,
    /// Payload in the shape the block model's handler expects.
    pub payload: Value,
}

/// The element types and their type-specific attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ElementKind {
    Paragraph {
        #[serde(skip_serializing_if = "Option::is_none")]
        style: Option<String>,
    },
    Heading {
        level: HeadingLevel,
        #[serde(skip_serializing_if = "Option::is_none")]
        style: Option<String>,
    },
    Blockquote {
        #[serde(skip_serializing_if = "Option::is_none")]
        attribution: Option<String>,
    },
    List {
        style: ListStyle,
    },
    ListItem,
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
    },
    Block(BlockNode),
}

impl ElementKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            ElementKind::Paragraph { .. } => NodeType::Paragraph,
            ElementKind::Heading { .. } => NodeType::Heading,
            ElementKind::Blockquote { .. } => NodeType::Blockquote,
            ElementKind::List { .. } => NodeType::List,
            ElementKind::ListItem => NodeType::ListItem,
            ElementKind::ThematicBreak => NodeType::ThematicBreak,
            ElementKind::Code { .. } => NodeType::Code,
            ElementKind::Link { .. } => NodeType::Link,
            ElementKind::Block(_) => NodeType::Block,
        }
    }
}

/// A typed element and its children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    #[serde(flatten)]
    pub kind: ElementKind,
    pub children: Vec<EditorNode>,
}

impl Element {
    /// Builds an element, enforcing the children conventions: void elements
    /// get the single empty leaf, other elements get one if they have none.
    pub fn new(kind: ElementKind, children: Vec<EditorNode>) -> Self {
        let children = if kind.node_type().is_void() || children.is_empty() {
            vec![EditorNode::Text(Leaf::empty())]
        } else {
            children
        };
        Self { kind, children }
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    pub fn paragraph(children: Vec<EditorNode>) -> Self {
        Self::new(ElementKind::Paragraph { style: None }, children)
    }

    pub fn heading(level: HeadingLevel, children: Vec<EditorNode>) -> Self {
        Self::new(ElementKind::Heading { level, style: None }, children)
    }

    pub fn blockquote(children: Vec<EditorNode>) -> Self {
        Self::new(ElementKind::Blockquote { attribution: None }, children)
    }

    pub fn list(style: ListStyle, items: Vec<EditorNode>) -> Self {
        Self::new(ElementKind::List { style }, items)
    }

    pub fn list_item(children: Vec<EditorNode>) -> Self {
        Self::new(ElementKind::ListItem, children)
    }

    pub fn thematic_break() -> Self {
        Self::new(ElementKind::ThematicBreak, Vec::new())
    }

    pub fn code(code: impl Into<String>, language: Option<String>) -> Self {
        Self::new(
            ElementKind::Code {
                code: code.into(),
                language,
                highlight: Vec::new(),
            },
            Vec::new(),
        )
    }

    pub fn link(url: impl Into<String>, children: Vec<EditorNode>) -> Self {
        Self::new(
            ElementKind::Link {
                url: url.into(),
                meta: Vec::new(),
            },
            children,
        )
    }

    pub fn block(block: BlockNode) -> Self {
        Self::new(ElementKind::Block(block), Vec::new())
    }
}

/// A node of the editor tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EditorNode {
    Text(Leaf),
    Element(Element),
}

impl EditorNode {
    pub fn text(text: impl Into<String>) -> Self {
        EditorNode::Text(Leaf::new(text))
    }

    pub fn marked(text: impl Into<String>, marks: impl IntoIterator<Item = Mark>) -> Self {
        EditorNode::Text(Leaf::with_marks(text, marks))
    }

    pub fn empty_leaf() -> Self {
        EditorNode::Text(Leaf::empty())
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            EditorNode::Text(_) => NodeType::Text,
            EditorNode::Element(element) => element.node_type(),
        }
    }

    pub fn children(&self) -> &[EditorNode] {
        match self {
            EditorNode::Text(_) => &[],
            EditorNode::Element(element) => &element.children,
        }
    }

    /// Concatenated text of every leaf below this node.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Whether this node is a leaf holding only whitespace.
    pub fn is_blank_text(&self) -> bool {
        matches!(self, EditorNode::Text(leaf) if leaf.text.trim().is_empty())
    }
}

fn collect_text(node: &EditorNode, out: &mut String) {
    match node {
        EditorNode::Text(leaf) => out.push_str(&leaf.text),
        EditorNode::Element(element) => {
            for child in &element.children {
                collect_text(child, out);
            }
        }
    }
}

impl From<Leaf> for EditorNode {
    fn from(leaf: Leaf) -> Self {
        EditorNode::Text(leaf)
    }
}

impl From<Element> for EditorNode {
    fn from(element: Element) -> Self {
        EditorNode::Element(element)
    }
}

impl TreeNode for EditorNode {
    // Void elements are opaque, whatever their `children` field holds.
    fn child_nodes(&self) -> Cow<'_, [Self]> {
        if self.node_type().is_void() {
            return Cow::Borrowed(&[]);
        }
        Cow::Borrowed(self.children())
    }
}

/// A node as it arrives from JSON, before the vocabulary has looked at it.
#[derive(Debug, Deserialize)]
struct RawEditorNode {
    #[serde(rename = "type")]
    node_type: Option<String>,
    text: Option<String>,
    marks: Option<Vec<String>>,
    children: Option<Vec<RawEditorNode>>,
    #[serde(flatten)]
    attrs: Map<String, Value>,
}

impl TryFrom<RawEditorNode> for EditorNode {
    type Error = FormatError;

    fn try_from(raw: RawEditorNode) -> Result<Self, Self::Error> {
        let RawEditorNode {
            node_type,
            text,
            marks,
            children,
            mut attrs,
        } = raw;

        let node_type = match (node_type, &text) {
            (None, Some(_)) => NodeType::Text,
            (Some(name), _) => NodeType::from_editor_name(&name)?,
            (None, None) => {
                return Err(FormatError::invalid_attribute(
                    "node",
                    "type",
                    "element without a type",
                ))
            }
        };

        if node_type == NodeType::Text {
            return leaf_from_raw(text.unwrap_or_default(), marks, attrs).map(EditorNode::Text);
        }

        let name = node_type.editor_name().unwrap_or("node");
        let mut a = Attrs::new(name, &mut attrs);
        let kind = match node_type {
            NodeType::Paragraph => ElementKind::Paragraph {
                style: a.opt_string("style")?,
            },
            NodeType::Heading => ElementKind::Heading {
                level: HeadingLevel::new(a.u8("level")?)?,
                style: a.opt_string("style")?,
            },
            NodeType::Blockquote => ElementKind::Blockquote {
                attribution: a.opt_string("attribution")?,
            },
            NodeType::List => ElementKind::List {
                style: ListStyle::from_name(&a.string("style")?)?,
            },
            NodeType::ListItem => ElementKind::ListItem,
            NodeType::ThematicBreak => ElementKind::ThematicBreak,
            NodeType::Code => ElementKind::Code {
                code: a.opt_string("code")?.unwrap_or_default(),
                language: a.opt_string("language")?,
                highlight: a.u32_list("highlight")?,
            },
            NodeType::Link => ElementKind::Link {
                url: a.string("url")?,
                meta: a.parsed("meta")?,
            },
            NodeType::Block => ElementKind::Block(BlockNode {
                id: a.opt_string("id")?,
                block_model_id: a.string("blockModelId")?,
                payload: a.take("payload").unwrap_or(Value::Null),
            }),
            NodeType::Root | NodeType::Text => {
                return Err(FormatError::UnsupportedNodeType(name.to_string()))
            }
        };

        let leftover = a.leftover();
        if !leftover.is_empty() {
            tracing::debug!(node = name, ?leftover, "ignoring unknown editor attributes");
        }

        let children = if node_type.is_void() {
            Vec::new()
        } else {
            children
                .unwrap_or_default()
                .into_iter()
                .map(EditorNode::try_from)
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(EditorNode::Element(Element::new(kind, children)))
    }
}

fn leaf_from_raw(
    text: String,
    marks: Option<Vec<String>>,
    flags: Map<String, Value>,
) -> Result<Leaf, FormatError> {
    let mut set = BTreeSet::new();
    for name in marks.unwrap_or_default() {
        set.insert(Mark::from_editor_name(&name)?);
    }
    for (name, value) in flags {
        let mark = Mark::from_editor_name(&name)?;
        match value {
            Value::Bool(true) => {
                set.insert(mark);
            }
            Value::Bool(false) | Value::Null => {}
            other => {
                return Err(FormatError::invalid_attribute(
                    "text",
                    name,
                    format!("expected a boolean mark flag, found {other}"),
                ))
            }
        }
    }
    Ok(Leaf { text, marks: set })
}

impl<'de> Deserialize<'de> for EditorNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawEditorNode::deserialize(deserializer)?;
        EditorNode::try_from(raw).map_err(serde::de::Error::custom)
    }
}

/// Reads an editor value (a JSON array of nodes).
///
/// Unlike going through `serde_json::from_str` directly, vocabulary failures
/// keep their [`FormatError`] variant.
pub fn from_json_str(source: &str) -> Result<Vec<EditorNode>, FormatError> {
    let raw: Vec<RawEditorNode> = serde_json::from_str(source)?;
    raw.into_iter().map(EditorNode::try_from).collect()
}

/// Writes an editor value as a JSON array.
pub fn to_json_string(value: &[EditorNode], pretty: bool) -> Result<String, FormatError> {
    crate::format::to_json(value, pretty)
}
