//! Mark and node vocabulary shared by every conversion path.
//!
//! The editor tree and the Dast wire tree speak slightly different languages.
//! This module is the single place where the names of both sides are listed
//! and paired up, so adding a node type or a mark is one new table row rather
//! than a new case in every converter.
//!
//! | Node          | Editor `type`   | Wire `type`     | Void | Inline |
//! |---------------|-----------------|-----------------|------|--------|
//! | Root          | -               | `root`          |      |        |
//! | Paragraph     | `paragraph`     | `paragraph`     |      |        |
//! | Heading       | `heading`       | `heading`       |      |        |
//! | Blockquote    | `blockquote`    | `blockquote`    |      |        |
//! | List          | `list`          | `list`          |      |        |
//! | ListItem      | `listItem`      | `listItem`      |      |        |
//! | ThematicBreak | `thematicBreak` | `thematicBreak` | yes  |        |
//! | Code          | `code`          | `code`          | yes  |        |
//! | Link          | `link`          | `link`          |      | yes    |
//! | Block         | `block`         | `block`         | yes  |        |
//! | Text          | `text`          | `span`          |      | yes    |
//!
//! Marks use the same names on both sides today, but the pairing still goes
//! through [`MARKS`] so the two vocabularies can drift independently.

use crate::error::FormatError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inline formatting attached to a text run.
///
/// The declaration order is the canonical serialization order, and `Ord`
/// follows it, so a `BTreeSet<Mark>` always iterates canonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mark {
    Strong,
    Code,
    Emphasis,
    Underline,
    Strikethrough,
    Highlight,
}

/// `(mark, editor name, wire name)`
const MARKS: &[(Mark, &str, &str)] = &[
    (Mark::Strong, "strong", "strong"),
    (Mark::Code, "code", "code"),
    (Mark::Emphasis, "emphasis", "emphasis"),
    (Mark::Underline, "underline", "underline"),
    (Mark::Strikethrough, "strikethrough", "strikethrough"),
    (Mark::Highlight, "highlight", "highlight"),
];

impl Mark {
    /// Every mark, in canonical order.
    pub const ALL: [Mark; 6] = [
        Mark::Strong,
        Mark::Code,
        Mark::Emphasis,
        Mark::Underline,
        Mark::Strikethrough,
        Mark::Highlight,
    ];

    fn entry(self) -> &'static (Mark, &'static str, &'static str) {
        // MARKS lists every variant in declaration order.
        &MARKS[self as usize]
    }

    pub fn editor_name(self) -> &'static str {
        self.entry().1
    }

    pub fn wire_name(self) -> &'static str {
        self.entry().2
    }

    pub fn from_editor_name(name: &str) -> Result<Mark, FormatError> {
        MARKS
            .iter()
            .find(|(_, editor, _)| *editor == name)
            .map(|(mark, _, _)| *mark)
            .ok_or_else(|| FormatError::UnsupportedMark(name.to_string()))
    }

    pub fn from_wire_name(name: &str) -> Result<Mark, FormatError> {
        MARKS
            .iter()
            .find(|(_, _, wire)| *wire == name)
            .map(|(mark, _, _)| *mark)
            .ok_or_else(|| FormatError::UnsupportedMark(name.to_string()))
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.editor_name())
    }
}

/// Every node type known to either tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Root,
    Paragraph,
    Heading,
    Blockquote,
    List,
    ListItem,
    ThematicBreak,
    Code,
    Link,
    Block,
    Text,
}

struct NodeTypeEntry {
    node: NodeType,
    editor: Option<&'static str>,
    wire: &'static str,
    void: bool,
    inline: bool,
}

const NODE_TYPES: &[NodeTypeEntry] = &[
    NodeTypeEntry {
        node: NodeType::Root,
        editor: None,
        wire: "root",
        void: false,
        inline: false,
    },
    NodeTypeEntry {
        node: NodeType::Paragraph,
        editor: Some("paragraph"),
        wire: "paragraph",
        void: false,
        inline: false,
    },
    NodeTypeEntry {
        node: NodeType::Heading,
        editor: Some("heading"),
        wire: "heading",
        void: false,
        inline: false,
    },
    NodeTypeEntry {
        node: NodeType::Blockquote,
        editor: Some("blockquote"),
        wire: "blockquote",
        void: false,
        inline: false,
    },
    NodeTypeEntry {
        node: NodeType::List,
        editor: Some("list"),
        wire: "list",
        void: false,
        inline: false,
    },
    NodeTypeEntry {
        node: NodeType::ListItem,
        editor: Some("listItem"),
        wire: "listItem",
        void: false,
        inline: false,
    },
    NodeTypeEntry {
        node: NodeType::ThematicBreak,
        editor: Some("thematicBreak"),
        wire: "thematicBreak",
        void: true,
        inline: false,
    },
    NodeTypeEntry {
        node: NodeType::Code,
        editor: Some("code"),
        wire: "code",
        void: true,
        inline: false,
    },
    NodeTypeEntry {
        node: NodeType::Link,
        editor: Some("link"),
        wire: "link",
        void: false,
        inline: true,
    },
    NodeTypeEntry {
        node: NodeType::Block,
        editor: Some("block"),
        wire: "block",
        void: true,
        inline: false,
    },
    NodeTypeEntry {
        node: NodeType::Text,
        editor: Some("text"),
        wire: "span",
        void: false,
        inline: true,
    },
];

impl NodeType {
    fn entry(self) -> &'static NodeTypeEntry {
        // NODE_TYPES lists every variant in declaration order.
        &NODE_TYPES[self as usize]
    }

    /// Name used by the editor tree, if the node exists there.
    pub fn editor_name(self) -> Option<&'static str> {
        self.entry().editor
    }

    pub fn wire_name(self) -> &'static str {
        self.entry().wire
    }

    /// Void nodes never carry meaningful children.
    pub fn is_void(self) -> bool {
        self.entry().void
    }

    /// Inline nodes may only appear inside paragraphs, headings and links.
    pub fn is_inline(self) -> bool {
        self.entry().inline
    }

    pub fn is_block(self) -> bool {
        !self.is_inline() && self != NodeType::Root
    }

    pub fn from_editor_name(name: &str) -> Result<NodeType, FormatError> {
        NODE_TYPES
            .iter()
            .find(|entry| entry.editor == Some(name))
            .map(|entry| entry.node)
            .ok_or_else(|| FormatError::UnsupportedNodeType(name.to_string()))
    }

    pub fn from_wire_name(name: &str) -> Result<NodeType, FormatError> {
        NODE_TYPES
            .iter()
            .find(|entry| entry.wire == name)
            .map(|entry| entry.node)
            .ok_or_else(|| FormatError::UnsupportedNodeType(name.to_string()))
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Maps an editor node type name to its wire counterpart.
pub fn to_wire_type(editor_type: &str) -> Result<&'static str, FormatError> {
    NodeType::from_editor_name(editor_type).map(NodeType::wire_name)
}

/// Maps a wire node type name to its editor counterpart.
///
/// `root` has no editor counterpart (the editor value is a bare forest) and is
/// rejected like any unknown name.
pub fn to_editor_type(wire_type: &str) -> Result<&'static str, FormatError> {
    NodeType::from_wire_name(wire_type)?
        .editor_name()
        .ok_or_else(|| FormatError::UnsupportedNodeType(wire_type.to_string()))
}

/// Bullet style of a list, identical on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    Bulleted,
    Numbered,
}

impl ListStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            ListStyle::Bulleted => "bulleted",
            ListStyle::Numbered => "numbered",
        }
    }

    pub fn from_name(name: &str) -> Result<ListStyle, FormatError> {
        match name {
            "bulleted" => Ok(ListStyle::Bulleted),
            "numbered" => Ok(ListStyle::Numbered),
            other => Err(FormatError::invalid_attribute(
                "list",
                "style",
                format!("expected 'bulleted' or 'numbered', found '{other}'"),
            )),
        }
    }
}

/// Heading level, always within `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    pub fn new(level: u8) -> Result<HeadingLevel, FormatError> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(HeadingLevel(level))
        } else {
            Err(FormatError::invalid_attribute(
                "heading",
                "level",
                format!("expected 1-6, found {level}"),
            ))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = FormatError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        HeadingLevel::new(level)
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> u8 {
        level.0
    }
}
