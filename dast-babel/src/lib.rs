//! Rich-text conversion between editor trees and DatoCMS structured text
//!
//!     This crate converts the document tree of the interactive rich-text editor to and from
//!     "Dast", the JSON tree DatoCMS stores for structured text fields, and imports externally
//!     authored HTML into the editor tree.
//!
//!     TLDR:
//!         - The editor value (`Vec<EditorNode>`) is the pivot. Every format parses into it and
//!           serializes from it.
//!         - Encode (editor → Dast) and decode (Dast → editor) are pure functions: no I/O, no
//!           shared state, no partial output on failure.
//!         - The wire path is strict (unknown types, marks and block references fail), the HTML
//!           path is lenient (unknown tags are unwrapped).
//!
//!     This is a pure lib, that is, it powers dast-cli but is shell agnostic: no code here
//!     prints, reads env vars, or touches the file system.
//!
//! Architecture
//!
//!     The file structure :
//!     .
//!     ├── error.rs                # FormatError, the one error type
//!     ├── vocabulary.rs           # Node types and marks, editor ↔ wire names
//!     ├── walk.rs                 # Post-order tree walker with fan-out
//!     ├── editor.rs               # Editor tree and its JSON codec
//!     ├── wire.rs                 # Dast tree, side-table records, StructuredText
//!     ├── blocks                  # Embedded block registry (BlockHandler per block model)
//!     ├── encode.rs               # Editor → Dast
//!     ├── decode.rs               # Dast → editor
//!     ├── validate.rs             # Nesting rules shared by both trees
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── formats
//!     │   ├── editor              # Editor JSON
//!     │   ├── dast                # Dast bundle (encode / decode)
//!     │   └── html                # HTML import
//!     └── common                  # Attribute access, import normalisation
//!
//! Core Algorithms
//!
//!     Everything that converts one tree into another is written as a visitor over the generic
//!     walker in walk.rs. The walker owns recursion and child ordering, the visitor decides what
//!     a single node becomes given its already converted children. Because a visitor may return
//!     zero, one or many nodes, flattening (an unwrapped HTML tag) and splicing (a `<br>` turning
//!     into a newline leaf) need no special cases.
//!
//!     All names live in the tables of vocabulary.rs. Adding a node type or a mark is one table
//!     entry plus the enum variants the compiler then asks for.
//!
//! Embedded Blocks
//!
//!     CMS records inlined in the text (images, for now) are `block` elements in the editor and
//!     `{"type": "block", "item": id}` references plus a side-table entry on the wire. The shape
//!     of each record is owned by a BlockHandler registered under its block model id, so new
//!     block kinds never touch the encoder or decoder. See ./blocks/mod.rs.
//!
//! Formats
//!
//!     Format specific capabilities are implemented with the Format trait. Formats have a name,
//!     file extensions, and parse() and/or serialize() methods. See the trait def [./format.rs]
//!     - Format trait: Uniform interface for all formats (parsing and/or serialization)
//!     - FormatRegistry: Centralized discovery and selection of formats
//!     - Format implementations: editor, dast, html (import only)
//!
//! Testing
//!     tests
//!     └── <area>
//!         └── <testname>.rs
//!
//!     Note that rust does not by default discover tests in subdirectories, so these are
//!     included from tests/lib.rs.

pub mod blocks;
pub mod decode;
pub mod editor;
pub mod encode;
pub mod error;
pub mod format;
pub mod formats;
pub mod registry;
pub mod validate;
pub mod vocabulary;
pub mod walk;
pub mod wire;

mod common;

pub use blocks::{
    BlockHandler, BlockRegistry, ImageBlock, ImagePayload, PassthroughBlock, UploadedImage,
};
pub use decode::{decode, DecodeOptions};
pub use editor::{BlockNode, EditorNode, Element, ElementKind, Leaf, MetaEntry};
pub use encode::{encode, EncodeOptions};
pub use error::FormatError;
pub use format::{Format, FormatOptions};
pub use formats::html::{import_html, ImportOptions};
pub use registry::FormatRegistry;
pub use vocabulary::{to_editor_type, to_wire_type, HeadingLevel, ListStyle, Mark, NodeType};
pub use wire::{BlockRecord, StructuredText, WireDocument, WireNode};
