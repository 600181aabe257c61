//! Dast format implementation
//!
//! The structured text bundle DatoCMS stores: a `dast` document plus the
//! block side-table. Parsing decodes it into an editor value, serializing
//! encodes an editor value into it.
//!
//! Pipeline:
//! - parse: JSON → [`StructuredText`](crate::wire::StructuredText) → [`decode`] → editor value
//! - serialize: editor value → [`encode`] → `StructuredText` → JSON

use crate::blocks::BlockRegistry;
use crate::decode::{decode, DecodeOptions};
use crate::editor::EditorNode;
use crate::encode::{encode, EncodeOptions};
use crate::error::FormatError;
use crate::format::{Format, FormatOptions};
use crate::wire;
use std::sync::Arc;

/// Format implementation for Dast structured text
pub struct DastFormat {
    blocks: Arc<BlockRegistry>,
    encode: EncodeOptions,
    decode: DecodeOptions,
    pretty: bool,
}

impl DastFormat {
    pub fn new(blocks: Arc<BlockRegistry>, options: &FormatOptions) -> Self {
        Self {
            blocks,
            encode: options.encode,
            decode: options.decode,
            pretty: options.pretty,
        }
    }
}

impl Default for DastFormat {
    fn default() -> Self {
        Self::new(
            Arc::new(BlockRegistry::with_defaults()),
            &FormatOptions::default(),
        )
    }
}

impl Format for DastFormat {
    fn name(&self) -> &str {
        "dast"
    }

    fn description(&self) -> &str {
        "DatoCMS structured text (dast document and block side-table)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["dast"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Vec<EditorNode>, FormatError> {
        let doc = wire::from_json_str(source)?;
        decode(&doc, &self.blocks, &self.decode)
    }

    fn serialize(&self, value: &[EditorNode]) -> Result<String, FormatError> {
        let doc = encode(value, &self.blocks, &self.encode)?;
        wire::to_json_string(&doc, self.pretty)
    }
}
