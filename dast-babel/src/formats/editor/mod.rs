//! Editor format implementation
//!
//! The editor value as JSON, exactly as the rich-text editor hands it over on
//! save. Parsing and serializing are lossless.

use crate::editor::{self, EditorNode};
use crate::error::FormatError;
use crate::format::Format;

/// Format implementation for editor JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct EditorFormat {
    pretty: bool,
}

impl EditorFormat {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Format for EditorFormat {
    fn name(&self) -> &str {
        "editor"
    }

    fn description(&self) -> &str {
        "Rich-text editor value (JSON array of nodes)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["slate"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Vec<EditorNode>, FormatError> {
        editor::from_json_str(source)
    }

    fn serialize(&self, value: &[EditorNode]) -> Result<String, FormatError> {
        editor::to_json_string(value, self.pretty)
    }
}
