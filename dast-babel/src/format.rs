//! Format trait definition
//!
//! This module defines the core Format trait that all format implementations must implement.
//! The trait provides a uniform interface for parsing and serializing documents, with the
//! editor value (`Vec<EditorNode>`) as the pivot every format converts through.

use crate::decode::DecodeOptions;
use crate::editor::EditorNode;
use crate::encode::EncodeOptions;
use crate::error::FormatError;
use crate::formats::html::ImportOptions;

/// Trait for document formats
///
/// Implementors provide conversion between a string representation and the editor value.
/// Formats can support parsing, serialization, or both.
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn supports_parsing(&self) -> bool {
///         true
///     }
///
///     fn parse(&self, source: &str) -> Result<Vec<EditorNode>, FormatError> {
///         // Parse source to an editor value
///         todo!()
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "editor", "dast", "html")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format (e.g., ["dast"], ["html", "htm"])
    ///
    /// Returns a slice of file extensions without the leading dot.
    /// Used for automatic format detection from filenames.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Whether this format supports parsing (source → editor value)
    fn supports_parsing(&self) -> bool {
        false
    }

    /// Whether this format supports serialization (editor value → source)
    fn supports_serialization(&self) -> bool {
        false
    }

    /// Parse source text into an editor value
    ///
    /// Default implementation returns NotSupported error.
    /// Formats that support parsing should override this method.
    fn parse(&self, _source: &str) -> Result<Vec<EditorNode>, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Serialize an editor value into source text
    ///
    /// Default implementation returns NotSupported error.
    /// Formats that support serialization should override this method.
    fn serialize(&self, _value: &[EditorNode]) -> Result<String, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }
}

/// Settings shared by the built-in formats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatOptions {
    pub encode: EncodeOptions,
    pub decode: DecodeOptions,
    pub import: ImportOptions,
    /// Indent JSON output.
    pub pretty: bool,
}

/// Writes JSON compactly or indented.
pub(crate) fn to_json<T: serde::Serialize + ?Sized>(
    value: &T,
    pretty: bool,
) -> Result<String, FormatError> {
    let result = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    result.map_err(|e| FormatError::SerializationError(e.to_string()))
}
