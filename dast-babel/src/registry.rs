//! Named lookup of the document formats.
//!
//! The CLI never talks to a format type directly: it resolves `--from` and
//! `--to` (or the input's extension) through a [`FormatRegistry`] and lets the
//! registry check that the chosen format can actually read or write.
//!
//! Every built-in format shares one [`BlockRegistry`], so a custom block model
//! registered once is understood by both the `dast` parser and serializer.

use crate::blocks::BlockRegistry;
use crate::editor::EditorNode;
use crate::error::FormatError;
use crate::format::{Format, FormatOptions};
use crate::formats::{DastFormat, EditorFormat, HtmlFormat};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Formats keyed by name.
///
/// ```ignore
/// let registry = FormatRegistry::default();
/// let value = registry.parse(html, "html")?;
/// let dast = registry.serialize(&value, "dast")?;
/// ```
pub struct FormatRegistry {
    formats: BTreeMap<String, Box<dyn Format>>,
}

#[derive(Clone, Copy)]
enum Direction {
    Parse,
    Serialize,
}

impl FormatRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        FormatRegistry {
            formats: BTreeMap::new(),
        }
    }

    /// Adds `format` under its name, replacing an earlier one of that name.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        match self.formats.get(name) {
            Some(format) => Ok(format.as_ref()),
            None => Err(FormatError::FormatNotFound(name.to_string())),
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// Registered names in alphabetical order.
    pub fn list_formats(&self) -> Vec<String> {
        self.formats.keys().cloned().collect()
    }

    /// Name of the format claiming the extension of `filename`, compared
    /// without regard to ASCII case (`post.DAST` is a dast document).
    pub fn detect_format_from_filename(&self, filename: &str) -> Option<String> {
        let extension = Path::new(filename).extension()?.to_str()?;
        self.formats
            .values()
            .find(|format| {
                format
                    .file_extensions()
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(extension))
            })
            .map(|format| format.name().to_string())
    }

    /// Reads `source` as `format` into an editor value.
    pub fn parse(&self, source: &str, format: &str) -> Result<Vec<EditorNode>, FormatError> {
        self.capable(format, Direction::Parse)?.parse(source)
    }

    /// Writes an editor value as `format`.
    pub fn serialize(&self, value: &[EditorNode], format: &str) -> Result<String, FormatError> {
        self.capable(format, Direction::Serialize)?
            .serialize(value)
    }

    fn capable(&self, name: &str, direction: Direction) -> Result<&dyn Format, FormatError> {
        let format = self.get(name)?;
        let (supported, verb) = match direction {
            Direction::Parse => (format.supports_parsing(), "parsing"),
            Direction::Serialize => (format.supports_serialization(), "serialization"),
        };
        if !supported {
            return Err(FormatError::NotSupported(format!(
                "Format '{name}' does not support {verb}"
            )));
        }
        Ok(format)
    }

    /// The built-in formats with default options and the default blocks.
    pub fn with_defaults() -> Self {
        Self::with_options(FormatOptions::default())
    }

    /// The built-in formats configured by `options`, with the default blocks.
    pub fn with_options(options: FormatOptions) -> Self {
        Self::with_blocks(options, Arc::new(BlockRegistry::with_defaults()))
    }

    /// The built-in formats configured by `options`, resolving embedded
    /// blocks through `blocks`.
    pub fn with_blocks(options: FormatOptions, blocks: Arc<BlockRegistry>) -> Self {
        let mut registry = Self::new();
        registry.register(EditorFormat::new(options.pretty));
        registry.register(DastFormat::new(blocks, &options));
        registry.register(HtmlFormat::new(options.import));
        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
