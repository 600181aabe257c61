//! Shared configuration loader for the dast toolchain.
//!
//! `defaults/dast.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`DastConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use dast_babel::{DecodeOptions, EncodeOptions, FormatOptions, ImportOptions};
use serde::Deserialize;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/dast.default.toml");

/// Top-level configuration consumed by dast applications.
#[derive(Debug, Clone, Deserialize)]
pub struct DastConfig {
    pub encode: EncodeConfig,
    pub decode: DecodeConfig,
    pub import: ImportConfig,
    pub output: OutputConfig,
}

/// Editor → Dast knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct EncodeConfig {
    pub validate_structure: bool,
}

/// Dast → editor knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct DecodeConfig {
    pub validate_structure: bool,
}

/// Mirrors the knobs exposed by the HTML importer.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    pub collapse_whitespace: bool,
    pub style_marks: bool,
    /// Empty means relative links stay as written.
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub pretty: bool,
}

impl From<&EncodeConfig> for EncodeOptions {
    fn from(config: &EncodeConfig) -> Self {
        EncodeOptions {
            validate_structure: config.validate_structure,
        }
    }
}

impl From<&DecodeConfig> for DecodeOptions {
    fn from(config: &DecodeConfig) -> Self {
        DecodeOptions {
            validate_structure: config.validate_structure,
        }
    }
}

impl From<&ImportConfig> for ImportOptions {
    fn from(config: &ImportConfig) -> Self {
        let base_url = config.base_url.trim();
        ImportOptions {
            collapse_whitespace: config.collapse_whitespace,
            style_marks: config.style_marks,
            base_url: (!base_url.is_empty()).then(|| base_url.to_string()),
        }
    }
}

impl From<&DastConfig> for FormatOptions {
    fn from(config: &DastConfig) -> Self {
        FormatOptions {
            encode: (&config.encode).into(),
            decode: (&config.decode).into(),
            import: (&config.import).into(),
            pretty: config.output.pretty,
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<DastConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<DastConfig, ConfigError> {
    Loader::new().build()
}
