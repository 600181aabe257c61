//! Embedded block registry
//!
//! Rich text can embed whole CMS records (an image, a video, a call to
//! action). In the editor tree such a record is a void `block` element holding
//! its payload; on the wire it becomes a `{"type": "block", "item": id}`
//! reference plus an entry in the side-table.
//!
//! # Architecture
//!
//! 1.  **`BlockHandler` trait**: converts one block model's payload between
//!     the editor shape and the wire record shape, and rejects payloads that
//!     are not complete yet.
//! 2.  **`BlockRegistry`**: maps a `blockModelId` (e.g. `ImageRecord`) to its
//!     handler. New block kinds are added by registering a handler; the
//!     serializer and deserializer never change.
//!
//! # Namespaces
//!
//! Besides exact model ids, a handler can be registered for a prefix with
//! [`BlockRegistry::register_namespace`]. Exact matches win over prefixes,
//! and prefixes are tried in registration order.
//!
//! # Standard handlers
//!
//! *   `ImageRecord`: inline images ([`image::ImageBlock`]).
//! *   [`PassthroughBlock`]: copies an object payload verbatim, for models
//!     whose shape this crate does not need to know.

use crate::error::FormatError;
use serde_json::{Map, Value};
use std::collections::HashMap;

pub mod image;

pub use image::{ImageBlock, ImagePayload, ResponsiveImage, UploadedImage, IMAGE_MODEL_ID};

/// Converts the payload of one block model.
pub trait BlockHandler: Send + Sync {
    /// The `blockModelId` this handler serves.
    fn model_id(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Turns an editor payload into the fields of a side-table record.
    ///
    /// Fails with [`FormatError::UnresolvedBlockReference`] when the payload
    /// is incomplete (for instance an image whose upload has not finished).
    fn encode(&self, payload: &Value) -> Result<Map<String, Value>, FormatError>;

    /// Turns the fields of a side-table record back into an editor payload.
    fn decode(&self, record: &Map<String, Value>) -> Result<Value, FormatError>;
}

/// Registry of block handlers, keyed by block model id.
pub struct BlockRegistry {
    handlers: HashMap<String, Box<dyn BlockHandler>>,
    namespace_handlers: Vec<(String, Box<dyn BlockHandler>)>,
}

impl BlockRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            namespace_handlers: Vec::new(),
        }
    }

    /// Create a registry with the standard handlers registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(ImageBlock);
        registry
    }

    /// Register a handler under its model id, replacing any previous one.
    pub fn register<H: BlockHandler + 'static>(&mut self, handler: H) {
        self.handlers
            .insert(handler.model_id().to_string(), Box::new(handler));
    }

    /// Register a handler for every model id starting with `prefix`.
    pub fn register_namespace<H: BlockHandler + 'static>(&mut self, prefix: &str, handler: H) {
        self.namespace_handlers
            .push((prefix.to_string(), Box::new(handler)));
    }

    /// Get the handler for a model id.
    pub fn get(&self, model_id: &str) -> Result<&dyn BlockHandler, FormatError> {
        if let Some(handler) = self.handlers.get(model_id) {
            return Ok(handler.as_ref());
        }

        self.namespace_handlers
            .iter()
            .find(|(prefix, _)| model_id.starts_with(prefix.as_str()))
            .map(|(_, handler)| handler.as_ref())
            .ok_or_else(|| FormatError::UnknownBlockModel(model_id.to_string()))
    }

    pub fn has(&self, model_id: &str) -> bool {
        self.get(model_id).is_ok()
    }

    /// List the exactly registered model ids (sorted)
    pub fn list_models(&self) -> Vec<String> {
        let mut names: Vec<_> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    /// List the registered namespace prefixes, in lookup order.
    pub fn list_namespaces(&self) -> Vec<String> {
        self.namespace_handlers
            .iter()
            .map(|(prefix, _)| prefix.clone())
            .collect()
    }

    pub fn encode(
        &self,
        model_id: &str,
        payload: &Value,
    ) -> Result<Map<String, Value>, FormatError> {
        self.get(model_id)?.encode(payload)
    }

    pub fn decode(
        &self,
        model_id: &str,
        record: &Map<String, Value>,
    ) -> Result<Value, FormatError> {
        self.get(model_id)?.decode(record)
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Copies object payloads unchanged in both directions.
pub struct PassthroughBlock {
    model_id: String,
}

impl PassthroughBlock {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
        }
    }
}

impl BlockHandler for PassthroughBlock {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn description(&self) -> &str {
        "Opaque record copied verbatim"
    }

    fn encode(&self, payload: &Value) -> Result<Map<String, Value>, FormatError> {
        match payload {
            Value::Object(fields) => Ok(fields.clone()),
            Value::Null => Err(FormatError::unresolved(&self.model_id, "payload is missing")),
            other => Err(FormatError::unresolved(
                &self.model_id,
                format!("payload must be an object, found {other}"),
            )),
        }
    }

    fn decode(&self, record: &Map<String, Value>) -> Result<Value, FormatError> {
        Ok(Value::Object(record.clone()))
    }
}
