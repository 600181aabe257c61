//! Error types for conversion operations

use thiserror::Error;

/// Errors that can occur while converting between document representations.
///
/// Every variant is fatal to the call that produced it: no conversion returns
/// a partially converted document alongside an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// Error during parsing
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Error during serialization
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// Format does not support the requested operation
    #[error("Operation not supported: {0}")]
    NotSupported(String),

    /// A node type outside the closed vocabulary
    #[error("Unsupported node type '{0}'")]
    UnsupportedNodeType(String),
    /// A mark outside the closed vocabulary
    #[error("Unsupported mark '{0}'")]
    UnsupportedMark(String),
    /// A wire document whose `schema` is not `dast`
    #[error("Unsupported schema '{0}', expected 'dast'")]
    UnsupportedSchema(String),
    /// A known node carrying a missing or malformed attribute
    #[error("Invalid attribute '{attribute}' on '{node}': {message}")]
    InvalidAttribute {
        node: String,
        attribute: String,
        message: String,
    },

    /// An embedded block whose wire payload cannot be produced
    #[error("Unresolved block reference to '{model}': {reason}")]
    UnresolvedBlockReference { model: String, reason: String },
    /// A `block` node whose id has no side-table entry
    #[error("Missing block entry for id '{0}'")]
    MissingBlockEntry(String),
    /// Two side-table entries (or two differing blocks) sharing one id
    #[error("Duplicate block entry for id '{0}'")]
    DuplicateBlockEntry(String),
    /// A block model id with no registered handler
    #[error("Unknown block model '{0}'")]
    UnknownBlockModel(String),

    /// A tree that breaks a nesting rule
    #[error("Structural invariant violated at {path}: {message}")]
    StructuralInvariantViolation { path: String, message: String },
}

impl FormatError {
    pub(crate) fn invalid_attribute(
        node: impl Into<String>,
        attribute: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        FormatError::InvalidAttribute {
            node: node.into(),
            attribute: attribute.into(),
            message: message.into(),
        }
    }

    pub(crate) fn unresolved(model: impl Into<String>, reason: impl Into<String>) -> Self {
        FormatError::UnresolvedBlockReference {
            model: model.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for FormatError {
    fn from(err: serde_json::Error) -> Self {
        FormatError::ParseError(err.to_string())
    }
}
