//! Typed access to the loose attribute maps of incoming JSON nodes.
//!
//! Both trees are read from JSON by first capturing each node as a raw map and
//! then pulling out the attributes its type needs. Attributes are removed as
//! they are read, so whatever is left over afterwards is unknown to the
//! vocabulary.

use crate::error::FormatError;
use serde_json::{Map, Value};

pub(crate) struct Attrs<'a> {
    node: &'static str,
    map: &'a mut Map<String, Value>,
}

impl<'a> Attrs<'a> {
    pub(crate) fn new(node: &'static str, map: &'a mut Map<String, Value>) -> Self {
        Self { node, map }
    }

    fn invalid(&self, key: &str, message: impl Into<String>) -> FormatError {
        FormatError::invalid_attribute(self.node, key, message)
    }

    pub(crate) fn take(&mut self, key: &str) -> Option<Value> {
        match self.map.remove(key) {
            Some(Value::Null) | None => None,
            Some(value) => Some(value),
        }
    }

    pub(crate) fn opt_string(&mut self, key: &str) -> Result<Option<String>, FormatError> {
        match self.take(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(self.invalid(key, format!("expected a string, found {other}"))),
        }
    }

    pub(crate) fn string(&mut self, key: &str) -> Result<String, FormatError> {
        self.opt_string(key)?
            .ok_or_else(|| self.invalid(key, "missing required attribute"))
    }

    pub(crate) fn u8(&mut self, key: &str) -> Result<u8, FormatError> {
        match self.take(key) {
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(|n| u8::try_from(n).ok())
                .ok_or_else(|| self.invalid(key, format!("expected a small integer, found {n}"))),
            Some(other) => Err(self.invalid(key, format!("expected an integer, found {other}"))),
            None => Err(self.invalid(key, "missing required attribute")),
        }
    }

    pub(crate) fn u32_list(&mut self, key: &str) -> Result<Vec<u32>, FormatError> {
        match self.take(key) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_u64()
                        .and_then(|n| u32::try_from(n).ok())
                        .ok_or_else(|| {
                            self.invalid(key, format!("expected integers, found {item}"))
                        })
                })
                .collect(),
            Some(other) => Err(self.invalid(key, format!("expected an array, found {other}"))),
        }
    }

    /// Deserializes an attribute with serde, treating absence as the default.
    pub(crate) fn parsed<T>(&mut self, key: &str) -> Result<T, FormatError>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        match self.take(key) {
            None => Ok(T::default()),
            Some(value) => {
                serde_json::from_value(value).map_err(|e| self.invalid(key, e.to_string()))
            }
        }
    }

    /// Names of the attributes nobody asked for.
    pub(crate) fn leftover(&self) -> Vec<&str> {
        self.map.keys().map(String::as_str).collect()
    }
}
