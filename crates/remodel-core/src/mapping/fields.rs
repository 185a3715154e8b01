//! Typed access to the keys of a document node.

use crate::error::FormatError;
use serde_json::{Map, Value};

/// Key-value view of one document node, tagged with its path for errors.
pub(crate) struct Fields<'a> {
    map: &'a Map<String, Value>,
    path: &'a str,
}

impl<'a> Fields<'a> {
    /// View `value` as an object node.
    pub(crate) fn new(value: &'a Value, path: &'a str) -> Result<Self, FormatError> {
        match value {
            Value::Object(map) => Ok(Self { map, path }),
            _ => Err(FormatError::NotAnObject {
                path: path.to_string(),
            }),
        }
    }

    pub(crate) fn path(&self) -> &'a str {
        self.path
    }

    fn required(&self, key: &'static str) -> Result<&'a Value, FormatError> {
        self.map.get(key).ok_or_else(|| FormatError::MissingKey {
            path: self.path.to_string(),
            key,
        })
    }

    fn wrong_type(&self, key: &'static str, expected: &'static str) -> FormatError {
        FormatError::WrongType {
            path: self.path.to_string(),
            key,
            expected,
        }
    }

    pub(crate) fn required_str(&self, key: &'static str) -> Result<&'a str, FormatError> {
        self.required(key)?
            .as_str()
            .ok_or_else(|| self.wrong_type(key, "a string"))
    }

    pub(crate) fn required_bool(&self, key: &'static str) -> Result<bool, FormatError> {
        self.required(key)?
            .as_bool()
            .ok_or_else(|| self.wrong_type(key, "a boolean"))
    }

    pub(crate) fn required_array(&self, key: &'static str) -> Result<&'a [Value], FormatError> {
        self.required(key)?
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| self.wrong_type(key, "an array"))
    }

    /// String value of an optional key. Absent, null and mistyped values
    /// all read as `None`.
    pub(crate) fn optional_str(&self, key: &str) -> Option<&'a str> {
        self.map.get(key).and_then(Value::as_str)
    }

    /// Boolean value of an optional key. Absent, null and mistyped values
    /// all read as `None`.
    pub(crate) fn optional_bool(&self, key: &str) -> Option<bool> {
        self.map.get(key).and_then(Value::as_bool)
    }
}
