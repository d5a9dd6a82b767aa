//! Partial updates to a test document.

use super::usability_test::Test;
use crate::constants::fields;
use crate::error::Result;
use serde::Serialize;
use serde_json::{Map, Value};

/// Top-level fields to overwrite on an existing test
///
/// The `id` field is dropped on construction: a test's identity never changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestPatch {
    fields: Map<String, Value>,
}

impl TestPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Patch that rewrites every field present on `test`
    pub fn from_test(test: &Test) -> Result<Self> {
        match serde_json::to_value(test)? {
            Value::Object(mut map) => {
                map.remove(fields::ID);
                Ok(Self { fields: map })
            }
            _ => Ok(Self::default()),
        }
    }

    /// Set one field, serialized with serde
    pub fn set(mut self, field: impl Into<String>, value: impl Serialize) -> Result<Self> {
        let field = field.into();
        if field != fields::ID {
            self.fields.insert(field, serde_json::to_value(value)?);
        }
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_document(self) -> Value {
        Value::Object(self.fields)
    }
}
