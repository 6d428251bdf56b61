//! Checked input record type.
//!
//! A [`Record`] is one application record parsed from a single JSON object.
//! Only scalar values are admitted; nested structure is rejected up front so
//! the transform layer never sees anything but numbers, text, and absence.
//! Unknown keys are kept (and later ignored); schema fields may be missing
//! and are imputed downstream.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// A scalar field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

/// One raw application record: field name to scalar value.
#[derive(Debug, Clone, Default)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Parse a record from one JSON object.
    ///
    /// Fails with [`Error::Validation`] when the input is not valid JSON,
    /// is not an object, or carries a non-scalar value. JSON `null` fields
    /// are treated as absent; booleans admit as 1.0/0.0.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(input)
            .map_err(|e| Error::Validation(format!("malformed JSON: {e}")))?;
        Self::from_json(value)
    }

    /// Build a record from an already-parsed JSON value.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let map = match value {
            serde_json::Value::Object(map) => map,
            other => {
                return Err(Error::Validation(format!(
                    "expected a JSON object, got {}",
                    json_type_name(&other)
                )))
            }
        };

        let mut fields = BTreeMap::new();
        for (key, value) in map {
            match value {
                serde_json::Value::Null => {}
                serde_json::Value::Bool(b) => {
                    fields.insert(key, FieldValue::Number(if b { 1.0 } else { 0.0 }));
                }
                serde_json::Value::Number(n) => {
                    let f = n.as_f64().ok_or_else(|| {
                        Error::Validation(format!("field '{key}': number out of range"))
                    })?;
                    fields.insert(key, FieldValue::Number(f));
                }
                serde_json::Value::String(s) => {
                    fields.insert(key, FieldValue::Text(s));
                }
                other => {
                    return Err(Error::Validation(format!(
                        "field '{key}': expected a scalar, got {}",
                        json_type_name(&other)
                    )))
                }
            }
        }

        Ok(Record { fields })
    }

    /// Insert a field (used by the fitter and tests).
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    /// Raw lookup, absent fields yield `None`.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Value of a numeric-role field.
    ///
    /// Fails with [`Error::Transform`] when the field holds text.
    pub fn numeric(&self, name: &str) -> Result<Option<f64>> {
        match self.fields.get(name) {
            None => Ok(None),
            Some(FieldValue::Number(v)) => Ok(Some(*v)),
            Some(FieldValue::Text(t)) => Err(Error::Transform(format!(
                "field '{name}' is numeric but got text value '{t}'"
            ))),
        }
    }

    /// Value of a categorical-role field.
    ///
    /// Fails with [`Error::Transform`] when the field holds a number.
    pub fn categorical(&self, name: &str) -> Result<Option<&str>> {
        match self.fields.get(name) {
            None => Ok(None),
            Some(FieldValue::Text(t)) => Ok(Some(t.as_str())),
            Some(FieldValue::Number(v)) => Err(Error::Transform(format!(
                "field '{name}' is categorical but got numeric value {v}"
            ))),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
