//! Decrypted credentials as structured text (YAML)
//!
//! Only used to reject malformed plaintext before it is encrypted, and by the
//! settings source to look values up. The top level is an explicit tagged
//! union: a bare scalar stays a scalar.

use serde_yaml::{Mapping, Value};

use crate::error::{Result, SecretsError};

#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// Empty file, or only comments / `~`
    Empty,
    Scalar(Value),
    Sequence(Vec<Value>),
    Mapping(Mapping),
}

impl Document {
    /// Parse `text`; `origin` names the source in error messages
    pub fn parse(text: &[u8], origin: &str) -> Result<Self> {
        let text = std::str::from_utf8(text).map_err(|e| SecretsError::InvalidDocument {
            origin: origin.to_owned(),
            message: format!("not valid UTF-8: {e}"),
        })?;

        if text.trim().is_empty() {
            return Ok(Document::Empty);
        }

        let value: Value =
            serde_yaml::from_str(text).map_err(|e| SecretsError::InvalidDocument {
                origin: origin.to_owned(),
                message: e.to_string(),
            })?;

        Ok(Self::from_value(value))
    }

    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => Document::Empty,
            Value::Mapping(map) => Document::Mapping(map),
            Value::Sequence(seq) => Document::Sequence(seq),
            Value::Tagged(tagged) => Self::from_value(tagged.value),
            scalar => Document::Scalar(scalar),
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Document::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Document::Empty => Value::Null,
            Document::Scalar(value) => value,
            Document::Sequence(seq) => Value::Sequence(seq),
            Document::Mapping(map) => Value::Mapping(map),
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        if matches!(self, Document::Empty) {
            return Ok(String::new());
        }
        serde_yaml::to_string(&self.clone().into_value()).map_err(|e| {
            SecretsError::InvalidDocument {
                origin: "settings".to_owned(),
                message: e.to_string(),
            }
        })
    }
}
