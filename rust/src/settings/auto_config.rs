use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::traits::RestResource;
use crate::config::SETTINGS_PATH;
use crate::error::Error;

/// Controller-wide auto-configuration settings.
///
/// The controller owns the schema, so attributes are kept exactly as served
/// and written back unchanged apart from caller edits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AutoConfigSettings {
    attributes: Map<String, Value>,
}

impl AutoConfigSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Set an attribute, returning the previous value.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.attributes.insert(name.into(), value)
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<Value> {
        self.attributes.remove(name)
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl RestResource for AutoConfigSettings {
    const PATH: &'static str = SETTINGS_PATH;
}

impl TryFrom<Value> for AutoConfigSettings {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Error> {
        match value {
            Value::Object(attributes) => Ok(Self { attributes }),
            Value::Null => Err(Error::InvalidSettings("null".to_string())),
            Value::Bool(_) => Err(Error::InvalidSettings("boolean".to_string())),
            Value::Number(n) => Err(Error::InvalidSettings(format!("number {}", n))),
            Value::String(_) => Err(Error::InvalidSettings("string".to_string())),
            Value::Array(_) => Err(Error::InvalidSettings("array".to_string())),
        }
    }
}
