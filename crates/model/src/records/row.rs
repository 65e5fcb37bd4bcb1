use crate::core::value::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldValue {
    pub name: String,
    pub value: Option<Value>,
}

impl FieldValue {
    pub fn new(name: &str, value: Value) -> Self {
        FieldValue {
            name: name.to_string(),
            value: Some(value),
        }
    }
}

/// A single entity instance, addressed by field name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RowData {
    pub entity: String,
    pub field_values: Vec<FieldValue>,
}

impl RowData {
    pub fn new(entity: &str, field_values: Vec<FieldValue>) -> Self {
        RowData {
            entity: entity.to_string(),
            field_values,
        }
    }

    /// Builds a row from a JSON object, one field per key.
    pub fn from_json(entity: &str, object: serde_json::Map<String, serde_json::Value>) -> Self {
        let field_values = object
            .into_iter()
            .map(|(name, value)| FieldValue {
                name,
                value: Some(Value::from(value)),
            })
            .collect();
        RowData::new(entity, field_values)
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.field_values
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(field))
    }

    pub fn get_value(&self, field: &str) -> Value {
        self.get(field)
            .and_then(|f| f.value.clone())
            .unwrap_or(Value::Null)
    }

    pub fn to_json(&self) -> serde_json::Value {
        let object = self
            .field_values
            .iter()
            .map(|f| {
                let value = f.value.as_ref().map_or(serde_json::Value::Null, Value::to_json);
                (f.name.clone(), value)
            })
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(object)
    }
}
