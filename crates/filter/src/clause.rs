use crate::error::ValidationError;
use serde_json::Value as JsonValue;

/// The attribute name that always resolves to the entity's identity attribute.
pub const IDENTITY_KEY: &str = "id";

/// A decoded filter request: the payload normalized to a list of elements.
///
/// Elements are kept as raw JSON so that malformed ones can be reported
/// back instead of failing the whole request.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterRequest {
    pub elements: Vec<JsonValue>,
}

impl FilterRequest {
    /// Parses the payload. A lone value is treated as a one-element list.
    pub fn decode(payload: &str) -> Result<Self, ValidationError> {
        let decoded: JsonValue =
            serde_json::from_str(payload).map_err(|e| ValidationError::MalformedPayload {
                reason: e.to_string(),
            })?;

        let elements = match decoded {
            JsonValue::Array(elements) => elements,
            single => vec![single],
        };

        Ok(FilterRequest { elements })
    }
}

/// One `{name, op, val}` filter unit.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    /// `None` when the `name` key is missing or not a string.
    pub name: Option<String>,
    /// The operator as sent, underscores included. Missing is `""`; a
    /// non-string operator keeps its JSON text so it fails lookup visibly.
    pub op: String,
    /// The comparison operand. Missing is `null`.
    pub val: JsonValue,
    source: JsonValue,
}

impl FilterClause {
    /// The operator with leading and trailing underscores removed,
    /// so `_eq_`, `eq` and `__eq` all name the same operator.
    pub fn canonical_op(&self) -> &str {
        self.op.trim_matches('_')
    }

    /// The attribute name as it should appear in diagnostics.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self
                .source
                .get("name")
                .map_or_else(|| "null".to_string(), JsonValue::to_string),
        }
    }

    /// The clause as it was received, for error messages.
    pub fn source(&self) -> &JsonValue {
        &self.source
    }
}

impl TryFrom<JsonValue> for FilterClause {
    type Error = JsonValue;

    /// Only JSON objects are clauses; anything else is handed back untouched.
    fn try_from(element: JsonValue) -> Result<Self, Self::Error> {
        if !element.is_object() {
            return Err(element);
        }

        let name = element
            .get("name")
            .and_then(JsonValue::as_str)
            .map(str::to_string);
        let op = match element.get("op") {
            Some(JsonValue::String(op)) => op.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };
        let val = element.get("val").cloned().unwrap_or(JsonValue::Null);

        Ok(FilterClause {
            name,
            op,
            val,
            source: element,
        })
    }
}
