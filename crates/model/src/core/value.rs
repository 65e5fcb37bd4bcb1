use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

/// A typed operand or field value.
///
/// Filter operands arrive as JSON and are converted with [`From<serde_json::Value>`];
/// entity rows may additionally carry dates and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Value {
    Int(i64),
    Uint(u64),
    Float(f64),
    String(String),
    Boolean(bool),
    Json(serde_json::Value),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    List(Vec<Value>),
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Uint(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::String(v) => v.parse::<f64>().ok(),
            Value::Boolean(v) => Some(if *v { 1.0 } else { 0.0 }),
            Value::Json(v) => v.as_f64(),
            Value::Date(_) | Value::Timestamp(_) | Value::List(_) | Value::Null => None,
        }
    }

    pub fn as_string(&self) -> Option<String> {
        match self {
            Value::Int(v) => Some(v.to_string()),
            Value::Uint(v) => Some(v.to_string()),
            Value::Float(v) => Some(v.to_string()),
            Value::String(v) => Some(v.clone()),
            Value::Boolean(v) => Some(v.to_string()),
            Value::Json(v) => v.as_str().map(|s| s.to_string()),
            Value::Date(v) => Some(v.to_string()),
            Value::Timestamp(v) => Some(v.to_rfc3339()),
            Value::List(_) | Value::Null => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Int(v) => Some(*v != 0),
            Value::Uint(v) => Some(*v != 0),
            Value::Float(v) => Some(*v != 0.0),
            Value::String(v) => match v.to_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            Value::Boolean(v) => Some(*v),
            Value::Json(v) => v.as_bool(),
            Value::Date(_) | Value::Timestamp(_) | Value::List(_) | Value::Null => None,
        }
    }

    /// Orders two values, coercing across numeric types and parsing strings
    /// compared against dates or timestamps. `None` means incomparable.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        use Value::*;
        match (self, other) {
            (Int(a), Int(b)) => Some(a.cmp(b)),
            (Uint(a), Uint(b)) => Some(a.cmp(b)),
            (Int(a), Uint(b)) => Some(i128::from(*a).cmp(&i128::from(*b))),
            (Uint(a), Int(b)) => Some(i128::from(*a).cmp(&i128::from(*b))),
            (Float(a), Float(b)) => a.partial_cmp(b),
            (Int(a), Float(b)) => (*a as f64).partial_cmp(b),
            (Float(a), Int(b)) => a.partial_cmp(&(*b as f64)),
            (Uint(a), Float(b)) => (*a as f64).partial_cmp(b),
            (Float(a), Uint(b)) => a.partial_cmp(&(*b as f64)),
            (String(a), String(b)) => Some(a.cmp(b)),
            (Boolean(a), Boolean(b)) => Some(a.cmp(b)),
            (Date(a), Date(b)) => Some(a.cmp(b)),
            (Timestamp(a), Timestamp(b)) => Some(a.cmp(b)),
            (Date(a), String(s)) => parse_date(s).map(|b| a.cmp(&b)),
            (String(s), Date(b)) => parse_date(s).map(|a| a.cmp(b)),
            (Timestamp(a), String(s)) => parse_timestamp(s).map(|b| a.cmp(&b)),
            (String(s), Timestamp(b)) => parse_timestamp(s).map(|a| a.cmp(b)),
            (Json(a), Json(b)) => (a == b).then_some(Ordering::Equal),
            _ => None,
        }
    }

    pub fn equal(&self, other: &Value) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }

    /// Plain JSON rendering; dates and timestamps become ISO strings.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Int(v) => serde_json::Value::from(*v),
            Value::Uint(v) => serde_json::Value::from(*v),
            Value::Float(v) => serde_json::Value::from(*v),
            Value::String(v) => serde_json::Value::String(v.clone()),
            Value::Boolean(v) => serde_json::Value::Bool(*v),
            Value::Json(v) => v.clone(),
            Value::Date(v) => serde_json::Value::String(v.to_string()),
            Value::Timestamp(v) => serde_json::Value::String(v.to_rfc3339()),
            Value::List(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Null => serde_json::Value::Null,
        }
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::Uint(u)
                } else {
                    n.as_f64().map_or(Value::Null, Value::Float)
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            obj @ serde_json::Value::Object(_) => Value::Json(obj),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Uint(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "'{}'", v.replace('\'', "''")),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Json(v) => {
                let json_str = v.to_string().replace('\'', "''");
                write!(f, "'{json_str}'")
            }
            Value::Date(v) => write!(f, "'{v}'"),
            Value::Timestamp(v) => write!(f, "'{v}'"),
            Value::List(items) => {
                let rendered = items
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "({rendered})")
            }
            Value::Null => write!(f, "NULL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_numbers() {
        assert_eq!(Value::from(json!(42)), Value::Int(42));
        assert_eq!(Value::from(json!(u64::MAX)), Value::Uint(u64::MAX));
        assert_eq!(Value::from(json!(1.5)), Value::Float(1.5));
    }

    #[test]
    fn test_from_json_composites() {
        assert_eq!(
            Value::from(json!([1, "a", null])),
            Value::List(vec![
                Value::Int(1),
                Value::String("a".to_string()),
                Value::Null
            ])
        );
        assert_eq!(
            Value::from(json!({"k": 1})),
            Value::Json(json!({"k": 1}))
        );
    }

    #[test]
    fn test_compare_numeric_cross_types() {
        assert_eq!(Value::Int(2).compare(&Value::Float(2.0)), Some(Ordering::Equal));
        assert_eq!(Value::Int(-1).compare(&Value::Uint(1)), Some(Ordering::Less));
        assert_eq!(Value::Uint(3).compare(&Value::Float(2.5)), Some(Ordering::Greater));
    }

    #[test]
    fn test_compare_dates_against_strings() {
        let date = Value::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(
            date.compare(&Value::String("2024-02-29".to_string())),
            Some(Ordering::Greater)
        );
        assert_eq!(date.compare(&Value::String("not a date".to_string())), None);

        let ts = Value::Timestamp(
            DateTime::parse_from_rfc3339("2024-03-01T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        );
        assert!(ts.equal(&Value::String("2024-03-01 10:00:00".to_string())));
    }

    #[test]
    fn test_compare_incompatible_types() {
        assert_eq!(Value::Int(1).compare(&Value::String("1".to_string())), None);
        assert_eq!(Value::Null.compare(&Value::Null), None);
    }

    #[test]
    fn test_display_escapes_quotes() {
        assert_eq!(Value::from("O'Hara").to_string(), "'O''Hara'");
        assert_eq!(
            Value::List(vec![Value::Int(1), Value::Int(2)]).to_string(),
            "(1, 2)"
        );
    }
}
