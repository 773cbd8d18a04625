use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

///
/// DynamicValue
///
/// A value of Terraform's dynamic type, as handed over by the host for
/// `arg` and for function parameters. Objects and maps both arrive as
/// `Object`; tuples, lists and sets as `List`.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum DynamicValue {
    Null,
    Unknown,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<Self>),
    Object(BTreeMap<String, Self>),
}

impl DynamicValue {
    /// Short name of the value kind, used in encoding diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Unknown => "unknown",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Object(_) => "object",
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_object(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    #[must_use]
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// Build an object from `(key, value)` pairs.
    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Self)>) -> Self {
        Self::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// True if any nested value is still unknown.
    #[must_use]
    pub fn contains_unknown(&self) -> bool {
        match self {
            Self::Unknown => true,
            Self::List(items) => items.iter().any(Self::contains_unknown),
            Self::Object(map) => map.values().any(Self::contains_unknown),
            Self::Null | Self::Bool(_) | Self::Number(_) | Self::String(_) => false,
        }
    }
}

impl From<Value> for DynamicValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

// Unknown values only exist during planning; they serialize as null.
impl From<DynamicValue> for Value {
    fn from(value: DynamicValue) -> Self {
        match value {
            DynamicValue::Null | DynamicValue::Unknown => Self::Null,
            DynamicValue::Bool(b) => Self::Bool(b),
            DynamicValue::Number(n) => Self::Number(n),
            DynamicValue::String(s) => Self::String(s),
            DynamicValue::List(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            DynamicValue::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect::<Map<_, _>>(),
            ),
        }
    }
}

impl From<&str> for DynamicValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for DynamicValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_objects_become_sorted_objects() {
        let value = DynamicValue::from(json!({ "b": "2", "a": { "c": "3" } }));

        let DynamicValue::Object(map) = &value else {
            panic!("expected object, got {value:?}");
        };
        assert_eq!(map.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(map["a"].kind(), "object");
    }

    #[test]
    fn unknown_is_detected_when_nested() {
        let value = DynamicValue::object([(
            "outer",
            DynamicValue::List(vec![DynamicValue::from("x"), DynamicValue::Unknown]),
        )]);

        assert!(value.contains_unknown());
        assert!(!DynamicValue::from("x").contains_unknown());
    }

    #[test]
    fn serde_goes_through_json_values() {
        let value: DynamicValue = serde_json::from_str(r#"{"greeter":"hello"}"#).unwrap();
        assert_eq!(
            value,
            DynamicValue::object([("greeter", DynamicValue::from("hello"))])
        );

        let back = serde_json::to_value(&value).unwrap();
        assert_eq!(back, json!({ "greeter": "hello" }));
    }
}
