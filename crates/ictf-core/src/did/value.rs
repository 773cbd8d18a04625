use crate::{did::EncodeError, dto::DynamicValue};
use derive_more::Display;
use std::collections::BTreeMap;

/// Wrapper key holding the candid type tag.
pub const TYPE_KEY: &str = "__didType";

/// Wrapper key holding the value to encode.
pub const VALUE_KEY: &str = "__didValue";

///
/// DidTag
///
/// Candid interpretations that can be forced through the wrapper.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum DidTag {
    #[display("text")]
    Text,

    #[display("record")]
    Record,
}

impl DidTag {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Record => "record",
        }
    }

    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "text" => Some(Self::Text),
            "record" => Some(Self::Record),
            _ => None,
        }
    }

    /// Wrap `payload` so it is encoded with this interpretation.
    #[must_use]
    pub fn wrap(self, payload: DynamicValue) -> DynamicValue {
        DynamicValue::object([
            (TYPE_KEY, DynamicValue::string(self.as_str())),
            (VALUE_KEY, payload),
        ])
    }
}

///
/// DidValue
///
/// The candid subset the provider can produce from configuration values.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DidValue {
    Text(String),
    Record(BTreeMap<String, Self>),
}

// Shape of a dynamic value, decided once before encoding.
enum Shape<'a> {
    Wrapper {
        tag: &'a DynamicValue,
        payload: &'a DynamicValue,
    },
    Text(&'a str),
    Mapping(&'a BTreeMap<String, DynamicValue>),
    Other,
}

impl<'a> Shape<'a> {
    fn of(value: &'a DynamicValue) -> Self {
        match value {
            DynamicValue::String(s) => Self::Text(s),
            DynamicValue::Object(map) => {
                match (map.len(), map.get(TYPE_KEY), map.get(VALUE_KEY)) {
                    (2, Some(tag), Some(payload)) => Self::Wrapper { tag, payload },
                    _ => Self::Mapping(map),
                }
            }
            _ => Self::Other,
        }
    }
}

impl DidValue {
    /// Resolve a dynamic value: wrapper first, then text, then record.
    ///
    /// A recognised wrapper tag is final; its payload is never reinterpreted
    /// through the other rules.
    pub fn from_dynamic(value: &DynamicValue) -> Result<Self, EncodeError> {
        match Shape::of(value) {
            Shape::Wrapper { tag, payload } => Self::from_wrapper(tag, payload),
            Shape::Text(s) => Ok(Self::Text(s.to_string())),
            Shape::Mapping(map) => Self::record_from_map(map),
            Shape::Other => {
                let kind = value.kind();

                Err(EncodeError::Unsupported {
                    kind,
                    attempts: vec![
                        format!(
                            "not a wrapped value: {kind} is not an object with exactly {TYPE_KEY} and {VALUE_KEY}"
                        ),
                        format!("not text: {kind} is not a string"),
                        format!("not a record: {kind} is not an object"),
                    ],
                })
            }
        }
    }

    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Build a record from `(field, value)` pairs.
    pub fn record<K: Into<String>>(fields: impl IntoIterator<Item = (K, Self)>) -> Self {
        Self::Record(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    fn from_wrapper(tag: &DynamicValue, payload: &DynamicValue) -> Result<Self, EncodeError> {
        let Some(tag_str) = tag.as_str() else {
            return Err(EncodeError::MalformedWrapper {
                reason: format!("{TYPE_KEY} must be a string, got {}", tag.kind()),
            });
        };

        let tag = DidTag::parse(tag_str).ok_or_else(|| EncodeError::UnknownTag {
            tag: tag_str.to_string(),
        })?;

        let resolved = match tag {
            DidTag::Text => Self::text_from(payload),
            DidTag::Record => Self::record_from(payload),
        };

        resolved.map_err(|err| EncodeError::WrapperPayload {
            tag,
            source: Box::new(err),
        })
    }

    fn text_from(value: &DynamicValue) -> Result<Self, EncodeError> {
        value
            .as_str()
            .map(Self::text)
            .ok_or_else(|| EncodeError::Unsupported {
                kind: value.kind(),
                attempts: vec![format!("not text: {} is not a string", value.kind())],
            })
    }

    fn record_from(value: &DynamicValue) -> Result<Self, EncodeError> {
        let map = value.as_object().ok_or_else(|| EncodeError::Unsupported {
            kind: value.kind(),
            attempts: vec![format!("not a record: {} is not an object", value.kind())],
        })?;

        Self::record_from_map(map)
    }

    fn record_from_map(map: &BTreeMap<String, DynamicValue>) -> Result<Self, EncodeError> {
        let fields = map
            .iter()
            .map(|(field, value)| {
                Self::from_dynamic(value)
                    .map(|resolved| (field.clone(), resolved))
                    .map_err(|err| EncodeError::Field {
                        field: field.clone(),
                        source: Box::new(err),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::record(fields))
    }
}

impl TryFrom<&DynamicValue> for DidValue {
    type Error = EncodeError;

    fn try_from(value: &DynamicValue) -> Result<Self, Self::Error> {
        Self::from_dynamic(value)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dynamic(value: serde_json::Value) -> DynamicValue {
        DynamicValue::from(value)
    }

    #[test]
    fn strings_resolve_to_text() {
        let value = DidValue::from_dynamic(&dynamic(json!("hello"))).unwrap();

        assert_eq!(value, DidValue::text("hello"));
    }

    #[test]
    fn objects_resolve_to_nested_records() {
        let value = DidValue::from_dynamic(&dynamic(json!({ "a": { "b": "c" } }))).unwrap();

        assert_eq!(
            value,
            DidValue::record([("a", DidValue::record([("b", DidValue::text("c"))]))])
        );
    }

    #[test]
    fn text_wrapper_short_circuits_record_path() {
        let wrapped = DidTag::Text.wrap(DynamicValue::from("v"));

        assert_eq!(DidValue::from_dynamic(&wrapped).unwrap(), DidValue::text("v"));
    }

    #[test]
    fn record_wrapper_resolves_fields_recursively() {
        let inner = DidTag::Text.wrap(DynamicValue::from("x"));
        let wrapped = DidTag::Record.wrap(DynamicValue::object([("field", inner)]));

        assert_eq!(
            DidValue::from_dynamic(&wrapped).unwrap(),
            DidValue::record([("field", DidValue::text("x"))])
        );
    }

    #[test]
    fn unknown_tag_errors_for_any_payload() {
        for payload in [json!("v"), json!({ "k": "v" }), json!(3), json!(null)] {
            let wrapped = dynamic(json!({ "__didType": "nat", "__didValue": payload }));
            let err = DidValue::from_dynamic(&wrapped).unwrap_err();

            assert!(
                matches!(&err, EncodeError::UnknownTag { tag } if tag == "nat"),
                "unexpected error: {err}"
            );
        }
    }

    #[test]
    fn wrapper_payload_is_not_reinterpreted() {
        let wrapped = dynamic(json!({ "__didType": "text", "__didValue": { "k": "v" } }));
        let err = DidValue::from_dynamic(&wrapped).unwrap_err();

        assert!(matches!(
            err,
            EncodeError::WrapperPayload {
                tag: DidTag::Text,
                ..
            }
        ));
    }

    #[test]
    fn non_string_tag_is_malformed() {
        let wrapped = dynamic(json!({ "__didType": true, "__didValue": "v" }));

        assert!(matches!(
            DidValue::from_dynamic(&wrapped),
            Err(EncodeError::MalformedWrapper { .. })
        ));
    }

    #[test]
    fn extra_keys_make_a_plain_record() {
        let value = dynamic(json!({ "__didType": "text", "__didValue": "v", "other": "o" }));

        let DidValue::Record(fields) = DidValue::from_dynamic(&value).unwrap() else {
            panic!("expected a record");
        };
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn primitive_kinds_are_not_coerced() {
        for value in [json!(true), json!(42), json!(["a"]), json!(null)] {
            let err = DidValue::from_dynamic(&dynamic(value)).unwrap_err();

            let EncodeError::Unsupported { attempts, .. } = &err else {
                panic!("unexpected error: {err}");
            };
            assert_eq!(attempts.len(), 3, "all interpretations listed: {err}");
        }
    }

    #[test]
    fn nested_failures_name_the_field() {
        let err = DidValue::from_dynamic(&dynamic(json!({ "outer": { "inner": 1 } }))).unwrap_err();
        let msg = err.to_string();

        assert!(msg.contains("'outer'"), "{msg}");
        assert!(std::error::Error::source(&err).is_some());
    }
}
