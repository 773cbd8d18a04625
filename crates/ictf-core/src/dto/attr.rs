use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::Error as _};

///
/// Attr
///
/// A single attribute value as seen by the plugin host.
///
/// During planning a value may be `Unknown` (it depends on something that is
/// only known after apply). Persisted state never contains unknown values.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Attr<T> {
    #[default]
    Null,
    Unknown,
    Known(T),
}

impl<T> Attr<T> {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Null or unknown: nothing concrete to act on yet.
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        !matches!(self, Self::Known(_))
    }

    #[must_use]
    pub const fn as_known(&self) -> Option<&T> {
        match self {
            Self::Known(value) => Some(value),
            Self::Null | Self::Unknown => None,
        }
    }
}

impl<T> From<Option<T>> for Attr<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Known)
    }
}

impl<T: Serialize> Serialize for Attr<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Known(value) => serializer.serialize_some(value),
            Self::Unknown => Err(S::Error::custom(
                "unknown attribute values cannot be serialized",
            )),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Attr<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    struct Holder {
        #[serde(default)]
        value: Attr<String>,
    }

    #[test]
    fn missing_and_null_fields_read_as_null() {
        let missing: Holder = serde_json::from_str("{}").unwrap();
        let null: Holder = serde_json::from_str(r#"{"value":null}"#).unwrap();

        assert!(missing.value.is_null());
        assert!(null.value.is_null());
    }

    #[test]
    fn known_values_round_trip_through_json() {
        let holder: Holder = serde_json::from_str(r#"{"value":"abc"}"#).unwrap();
        assert_eq!(holder.value, Attr::Known("abc".to_string()));

        let json = serde_json::to_string(&holder).unwrap();
        assert_eq!(json, r#"{"value":"abc"}"#);
    }

    #[test]
    fn unknown_values_refuse_to_serialize() {
        let holder = Holder {
            value: Attr::Unknown,
        };

        assert!(serde_json::to_string(&holder).is_err());
        assert!(holder.value.is_unset());
    }
}
