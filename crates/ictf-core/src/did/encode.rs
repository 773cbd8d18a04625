use crate::{
    did::{DidValue, EncodeError},
    dto::DynamicValue,
    log,
    log::Topic,
};
use candid::types::{
    Label,
    value::{IDLArgs, IDLField, IDLValue},
};

impl DidValue {
    /// Convert into a candid value. Record fields are ordered by field hash,
    /// matching what the textual candid parser produces.
    #[must_use]
    pub fn to_idl(&self) -> IDLValue {
        match self {
            Self::Text(s) => IDLValue::Text(s.clone()),
            Self::Record(fields) => {
                let mut fields: Vec<IDLField> = fields
                    .iter()
                    .map(|(name, value)| IDLField {
                        id: Label::Named(name.clone()),
                        val: value.to_idl(),
                    })
                    .collect();
                fields.sort_by_key(|field| field.id.get_id());

                IDLValue::Record(fields)
            }
        }
    }

    /// Serialize as a single-element candid argument list.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let bytes = IDLArgs::new(&[self.to_idl()]).to_bytes()?;

        Ok(bytes)
    }
}

/// Encode a dynamic configuration value as candid argument bytes.
pub fn encode(value: &DynamicValue) -> Result<Vec<u8>, EncodeError> {
    let did = DidValue::from_dynamic(value)?;
    let bytes = did.to_bytes()?;

    log!(
        Topic::Did,
        Debug,
        "encoded {} value into {} bytes",
        value.kind(),
        bytes.len()
    );

    Ok(bytes)
}

/// Encode a dynamic configuration value and hex-encode the result.
pub fn encode_hex(value: &DynamicValue) -> Result<String, EncodeError> {
    encode(value).map(hex::encode)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use candid::{CandidType, Decode, Deserialize, Encode};
    use serde_json::json;

    #[derive(CandidType, Debug, Deserialize, PartialEq)]
    struct Greeter {
        greeter: String,
        suffix: String,
    }

    #[test]
    fn text_matches_typed_candid_encoding() {
        let bytes = encode(&DynamicValue::from("Salut")).unwrap();

        assert_eq!(bytes, Encode!(&"Salut".to_string()).unwrap());
    }

    #[test]
    fn record_decodes_into_matching_struct() {
        let value = DynamicValue::from(json!({ "suffix": "!", "greeter": "hi" }));
        let bytes = encode(&value).unwrap();

        let decoded = Decode!(&bytes, Greeter).unwrap();
        assert_eq!(
            decoded,
            Greeter {
                greeter: "hi".to_string(),
                suffix: "!".to_string(),
            }
        );
    }

    #[test]
    fn text_decodes_as_optional_text() {
        let bytes = encode(&DynamicValue::from("Hello")).unwrap();

        let decoded = Decode!(&bytes, Option<String>).unwrap();
        assert_eq!(decoded.as_deref(), Some("Hello"));
    }

    #[test]
    fn hex_output_is_lowercase_didl() {
        let hex = encode_hex(&DynamicValue::from("x")).unwrap();

        // "DIDL" magic
        assert!(hex.starts_with("4449444c"), "{hex}");
        assert_eq!(hex, hex.to_lowercase());
    }

    #[test]
    fn unsupported_values_fail_before_serialization() {
        assert!(encode(&DynamicValue::from(json!(1))).is_err());
    }
}
