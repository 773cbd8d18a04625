//! Provider functions for building canister arguments.

use crate::{
    Error,
    did::{self, DidTag},
    dto::DynamicValue,
};

///
/// FunctionDefinition
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FunctionDefinition {
    pub name: &'static str,
    pub summary: &'static str,
    pub description: &'static str,
    pub parameter: &'static str,
    pub parameter_description: &'static str,
}

pub const DID_ENCODE: FunctionDefinition = FunctionDefinition {
    name: "did_encode",
    summary: "Encode Terraform values into candid values.",
    description: concat!(
        "The `did_encode` function transforms Terraform values into hex-encoded candid values. ",
        "It takes a single argument and applies heuristics to generate a candid value.\n",
        "Strings are encoded as candid text. Maps and objects are encoded as records unless ",
        "they consist of exactly the fields `__didType` and `__didValue`, in which case ",
        "`__didValue` is encoded as the type named by `__didType`. Prefer the `did_text` and ",
        "`did_record` helpers over writing those fields by hand.\n\n",
        "`\"hello\"` = `(\"hello\")`\n",
        "`{ foo = \"bar\" }` = `(record { foo = \"bar\" })`\n",
    ),
    parameter: "input",
    parameter_description: "The HCL value to candid-encode",
};

pub const DID_TEXT: FunctionDefinition = FunctionDefinition {
    name: "did_text",
    summary: "Mark a Terraform value as a candid text",
    description: "See the documentation for `did_encode`.",
    parameter: "input",
    parameter_description: "The Terraform string to candid-encode as candid text",
};

pub const DID_RECORD: FunctionDefinition = FunctionDefinition {
    name: "did_record",
    summary: "Mark a Terraform value as a candid record",
    description: "See the documentation for `did_encode`.",
    parameter: "input",
    parameter_description: "The HCL object to candid-encode as a candid record",
};

/// Every function the provider exposes.
#[must_use]
pub const fn definitions() -> [FunctionDefinition; 3] {
    [DID_ENCODE, DID_TEXT, DID_RECORD]
}

/// `did_encode(value)`: hex of the candid encoding.
pub fn did_encode(input: &DynamicValue) -> Result<String, Error> {
    Ok(did::encode_hex(input)?)
}

/// `did_text(string)`: wrapper forcing candid text.
#[must_use]
pub fn did_text(input: &str) -> DynamicValue {
    DidTag::Text.wrap(DynamicValue::string(input))
}

/// `did_record(value)`: wrapper forcing a candid record.
#[must_use]
pub fn did_record(input: DynamicValue) -> DynamicValue {
    DidTag::Record.wrap(input)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::did::{TYPE_KEY, VALUE_KEY};
    use serde_json::json;

    #[test]
    fn names_are_unique_and_described() {
        let defs = definitions();
        let names: Vec<_> = defs.iter().map(|d| d.name).collect();

        assert_eq!(names, ["did_encode", "did_text", "did_record"]);
        assert!(defs.iter().all(|d| !d.summary.is_empty()));
    }

    #[test]
    fn text_wrapper_has_exactly_two_keys() {
        let wrapped = did_text("hi");
        let object = wrapped.as_object().unwrap();

        assert_eq!(object.len(), 2);
        assert_eq!(object[TYPE_KEY].as_str(), Some("text"));
        assert_eq!(object[VALUE_KEY].as_str(), Some("hi"));
    }

    #[test]
    fn record_wrapper_encodes_like_a_plain_object() {
        let plain = DynamicValue::from(json!({ "greeter": "hi" }));

        assert_eq!(
            did_encode(&did_record(plain.clone())).unwrap(),
            did_encode(&plain).unwrap()
        );
    }

    #[test]
    fn encode_rejects_numbers() {
        assert!(did_encode(&DynamicValue::from(json!(3))).is_err());
    }
}
