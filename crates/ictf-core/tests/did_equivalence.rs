//! The dynamic-value encoder must produce exactly what textual candid does.

use ictf_core::{
    api::function::{did_record, did_text},
    did::{self, EncodeError},
    dto::DynamicValue,
};
use serde_json::json;

fn textual(idl: &str) -> Vec<u8> {
    candid_parser::parse_idl_args(idl)
        .unwrap()
        .to_bytes()
        .unwrap()
}

fn dynamic(value: serde_json::Value) -> Vec<u8> {
    did::encode(&DynamicValue::from(value)).unwrap()
}

#[test]
fn plain_text() {
    assert_eq!(dynamic(json!("hello")), textual(r#"("hello")"#));
}

#[test]
fn unicode_text() {
    assert_eq!(dynamic(json!("grüße 👋")), textual(r#"("grüße 👋")"#));
}

#[test]
fn flat_record() {
    assert_eq!(
        dynamic(json!({ "foo": "bar" })),
        textual(r#"(record { foo = "bar" })"#)
    );
}

#[test]
fn record_key_order_is_irrelevant() {
    let expected = textual(r#"(record { greeter = "hi"; suffix = "!" })"#);

    assert_eq!(dynamic(json!({ "greeter": "hi", "suffix": "!" })), expected);
    assert_eq!(dynamic(json!({ "suffix": "!", "greeter": "hi" })), expected);
    assert_eq!(
        textual(r#"(record { suffix = "!"; greeter = "hi" })"#),
        expected
    );
}

#[test]
fn nested_record() {
    assert_eq!(
        dynamic(json!({ "outer": { "inner": "x" }, "name": "n" })),
        textual(r#"(record { outer = record { inner = "x" }; name = "n" })"#)
    );
}

#[test]
fn text_wrapper_matches_plain_text() {
    let wrapped = did_text("Salut");

    assert_eq!(did::encode(&wrapped).unwrap(), textual(r#"("Salut")"#));
}

#[test]
fn record_wrapper_inside_record() {
    let value = DynamicValue::object([
        ("a", did_record(DynamicValue::from(json!({ "b": "c" })))),
        ("t", did_text("u")),
    ]);

    assert_eq!(
        did::encode(&value).unwrap(),
        textual(r#"(record { a = record { b = "c" }; t = "u" })"#)
    );
}

#[test]
fn wrapper_keys_take_precedence_over_record_reading() {
    // read as a record this would be `record { __didType; __didValue }`
    let value = json!({ "__didType": "text", "__didValue": "x" });

    assert_eq!(dynamic(value), textual(r#"("x")"#));
}

#[test]
fn wrapper_with_extra_key_is_a_plain_record() {
    let value = json!({ "__didType": "text", "__didValue": "x", "other": "y" });

    assert_eq!(
        dynamic(value),
        textual(r#"(record { __didType = "text"; __didValue = "x"; other = "y" })"#)
    );
}

#[test]
fn unknown_tag_is_named() {
    let value = DynamicValue::from(json!({ "__didType": "nat", "__didValue": "1" }));

    let err = did::encode(&value).unwrap_err();
    assert!(matches!(err, EncodeError::UnknownTag { ref tag } if tag == "nat"));
    assert!(err.to_string().contains("nat"));
}

#[test]
fn unsupported_value_lists_every_attempt() {
    let err = did::encode(&DynamicValue::from(json!(true))).unwrap_err();

    let EncodeError::Unsupported { attempts, .. } = &err else {
        panic!("expected unsupported, got {err:?}");
    };
    assert_eq!(attempts.len(), 3);
}
