use crate::{
    Error, did,
    domain::ValidationError,
    dto::{Attr, DynamicValue},
};

///
/// resolve_arg
/// Produce the raw init/upgrade argument for a canister.
///
/// `arg_hex` is used verbatim, `arg` goes through the candid encoder, and
/// neither set means the empty blob (not an encoded `null`).
///

pub fn resolve_arg(arg: &Attr<DynamicValue>, arg_hex: &Attr<String>) -> Result<Vec<u8>, Error> {
    if arg.is_unknown() || arg.as_known().is_some_and(DynamicValue::contains_unknown) {
        return Err(ValidationError::UnknownValue { attribute: "arg" }.into());
    }
    if arg_hex.is_unknown() {
        return Err(ValidationError::UnknownValue {
            attribute: "arg_hex",
        }
        .into());
    }

    match (arg.as_known(), arg_hex.as_known()) {
        (Some(_), Some(_)) => Err(ValidationError::ArgConflict.into()),
        (None, Some(hex_str)) => {
            let bytes = hex::decode(hex_str.trim()).map_err(ValidationError::from)?;

            Ok(bytes)
        }
        (Some(value), None) => Ok(did::encode(value)?),
        (None, None) => Ok(Vec::new()),
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorClass;

    #[test]
    fn no_arg_is_the_empty_blob() {
        assert!(resolve_arg(&Attr::Null, &Attr::Null).unwrap().is_empty());
    }

    #[test]
    fn hex_is_used_verbatim() {
        let bytes = resolve_arg(&Attr::Null, &Attr::Known("4449444c0000".to_string())).unwrap();

        assert_eq!(bytes, b"DIDL\0\0");
    }

    #[test]
    fn empty_hex_is_the_empty_blob() {
        let bytes = resolve_arg(&Attr::Null, &Attr::Known(String::new())).unwrap();

        assert!(bytes.is_empty());
    }

    #[test]
    fn dynamic_arg_is_encoded() {
        let bytes = resolve_arg(&Attr::Known(DynamicValue::from("Salut")), &Attr::Null).unwrap();

        assert_eq!(bytes, did::encode(&DynamicValue::from("Salut")).unwrap());
    }

    #[test]
    fn both_set_is_a_conflict() {
        let err = resolve_arg(
            &Attr::Known(DynamicValue::from("a")),
            &Attr::Known(String::new()),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            Error::Validation(ValidationError::ArgConflict)
        ));
    }

    #[test]
    fn bad_hex_and_bad_values_are_local_errors() {
        let err = resolve_arg(&Attr::Null, &Attr::Known("zz".to_string())).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Validation);

        let err = resolve_arg(
            &Attr::Known(DynamicValue::Bool(true)),
            &Attr::Null,
        )
        .unwrap_err();
        assert_eq!(err.class(), ErrorClass::Encoding);
    }

    #[test]
    fn unknown_arg_is_rejected() {
        let err = resolve_arg(&Attr::Unknown, &Attr::Null).unwrap_err();

        assert!(err.is_local());
    }

    #[test]
    fn nested_unknown_arg_is_rejected() {
        let arg = DynamicValue::Object(
            [
                ("greeter".to_string(), DynamicValue::from("Salut")),
                ("owner".to_string(), DynamicValue::Unknown),
            ]
            .into_iter()
            .collect(),
        );

        let err = resolve_arg(&Attr::Known(arg), &Attr::Null).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::UnknownValue { attribute: "arg" })
        ));
    }
}
