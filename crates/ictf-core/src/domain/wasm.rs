use crate::domain::ValidationError;
use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

///
/// verify_checksum
/// Compare module bytes against an optional expected digest and return the
/// computed one. Comparison ignores hex case.
///

pub fn verify_checksum(bytes: &[u8], expected: Option<&str>) -> Result<String, ValidationError> {
    let actual = sha256_hex(bytes);

    match expected {
        Some(expected) if !expected.eq_ignore_ascii_case(&actual) => {
            Err(ValidationError::ChecksumMismatch {
                expected: expected.to_string(),
                actual,
            })
        }
        _ => Ok(actual),
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    // sha256("") is a well known constant
    const EMPTY_SHA: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn digest_of_empty_input() {
        assert_eq!(sha256_hex(b""), EMPTY_SHA);
    }

    #[test]
    fn matching_checksum_passes_in_any_case() {
        assert_eq!(verify_checksum(b"", Some(EMPTY_SHA)).unwrap(), EMPTY_SHA);
        assert!(verify_checksum(b"", Some(&EMPTY_SHA.to_uppercase())).is_ok());
        assert!(verify_checksum(b"", None).is_ok());
    }

    #[test]
    fn mismatch_reports_both_digests() {
        let err = verify_checksum(b"\0asm", Some(EMPTY_SHA)).unwrap_err();

        let ValidationError::ChecksumMismatch { expected, actual } = err else {
            panic!("expected mismatch");
        };
        assert_eq!(expected, EMPTY_SHA);
        assert_eq!(actual, sha256_hex(b"\0asm"));
    }
}
