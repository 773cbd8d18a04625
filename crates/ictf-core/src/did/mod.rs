//!
//! Candid encoding of dynamic configuration values.
//!
//! Terraform values are mapped to candid with a small set of heuristics:
//! strings become `text`, objects and maps become `record`s. A value can be
//! forced into a given interpretation with the two-field wrapper
//! `{ __didType = "text" | "record", __didValue = ... }`, which is what the
//! `did_text` and `did_record` provider functions produce.
//!

mod encode;
mod value;

pub use encode::{encode, encode_hex};
pub use value::{DidTag, DidValue, TYPE_KEY, VALUE_KEY};

use crate::ThisError;

///
/// EncodeError
///

#[derive(Debug, ThisError)]
pub enum EncodeError {
    #[error("unknown candid type tag '{tag}' in {TYPE_KEY}")]
    UnknownTag { tag: String },

    #[error("malformed {TYPE_KEY}/{VALUE_KEY} wrapper: {reason}")]
    MalformedWrapper { reason: String },

    #[error("cannot encode {tag} wrapper payload: {source}")]
    WrapperPayload {
        tag: DidTag,
        #[source]
        source: Box<Self>,
    },

    #[error("cannot encode record field '{field}': {source}")]
    Field {
        field: String,
        #[source]
        source: Box<Self>,
    },

    #[error("cannot encode {kind} value as candid: {}", attempts.join("; "))]
    Unsupported {
        kind: &'static str,
        attempts: Vec<String>,
    },

    #[error("candid serialization failed: {0}")]
    Candid(#[from] candid::Error),
}
