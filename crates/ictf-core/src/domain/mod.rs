//!
//! Deterministic rules used by the canister reconciler.
//!
//! Nothing in here talks to the network; every function is a pure decision
//! over already-loaded inputs so it can be tested in isolation.
//!

pub mod arg;
pub mod policy;
pub mod wasm;

use crate::ThisError;
use std::path::PathBuf;

///
/// ValidationError
/// Local validation failures raised before any remote call.
///

#[derive(Debug, ThisError)]
pub enum ValidationError {
    #[error("'arg' and 'arg_hex' cannot both be set")]
    ArgConflict,

    #[error("'arg_hex' is not valid hex: {0}")]
    InvalidArgHex(#[from] hex::FromHexError),

    #[error("'{attribute}' is still unknown at apply time")]
    UnknownValue { attribute: &'static str },

    #[error("sha256 mismatch for wasm module: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("could not read wasm module '{}': {source}", path.display())]
    WasmRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{attribute}' contains an invalid principal '{value}': {reason}")]
    InvalidPrincipal {
        attribute: &'static str,
        value: String,
        reason: String,
    },

    #[error("controllers are not set")]
    ControllersNotSet,

    #[error("canister id is not set")]
    MissingId,
}
