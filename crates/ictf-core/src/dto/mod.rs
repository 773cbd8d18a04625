//!
//! Host-boundary data shapes.
//!
//! These mirror what the plugin host hands the provider (attribute values that
//! may be null or unknown, dynamic configuration values) and what it persists
//! (flat canister state).
//!

pub mod attr;
pub mod canister;
pub mod diag;
pub mod value;

pub use attr::Attr;
pub use canister::{CanisterModel, CanisterState};
pub use diag::{Diagnostic, Diagnostics, Severity};
pub use value::DynamicValue;

///
/// PRELUDE
///

pub mod prelude {
    pub use crate::dto::{Attr, DynamicValue};
    pub use serde::{Deserialize, Serialize};
    pub use std::collections::BTreeMap;
}
