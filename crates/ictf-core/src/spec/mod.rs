//!
//! Candid bindings for the system canisters the provider talks to.
//! Only the fields the provider sends or reads are modelled; candid record
//! subtyping lets the remote side fill in the rest.
//!

pub mod cmc;
pub mod ledger;
pub mod mgmt;

/// Shared imports for spec modules so type definitions stay concise.
pub mod prelude {
    pub use candid::{CandidType, Nat, Principal};
    pub use serde::Deserialize;
    pub use serde_bytes::ByteBuf;
}
