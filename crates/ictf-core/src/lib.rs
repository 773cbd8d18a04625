//! Core library behind the `ic` Terraform provider.
//!
//! The provider manages canisters on the Internet Computer: it creates them,
//! installs code with a candid-encoded argument, keeps their controller list
//! in sync, imports existing canisters and deletes them.
//!
//! ## Layering
//!
//! The crate keeps the host-facing surface thin and decisions centralized:
//! - `api/` is the host-facing surface (attributes, diagnostics, resource, functions).
//! - `workflow/` implements the canister lifecycle reconciler.
//! - `domain/` owns deterministic decision rules (install mode, lock-out check).
//! - `ops/` wraps remote calls with operation context and logging, and reads wasm files.
//! - `infra/` talks to the IC through `ic-agent` (client trait, identities, accounts).
//! - `did/` converts dynamic configuration values into candid bytes.
//! - `spec/` holds candid bindings for the management canister, ledger and CMC.
//!
//! The default flow is: api → workflow → domain → ops → infra.

pub mod api;
pub mod config;
pub mod did;
pub mod domain;
pub mod dto;
pub mod error;
pub mod infra;
pub mod log;
pub mod ops;
pub mod spec;
pub mod workflow;

pub use error::{Error, ErrorClass};

pub(crate) use thiserror::Error as ThisError;

///
/// Crate Version
///

pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
